use std::cmp::Ordering;

use tracing::debug;

use crate::core::distance::DistanceMatrix;
use crate::models::{ClubTravel, Coordinate, DistanceAnalytics, DistanceRecord, LeagueTravel, Partition};

/// Derive travel figures from a finalized partition
///
/// Pure: reads the partition and its club coordinates, mutates nothing.
/// "Away" means every other club of the same league, one trip each.
pub fn analyze(partition: &Partition) -> DistanceAnalytics {
    let coords: Vec<Coordinate> = partition.clubs.iter().map(|c| c.coordinate).collect();
    let matrix = DistanceMatrix::from_coordinates(&coords);
    let n = partition.num_clubs();

    let mut all_pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let same = partition.assignment[i] == partition.assignment[j];
            all_pairs.push(DistanceRecord::new(
                &partition.clubs[i].name,
                &partition.clubs[j].name,
                matrix.get(i, j),
                same.then(|| partition.leagues[partition.assignment[i]].name.clone()),
            ));
        }
    }

    let mut longest_trips: Vec<DistanceRecord> =
        all_pairs.iter().filter(|r| r.league.is_some()).cloned().collect();
    longest_trips.sort_by(trip_order);

    let mut clubs = Vec::with_capacity(n);
    let mut leagues = Vec::with_capacity(partition.num_leagues());
    for league in &partition.leagues {
        let mut members = partition.member_indices(league.ordinal);
        members.sort_by(|&a, &b| partition.clubs[a].name.cmp(&partition.clubs[b].name));

        let mut avg_sum = 0.0;
        let mut max_pair: Option<DistanceRecord> = None;
        for (x, &i) in members.iter().enumerate() {
            for &j in &members[x + 1..] {
                let record = DistanceRecord::new(
                    &partition.clubs[i].name,
                    &partition.clubs[j].name,
                    matrix.get(i, j),
                    Some(league.name.clone()),
                );
                if max_pair.as_ref().map_or(true, |m| trip_order(&record, m) == Ordering::Less) {
                    max_pair = Some(record);
                }
            }

            let trips: Vec<f64> = members
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| matrix.get(i, j))
                .collect();
            let season_away_km: f64 = trips.iter().sum();
            let avg_away_km = if trips.is_empty() {
                0.0
            } else {
                season_away_km / trips.len() as f64
            };
            avg_sum += avg_away_km;
            clubs.push(ClubTravel {
                club: partition.clubs[i].name.clone(),
                league: league.name.clone(),
                away_games: trips.len(),
                avg_away_km,
                season_away_km,
                longest_trip_km: trips.iter().copied().fold(0.0, f64::max),
            });
        }

        let avg_away_km = if members.is_empty() {
            0.0
        } else {
            avg_sum / members.len() as f64
        };
        leagues.push(LeagueTravel {
            league: league.name.clone(),
            ordinal: league.ordinal,
            clubs: members.len(),
            avg_away_km,
            total_pairwise_km: matrix.pairwise_sum(&members),
            max_pair,
        });
    }

    debug!(
        "Analyzed {} partition: {} pairs, {} same-league trips",
        partition.strategy,
        all_pairs.len(),
        longest_trips.len()
    );

    DistanceAnalytics {
        clubs,
        leagues,
        longest_trips,
        all_pairs,
    }
}

/// Longest first, ties by club names
fn trip_order(a: &DistanceRecord, b: &DistanceRecord) -> Ordering {
    b.distance_km
        .total_cmp(&a.distance_km)
        .then_with(|| a.club_a.cmp(&b.club_a))
        .then_with(|| a.club_b.cmp(&b.club_b))
}
