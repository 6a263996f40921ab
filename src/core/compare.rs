use std::collections::BTreeMap;

use tracing::debug;

use crate::core::error::PartitionError;
use crate::models::{ComparisonReport, MovedClub, Partition};

/// Diff two partitions of the same club set
///
/// Leagues are matched by name, so both sides must come out of the same
/// finalization (canonical slot order and naming). Moved clubs are listed by name.
pub fn compare(baseline: &Partition, candidate: &Partition) -> Result<ComparisonReport, PartitionError> {
    let base: BTreeMap<&str, &str> = league_by_club(baseline);
    let cand: BTreeMap<&str, &str> = league_by_club(candidate);

    if base.len() != cand.len() || base.keys().any(|name| !cand.contains_key(name)) {
        let missing: Vec<&str> = base
            .keys()
            .filter(|name| !cand.contains_key(*name))
            .chain(cand.keys().filter(|name| !base.contains_key(*name)))
            .copied()
            .collect();
        return Err(PartitionError::ClubSetMismatch(format!(
            "clubs not present in both partitions: {}",
            missing.join(", ")
        )));
    }

    let moved_clubs: Vec<MovedClub> = base
        .iter()
        .filter_map(|(&club, &from)| {
            let to = cand[club];
            (from != to).then(|| MovedClub {
                club: club.to_string(),
                from_league: from.to_string(),
                to_league: to.to_string(),
            })
        })
        .collect();

    let report = ComparisonReport {
        baseline: baseline.strategy,
        candidate: candidate.strategy,
        objective_delta_km: candidate.objective.total_intra_km - baseline.objective.total_intra_km,
        avg_away_delta_km: candidate.objective.avg_away_km - baseline.objective.avg_away_km,
        moved_clubs,
    };
    debug!(
        "Compared {} -> {}: {} clubs moved, delta {:.1} km",
        report.baseline,
        report.candidate,
        report.moved_clubs.len(),
        report.objective_delta_km
    );
    Ok(report)
}

fn league_by_club(partition: &Partition) -> BTreeMap<&str, &str> {
    partition
        .clubs
        .iter()
        .zip(&partition.assignment)
        .map(|(club, &slot)| (club.name.as_str(), partition.leagues[slot].name.as_str()))
        .collect()
}
