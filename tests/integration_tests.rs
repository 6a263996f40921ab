// Integration tests for Kompass Leagues

mod common;

use std::collections::BTreeSet;

use common::{germany_clubs, germany_records, GERMANY_80};
use kompass_leagues::core::distance::{haversine_distance, DistanceMatrix};
use kompass_leagues::core::{DerbyRules, DerbyUnits};
use kompass_leagues::models::{Coordinate, Partition};
use kompass_leagues::{
    ClubRecord, ClubSet, PartitionConfig, PartitionError, Partitioner, RunReport, Strategy,
};

fn partitioner() -> Partitioner {
    Partitioner::new(PartitionConfig::new(4, 20)).unwrap()
}

#[test]
fn test_integration_four_leagues_of_twenty() {
    let outcome = partitioner().run(&germany_clubs()).unwrap();
    let matrix = outcome.matrix.as_ref().unwrap();

    for analyzed in [&outcome.centroid, matrix] {
        let partition = &analyzed.partition;
        assert_eq!(partition.num_clubs(), 80);
        assert_eq!(partition.league_sizes(), vec![20; 4]);
        assert!(partition.validate().is_ok());

        let names: BTreeSet<&str> = partition.leagues.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, BTreeSet::from(["Nord", "Ost", "Süd", "West"]));
        assert_eq!(partition.leagues[0].name, "Nord");
        assert_eq!(partition.leagues[3].name, "Süd");

        for (league, avg) in analyzed.analytics.per_league_avg_km() {
            assert!(avg > 20.0 && avg < 400.0, "{} averages {:.1} km", league, avg);
        }
    }

    assert_eq!(matrix.partition.league_of("VfB Lübeck").unwrap().name, "Nord");
    assert_eq!(matrix.partition.league_of("FC Bayern München II").unwrap().name, "Süd");
}

#[test]
fn test_integration_longest_trip_matches_brute_force() {
    let outcome = partitioner().run(&germany_clubs()).unwrap();
    let primary = outcome.primary();
    let partition = &primary.partition;

    let mut expected = 0.0_f64;
    for i in 0..partition.num_clubs() {
        for j in (i + 1)..partition.num_clubs() {
            if partition.assignment[i] == partition.assignment[j] {
                let (a, b) = (partition.clubs[i].coordinate, partition.clubs[j].coordinate);
                expected = expected.max(haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude));
            }
        }
    }

    let longest = primary.analytics.longest_trip().unwrap();
    assert!((longest.distance_km - expected).abs() < 1e-9);
    assert_eq!(
        partition.league_of(&longest.club_a).unwrap().name,
        partition.league_of(&longest.club_b).unwrap().name
    );
}

#[test]
fn test_integration_all_pairs_count() {
    let outcome = partitioner().run(&germany_clubs()).unwrap();
    assert_eq!(outcome.primary().analytics.all_pairs.len(), 80 * 79 / 2);
    assert_eq!(outcome.primary().analytics.longest_trips.len(), 4 * 20 * 19 / 2);
    assert_eq!(outcome.primary().analytics.clubs.len(), 80);
}

#[test]
fn test_integration_matrix_not_worse_than_centroid() {
    let outcome = partitioner().run(&germany_clubs()).unwrap();
    let comparison = outcome.comparison.as_ref().unwrap();

    assert_eq!(comparison.baseline, Strategy::Centroid);
    assert_eq!(comparison.candidate, Strategy::Matrix);
    assert!(comparison.objective_delta_km <= 1e-6, "delta {}", comparison.objective_delta_km);

    let matrix = &outcome.matrix.as_ref().unwrap().partition;
    for moved in &comparison.moved_clubs {
        assert_eq!(outcome.centroid.partition.league_of(&moved.club).unwrap().name, moved.from_league);
        assert_eq!(matrix.league_of(&moved.club).unwrap().name, moved.to_league);
    }
}

#[test]
fn test_integration_matrix_is_idempotent() {
    let clubs = germany_clubs();
    let first = partitioner().partition(&clubs, Strategy::Matrix).unwrap();
    let second = partitioner().partition(&clubs, Strategy::Matrix).unwrap();
    assert_eq!(first.assignment, second.assignment);
    assert_eq!(first.objective, second.objective);
}

#[test]
fn test_integration_derby_pair_shares_league() {
    let mut config = PartitionConfig::new(4, 20);
    config.enforce_derby_same_league = true;
    config.derby_pairs = vec![("Kickers Emden".to_string(), "FC Memmingen".to_string())];
    let outcome = Partitioner::new(config).unwrap().run(&germany_clubs()).unwrap();

    for analyzed in [&outcome.centroid, outcome.matrix.as_ref().unwrap()] {
        let partition = &analyzed.partition;
        assert_eq!(
            partition.league_of("Kickers Emden").unwrap().name,
            partition.league_of("FC Memmingen").unwrap().name
        );
        assert_eq!(partition.league_sizes(), vec![20; 4]);
    }
}

#[test]
fn test_integration_derby_names_match_by_key() {
    let mut config = PartitionConfig::new(4, 20);
    config.enforce_derby_same_league = true;
    config.derby_pairs = vec![("bsg chemie leipzig".to_string(), "Hertha 03 Zehlendorf".to_string())];
    let partition = Partitioner::new(config)
        .unwrap()
        .partition(&germany_clubs(), Strategy::Centroid)
        .unwrap();
    assert_eq!(
        partition.league_of("BSG Chemie Leipzig").unwrap().name,
        partition.league_of("Hertha 03 Zehlendorf").unwrap().name
    );
}

fn same_league(partition: &Partition, clubs: &[&str]) -> bool {
    let leagues: BTreeSet<&str> = clubs
        .iter()
        .map(|c| partition.league_of(c).unwrap().name.as_str())
        .collect();
    leagues.len() == 1
}

#[test]
fn test_integration_three_club_derby_group_stays_together() {
    let clubs = ClubSet::from_records(vec![
        ClubRecord::new("Holstein Kiel II", 54.349, 10.124),
        ClubRecord::new("VfB Lübeck", 53.871, 10.661),
        ClubRecord::new("SpVgg Unterhaching", 48.068, 11.612),
        ClubRecord::new("TSV Buchbach", 48.317, 12.267),
        ClubRecord::new("Fortuna Köln", 50.918, 6.935),
        ClubRecord::new("Wuppertaler SV", 51.253, 7.150),
        ClubRecord::new("Sportfreunde Siegen", 50.874, 8.024),
        ClubRecord::new("BSG Chemie Leipzig", 51.339, 12.373),
    ])
    .unwrap();
    let mut config = PartitionConfig::new(2, 4);
    config.enforce_derby_same_league = true;
    config.derby_pairs = vec![
        ("Holstein Kiel II".to_string(), "VfB Lübeck".to_string()),
        ("SpVgg Unterhaching".to_string(), "TSV Buchbach".to_string()),
        ("Fortuna Köln".to_string(), "Wuppertaler SV".to_string()),
        ("Wuppertaler SV".to_string(), "Sportfreunde Siegen".to_string()),
    ];
    let partitioner = Partitioner::new(config).unwrap();
    let group = ["Fortuna Köln", "Wuppertaler SV", "Sportfreunde Siegen"];

    let centroid = partitioner.partition(&clubs, Strategy::Centroid).unwrap();
    let matrix = partitioner.partition(&clubs, Strategy::Matrix).unwrap();
    let outcome = partitioner.run(&clubs).unwrap();

    for partition in [&centroid, &matrix, &outcome.centroid.partition, &outcome.primary().partition] {
        assert!(same_league(partition, &group), "{:?}", partition.assignment);
        assert!(same_league(partition, &["Holstein Kiel II", "VfB Lübeck"]));
        assert!(same_league(partition, &["SpVgg Unterhaching", "TSV Buchbach"]));
        assert_eq!(partition.league_sizes(), vec![4, 4]);
    }
    assert!(outcome.comparison.unwrap().objective_delta_km <= 1e-6);
}

#[test]
fn test_integration_proximity_derbies() {
    let clubs = germany_clubs();
    let coords: Vec<Coordinate> = GERMANY_80
        .iter()
        .map(|&(_, lat, lon)| Coordinate::new(lat, lon).unwrap())
        .collect();
    let matrix = DistanceMatrix::from_coordinates(&coords);

    for radius in [15.0, 50.0, 100.0] {
        let mut config = PartitionConfig::new(4, 20);
        config.enforce_derby_same_league = true;
        config.derby_max_distance_km = Some(radius);
        let outcome = Partitioner::new(config).unwrap().run(&clubs).unwrap();

        let rules = DerbyRules {
            enforce: true,
            pairs: vec![],
            max_distance_km: Some(radius),
        };
        let units = DerbyUnits::build(&clubs, &matrix, &rules, 20);
        for analyzed in [&outcome.centroid, outcome.matrix.as_ref().unwrap()] {
            let partition = &analyzed.partition;
            assert_eq!(partition.league_sizes(), vec![20; 4], "radius {}", radius);
            for unit in units.iter().filter(|u| u.is_bound()) {
                let first = partition.assignment[unit.members[0]];
                assert!(
                    unit.members.iter().all(|&c| partition.assignment[c] == first),
                    "radius {}: derby group {:?} split",
                    radius,
                    unit.members
                );
            }
        }

        let delta = outcome.comparison.unwrap().objective_delta_km;
        assert!(delta <= 1e-6, "radius {}: delta {}", radius, delta);
    }
}

#[test]
fn test_integration_capacity_mismatch() {
    let records: Vec<ClubRecord> = germany_records().into_iter().take(79).collect();
    let clubs = ClubSet::from_records(records).unwrap();

    let err = partitioner().run(&clubs).unwrap_err();
    assert_eq!(err, PartitionError::CapacityMismatch { clubs: 79, capacity: 80 });
}

#[test]
fn test_integration_unresolved_coordinate() {
    let mut records = germany_records();
    records[10] = ClubRecord::unresolved(GERMANY_80[10].0);
    let clubs = ClubSet::from_records(records).unwrap();

    for strategy in [Strategy::Centroid, Strategy::Matrix] {
        let err = partitioner().partition(&clubs, strategy).unwrap_err();
        assert_eq!(
            err,
            PartitionError::UnresolvedCoordinate {
                clubs: vec!["VfB Oldenburg".to_string()]
            }
        );
    }
}

#[test]
fn test_integration_custom_league_names() {
    let mut config = PartitionConfig::new(2, 40);
    config.league_names = vec!["Staffel Nord".to_string(), "Staffel Süd".to_string()];
    let outcome = Partitioner::new(config).unwrap().run(&germany_clubs()).unwrap();
    let partition = &outcome.primary().partition;

    assert_eq!(partition.league_sizes(), vec![40, 40]);
    assert_eq!(partition.league_of("SC Weiche Flensburg 08").unwrap().name, "Staffel Nord");
    assert_eq!(partition.league_of("SC Freiburg II").unwrap().name, "Staffel Süd");
}

#[test]
fn test_integration_explicit_names_win_over_compass() {
    let mut config = PartitionConfig::new(4, 20);
    config.compass_names = true;
    config.league_names = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
    let outcome = Partitioner::new(config).unwrap().run(&germany_clubs()).unwrap();

    for analyzed in [&outcome.centroid, outcome.matrix.as_ref().unwrap()] {
        let names: Vec<&str> = analyzed.partition.leagues.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }
    assert_eq!(outcome.primary().partition.league_of("VfB Lübeck").unwrap().name, "A");
}

#[test]
fn test_integration_report_serializes() {
    let outcome = partitioner().run(&germany_clubs()).unwrap();
    let report = RunReport {
        run_id: uuid::Uuid::new_v4(),
        generated_at: chrono::Utc::now(),
        version: "test".to_string(),
        outcome,
    };
    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("runId").is_some());
    assert!(json["outcome"]["comparison"].is_object());
    assert_eq!(json["outcome"]["matrix"]["partition"]["strategy"], "matrix");
}
