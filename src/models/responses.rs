use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::domain::{Partition, Strategy};

/// Distance between two clubs, stored with `club_a < club_b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceRecord {
    #[serde(rename = "clubA")]
    pub club_a: String,
    #[serde(rename = "clubB")]
    pub club_b: String,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    /// Shared league name when both clubs play in the same league
    pub league: Option<String>,
}

impl DistanceRecord {
    pub fn new(a: &str, b: &str, distance_km: f64, league: Option<String>) -> Self {
        let (club_a, club_b) = if a <= b { (a, b) } else { (b, a) };
        Self {
            club_a: club_a.to_string(),
            club_b: club_b.to_string(),
            distance_km,
            league,
        }
    }

    pub fn involves(&self, club: &str) -> bool {
        self.club_a == club || self.club_b == club
    }
}

/// Travel burden of one club within its league
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubTravel {
    pub club: String,
    pub league: String,
    #[serde(rename = "awayGames")]
    pub away_games: usize,
    #[serde(rename = "avgAwayKm")]
    pub avg_away_km: f64,
    #[serde(rename = "seasonAwayKm")]
    pub season_away_km: f64,
    #[serde(rename = "longestTripKm")]
    pub longest_trip_km: f64,
}

/// Aggregated travel figures of one league
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueTravel {
    pub league: String,
    pub ordinal: usize,
    pub clubs: usize,
    #[serde(rename = "avgAwayKm")]
    pub avg_away_km: f64,
    #[serde(rename = "totalPairwiseKm")]
    pub total_pairwise_km: f64,
    #[serde(rename = "maxPair")]
    pub max_pair: Option<DistanceRecord>,
}

/// Travel analytics derived from one partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceAnalytics {
    pub clubs: Vec<ClubTravel>,
    pub leagues: Vec<LeagueTravel>,
    /// Same-league pairs, longest first
    #[serde(rename = "longestTrips")]
    pub longest_trips: Vec<DistanceRecord>,
    /// Every club pair exactly once
    #[serde(rename = "allPairs")]
    pub all_pairs: Vec<DistanceRecord>,
}

impl DistanceAnalytics {
    pub fn per_club_avg_away_km(&self) -> BTreeMap<&str, f64> {
        self.clubs
            .iter()
            .map(|c| (c.club.as_str(), c.avg_away_km))
            .collect()
    }

    pub fn per_league_avg_km(&self) -> BTreeMap<&str, f64> {
        self.leagues
            .iter()
            .map(|l| (l.league.as_str(), l.avg_away_km))
            .collect()
    }

    pub fn longest_trip(&self) -> Option<&DistanceRecord> {
        self.longest_trips.first()
    }

    /// Club with the highest season away distance
    pub fn busiest_club(&self) -> Option<&ClubTravel> {
        self.clubs.iter().fold(None, |best: Option<&ClubTravel>, c| match best {
            Some(b) if b.season_away_km >= c.season_away_km => Some(b),
            _ => Some(c),
        })
    }

    pub fn overall_avg_away_km(&self) -> f64 {
        if self.clubs.is_empty() {
            return 0.0;
        }
        self.clubs.iter().map(|c| c.avg_away_km).sum::<f64>() / self.clubs.len() as f64
    }
}

/// Club placed in a different league by the candidate partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedClub {
    pub club: String,
    #[serde(rename = "fromLeague")]
    pub from_league: String,
    #[serde(rename = "toLeague")]
    pub to_league: String,
}

/// Difference between a baseline and a candidate partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub baseline: Strategy,
    pub candidate: Strategy,
    #[serde(rename = "movedClubs")]
    pub moved_clubs: Vec<MovedClub>,
    /// Candidate total minus baseline total; negative means the candidate improved
    #[serde(rename = "objectiveDeltaKm")]
    pub objective_delta_km: f64,
    #[serde(rename = "avgAwayDeltaKm")]
    pub avg_away_delta_km: f64,
}

/// Partition together with its analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedPartition {
    pub partition: Partition,
    pub analytics: DistanceAnalytics,
}

/// Everything a full partitioning run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionOutcome {
    pub centroid: AnalyzedPartition,
    pub matrix: Option<AnalyzedPartition>,
    pub comparison: Option<ComparisonReport>,
}

impl PartitionOutcome {
    /// Matrix result when it was computed, centroid result otherwise
    pub fn primary(&self) -> &AnalyzedPartition {
        self.matrix.as_ref().unwrap_or(&self.centroid)
    }
}

/// Run envelope written by the binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(rename = "runId")]
    pub run_id: uuid::Uuid,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub outcome: PartitionOutcome,
}
