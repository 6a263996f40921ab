use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::SeasonTag;

/// One club as handed over by the data-collection side
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClubRecord {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(alias = "lat", default)]
    pub latitude: Option<f64>,
    #[serde(alias = "lon", alias = "lng", default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub tags: Vec<SeasonTag>,
}

impl ClubRecord {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            tags: vec![],
        }
    }

    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latitude: None,
            longitude: None,
            tags: vec![],
        }
    }
}

/// Partitioning options consumed by the engine
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PartitionConfig {
    #[validate(range(min = 1))]
    #[serde(rename = "leagueCount", alias = "league_count")]
    pub league_count: usize,
    #[validate(range(min = 1))]
    #[serde(rename = "leagueCapacity", alias = "league_capacity")]
    pub league_capacity: usize,
    #[serde(rename = "leagueNames", alias = "league_names", default)]
    pub league_names: Vec<String>,
    #[serde(rename = "compassNames", alias = "compass_names", default = "default_true")]
    pub compass_names: bool,
    #[serde(rename = "enforceDerbySameLeague", alias = "enforce_derby_same_league", default)]
    pub enforce_derby_same_league: bool,
    #[serde(rename = "derbyPairs", alias = "derby_pairs", default)]
    pub derby_pairs: Vec<(String, String)>,
    #[validate(range(exclusive_min = 0.0))]
    #[serde(rename = "derbyMaxDistanceKm", alias = "derby_max_distance_km", default)]
    pub derby_max_distance_km: Option<f64>,
    #[serde(rename = "enableMatrixVariant", alias = "enable_matrix_variant", default = "default_true")]
    pub enable_matrix_variant: bool,
    #[validate(range(min = 1))]
    #[serde(rename = "centroidMaxPasses", alias = "centroid_max_passes", default = "default_centroid_max_passes")]
    pub centroid_max_passes: usize,
    #[validate(range(min = 1))]
    #[serde(rename = "matrixMaxPasses", alias = "matrix_max_passes", default = "default_matrix_max_passes")]
    pub matrix_max_passes: usize,
}

impl PartitionConfig {
    pub fn new(league_count: usize, league_capacity: usize) -> Self {
        Self {
            league_count,
            league_capacity,
            ..Self::default()
        }
    }

    pub fn total_capacity(&self) -> usize {
        self.league_count * self.league_capacity
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            league_count: 4,
            league_capacity: 20,
            league_names: vec![],
            compass_names: true,
            enforce_derby_same_league: false,
            derby_pairs: vec![],
            derby_max_distance_km: None,
            enable_matrix_variant: true,
            centroid_max_passes: default_centroid_max_passes(),
            matrix_max_passes: default_matrix_max_passes(),
        }
    }
}

fn default_true() -> bool {
    true
}

pub(crate) fn default_centroid_max_passes() -> usize {
    100
}

pub(crate) fn default_matrix_max_passes() -> usize {
    200
}
