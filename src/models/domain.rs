use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::error::PartitionError;

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, returning `None` if it is NaN or out of range
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self { latitude, longitude })
    }
}

/// Season-transition markers, only consumed by downstream rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonTag {
    Relegated,
    Promoted,
    ReformEntrant,
    RelegatedFromThirdTier,
    PromotedFromFifthTier,
}

/// Club as delivered by the data-collection side, coordinate possibly unresolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub name: String,
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub tags: BTreeSet<SeasonTag>,
}

impl Club {
    pub fn new(name: impl Into<String>, coordinate: Option<Coordinate>) -> Self {
        Self {
            name: name.into(),
            coordinate,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tag(mut self, tag: SeasonTag) -> Self {
        self.tags.insert(tag);
        self
    }

    /// Resolved coordinate, or `MissingCoordinate` naming this club
    pub fn coordinate(&self) -> Result<Coordinate, PartitionError> {
        self.coordinate
            .ok_or_else(|| PartitionError::MissingCoordinate(self.name.clone()))
    }

    pub fn is_resolved(&self) -> bool {
        self.coordinate.is_some()
    }
}

/// Club with a known position; the only kind a partition holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedClub {
    pub name: String,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub tags: BTreeSet<SeasonTag>,
}

impl TryFrom<&Club> for ResolvedClub {
    type Error = PartitionError;

    fn try_from(club: &Club) -> Result<Self, Self::Error> {
        Ok(Self {
            name: club.name.clone(),
            coordinate: club.coordinate()?,
            tags: club.tags.clone(),
        })
    }
}

/// Fixed-capacity output group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub name: String,
    pub ordinal: usize,
    pub capacity: usize,
}

impl League {
    pub fn new(name: impl Into<String>, ordinal: usize, capacity: usize) -> Self {
        Self {
            name: name.into(),
            ordinal,
            capacity,
        }
    }

    /// `count` leagues of equal capacity; missing names become "Liga N"
    pub fn uniform(count: usize, capacity: usize, names: &[String]) -> Vec<League> {
        (0..count)
            .map(|ordinal| {
                let name = names
                    .get(ordinal)
                    .cloned()
                    .unwrap_or_else(|| format!("Liga {}", ordinal + 1));
                League::new(name, ordinal, capacity)
            })
            .collect()
    }
}

/// Optimization objective used to build a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Centroid,
    Matrix,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Centroid => write!(f, "centroid"),
            Strategy::Matrix => write!(f, "matrix"),
        }
    }
}

/// Achieved objective values of a partition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// Sum of all intra-league pairwise distances
    #[serde(rename = "totalIntraKm")]
    pub total_intra_km: f64,
    /// Mean over clubs of their average away distance
    #[serde(rename = "avgAwayKm")]
    pub avg_away_km: f64,
}

/// Whether the optimizer stopped on its own or at the pass ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Convergence {
    pub converged: bool,
    pub passes: usize,
}

/// Complete, capacity-valid assignment of every club to one league
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub strategy: Strategy,
    pub leagues: Vec<League>,
    pub clubs: Vec<ResolvedClub>,
    /// League ordinal per entry of `clubs`
    pub assignment: Vec<usize>,
    pub objective: Objective,
    pub convergence: Convergence,
}

impl Partition {
    pub fn num_clubs(&self) -> usize {
        self.clubs.len()
    }

    pub fn num_leagues(&self) -> usize {
        self.leagues.len()
    }

    /// League a club was placed in, looked up by exact name
    pub fn league_of(&self, club_name: &str) -> Option<&League> {
        self.clubs
            .iter()
            .position(|c| c.name == club_name)
            .map(|i| &self.leagues[self.assignment[i]])
    }

    /// Club indices of one league, in club order
    pub fn member_indices(&self, ordinal: usize) -> Vec<usize> {
        self.assignment
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == ordinal)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn members(&self, ordinal: usize) -> impl Iterator<Item = &ResolvedClub> {
        self.assignment
            .iter()
            .zip(self.clubs.iter())
            .filter(move |(&l, _)| l == ordinal)
            .map(|(_, club)| club)
    }

    pub fn league_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.leagues.len()];
        for &l in &self.assignment {
            sizes[l] += 1;
        }
        sizes
    }

    /// Check the capacity invariant of a finalized partition
    pub fn validate(&self) -> Result<(), PartitionError> {
        if self.assignment.len() != self.clubs.len() {
            return Err(PartitionError::NoFeasiblePartition(format!(
                "{} assignments for {} clubs",
                self.assignment.len(),
                self.clubs.len()
            )));
        }
        if let Some(&bad) = self.assignment.iter().find(|&&l| l >= self.leagues.len()) {
            return Err(PartitionError::NoFeasiblePartition(format!(
                "assignment to unknown league ordinal {}",
                bad
            )));
        }
        for (league, size) in self.leagues.iter().zip(self.league_sizes()) {
            if size != league.capacity {
                return Err(PartitionError::NoFeasiblePartition(format!(
                    "league {} holds {} clubs, capacity is {}",
                    league.name, size, league.capacity
                )));
            }
        }
        Ok(())
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Generous box around Germany for plausibility checks
    pub const GERMANY: BoundingBox = BoundingBox {
        min_lat: 46.0,
        max_lat: 56.5,
        min_lon: 5.0,
        max_lon: 16.5,
    };
}
