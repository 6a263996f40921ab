use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use crate::core::distance::is_within_bounding_box;
use crate::core::error::PartitionError;
use crate::models::{BoundingBox, Club, ClubRecord, Coordinate, ResolvedClub};

/// Errors raised while normalizing the incoming club list
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClubSetError {
    #[error("Club name is empty")]
    EmptyName,

    #[error("Duplicate club {name:?} (already present as {existing:?})")]
    DuplicateClub { name: String, existing: String },

    #[error("Club {name:?} has an invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        name: String,
        latitude: f64,
        longitude: f64,
    },
}

/// Normalize a display name: non-breaking spaces, trimming, collapsed whitespace
pub fn normalize_name(name: &str) -> String {
    name.replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Identity key used for duplicate detection and name lookups
///
/// "Rot-Weiß Oberhausen" and "rot weiss oberhausen" share a key.
pub fn club_key(name: &str) -> String {
    let lowered = normalize_name(name).to_lowercase().replace('ß', "ss");
    let cleaned: String = lowered
        .chars()
        .map(|c| if c == '-' || c == '/' { ' ' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Read-only snapshot of the clubs taking part in one run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClubSet {
    clubs: Vec<Club>,
    index: BTreeMap<String, usize>,
}

impl ClubSet {
    /// Build a club set from already typed clubs
    pub fn new(clubs: Vec<Club>) -> Result<Self, ClubSetError> {
        let mut set = ClubSet::default();
        for club in clubs {
            set.push(club)?;
        }
        Ok(set)
    }

    /// Build a club set from raw records
    ///
    /// A record with only one of latitude/longitude is kept as unresolved.
    pub fn from_records(records: Vec<ClubRecord>) -> Result<Self, ClubSetError> {
        let mut set = ClubSet::default();
        for record in records {
            let name = normalize_name(&record.name);
            let coordinate = match (record.latitude, record.longitude) {
                (Some(latitude), Some(longitude)) => Some(
                    Coordinate::new(latitude, longitude).ok_or_else(|| {
                        ClubSetError::InvalidCoordinate {
                            name: name.clone(),
                            latitude,
                            longitude,
                        }
                    })?,
                ),
                (None, None) => None,
                _ => {
                    warn!("Club {:?} has a partial coordinate, treating it as unresolved", name);
                    None
                }
            };
            let mut club = Club::new(name, coordinate);
            club.tags.extend(record.tags);
            set.push(club)?;
        }
        Ok(set)
    }

    fn push(&mut self, mut club: Club) -> Result<(), ClubSetError> {
        club.name = normalize_name(&club.name);
        if club.name.is_empty() {
            return Err(ClubSetError::EmptyName);
        }
        if let Some(c) = club.coordinate {
            if Coordinate::new(c.latitude, c.longitude).is_none() {
                return Err(ClubSetError::InvalidCoordinate {
                    name: club.name,
                    latitude: c.latitude,
                    longitude: c.longitude,
                });
            }
        }
        let key = club_key(&club.name);
        if let Some(&existing) = self.index.get(&key) {
            return Err(ClubSetError::DuplicateClub {
                name: club.name,
                existing: self.clubs[existing].name.clone(),
            });
        }
        self.index.insert(key, self.clubs.len());
        self.clubs.push(club);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.clubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Club> {
        self.clubs.iter()
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    /// Position of a club, matched by identity key
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(&club_key(name)).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Club> {
        self.index_of(name).map(|i| &self.clubs[i])
    }

    /// Names of clubs without a resolved coordinate, in set order
    pub fn unresolved(&self) -> Vec<String> {
        self.clubs
            .iter()
            .filter(|c| !c.is_resolved())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Resolved view of every club, or `UnresolvedCoordinate` listing all gaps
    pub fn resolve(&self) -> Result<Vec<ResolvedClub>, PartitionError> {
        let unresolved = self.unresolved();
        if !unresolved.is_empty() {
            return Err(PartitionError::UnresolvedCoordinate { clubs: unresolved });
        }
        self.clubs.iter().map(ResolvedClub::try_from).collect()
    }

    /// Resolved clubs lying outside a plausibility region
    pub fn check_region(&self, region: &BoundingBox) -> Vec<&Club> {
        let outside: Vec<&Club> = self
            .clubs
            .iter()
            .filter(|c| match c.coordinate {
                Some(p) => !is_within_bounding_box(p.latitude, p.longitude, region),
                None => false,
            })
            .collect();
        for club in &outside {
            warn!("Club {:?} lies outside the expected region", club.name);
        }
        outside
    }
}
