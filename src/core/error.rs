use thiserror::Error;

/// Errors that can occur while partitioning or comparing partitions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PartitionError {
    #[error("Club {0:?} has no resolved coordinate")]
    MissingCoordinate(String),

    #[error("{} club(s) without resolved coordinates: {}", .clubs.len(), .clubs.join(", "))]
    UnresolvedCoordinate { clubs: Vec<String> },

    #[error("Capacity mismatch: {clubs} clubs for a total league capacity of {capacity}")]
    CapacityMismatch { clubs: usize, capacity: usize },

    #[error("No feasible partition: {0}")]
    NoFeasiblePartition(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Partitions cover different clubs: {0}")]
    ClubSetMismatch(String),
}

impl From<validator::ValidationErrors> for PartitionError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PartitionError::InvalidConfig(errors.to_string())
    }
}
