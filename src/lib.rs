//! Kompass Leagues - geographic league partitioning for regional football
//!
//! This library assigns a season's clubs to equally sized leagues so that
//! intra-league travel stays short. Two strategies are provided (nearest
//! league centroid, and pairwise distance minimization with swap refinement),
//! plus travel analytics and a comparison between the two results.

pub mod config;
pub mod core;
pub mod models;

// Re-export commonly used types
pub use crate::core::{analyze, compare, haversine_distance, ClubSet, ClubSetError, PartitionError, Partitioner};
pub use models::{
    BoundingBox, Club, ClubRecord, ComparisonReport, Coordinate, DistanceAnalytics, League, Partition,
    PartitionConfig, PartitionOutcome, RunReport, Strategy,
};
