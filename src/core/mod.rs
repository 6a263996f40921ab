// Core algorithm exports
pub mod analytics;
pub mod centroid;
pub mod clubset;
pub mod compare;
pub mod derby;
pub mod distance;
pub mod error;
pub mod matrix;
pub mod partitioner;
pub(crate) mod placement;

pub use analytics::analyze;
pub use centroid::CentroidStrategy;
pub use clubset::{club_key, normalize_name, ClubSet, ClubSetError};
pub use compare::compare;
pub use derby::{DerbyRules, DerbyUnits, Unit};
pub use distance::{haversine_distance, is_within_bounding_box, mean_coordinate, DistanceMatrix, EARTH_RADIUS_KM};
pub use error::PartitionError;
pub use matrix::{MatrixStrategy, Refinement};
pub use partitioner::Partitioner;
