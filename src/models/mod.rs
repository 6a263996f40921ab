// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BoundingBox, Club, Convergence, Coordinate, League, Objective, Partition, ResolvedClub, SeasonTag, Strategy};
pub use requests::{ClubRecord, PartitionConfig};
pub use responses::{AnalyzedPartition, ClubTravel, ComparisonReport, DistanceAnalytics, DistanceRecord, LeagueTravel, MovedClub, PartitionOutcome, RunReport};
