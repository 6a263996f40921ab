use std::collections::BTreeSet;

use tracing::{debug, info, warn};
use validator::Validate;

use crate::core::analytics::analyze;
use crate::core::centroid::CentroidStrategy;
use crate::core::clubset::ClubSet;
use crate::core::compare::compare;
use crate::core::derby::{DerbyRules, DerbyUnits};
use crate::core::distance::DistanceMatrix;
use crate::core::error::PartitionError;
use crate::core::matrix::MatrixStrategy;
use crate::core::placement::finalize;
use crate::models::{
    AnalyzedPartition, Coordinate, League, Partition, PartitionConfig, PartitionOutcome, ResolvedClub, Strategy,
};

/// Main partitioning orchestrator
///
/// # Pipeline Stages
/// 1. Precondition checks (leagues, coordinates, capacity)
/// 2. Distance matrix and derby units
/// 3. Strategy assignment
/// 4. Finalization into a validated, canonically ordered partition
#[derive(Debug, Clone)]
pub struct Partitioner {
    config: PartitionConfig,
    leagues: Vec<League>,
}

impl Partitioner {
    pub fn new(config: PartitionConfig) -> Result<Self, PartitionError> {
        config.validate()?;
        if !config.league_names.is_empty() && config.league_names.len() != config.league_count {
            return Err(PartitionError::InvalidConfig(format!(
                "{} league names given for {} leagues",
                config.league_names.len(),
                config.league_count
            )));
        }
        let distinct: BTreeSet<&str> = config.league_names.iter().map(String::as_str).collect();
        if distinct.len() != config.league_names.len() {
            return Err(PartitionError::InvalidConfig(
                "league names must be distinct".to_string(),
            ));
        }
        if config.compass_names && !config.league_names.is_empty() {
            warn!("Explicit league names given, compass names are not applied");
        }
        let leagues = League::uniform(config.league_count, config.league_capacity, &config.league_names);
        Ok(Self { config, leagues })
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Leagues built from the configuration
    pub fn leagues(&self) -> &[League] {
        &self.leagues
    }

    /// Partition `clubs` into the configured leagues
    pub fn partition(&self, clubs: &ClubSet, strategy: Strategy) -> Result<Partition, PartitionError> {
        self.solve(clubs, &self.leagues, strategy, None, self.compass_names())
    }

    /// Partition `clubs` into explicitly given leagues
    ///
    /// Derby rules and pass ceilings still come from the configuration; the
    /// given league names are kept as they are.
    pub fn partition_with_leagues(
        &self,
        clubs: &ClubSet,
        leagues: &[League],
        strategy: Strategy,
    ) -> Result<Partition, PartitionError> {
        self.solve(clubs, leagues, strategy, None, false)
    }

    /// Full run: centroid partition, matrix partition seeded from it, analytics and comparison
    pub fn run(&self, clubs: &ClubSet) -> Result<PartitionOutcome, PartitionError> {
        info!(
            "Partitioning {} clubs into {} leagues of {}",
            clubs.len(),
            self.config.league_count,
            self.config.league_capacity
        );

        let compass = self.compass_names();
        let centroid = self.solve(clubs, &self.leagues, Strategy::Centroid, None, compass)?;
        let matrix = if self.config.enable_matrix_variant {
            Some(self.solve(
                clubs,
                &self.leagues,
                Strategy::Matrix,
                Some(&centroid.assignment),
                compass,
            )?)
        } else {
            None
        };

        let comparison = match &matrix {
            Some(m) => Some(compare(&centroid, m)?),
            None => None,
        };
        if let Some(report) = &comparison {
            info!(
                "Matrix vs centroid: {:+.1} km total, {} clubs moved",
                report.objective_delta_km,
                report.moved_clubs.len()
            );
        }

        Ok(PartitionOutcome {
            centroid: with_analytics(centroid),
            matrix: matrix.map(with_analytics),
            comparison,
        })
    }

    /// Compass labels only replace generated names
    fn compass_names(&self) -> bool {
        self.config.compass_names && self.config.league_names.is_empty()
    }

    fn solve(
        &self,
        clubs: &ClubSet,
        leagues: &[League],
        strategy: Strategy,
        baseline: Option<&[usize]>,
        compass_names: bool,
    ) -> Result<Partition, PartitionError> {
        let resolved = precheck(clubs, leagues)?;
        let coords: Vec<Coordinate> = resolved.iter().map(|c| c.coordinate).collect();
        let matrix = DistanceMatrix::from_coordinates(&coords);

        let max_group = leagues.iter().map(|l| l.capacity).min().unwrap_or(0);
        let mut units = DerbyUnits::build(clubs, &matrix, &DerbyRules::from(&self.config), max_group);
        debug!("{} placement units for {} clubs", units.len(), resolved.len());

        let (slots, convergence) = match strategy {
            Strategy::Centroid => {
                CentroidStrategy::new(self.config.centroid_max_passes).assign(&coords, &matrix, leagues, &mut units)?
            }
            Strategy::Matrix => MatrixStrategy::new(self.config.matrix_max_passes).assign(
                &coords,
                &matrix,
                leagues,
                &mut units,
                baseline,
            )?,
        };

        let partition = finalize(
            strategy,
            leagues,
            resolved,
            &matrix,
            slots,
            convergence,
            compass_names,
        )?;
        info!(
            "{} strategy: {:.1} km intra-league total, {:.1} km average away trip ({} passes, converged: {})",
            strategy,
            partition.objective.total_intra_km,
            partition.objective.avg_away_km,
            partition.convergence.passes,
            partition.convergence.converged
        );
        Ok(partition)
    }
}

/// League sanity, coordinate resolution, then capacity
fn precheck(clubs: &ClubSet, leagues: &[League]) -> Result<Vec<ResolvedClub>, PartitionError> {
    if leagues.is_empty() {
        return Err(PartitionError::InvalidConfig("at least one league is required".to_string()));
    }
    let mut names = BTreeSet::new();
    for (idx, league) in leagues.iter().enumerate() {
        if !names.insert(league.name.as_str()) {
            return Err(PartitionError::InvalidConfig(format!(
                "league name {:?} is used twice",
                league.name
            )));
        }
        if league.capacity == 0 {
            return Err(PartitionError::InvalidConfig(format!(
                "league {} has zero capacity",
                league.name
            )));
        }
        if league.ordinal != idx {
            return Err(PartitionError::InvalidConfig(format!(
                "league {} has ordinal {} at position {}",
                league.name, league.ordinal, idx
            )));
        }
    }

    let resolved = clubs.resolve()?;
    let capacity: usize = leagues.iter().map(|l| l.capacity).sum();
    if resolved.len() != capacity {
        return Err(PartitionError::CapacityMismatch {
            clubs: resolved.len(),
            capacity,
        });
    }
    Ok(resolved)
}

fn with_analytics(partition: Partition) -> AnalyzedPartition {
    let analytics = analyze(&partition);
    AnalyzedPartition { partition, analytics }
}
