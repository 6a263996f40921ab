use std::cmp::Ordering;

use tracing::debug;

use crate::core::derby::DerbyUnits;
use crate::core::distance::DistanceMatrix;
use crate::core::error::PartitionError;
use crate::core::placement::{farthest_point_anchors, group_center, Placement};
use crate::models::{Convergence, Coordinate, League};

/// Assignment by nearest league centroid
///
/// # Stages
/// 1. Farthest-point anchors seed one centroid per league
/// 2. Units placed north to south into the nearest centroid with room
/// 3. Centroid recompute + global greedy reassignment until stable or `max_passes`
#[derive(Debug, Clone, Copy)]
pub struct CentroidStrategy {
    max_passes: usize,
}

impl CentroidStrategy {
    pub fn new(max_passes: usize) -> Self {
        Self { max_passes }
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Compute a slot assignment for every club
    pub fn assign(
        &self,
        coords: &[Coordinate],
        matrix: &DistanceMatrix,
        leagues: &[League],
        units: &mut DerbyUnits,
    ) -> Result<(Vec<usize>, Convergence), PartitionError> {
        let anchors = farthest_point_anchors(coords, matrix, leagues.len());
        let seed_centroids: Vec<Coordinate> = anchors.iter().map(|&a| coords[a]).collect();
        if seed_centroids.len() != leagues.len() {
            return Err(PartitionError::NoFeasiblePartition(format!(
                "{} anchors for {} leagues",
                seed_centroids.len(),
                leagues.len()
            )));
        }

        let mut assignment = seed(coords, leagues, units, &seed_centroids)?;

        for pass in 1..=self.max_passes {
            let centroids = league_centroids(coords, &assignment, leagues.len())?;
            let next = reassign(coords, leagues, units, &centroids, &assignment)?;
            let moved = next
                .iter()
                .zip(assignment.iter())
                .filter(|(a, b)| a != b)
                .count();
            debug!("Centroid pass {}: {} clubs changed league", pass, moved);
            assignment = next;
            if moved == 0 {
                return Ok((assignment, Convergence { converged: true, passes: pass }));
            }
        }

        Ok((
            assignment,
            Convergence {
                converged: false,
                passes: self.max_passes,
            },
        ))
    }
}

/// Initial placement: larger units first, then by latitude descending
fn seed(
    coords: &[Coordinate],
    leagues: &[League],
    units: &mut DerbyUnits,
    centroids: &[Coordinate],
) -> Result<Vec<usize>, PartitionError> {
    let mut order: Vec<(usize, usize, f64)> = (0..units.len())
        .map(|u| {
            let lat = group_center(coords, units.members(u)).map_or(0.0, |c| c.latitude);
            (u, units.unit(u).size(), lat)
        })
        .collect();
    order.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then(b.2.total_cmp(&a.2))
            .then(a.0.cmp(&b.0))
    });

    let mut placement = Placement::new(coords.len(), leagues);
    placement.reserve(units);
    for (unit, _, _) in order {
        placement.place_unit(units, unit, |_, members, league| {
            group_center(coords, members).map_or(f64::INFINITY, |c| c.distance_km(&centroids[league]))
        })?;
    }
    placement.finish()
}

/// Mean position of every league slot
fn league_centroids(
    coords: &[Coordinate],
    assignment: &[usize],
    k: usize,
) -> Result<Vec<Coordinate>, PartitionError> {
    (0..k)
        .map(|slot| {
            let members: Vec<usize> = (0..assignment.len()).filter(|&c| assignment[c] == slot).collect();
            group_center(coords, &members).ok_or_else(|| {
                PartitionError::NoFeasiblePartition(format!("league slot {} is empty", slot))
            })
        })
        .collect()
}

/// Capacity-respecting reassignment to the nearest centroids
///
/// All (unit, league) pairs are taken in ascending distance order, ties by
/// league ordinal then unit index. Bound units go before single clubs, larger
/// ones first; if they no longer pack, every bound unit keeps its `previous` league.
fn reassign(
    coords: &[Coordinate],
    leagues: &[League],
    units: &DerbyUnits,
    centroids: &[Coordinate],
    previous: &[usize],
) -> Result<Vec<usize>, PartitionError> {
    let mut placement = Placement::new(coords.len(), leagues);

    let mut sizes: Vec<usize> = units.iter().filter(|u| u.is_bound()).map(|u| u.size()).collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes.dedup();

    let mut packed = true;
    for size in sizes {
        let class: Vec<usize> = (0..units.len()).filter(|&u| units.unit(u).size() == size).collect();
        if !greedy_fill(coords, &mut placement, units, &class, centroids).is_empty() {
            packed = false;
            break;
        }
    }
    if !packed {
        debug!("Derby groups do not repack around new centroids, keeping their leagues");
        placement = Placement::new(coords.len(), leagues);
        for unit in units.iter().filter(|u| u.is_bound()) {
            placement.place(&unit.members, previous[unit.members[0]]);
        }
    }

    let singles: Vec<usize> = (0..units.len())
        .filter(|&u| !units.unit(u).is_bound() && !placement.is_placed(units.members(u)[0]))
        .collect();
    let left = greedy_fill(coords, &mut placement, units, &singles, centroids);
    if let Some(&unit) = left.first() {
        return Err(PartitionError::NoFeasiblePartition(format!(
            "club #{} found no league with room",
            units.members(unit)[0]
        )));
    }
    placement.finish()
}

/// Greedy fill over sorted (distance, league, unit) pairs; returns units left over
fn greedy_fill(
    coords: &[Coordinate],
    placement: &mut Placement,
    units: &DerbyUnits,
    candidates: &[usize],
    centroids: &[Coordinate],
) -> Vec<usize> {
    let mut pairs: Vec<(f64, usize, usize)> = Vec::with_capacity(candidates.len() * centroids.len());
    for &unit in candidates {
        let Some(center) = group_center(coords, units.members(unit)) else {
            continue;
        };
        for (league, centroid) in centroids.iter().enumerate() {
            pairs.push((center.distance_km(centroid), league, unit));
        }
    }
    pairs.sort_by(|a, b| match a.0.total_cmp(&b.0) {
        Ordering::Equal => a.1.cmp(&b.1).then(a.2.cmp(&b.2)),
        other => other,
    });

    let mut done = vec![false; units.len()];
    for (_, league, unit) in pairs {
        if done[unit] {
            continue;
        }
        let members = units.members(unit);
        if placement.fits(league, members.len()) {
            placement.place(members, league);
            done[unit] = true;
        }
    }
    candidates.iter().copied().filter(|&u| !done[u]).collect()
}
