use tracing::debug;

use crate::core::derby::DerbyUnits;
use crate::core::distance::{mean_coordinate, DistanceMatrix};
use crate::core::error::PartitionError;
use crate::core::placement::{evaluate, group_center, Placement};
use crate::models::{Convergence, Coordinate, League};

/// Smallest reduction in km that counts as an improving swap
const IMPROVEMENT_EPS_KM: f64 = 1e-9;

/// Assignment minimizing the sum of intra-league pairwise distances
///
/// Greedy construction by marginal pairwise cost, then swap refinement that
/// only accepts strictly improving exchanges between two leagues.
#[derive(Debug, Clone, Copy)]
pub struct MatrixStrategy {
    max_passes: usize,
}

/// Outcome of one refinement run
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    pub assignment: Vec<usize>,
    pub convergence: Convergence,
    pub swaps: usize,
}

impl MatrixStrategy {
    pub fn new(max_passes: usize) -> Self {
        Self { max_passes }
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Compute a slot assignment for every club
    ///
    /// With a `baseline`, refinement also starts from it. A result keeping every
    /// derby group together beats one that had to split a group; among equals
    /// the lower total wins, ties to the constructed seed.
    pub fn assign(
        &self,
        coords: &[Coordinate],
        matrix: &DistanceMatrix,
        leagues: &[League],
        units: &mut DerbyUnits,
        baseline: Option<&[usize]>,
    ) -> Result<(Vec<usize>, Convergence), PartitionError> {
        let k = leagues.len();
        let grouped = units.clone();
        let constructed = construct(coords, matrix, leagues, units)?;
        let mut best = self.refine(matrix, k, units, constructed);
        let mut best_key = (
            !grouped.colocated(&best.assignment),
            evaluate(matrix, &best.assignment, k).total_intra_km,
        );
        debug!(
            "Matrix refinement from construction: {:.1} km after {} swaps",
            best_key.1, best.swaps
        );

        if let Some(seed) = baseline {
            if is_valid_seed(seed, leagues, &grouped) {
                let alt = self.refine(matrix, k, &grouped, seed.to_vec());
                let alt_key = (false, evaluate(matrix, &alt.assignment, k).total_intra_km);
                debug!(
                    "Matrix refinement from baseline: {:.1} km after {} swaps",
                    alt_key.1, alt.swaps
                );
                if alt_key.0 < best_key.0 || (alt_key.0 == best_key.0 && alt_key.1 < best_key.1) {
                    best = alt;
                    best_key = alt_key;
                    *units = grouped;
                }
            } else {
                debug!("Baseline assignment splits a derby group, not used as seed");
            }
        }

        debug!("Matrix strategy objective {:.1} km", best_key.1);
        Ok((best.assignment, best.convergence))
    }

    /// Swap refinement until no improving swap exists or `max_passes` sweeps ran
    ///
    /// Only units of equal size in different leagues are exchanged, so league
    /// sizes and bound derby groups are preserved.
    pub fn refine(
        &self,
        matrix: &DistanceMatrix,
        k: usize,
        units: &DerbyUnits,
        mut assignment: Vec<usize>,
    ) -> Refinement {
        let n = assignment.len();

        // sums[i * k + l]: distance from club i to all clubs of league l
        let mut sums = vec![0.0; n * k];
        for i in 0..n {
            for x in 0..n {
                sums[i * k + assignment[x]] += matrix.get(i, x);
            }
        }
        let intra: Vec<f64> = units.iter().map(|u| matrix.pairwise_sum(&u.members)).collect();

        let mut swaps = 0;
        for pass in 1..=self.max_passes {
            let mut improved = false;
            for p in 0..units.len() {
                for q in (p + 1)..units.len() {
                    let (up, uq) = (units.members(p), units.members(q));
                    if up.len() != uq.len() || up.is_empty() {
                        continue;
                    }
                    let (a, b) = (assignment[up[0]], assignment[uq[0]]);
                    if a == b {
                        continue;
                    }

                    let sum_over = |members: &[usize], league: usize, sums: &[f64]| -> f64 {
                        members.iter().map(|&m| sums[m * k + league]).sum()
                    };
                    let cross: f64 = up.iter().map(|&u| matrix.row_sum_over(u, uq)).sum();
                    let before = sum_over(up, a, &sums) - 2.0 * intra[p] + sum_over(uq, b, &sums)
                        - 2.0 * intra[q];
                    let after = sum_over(up, b, &sums) - cross + sum_over(uq, a, &sums) - cross;

                    if after < before - IMPROVEMENT_EPS_KM {
                        for x in 0..n {
                            let to_q = matrix.row_sum_over(x, uq);
                            let to_p = matrix.row_sum_over(x, up);
                            sums[x * k + a] += to_q - to_p;
                            sums[x * k + b] += to_p - to_q;
                        }
                        for &m in up {
                            assignment[m] = b;
                        }
                        for &m in uq {
                            assignment[m] = a;
                        }
                        swaps += 1;
                        improved = true;
                    }
                }
            }
            if !improved {
                return Refinement {
                    assignment,
                    convergence: Convergence { converged: true, passes: pass },
                    swaps,
                };
            }
        }

        Refinement {
            assignment,
            convergence: Convergence {
                converged: false,
                passes: self.max_passes,
            },
            swaps,
        }
    }
}

/// Greedy construction by marginal increase of a league's pairwise sum
///
/// Larger units first, then by distance from the overall mean position
/// (most remote first), ties by unit index.
fn construct(
    coords: &[Coordinate],
    matrix: &DistanceMatrix,
    leagues: &[League],
    units: &mut DerbyUnits,
) -> Result<Vec<usize>, PartitionError> {
    let center = mean_coordinate(coords).ok_or_else(|| {
        PartitionError::NoFeasiblePartition("no clubs to partition".to_string())
    })?;

    let mut order: Vec<(usize, usize, f64)> = (0..units.len())
        .map(|u| {
            let remote = group_center(coords, units.members(u)).map_or(0.0, |c| c.distance_km(&center));
            (u, units.unit(u).size(), remote)
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
        placement.place_unit(units, unit, |p, members, league| {
            let current = p.league_members(league);
            members.iter().map(|&m| matrix.row_sum_over(m, current)).sum()
        })?;
    }
    placement.finish()
}

/// A seed must have the right length, fill every league exactly and keep bound units together
fn is_valid_seed(seed: &[usize], leagues: &[League], units: &DerbyUnits) -> bool {
    if seed.len() != units.iter().map(|u| u.size()).sum::<usize>() {
        return false;
    }
    let mut sizes = vec![0; leagues.len()];
    for &slot in seed {
        match sizes.get_mut(slot) {
            Some(s) => *s += 1,
            None => return false,
        }
    }
    sizes.iter().zip(leagues).all(|(&s, l)| s == l.capacity) && units.colocated(seed)
}
