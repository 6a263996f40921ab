use std::cmp::Ordering;

use tracing::debug;

use crate::core::derby::DerbyUnits;
use crate::core::distance::{mean_coordinate, DistanceMatrix};
use crate::core::error::PartitionError;
use crate::models::{Convergence, Coordinate, League, Objective, Partition, ResolvedClub, Strategy};

/// Compass labels for a four-league split, north to south
const COMPASS_NORTH: &str = "Nord";
const COMPASS_SOUTH: &str = "Süd";
const COMPASS_WEST: &str = "West";
const COMPASS_EAST: &str = "Ost";

/// Partially filled assignment of clubs to league slots
#[derive(Debug, Clone)]
pub(crate) struct Placement {
    assignment: Vec<Option<usize>>,
    remaining: Vec<usize>,
    members: Vec<Vec<usize>>,
    /// Sizes of bound units still waiting for a league, descending
    pending: Vec<usize>,
}

impl Placement {
    pub fn new(num_clubs: usize, leagues: &[League]) -> Self {
        Self {
            assignment: vec![None; num_clubs],
            remaining: leagues.iter().map(|l| l.capacity).collect(),
            members: vec![Vec::new(); leagues.len()],
            pending: Vec::new(),
        }
    }

    /// Register the bound units that still have to be placed
    ///
    /// League choices for bound units then keep room for the rest of them.
    pub fn reserve(&mut self, units: &DerbyUnits) {
        self.pending = units.iter().filter(|u| u.is_bound()).map(|u| u.size()).collect();
        self.pending.sort_unstable_by(|a, b| b.cmp(a));
    }

    fn release(&mut self, size: usize) {
        if let Some(pos) = self.pending.iter().position(|&s| s == size) {
            self.pending.remove(pos);
        }
    }

    /// Pending bound units still pack first-fit-decreasing after putting `size` clubs into `league`
    fn leaves_room(&self, league: usize, size: usize) -> bool {
        let mut free = self.remaining.clone();
        free[league] -= size;
        for &s in &self.pending {
            match free.iter().position(|&f| f >= s) {
                Some(slot) => free[slot] -= s,
                None => return false,
            }
        }
        true
    }

    pub fn num_leagues(&self) -> usize {
        self.remaining.len()
    }

    pub fn fits(&self, league: usize, size: usize) -> bool {
        self.remaining[league] >= size
    }

    pub fn is_placed(&self, club: usize) -> bool {
        self.assignment[club].is_some()
    }

    pub fn league_members(&self, league: usize) -> &[usize] {
        &self.members[league]
    }

    pub fn place(&mut self, clubs: &[usize], league: usize) {
        for &c in clubs {
            self.assignment[c] = Some(league);
            self.members[league].push(c);
        }
        self.remaining[league] -= clubs.len();
    }

    /// Some league already holds a soft derby partner of these clubs
    fn holds_partner(&self, clubs: &[usize], units: &DerbyUnits, league: usize) -> bool {
        clubs.iter().any(|&c| {
            units
                .partners(c)
                .iter()
                .any(|&p| self.assignment[p] == Some(league))
        })
    }

    /// Cheapest league with room for `clubs`
    ///
    /// Ties go to a league holding a derby partner, then to the lowest ordinal.
    pub fn cheapest_league<F>(&self, clubs: &[usize], units: &DerbyUnits, cost: F) -> Option<usize>
    where
        F: Fn(&Placement, usize) -> f64,
    {
        let open: Vec<usize> = (0..self.num_leagues())
            .filter(|&l| self.fits(l, clubs.len()))
            .collect();
        let packing: Vec<usize> = open
            .iter()
            .copied()
            .filter(|&l| self.leaves_room(l, clubs.len()))
            .collect();
        let allowed = if packing.is_empty() { open } else { packing };

        let mut best: Option<(f64, bool, usize)> = None;
        for league in allowed {
            let candidate = (cost(self, league), !self.holds_partner(clubs, units, league), league);
            best = match best {
                Some(b) if compare_candidates(&b, &candidate) != Ordering::Greater => Some(b),
                _ => Some(candidate),
            };
        }
        best.map(|(_, _, league)| league)
    }

    /// Place a unit into its cheapest league, splitting a bound unit that fits nowhere
    pub fn place_unit<F>(&mut self, units: &mut DerbyUnits, unit: usize, cost: F) -> Result<(), PartitionError>
    where
        F: Fn(&Placement, &[usize], usize) -> f64,
    {
        let members = units.members(unit).to_vec();
        if members.len() > 1 {
            self.release(members.len());
        }
        if let Some(league) = self.cheapest_league(&members, units, |p, l| cost(p, &members, l)) {
            self.place(&members, league);
            return Ok(());
        }
        if members.len() == 1 {
            return Err(PartitionError::NoFeasiblePartition(format!(
                "no league has room left for club #{}",
                members[0]
            )));
        }
        for part in units.split(unit) {
            let single = units.members(part).to_vec();
            let league = self
                .cheapest_league(&single, units, |p, l| cost(p, &single, l))
                .ok_or_else(|| {
                    PartitionError::NoFeasiblePartition(format!(
                        "no league has room left for club #{}",
                        single[0]
                    ))
                })?;
            self.place(&single, league);
        }
        Ok(())
    }

    /// Complete slot assignment, or `NoFeasiblePartition`
    pub fn finish(self) -> Result<Vec<usize>, PartitionError> {
        if let Some(slot) = self.remaining.iter().position(|&r| r != 0) {
            return Err(PartitionError::NoFeasiblePartition(format!(
                "league slot {} left with {} free places",
                slot, self.remaining[slot]
            )));
        }
        self.assignment
            .into_iter()
            .enumerate()
            .map(|(club, slot)| {
                slot.ok_or_else(|| {
                    PartitionError::NoFeasiblePartition(format!("club #{} left unassigned", club))
                })
            })
            .collect()
    }
}

fn compare_candidates(a: &(f64, bool, usize), b: &(f64, bool, usize)) -> Ordering {
    a.0.total_cmp(&b.0)
        .then(a.1.cmp(&b.1))
        .then(a.2.cmp(&b.2))
}

/// Mean coordinate of a group of clubs
pub(crate) fn group_center(coords: &[Coordinate], clubs: &[usize]) -> Option<Coordinate> {
    mean_coordinate(clubs.iter().map(|&c| &coords[c]))
}

/// Pick `k` spread-out anchor clubs by farthest-point selection
///
/// The first anchor is the club farthest from the overall mean; each next one
/// maximizes its distance to the closest anchor so far. Ties keep the lower index.
pub(crate) fn farthest_point_anchors(coords: &[Coordinate], matrix: &DistanceMatrix, k: usize) -> Vec<usize> {
    let n = coords.len();
    let Some(center) = mean_coordinate(coords) else {
        return Vec::new();
    };
    let mut chosen = vec![false; n];
    let mut anchors = Vec::with_capacity(k);

    let mut first = 0;
    for i in 1..n {
        if coords[i].distance_km(&center) > coords[first].distance_km(&center) {
            first = i;
        }
    }
    anchors.push(first);
    chosen[first] = true;

    let mut nearest: Vec<f64> = (0..n).map(|i| matrix.get(i, first)).collect();
    while anchors.len() < k.min(n) {
        let mut next: Option<usize> = None;
        for i in (0..n).filter(|&i| !chosen[i]) {
            if next.map_or(true, |b| nearest[i] > nearest[b]) {
                next = Some(i);
            }
        }
        let Some(next) = next else { break };
        anchors.push(next);
        chosen[next] = true;
        for i in 0..n {
            nearest[i] = nearest[i].min(matrix.get(i, next));
        }
    }
    anchors
}

/// Pairwise objective of a slot assignment over `k` slots
pub(crate) fn evaluate(matrix: &DistanceMatrix, assignment: &[usize], k: usize) -> Objective {
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (club, &slot) in assignment.iter().enumerate() {
        groups[slot].push(club);
    }
    let total_intra_km = groups.iter().map(|g| matrix.pairwise_sum(g)).sum();

    let mut away_sum = 0.0;
    for group in &groups {
        if group.len() < 2 {
            continue;
        }
        for &club in group {
            away_sum += matrix.row_sum_over(club, group) / (group.len() - 1) as f64;
        }
    }
    let avg_away_km = if assignment.is_empty() {
        0.0
    } else {
        away_sum / assignment.len() as f64
    };

    Objective {
        total_intra_km,
        avg_away_km,
    }
}

/// Turn a slot assignment into a validated partition
///
/// With equal capacities, slots are reordered north to south by centroid and
/// take league names in that order; `compass_names` labels a four-league split
/// geographically.
pub(crate) fn finalize(
    strategy: Strategy,
    leagues: &[League],
    clubs: Vec<ResolvedClub>,
    matrix: &DistanceMatrix,
    slots: Vec<usize>,
    convergence: Convergence,
    compass_names: bool,
) -> Result<Partition, PartitionError> {
    let k = leagues.len();
    let coords: Vec<Coordinate> = clubs.iter().map(|c| c.coordinate).collect();

    let uniform = leagues.windows(2).all(|w| w[0].capacity == w[1].capacity);
    let (assignment, final_leagues) = if uniform && k > 1 {
        let mut centers: Vec<(usize, Coordinate)> = Vec::with_capacity(k);
        for slot in 0..k {
            let members: Vec<usize> = (0..slots.len()).filter(|&c| slots[c] == slot).collect();
            let center = group_center(&coords, &members).ok_or_else(|| {
                PartitionError::NoFeasiblePartition(format!("league slot {} is empty", slot))
            })?;
            centers.push((slot, center));
        }
        centers.sort_by(|a, b| {
            b.1.latitude
                .total_cmp(&a.1.latitude)
                .then(a.1.longitude.total_cmp(&b.1.longitude))
                .then(a.0.cmp(&b.0))
        });

        let mut ordinal_of_slot = vec![0; k];
        for (ordinal, (slot, _)) in centers.iter().enumerate() {
            ordinal_of_slot[*slot] = ordinal;
        }

        let mut renamed: Vec<League> = leagues.to_vec();
        if compass_names && k == 4 {
            let (west, east) = if centers[1].1.longitude <= centers[2].1.longitude {
                (1, 2)
            } else {
                (2, 1)
            };
            renamed[0].name = COMPASS_NORTH.to_string();
            renamed[west].name = COMPASS_WEST.to_string();
            renamed[east].name = COMPASS_EAST.to_string();
            renamed[3].name = COMPASS_SOUTH.to_string();
        }
        debug!("League slots reordered north to south: {:?}", ordinal_of_slot);
        (
            slots.iter().map(|&s| ordinal_of_slot[s]).collect::<Vec<_>>(),
            renamed,
        )
    } else {
        (slots, leagues.to_vec())
    };

    let objective = evaluate(matrix, &assignment, k);
    let partition = Partition {
        strategy,
        leagues: final_leagues,
        clubs,
        assignment,
        objective,
        convergence,
    };
    partition.validate()?;
    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords() -> Vec<Coordinate> {
        vec![
            Coordinate { latitude: 54.0, longitude: 10.0 },
            Coordinate { latitude: 54.1, longitude: 10.1 },
            Coordinate { latitude: 48.0, longitude: 11.0 },
            Coordinate { latitude: 48.1, longitude: 11.1 },
        ]
    }

    fn resolved(coords: &[Coordinate]) -> Vec<ResolvedClub> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &c)| ResolvedClub {
                name: format!("Club {}", i),
                coordinate: c,
                tags: Default::default(),
            })
            .collect()
    }

    #[test]
    fn test_cheapest_league_breaks_ties_by_ordinal() {
        let leagues = League::uniform(3, 2, &[]);
        let placement = Placement::new(4, &leagues);
        let units = DerbyUnits::singletons(4);
        assert_eq!(placement.cheapest_league(&[0], &units, |_, _| 1.0), Some(0));
        assert_eq!(
            placement.cheapest_league(&[0], &units, |_, l| if l == 2 { 0.5 } else { 1.0 }),
            Some(2)
        );
    }

    #[test]
    fn test_cheapest_league_keeps_room_for_pending_groups() {
        let leagues = League::uniform(2, 4, &[]);
        let mut placement = Placement::new(8, &leagues);
        let units = DerbyUnits::singletons(8);
        placement.place(&[0, 1], 0);
        placement.pending = vec![3];

        // league 1 is cheaper but would leave no league with room for three
        assert!(!placement.leaves_room(1, 2));
        assert!(placement.leaves_room(0, 2));
        assert_eq!(
            placement.cheapest_league(&[2, 3], &units, |_, l| if l == 1 { 0.0 } else { 1.0 }),
            Some(0)
        );

        placement.release(3);
        assert!(placement.pending.is_empty());
        assert_eq!(
            placement.cheapest_league(&[2, 3], &units, |_, l| if l == 1 { 0.0 } else { 1.0 }),
            Some(1)
        );
    }

    #[test]
    fn test_place_and_finish() {
        let leagues = League::uniform(2, 2, &[]);
        let mut placement = Placement::new(4, &leagues);
        placement.place(&[0, 1], 1);
        assert!(!placement.fits(1, 1));
        assert!(placement.is_placed(0));
        assert!(placement.clone().finish().is_err());
        placement.place(&[2, 3], 0);
        assert_eq!(placement.finish().unwrap(), vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_anchors_are_spread() {
        let coords = coords();
        let matrix = DistanceMatrix::from_coordinates(&coords);
        let anchors = farthest_point_anchors(&coords, &matrix, 2);
        assert_eq!(anchors.len(), 2);
        let north = anchors.iter().filter(|&&a| a < 2).count();
        assert_eq!(north, 1, "one anchor per region, got {:?}", anchors);
    }

    #[test]
    fn test_evaluate() {
        let coords = coords();
        let matrix = DistanceMatrix::from_coordinates(&coords);
        let objective = evaluate(&matrix, &[0, 0, 1, 1], 2);
        let expected = matrix.get(0, 1) + matrix.get(2, 3);
        assert!((objective.total_intra_km - expected).abs() < 1e-9);
        assert!((objective.avg_away_km - expected / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_finalize_orders_north_first() {
        let coords = coords();
        let matrix = DistanceMatrix::from_coordinates(&coords);
        let leagues = League::uniform(2, 2, &["A".to_string(), "B".to_string()]);
        let partition = finalize(
            Strategy::Matrix,
            &leagues,
            resolved(&coords),
            &matrix,
            vec![1, 1, 0, 0],
            Convergence { converged: true, passes: 1 },
            true,
        )
        .unwrap();
        assert_eq!(partition.assignment, vec![0, 0, 1, 1]);
        assert_eq!(partition.league_of("Club 0").unwrap().name, "A");
        assert_eq!(partition.league_of("Club 3").unwrap().name, "B");
    }
}
