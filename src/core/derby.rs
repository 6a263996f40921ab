use tracing::{debug, warn};

use crate::core::clubset::ClubSet;
use crate::core::distance::DistanceMatrix;
use crate::models::PartitionConfig;

/// Derby settings extracted from the partition config
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerbyRules {
    pub enforce: bool,
    pub pairs: Vec<(String, String)>,
    pub max_distance_km: Option<f64>,
}

impl From<&PartitionConfig> for DerbyRules {
    fn from(config: &PartitionConfig) -> Self {
        Self {
            enforce: config.enforce_derby_same_league,
            pairs: config.derby_pairs.clone(),
            max_distance_km: config.derby_max_distance_km,
        }
    }
}

/// Clubs that are placed and swapped together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Club indices, ascending
    pub members: Vec<usize>,
}

impl Unit {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// A bound derby group rather than a single club
    pub fn is_bound(&self) -> bool {
        self.members.len() > 1
    }
}

/// Placement units of one strategy run
///
/// Bound groups must share a league. Soft partners only break cost ties.
#[derive(Debug, Clone, PartialEq)]
pub struct DerbyUnits {
    units: Vec<Unit>,
    unit_of: Vec<usize>,
    partners: Vec<Vec<usize>>,
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // lower root wins so component roots stay deterministic
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

impl DerbyUnits {
    /// Every club on its own, no preferences
    pub fn singletons(n: usize) -> Self {
        Self {
            units: (0..n).map(|i| Unit { members: vec![i] }).collect(),
            unit_of: (0..n).collect(),
            partners: vec![Vec::new(); n],
        }
    }

    /// Group derby clubs into units
    ///
    /// Components larger than `max_group` fall back to soft partners.
    pub fn build(
        clubs: &ClubSet,
        matrix: &DistanceMatrix,
        rules: &DerbyRules,
        max_group: usize,
    ) -> Self {
        let n = matrix.len();
        if !rules.enforce {
            return Self::singletons(n);
        }

        let mut edges: Vec<(usize, usize)> = Vec::new();
        for (a, b) in &rules.pairs {
            match (clubs.index_of(a), clubs.index_of(b)) {
                (Some(i), Some(j)) if i != j => edges.push((i.min(j), i.max(j))),
                (Some(_), Some(_)) => warn!("Derby pair {:?} / {:?} names the same club", a, b),
                _ => warn!("Derby pair {:?} / {:?} references an unknown club, ignoring", a, b),
            }
        }
        if let Some(max_km) = rules.max_distance_km {
            for i in 0..n {
                for j in (i + 1)..n {
                    if matrix.get(i, j) <= max_km {
                        edges.push((i, j));
                    }
                }
            }
        }
        edges.sort_unstable();
        edges.dedup();

        let mut set = DisjointSet::new(n);
        for &(i, j) in &edges {
            set.union(i, j);
        }

        let mut components: Vec<Vec<usize>> = vec![Vec::new(); n];
        for i in 0..n {
            let root = set.find(i);
            components[root].push(i);
        }

        let mut units = Self {
            units: Vec::new(),
            unit_of: vec![0; n],
            partners: vec![Vec::new(); n],
        };
        for component in components.into_iter().filter(|c| !c.is_empty()) {
            if component.len() > 1 && component.len() <= max_group {
                debug!("Derby group of {} clubs bound to one league", component.len());
                units.push_unit(component);
            } else {
                if component.len() > 1 {
                    warn!(
                        "Derby group of {} clubs exceeds league capacity {}, keeping it as a preference",
                        component.len(),
                        max_group
                    );
                }
                for club in component {
                    units.push_unit(vec![club]);
                }
            }
        }
        for &(i, j) in &edges {
            if units.unit_of[i] != units.unit_of[j] {
                units.link(i, j);
            }
        }
        units
    }

    fn push_unit(&mut self, members: Vec<usize>) -> usize {
        let idx = self.units.len();
        for &m in &members {
            self.unit_of[m] = idx;
        }
        self.units.push(Unit { members });
        idx
    }

    fn link(&mut self, a: usize, b: usize) {
        if !self.partners[a].contains(&b) {
            self.partners[a].push(b);
        }
        if !self.partners[b].contains(&a) {
            self.partners[b].push(a);
        }
    }

    /// Break a bound unit into singletons that still prefer each other
    ///
    /// Returns the unit indices now holding the former members.
    pub fn split(&mut self, unit: usize) -> Vec<usize> {
        let members = std::mem::take(&mut self.units[unit].members);
        warn!("Derby group of {} clubs does not fit any league, keeping it as a preference", members.len());
        for (k, &a) in members.iter().enumerate() {
            for &b in &members[k + 1..] {
                self.link(a, b);
            }
        }
        let mut indices = Vec::with_capacity(members.len());
        self.units[unit].members = vec![members[0]];
        indices.push(unit);
        for &m in &members[1..] {
            indices.push(self.push_unit(vec![m]));
        }
        indices
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn unit(&self, idx: usize) -> &Unit {
        &self.units[idx]
    }

    pub fn members(&self, idx: usize) -> &[usize] {
        &self.units[idx].members
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn unit_of(&self, club: usize) -> usize {
        self.unit_of[club]
    }

    /// Soft derby partners of a club
    pub fn partners(&self, club: usize) -> &[usize] {
        &self.partners[club]
    }

    /// Every bound unit sits in a single league under `assignment`
    pub fn colocated(&self, assignment: &[usize]) -> bool {
        self.units.iter().all(|u| {
            u.members
                .iter()
                .all(|&m| assignment[m] == assignment[u.members[0]])
        })
    }
}
