//! All-pairs bond search.
use glam::DVec2;

use crate::bonds::{dist2, BondNetwork, PairSearch};

/// Examines every unordered pair `(i, j)`, `i < j`, exactly once. O(N^2).
#[derive(Debug, Clone, Default)]
pub struct ExhaustivePairs {
    /// Compute rows on the rayon thread pool.
    pub parallel: bool,
}

impl ExhaustivePairs {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }
}

impl PairSearch for ExhaustivePairs {
    fn find_bonds(&self, positions: &[DVec2], horizon: f64) -> BondNetwork {
        let h2 = horizon * horizon;
        BondNetwork::from_rows(positions.len(), self.parallel, |i, out| {
            let pi = positions[i];
            for (j, &pj) in positions.iter().enumerate().skip(i + 1) {
                if dist2(pi, pj) <= h2 {
                    out.push(j as u32);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Lattice;

    #[test]
    fn pair_exactly_at_horizon_is_bonded() {
        let positions = [DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)];
        let net = ExhaustivePairs::new(false).find_bonds(&positions, 1.0);
        assert_eq!(net.bond_count(), 1);
        assert!(net.contains(0, 1));
    }

    #[test]
    fn pair_beyond_horizon_is_not_bonded() {
        let positions = [DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0)];
        let net = ExhaustivePairs::new(false).find_bonds(&positions, 1.0);
        assert_eq!(net.bond_count(), 0);
    }

    #[test]
    fn interior_particle_has_four_neighbors_with_unit_horizon() {
        let lattice = Lattice::with_dims(3, 3, 1.0);
        let net = ExhaustivePairs::new(false).find_bonds(&lattice.positions(), 1.0);
        let counts = net.bond_counts();
        assert_eq!(counts[4], 4);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[1], 3);
        assert_eq!(net.bond_count(), 12);
    }

    #[test]
    fn single_particle_has_no_bonds() {
        let net = ExhaustivePairs::new(true).find_bonds(&[DVec2::ZERO], 5.0);
        assert_eq!(net.particle_count(), 1);
        assert_eq!(net.bond_counts(), vec![0]);
    }
}
