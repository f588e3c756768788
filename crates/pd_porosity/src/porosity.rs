//! Porosity sampling: uniform Bernoulli thinning of the bond network.
//!
//! Every bond receives exactly one independent trial and breaks with probability `phi`, so
//! the expected broken fraction equals `phi`. The realized fraction is a random variable.
//!
//! Two sampling modes are provided:
//! - [`PorositySampler::sample`] draws from one caller-supplied stream in canonical bond order.
//! - [`PorositySampler::sample_seeded`] derives one stream per particle row from a base seed
//!   via [`seed_for_row`]. Rows are the unit of work, so the outcome does not depend on the
//!   number of threads.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::bonds::BondNetwork;

/// Per-particle and global bond tallies after sampling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BondTallies {
    /// Bonds incident to each particle before breaking (`N_total`).
    pub total: Vec<u32>,
    /// Broken bonds incident to each particle (`N_broken`), `<= total`.
    pub broken: Vec<u32>,
    /// Number of distinct bonds.
    pub total_bonds: u64,
    /// Number of distinct broken bonds.
    pub broken_bonds: u64,
}

impl BondTallies {
    fn zeroed(total: Vec<u32>, total_bonds: u64) -> Self {
        let broken = vec![0; total.len()];
        Self {
            total,
            broken,
            total_bonds,
            broken_bonds: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.total.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_empty()
    }

    /// Realized global porosity `broken_bonds / total_bonds`, or 0 without bonds.
    pub fn realized_porosity(&self) -> f64 {
        if self.total_bonds == 0 {
            0.0
        } else {
            self.broken_bonds as f64 / self.total_bonds as f64
        }
    }
}

/// Breaks bonds independently with probability `phi`.
#[derive(Debug, Clone, Copy)]
pub struct PorositySampler {
    /// Target porosity ratio in [0, 1].
    pub phi: f64,
}

impl PorositySampler {
    pub fn new(phi: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&phi), "phi must be within [0, 1]");
        Self { phi }
    }

    /// Samples every bond from a single stream, visiting bonds in canonical order.
    pub fn sample(&self, network: &BondNetwork, rng: &mut dyn Rng) -> BondTallies {
        let mut tallies =
            BondTallies::zeroed(network.bond_counts(), network.bond_count() as u64);
        for (i, j) in network.iter() {
            if self.breaks(rng) {
                tallies.broken[i] += 1;
                tallies.broken[j] += 1;
                tallies.broken_bonds += 1;
            }
        }
        tallies
    }

    /// Samples bonds with one stream per particle row, derived from `base_seed`.
    ///
    /// The result is identical whether `parallel` is set or not.
    pub fn sample_seeded(
        &self,
        network: &BondNetwork,
        base_seed: u64,
        parallel: bool,
    ) -> BondTallies {
        let n = network.particle_count();
        let broken_rows: Vec<Vec<u32>> = if parallel {
            (0..n)
                .into_par_iter()
                .map(|i| self.broken_partners(network, base_seed, i))
                .collect()
        } else {
            (0..n)
                .map(|i| self.broken_partners(network, base_seed, i))
                .collect()
        };

        // Rows hold only broken bonds, so the merge is O(N + broken bonds).
        let mut tallies = BondTallies::zeroed(network.bond_counts(), network.bond_count() as u64);
        for (i, row) in broken_rows.into_iter().enumerate() {
            tallies.broken[i] += row.len() as u32;
            tallies.broken_bonds += row.len() as u64;
            for j in row {
                tallies.broken[j as usize] += 1;
            }
        }
        tallies
    }

    /// Partners `j > i` whose bond with `i` breaks, drawn from the stream of row `i`.
    fn broken_partners(&self, network: &BondNetwork, base_seed: u64, i: usize) -> Vec<u32> {
        let partners = network.partners(i);
        if partners.is_empty() {
            return Vec::new();
        }
        let mut rng = StdRng::seed_from_u64(seed_for_row(base_seed, i));
        partners
            .iter()
            .copied()
            .filter(|_| self.breaks(&mut rng))
            .collect()
    }

    #[inline]
    fn breaks(&self, rng: &mut dyn Rng) -> bool {
        rand01(rng) < self.phi
    }
}

/// Uniform draw in [0, 1) with 53 bits of precision.
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Derives an independent stream seed for particle row `row` from `base_seed`.
pub fn seed_for_row(base_seed: u64, row: usize) -> u64 {
    mix_u64(base_seed ^ (row as u64).wrapping_mul(0x9E3779B97F4A7C15))
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
