//! Neighbor search: which particle pairs lie within the horizon and therefore form a bond.
//!
//! A bond is an unordered pair `(i, j)`, `i != j`, whose squared distance is `<= horizon^2`.
//! Strategies implementing [`PairSearch`] must produce the same bond set; they only differ in
//! how many pairs they examine.
use glam::DVec2;
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod cell_grid;
pub mod exhaustive;

pub use cell_grid::CellGridPairs;
pub use exhaustive::ExhaustivePairs;

/// Trait for bond discovery over a point set.
pub trait PairSearch: Send + Sync {
    fn find_bonds(&self, positions: &[DVec2], horizon: f64) -> BondNetwork;
}

/// Selects a [`PairSearch`] implementation from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BondSearch {
    /// Examine every unordered pair.
    Exhaustive,
    /// Bin particles into cells of roughly horizon size and examine adjacent cells only.
    #[default]
    CellGrid,
}

impl BondSearch {
    /// Boxed runtime strategy for this selection.
    pub fn strategy(self, parallel: bool) -> Box<dyn PairSearch> {
        match self {
            BondSearch::Exhaustive => Box::new(ExhaustivePairs::new(parallel)),
            BondSearch::CellGrid => Box::new(CellGridPairs::new(parallel)),
        }
    }
}

/// Squared Euclidean distance.
#[inline]
pub fn dist2(a: DVec2, b: DVec2) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Bond set stored as a compressed half-adjacency: for every particle `i`, the ascending list
/// of partners `j > i`. Each bond therefore appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondNetwork {
    offsets: Vec<usize>,
    partners: Vec<u32>,
}

impl BondNetwork {
    /// Network over `particle_count` particles without any bonds.
    pub fn empty(particle_count: usize) -> Self {
        Self {
            offsets: vec![0; particle_count + 1],
            partners: Vec::new(),
        }
    }

    /// Assembles a network row by row. `row` must push the partners `j > i` of particle `i`
    /// in ascending order.
    pub fn from_rows<F>(particle_count: usize, parallel: bool, row: F) -> Self
    where
        F: Fn(usize, &mut Vec<u32>) + Send + Sync,
    {
        if !parallel {
            let mut offsets = Vec::with_capacity(particle_count + 1);
            let mut partners = Vec::new();
            offsets.push(0);
            for i in 0..particle_count {
                row(i, &mut partners);
                offsets.push(partners.len());
            }
            return Self { offsets, partners };
        }

        let rows: Vec<Vec<u32>> = (0..particle_count)
            .into_par_iter()
            .map(|i| {
                let mut out = Vec::new();
                row(i, &mut out);
                out
            })
            .collect();

        let total: usize = rows.iter().map(Vec::len).sum();
        let mut offsets = Vec::with_capacity(particle_count + 1);
        let mut partners = Vec::with_capacity(total);
        offsets.push(0);
        for r in rows {
            partners.extend_from_slice(&r);
            offsets.push(partners.len());
        }
        Self { offsets, partners }
    }

    pub fn particle_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of distinct bonds.
    pub fn bond_count(&self) -> usize {
        self.partners.len()
    }

    /// Partners `j > i` of particle `i`, ascending.
    pub fn partners(&self, i: usize) -> &[u32] {
        &self.partners[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Bonds `(i, j)` with `i < j`, ordered by `i` then `j`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.particle_count())
            .flat_map(move |i| self.partners(i).iter().map(move |&j| (i, j as usize)))
    }

    /// Whether `a` and `b` are bonded. Symmetric; never true for `a == b`.
    pub fn contains(&self, a: usize, b: usize) -> bool {
        if a == b || a.max(b) >= self.particle_count() {
            return false;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        self.partners(lo).binary_search(&(hi as u32)).is_ok()
    }

    /// Total bond count per particle, counting each bond at both endpoints.
    pub fn bond_counts(&self) -> Vec<u32> {
        let mut counts = vec![0u32; self.particle_count()];
        for (i, j) in self.iter() {
            counts[i] += 1;
            counts[j] += 1;
        }
        counts
    }
}
