//! Bond search over a uniform cell grid.
//!
//! Particles are binned into square cells at least as wide as the horizon, so every bonded
//! partner lies in the same or an adjacent cell. Cell binning only prunes pairs that are
//! guaranteed to exceed the horizon; the exact `dist2 <= horizon^2` test still decides.
use glam::DVec2;
use tracing::debug;

use crate::bonds::{dist2, BondNetwork, ExhaustivePairs, PairSearch};

/// Relative widening of cells over the horizon, absorbing rounding in the cell index.
const CELL_SLACK: f64 = 1e-6;

/// Upper bound on cells per particle before cells are coarsened.
const MAX_CELLS_PER_PARTICLE: usize = 4;

/// Cell-binned bond search. Roughly O(N) for a lattice with a fixed horizon factor.
#[derive(Debug, Clone, Default)]
pub struct CellGridPairs {
    /// Compute rows on the rayon thread pool.
    pub parallel: bool,
}

impl CellGridPairs {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }
}

impl PairSearch for CellGridPairs {
    fn find_bonds(&self, positions: &[DVec2], horizon: f64) -> BondNetwork {
        if positions.is_empty() {
            return BondNetwork::empty(0);
        }
        if !horizon.is_finite() || horizon <= 0.0 {
            return ExhaustivePairs::new(self.parallel).find_bonds(positions, horizon);
        }

        let bins = CellBins::new(positions, horizon);
        debug!(
            "Cell grid: {} x {} cells of size {:.6} for {} particles.",
            bins.cols,
            bins.rows,
            bins.cell_size,
            positions.len()
        );

        let h2 = horizon * horizon;
        BondNetwork::from_rows(positions.len(), self.parallel, |i, out| {
            let start = out.len();
            let pi = positions[i];
            let (cx, cy) = bins.cell_of(pi);
            for ny in cy.saturating_sub(1)..=(cy + 1).min(bins.rows - 1) {
                for nx in cx.saturating_sub(1)..=(cx + 1).min(bins.cols - 1) {
                    for &j in bins.items(nx, ny) {
                        if (j as usize) > i && dist2(pi, positions[j as usize]) <= h2 {
                            out.push(j);
                        }
                    }
                }
            }
            out[start..].sort_unstable();
        })
    }
}

struct CellBins {
    origin: DVec2,
    cell_size: f64,
    cols: usize,
    rows: usize,
    cell_start: Vec<usize>,
    items: Vec<u32>,
}

impl CellBins {
    fn new(positions: &[DVec2], horizon: f64) -> Self {
        let (min, max) = positions.iter().fold(
            (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
            |(lo, hi), &p| (lo.min(p), hi.max(p)),
        );
        let span = max - min;
        let max_cells = positions.len().saturating_mul(MAX_CELLS_PER_PARTICLE).max(16) as f64;

        // Coarsen in f64 so that a horizon far below the domain span never reaches an
        // integer cast with an out-of-range cell count.
        let floor_size = span.max_element() / max_cells.sqrt();
        let mut cell_size = (horizon * (1.0 + CELL_SLACK)).max(floor_size);
        while cell_count(span, cell_size) > max_cells {
            cell_size *= 2.0;
        }
        let (cols, rows) = dims_for(span, cell_size);

        let mut bins = Self {
            origin: min,
            cell_size,
            cols,
            rows,
            cell_start: vec![0; cols * rows + 1],
            items: vec![0; positions.len()],
        };

        // Counting sort by cell; ids stay ascending within each cell.
        let cells: Vec<usize> = positions
            .iter()
            .map(|&p| {
                let (cx, cy) = bins.cell_of(p);
                cy * cols + cx
            })
            .collect();
        for &c in &cells {
            bins.cell_start[c + 1] += 1;
        }
        for c in 0..cols * rows {
            bins.cell_start[c + 1] += bins.cell_start[c];
        }
        let mut cursor = bins.cell_start.clone();
        for (id, &c) in cells.iter().enumerate() {
            bins.items[cursor[c]] = id as u32;
            cursor[c] += 1;
        }

        bins
    }

    #[inline]
    fn cell_of(&self, p: DVec2) -> (usize, usize) {
        let rel = (p - self.origin) / self.cell_size;
        let cx = (rel.x.floor().max(0.0) as usize).min(self.cols - 1);
        let cy = (rel.y.floor().max(0.0) as usize).min(self.rows - 1);
        (cx, cy)
    }

    #[inline]
    fn items(&self, cx: usize, cy: usize) -> &[u32] {
        let c = cy * self.cols + cx;
        &self.items[self.cell_start[c]..self.cell_start[c + 1]]
    }
}

fn cell_count(span: DVec2, cell_size: f64) -> f64 {
    ((span.x / cell_size).floor() + 1.0) * ((span.y / cell_size).floor() + 1.0)
}

/// Grid dimensions for a cell size already bounded by [`cell_count`].
fn dims_for(span: DVec2, cell_size: f64) -> (usize, usize) {
    let cols = (span.x / cell_size).floor() as usize + 1;
    let rows = (span.y / cell_size).floor() as usize + 1;
    (cols, rows)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::lattice::Lattice;

    fn assert_matches_exhaustive(positions: &[DVec2], horizon: f64) {
        let expected = ExhaustivePairs::new(false).find_bonds(positions, horizon);
        let seq = CellGridPairs::new(false).find_bonds(positions, horizon);
        let par = CellGridPairs::new(true).find_bonds(positions, horizon);
        assert_eq!(seq, expected, "sequential cell grid differs (h = {horizon})");
        assert_eq!(par, expected, "parallel cell grid differs (h = {horizon})");
    }

    #[test]
    fn matches_exhaustive_on_lattices() {
        for &(nx, ny, dx, m) in &[
            (11, 11, 0.1, 3.0),
            (9, 4, 0.25, 1.0),
            (6, 6, 1.0, 2.0),
            (13, 7, 0.3, 1.5),
            (5, 5, 0.1, 0.5),
        ] {
            let lattice = Lattice::with_dims(nx, ny, dx);
            assert_matches_exhaustive(&lattice.positions(), m * dx);
        }
    }

    #[test]
    fn matches_exhaustive_on_scattered_points() {
        let mut rng = StdRng::seed_from_u64(99);
        let positions: Vec<DVec2> = (0..200)
            .map(|_| {
                let x = (rng.next_u32() as f64) / (u32::MAX as f64) * 10.0;
                let y = (rng.next_u32() as f64) / (u32::MAX as f64) * 4.0;
                DVec2::new(x, y)
            })
            .collect();
        assert_matches_exhaustive(&positions, 0.7);
        assert_matches_exhaustive(&positions, 3.0);
    }

    #[test]
    fn tiny_horizon_coarsens_cells() {
        let lattice = Lattice::with_dims(20, 20, 1.0);
        let bins = CellBins::new(&lattice.positions(), 1e-3);
        assert!(bins.cols * bins.rows <= 400 * MAX_CELLS_PER_PARTICLE);
        assert_matches_exhaustive(&lattice.positions(), 1e-3);
    }

    #[test]
    fn vanishing_horizon_finds_no_bonds() {
        let lattice = Lattice::with_dims(3, 3, 0.5);
        let positions = lattice.positions();
        let horizon = 1e-20 * 0.5;
        let bins = CellBins::new(&positions, horizon);
        assert!(bins.cols * bins.rows <= 9 * MAX_CELLS_PER_PARTICLE);

        let net = CellGridPairs::new(true).find_bonds(&positions, horizon);
        assert_eq!(net.particle_count(), 9);
        assert_eq!(net.bond_count(), 0);
        assert_matches_exhaustive(&positions, horizon);
    }

    #[test]
    fn bins_cover_every_particle_once() {
        let lattice = Lattice::with_dims(8, 3, 0.5);
        let bins = CellBins::new(&lattice.positions(), 0.75);
        let mut seen: Vec<u32> = (0..bins.rows)
            .flat_map(|cy| (0..bins.cols).map(move |cx| (cx, cy)))
            .flat_map(|(cx, cy)| bins.items(cx, cy).to_vec())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..24).collect::<Vec<u32>>());
    }

    #[test]
    fn empty_input_gives_empty_network() {
        let net = CellGridPairs::new(true).find_bonds(&[], 1.0);
        assert_eq!(net.particle_count(), 0);
        assert_eq!(net.bond_count(), 0);
    }
}
