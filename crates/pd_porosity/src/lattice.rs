//! Regular particle lattice spanning a rectangular domain.
use glam::DVec2;
use mint::Vector2;

use crate::config::DomainParams;

/// A material point on the lattice. Immutable once placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Index in creation order, `j * nx + i`.
    pub id: usize,
    /// Position `(i * dx, j * dx)`.
    pub position: DVec2,
}

/// Row-major lattice of particles with spacing `dx`, anchored at the origin.
#[derive(Debug, Clone)]
pub struct Lattice {
    pub nx: usize,
    pub ny: usize,
    pub spacing: f64,
    particles: Vec<Particle>,
}

impl Lattice {
    /// Builds the lattice for validated parameters.
    ///
    /// Enumeration is ascending `j`, then ascending `i`, so the particle at grid coordinates
    /// `(i, j)` has id `j * nx + i`.
    pub fn build(params: &DomainParams) -> Self {
        let (nx, ny) = params.grid_dims();
        Self::with_dims(nx, ny, params.dx)
    }

    /// Builds an `nx` x `ny` lattice with the given spacing.
    pub fn with_dims(nx: usize, ny: usize, spacing: f64) -> Self {
        debug_assert!(spacing > 0.0, "spacing must be > 0");
        let mut particles = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                particles.push(Particle {
                    id: j * nx + i,
                    position: DVec2::new(i as f64 * spacing, j as f64 * spacing),
                });
            }
        }

        Self {
            nx,
            ny,
            spacing,
            particles,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particle at grid coordinates `(i, j)`, if inside the lattice.
    pub fn get(&self, i: usize, j: usize) -> Option<&Particle> {
        if i < self.nx && j < self.ny {
            self.particles.get(j * self.nx + i)
        } else {
            None
        }
    }

    /// Grid coordinates `(i, j)` of a particle id.
    pub fn grid_coords(&self, id: usize) -> Option<(usize, usize)> {
        (id < self.len()).then(|| (id % self.nx, id / self.nx))
    }

    /// Positions in id order.
    pub fn positions(&self) -> Vec<DVec2> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Positions in id order as `mint` vectors, the interchange type used by exporters.
    pub fn positions_mint(&self) -> Vec<Vector2<f64>> {
        self.particles.iter().map(|p| p.position.into()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_matches_grid_dims() {
        let params = DomainParams::new(2.0, 1.0, 0.5, 0.1, 2.0);
        let lattice = Lattice::build(&params);
        assert_eq!((lattice.nx, lattice.ny), (5, 3));
        assert_eq!(lattice.len(), 15);
    }

    #[test]
    fn ids_and_positions_follow_row_major_order() {
        let lattice = Lattice::with_dims(3, 2, 0.5);
        for j in 0..2 {
            for i in 0..3 {
                let p = lattice.get(i, j).expect("inside lattice");
                assert_eq!(p.id, j * 3 + i);
                assert_eq!(p.position, DVec2::new(i as f64 * 0.5, j as f64 * 0.5));
                assert_eq!(lattice.grid_coords(p.id), Some((i, j)));
            }
        }
        assert!(lattice.get(3, 0).is_none());
        assert!(lattice.grid_coords(6).is_none());
    }

    #[test]
    fn positions_are_distinct() {
        let lattice = Lattice::with_dims(4, 4, 0.25);
        let pts = lattice.positions();
        for a in 0..pts.len() {
            for b in (a + 1)..pts.len() {
                assert_ne!(pts[a], pts[b]);
            }
        }
    }

    #[test]
    fn degenerate_domain_yields_single_particle() {
        let params = DomainParams::new(0.5, 0.5, 1.0, 0.3, 2.0);
        let lattice = Lattice::build(&params);
        assert_eq!(lattice.len(), 1);
        assert_eq!(lattice.particles()[0].position, DVec2::ZERO);
    }

    #[test]
    fn mint_positions_mirror_glam_positions() {
        let lattice = Lattice::with_dims(2, 2, 1.0);
        let mint = lattice.positions_mint();
        assert_eq!(mint.len(), 4);
        assert_eq!((mint[3].x, mint[3].y), (1.0, 1.0));
    }
}
