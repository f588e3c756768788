//! Run parameters: domain extents, lattice spacing, porosity ratio and horizon factor.
//!
//! [`DomainParams`] carries the five physical inputs of a pre-damage run and validates them
//! up front; [`RunConfig`] adds the execution knobs (seed, neighbor search, parallelism).
//! Nothing downstream of [`DomainParams::validate`] can fail for a validated configuration.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bonds::BondSearch;
use crate::error::{Error, Result};

/// Largest particle count addressable by the `u32` ids stored in a bond network.
pub const MAX_PARTICLES: usize = u32::MAX as usize;

/// Physical parameters of a pre-damage run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DomainParams {
    /// Domain extent along x.
    pub lx: f64,
    /// Domain extent along y.
    pub ly: f64,
    /// Lattice spacing.
    pub dx: f64,
    /// Target porosity ratio in [0, 1]; the probability that any bond is broken.
    pub phi: f64,
    /// Horizon factor; the horizon is `m * dx`.
    pub m: f64,
}

impl DomainParams {
    pub fn new(lx: f64, ly: f64, dx: f64, phi: f64, m: f64) -> Self {
        Self { lx, ly, dx, phi, m }
    }

    /// Sets both domain extents.
    pub fn with_extent(mut self, lx: f64, ly: f64) -> Self {
        self.lx = lx;
        self.ly = ly;
        self
    }

    /// Sets the lattice spacing.
    pub fn with_spacing(mut self, dx: f64) -> Self {
        self.dx = dx;
        self
    }

    /// Sets the target porosity ratio.
    pub fn with_porosity(mut self, phi: f64) -> Self {
        self.phi = phi;
        self
    }

    /// Sets the horizon factor.
    pub fn with_horizon_factor(mut self, m: f64) -> Self {
        self.m = m;
        self
    }

    /// Interaction radius `delta = m * dx`.
    #[inline]
    pub fn horizon(&self) -> f64 {
        self.m * self.dx
    }

    /// Lattice dimensions `(Nx, Ny)` with `Nx = floor(Lx / dx) + 1`.
    pub fn grid_dims(&self) -> (usize, usize) {
        let nx = (self.lx / self.dx).floor() as usize + 1;
        let ny = (self.ly / self.dx).floor() as usize + 1;
        (nx, ny)
    }

    /// Total particle count `Nx * Ny`.
    pub fn particle_count(&self) -> usize {
        let (nx, ny) = self.grid_dims();
        nx.saturating_mul(ny)
    }

    /// Validates the parameters, returning an error describing the first violation.
    pub fn validate(&self) -> Result<()> {
        positive("Lx", self.lx)?;
        positive("Ly", self.ly)?;
        positive("dx", self.dx)?;
        positive("m", self.m)?;
        if !self.phi.is_finite() || !(0.0..=1.0).contains(&self.phi) {
            return Err(Error::InvalidConfig(format!(
                "porosity ratio phi must be within [0, 1], got {}",
                self.phi
            )));
        }

        let nx = (self.lx / self.dx).floor() + 1.0;
        let ny = (self.ly / self.dx).floor() + 1.0;
        if !(nx * ny).is_finite() || nx * ny > MAX_PARTICLES as f64 {
            return Err(Error::InvalidConfig(format!(
                "lattice of {nx} x {ny} particles exceeds the supported maximum of {MAX_PARTICLES}"
            )));
        }

        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{name} must be a finite value > 0, got {value}"
        )))
    }
}

/// Full configuration of a pre-damage run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunConfig {
    /// Physical parameters.
    pub params: DomainParams,
    /// Base seed for bond breaking. `None` draws a fresh seed per run.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: Option<u64>,
    /// Neighbor search strategy.
    #[cfg_attr(feature = "serde", serde(default))]
    pub search: BondSearch,
    /// Spread bond search and sampling across the rayon thread pool.
    #[cfg_attr(feature = "serde", serde(default = "default_parallel"))]
    pub parallel: bool,
}

#[cfg(feature = "serde")]
fn default_parallel() -> bool {
    true
}

impl RunConfig {
    /// Creates a new [`RunConfig`] with a random seed, cell-grid search and parallel execution.
    pub fn new(params: DomainParams) -> Self {
        Self {
            params,
            seed: None,
            search: BondSearch::default(),
            parallel: true,
        }
    }

    /// Fixes the base seed, making the run reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the neighbor search strategy.
    pub fn with_search(mut self, search: BondSearch) -> Self {
        self.search = search;
        self
    }

    /// Enables or disables parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.params.validate()
    }
}

/// Derived output file name, e.g. `porosity_Lx10_phi25.vtk` for `Lx = 10.5, phi = 0.25`.
pub fn output_file_name(params: &DomainParams) -> String {
    let lx = params.lx.trunc() as i64;
    let phi_pct = (params.phi * 100.0).trunc() as i64;
    format!("porosity_Lx{lx}_phi{phi_pct}.vtk")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> DomainParams {
        DomainParams::new(1.0, 1.0, 0.1, 0.2, 3.0)
    }

    #[test]
    fn valid_params_pass() {
        assert!(params().validate().is_ok());
    }

    #[test]
    fn non_positive_extents_and_spacing_are_rejected() {
        assert!(params().with_extent(0.0, 1.0).validate().is_err());
        assert!(params().with_extent(1.0, -2.0).validate().is_err());
        assert!(params().with_spacing(0.0).validate().is_err());
        assert!(params().with_horizon_factor(0.0).validate().is_err());
        assert!(params().with_spacing(f64::NAN).validate().is_err());
    }

    #[test]
    fn porosity_outside_unit_interval_is_rejected() {
        let err = params().with_porosity(1.5).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref msg) if msg.contains("phi")));
        assert!(params().with_porosity(-0.01).validate().is_err());
        assert!(params().with_porosity(0.0).validate().is_ok());
        assert!(params().with_porosity(1.0).validate().is_ok());
    }

    #[test]
    fn oversized_lattice_is_rejected() {
        let p = DomainParams::new(1.0e6, 1.0e6, 1.0e-3, 0.1, 2.0);
        assert!(p.validate().is_err());
    }

    #[test]
    fn grid_dims_follow_floor_plus_one() {
        let p = DomainParams::new(1.0, 2.5, 1.0, 0.0, 1.0);
        assert_eq!(p.grid_dims(), (2, 3));
        assert_eq!(p.particle_count(), 6);

        let single = DomainParams::new(0.5, 0.5, 1.0, 0.5, 1.0);
        assert_eq!(single.grid_dims(), (1, 1));
    }

    #[test]
    fn horizon_is_factor_times_spacing() {
        let p = DomainParams::new(1.0, 1.0, 0.5, 0.0, 3.0);
        assert_eq!(p.horizon(), 1.5);
    }

    #[test]
    fn output_name_truncates_length_and_percentage() {
        let p = DomainParams::new(10.7, 3.0, 0.1, 0.256, 3.0);
        assert_eq!(output_file_name(&p), "porosity_Lx10_phi25.vtk");
    }

    #[test]
    fn run_config_builders_set_fields() {
        let cfg = RunConfig::new(params())
            .with_seed(7)
            .with_search(BondSearch::Exhaustive)
            .with_parallel(false);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.search, BondSearch::Exhaustive);
        assert!(!cfg.parallel);
        assert!(cfg.validate().is_ok());
    }
}
