use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::DVec2;
use pd_porosity::lattice::Lattice;

// Bond search on the larger lattices takes tens of milliseconds per iteration.
pub const SAMPLE_SIZE: usize = 10;
pub const WARM_UP: Duration = Duration::from_millis(500);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

/// Horizon factor used by every bench, matching the common peridynamic choice `m = 3`.
pub const HORIZON_FACTOR: f64 = 3.0;

pub fn pd_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// Positions of a square `side` x `side` lattice with unit spacing.
pub fn square_lattice(side: usize) -> Vec<DVec2> {
    Lattice::with_dims(side, side, 1.0).positions()
}

pub fn bonds_throughput(bonds: usize) -> Throughput {
    Throughput::Elements(bonds.max(1) as u64)
}
