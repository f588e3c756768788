//! End-to-end pre-damage run: lattice, bonds, porosity sampling, damage.
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::damage::{self, DamageField};
use crate::error::Result;
use crate::events::{EventKind, EventSink, PreDamageEvent, RunSummary};
use crate::lattice::Lattice;
use crate::porosity::{BondTallies, PorositySampler};

/// Output of a pre-damage run. Immutable once produced; may be exported any number of times.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PreDamageResult {
    pub lattice: Lattice,
    pub tallies: BondTallies,
    pub damage: DamageField,
    /// Base seed actually used, for replaying the run.
    pub seed: u64,
}

impl PreDamageResult {
    /// Realized global porosity `broken / total` bonds.
    pub fn realized_porosity(&self) -> f64 {
        self.tallies.realized_porosity()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            particle_count: self.lattice.len(),
            total_bonds: self.tallies.total_bonds,
            broken_bonds: self.tallies.broken_bonds,
            realized_porosity: self.realized_porosity(),
            seed: self.seed,
        }
    }
}

/// Runs the pipeline without event observation.
pub fn run(config: &RunConfig) -> Result<PreDamageResult> {
    run_with_events(config, &mut ())
}

/// Runs the pipeline, reporting progress to `sink`.
///
/// Invalid parameters are rejected before any particle is created.
pub fn run_with_events(config: &RunConfig, sink: &mut dyn EventSink) -> Result<PreDamageResult> {
    config.validate()?;
    let params = &config.params;
    let seed = config.seed.unwrap_or_else(|| rand::rng().next_u64());

    info!(
        "Pre-damage run: Lx = {}, Ly = {}, dx = {}, phi = {}, m = {} | seed {}.",
        params.lx, params.ly, params.dx, params.phi, params.m, seed
    );
    if sink.wants(EventKind::RunStarted) {
        sink.send(PreDamageEvent::RunStarted {
            params: *params,
            seed,
            search: config.search,
        });
    }

    let lattice = Lattice::build(params);
    info!(
        "Building grid: Nx = {}, Ny = {}, total particles N = {}.",
        lattice.nx,
        lattice.ny,
        lattice.len()
    );
    if sink.wants(EventKind::LatticeBuilt) {
        sink.send(PreDamageEvent::LatticeBuilt {
            nx: lattice.nx,
            ny: lattice.ny,
            particle_count: lattice.len(),
        });
    }

    if params.m < 1.0 {
        warn_with(
            sink,
            "bonds",
            format!(
                "Horizon factor m = {} is below 1; the horizon is shorter than the lattice spacing and no bonds can form.",
                params.m
            ),
        );
    }

    let horizon = params.horizon();
    let network = config
        .search
        .strategy(config.parallel)
        .find_bonds(&lattice.positions(), horizon);
    debug!(
        "Bond search ({:?}, parallel = {}) found {} bonds.",
        config.search,
        config.parallel,
        network.bond_count()
    );
    if sink.wants(EventKind::BondsFound) {
        sink.send(PreDamageEvent::BondsFound {
            horizon,
            total_bonds: network.bond_count() as u64,
        });
    }
    if network.bond_count() == 0 {
        warn_with(
            sink,
            "bonds",
            "Lattice has no bonds; damage is zero everywhere.".to_owned(),
        );
    }

    let tallies = PorositySampler::new(params.phi).sample_seeded(&network, seed, config.parallel);
    info!(
        "Total bonds: {} | broken: {} | realized porosity ~ {:.6}.",
        tallies.total_bonds,
        tallies.broken_bonds,
        tallies.realized_porosity()
    );
    if sink.wants(EventKind::BondsBroken) {
        sink.send(PreDamageEvent::BondsBroken {
            total_bonds: tallies.total_bonds,
            broken_bonds: tallies.broken_bonds,
            realized_porosity: tallies.realized_porosity(),
        });
    }

    let damage = damage::evaluate(&tallies);
    if sink.wants(EventKind::DamageEvaluated) {
        let stats = damage.stats(&tallies);
        sink.send(PreDamageEvent::DamageEvaluated {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            isolated: stats.isolated,
        });
    }

    let result = PreDamageResult {
        lattice,
        tallies,
        damage,
        seed,
    };
    if sink.wants(EventKind::RunFinished) {
        sink.send(PreDamageEvent::RunFinished {
            summary: result.summary(),
        });
    }

    Ok(result)
}

fn warn_with(sink: &mut dyn EventSink, context: &str, message: String) {
    warn!("{}", message);
    if sink.wants(EventKind::Warning) {
        sink.send(PreDamageEvent::Warning {
            context: context.into(),
            message,
        });
    }
}
