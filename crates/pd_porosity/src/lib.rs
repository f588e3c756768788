#![forbid(unsafe_code)]
//! pd_porosity: synthetic porosity pre-damage for 2D peridynamic particle lattices.
//!
//! Modules:
//! - config: domain parameters, run configuration and validation
//! - lattice: regular particle grid construction
//! - bonds: neighbor search under a horizon (exhaustive scan, cell-grid binning)
//! - porosity: Bernoulli bond breaking calibrated to a target porosity ratio
//! - damage: per-particle damage from broken/total bond counts
//! - pipeline: end-to-end run with observable events
//! - export: legacy VTK polydata writer for points + damage
pub mod bonds;
pub mod config;
pub mod damage;
pub mod error;
pub mod events;
pub mod export;
pub mod lattice;
pub mod pipeline;
pub mod porosity;

/// Convenient re-exports for common types. Import with `use pd_porosity::prelude::*;`.
pub mod prelude {
    pub use crate::bonds::{BondNetwork, BondSearch, CellGridPairs, ExhaustivePairs, PairSearch};
    pub use crate::config::{output_file_name, DomainParams, RunConfig};
    pub use crate::damage::{evaluate, DamageField, DamageStats};
    pub use crate::error::{Error, Result};
    pub use crate::events::{EventKind, EventSink, FnSink, PreDamageEvent, RunSummary, VecSink};
    pub use crate::export::{export_result, export_to_path, FieldExporter, VtkPolyDataExporter};
    pub use crate::lattice::{Lattice, Particle};
    pub use crate::pipeline::{run, run_with_events, PreDamageResult};
    pub use crate::porosity::{seed_for_row, BondTallies, PorositySampler};
}
