//! Event types and sinks for observing pre-damage runs.
//!
//! This module defines [`PreDamageEvent`] and a set of sinks to emit, collect, or forward
//! events while executing [`crate::pipeline::run_with_events`].
use crate::bonds::BondSearch;
use crate::config::DomainParams;

/// Describes events emitted by a pre-damage run, in pipeline order.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum PreDamageEvent {
    /// Emitted after validation, before any particle is placed.
    RunStarted {
        /// The physical parameters of the run.
        params: DomainParams,
        /// Base seed used for bond breaking.
        seed: u64,
        /// Neighbor search strategy.
        search: BondSearch,
    },

    /// Emitted once the lattice is built.
    LatticeBuilt {
        nx: usize,
        ny: usize,
        particle_count: usize,
    },

    /// Emitted once the bond network is known.
    BondsFound {
        /// Interaction radius used for the search.
        horizon: f64,
        /// Number of distinct bonds.
        total_bonds: u64,
    },

    /// Emitted after every bond received its breaking trial.
    BondsBroken {
        total_bonds: u64,
        broken_bonds: u64,
        /// Realized global porosity.
        realized_porosity: f64,
    },

    /// Emitted after the damage field is computed.
    DamageEvaluated {
        min: f64,
        max: f64,
        mean: f64,
        /// Particles without bonds.
        isolated: usize,
    },

    /// Emitted when the run finishes.
    RunFinished {
        summary: RunSummary,
    },

    /// Non-fatal warning generated during the run.
    Warning {
        /// Context string (e.g. pipeline stage).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`PreDamageEvent`], used by sinks to filter what they receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RunStarted,
    LatticeBuilt,
    BondsFound,
    BondsBroken,
    DamageEvaluated,
    RunFinished,
    Warning,
}

impl PreDamageEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PreDamageEvent::RunStarted { .. } => EventKind::RunStarted,
            PreDamageEvent::LatticeBuilt { .. } => EventKind::LatticeBuilt,
            PreDamageEvent::BondsFound { .. } => EventKind::BondsFound,
            PreDamageEvent::BondsBroken { .. } => EventKind::BondsBroken,
            PreDamageEvent::DamageEvaluated { .. } => EventKind::DamageEvaluated,
            PreDamageEvent::RunFinished { .. } => EventKind::RunFinished,
            PreDamageEvent::Warning { .. } => EventKind::Warning,
        }
    }
}

/// Compact outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub particle_count: usize,
    pub total_bonds: u64,
    pub broken_bonds: u64,
    pub realized_porosity: f64,
    pub seed: u64,
}

/// A generic event sink that accepts [`PreDamageEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PreDamageEvent);

    /// Whether the sink cares about events of `kind`. Producers skip building unwanted events.
    fn wants(&self, _kind: EventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PreDamageEvent) {}

    #[inline]
    fn wants(&self, _kind: EventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PreDamageEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PreDamageEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PreDamageEvent),
{
    #[inline]
    fn send(&mut self, event: PreDamageEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PreDamageEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<PreDamageEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PreDamageEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PreDamageEvent) {
        self.events.push(event);
    }
}
