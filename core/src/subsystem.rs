//! Subsystem trait.
//!
//! RULE: Every daily phase implements SimSubsystem.
//! The engine calls update() on each registered subsystem
//! in registration order, every day.
//! Execution order is fixed and documented in engine.rs.

use crate::{
    error::SimResult,
    event::SimEvent,
    population::PopulationState,
    rng::SubsystemRng,
};

/// The contract every daily phase must fulfill.
pub trait SimSubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per day by the engine.
    ///
    /// - `state`: the shared population; this phase is its only writer
    ///   for the duration of the call
    /// - `rng`:   this subsystem's deterministic RNG for the day
    ///
    /// Returns the events describing the transitions applied.
    fn update(
        &mut self,
        state: &mut PopulationState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>>;
}
