//! Shared primitive types used across the entire simulation.

/// A simulated day. Day 1 is the first day the engine runs.
pub type Day = u64;

/// A head count in one compartment of the population.
pub type Count = u64;

/// The canonical run identifier.
pub type RunId = String;
