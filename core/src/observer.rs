//! Simulation observer trait for progress reporting and data collection.

use crate::{event::SimEvent, snapshot::DaySnapshot, types::Day};

/// Callbacks invoked by [`SimEngine`][crate::engine::SimEngine] at key
/// points in the daily loop.
///
/// All methods have default no-op implementations so implementors only
/// need to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_day_end(&mut self, snapshot: &DaySnapshot) {
///         println!("day {}: {} sick, {} dead", snapshot.day, snapshot.sick(), snapshot.dead);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each day, before any phase runs.
    fn on_day_start(&mut self, _day: Day) {}

    /// Called for every event a phase emits, in emission order.
    fn on_event(&mut self, _event: &SimEvent) {}

    /// Called once the day's snapshot has been archived.
    fn on_day_end(&mut self, _snapshot: &DaySnapshot) {}

    /// Called once after the final day completes.
    fn on_run_end(&mut self, _final_day: Day) {}
}

/// A [`SimObserver`] that does nothing. Use when you need to drive the
/// engine but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
