//! Day-by-day stochastic epidemic simulation over a closed population.
//!
//! The population is a set of head counts (healthy, incubating, mild,
//! severe, dead), not a list of individuals. Every day four phases run in
//! a fixed order — interaction, quarantine, illness, hospital — each one
//! rolling per-person odds from the [`ProbabilityTable`] against a seeded
//! RNG stream, then the day is archived as an immutable [`DaySnapshot`].
//!
//! ```rust,ignore
//! use epidemic_core::{NoopObserver, SimConfig, SimEngine};
//!
//! let mut engine = SimEngine::build("run-1".into(), 42, SimConfig::default_test())?;
//! engine.run(&mut NoopObserver)?;
//! for day in engine.archive().iter() {
//!     println!("{} {} {}", day.day, day.sick(), day.dead);
//! }
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod hospital_subsystem;
pub mod illness_subsystem;
pub mod interaction_subsystem;
pub mod observer;
pub mod pipeline;
pub mod population;
pub mod quarantine_subsystem;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod subsystem;
pub mod types;

pub use config::{PopulationConfig, ProbabilityTable, SimConfig};
pub use engine::SimEngine;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use snapshot::{DaySnapshot, SnapshotArchive};
