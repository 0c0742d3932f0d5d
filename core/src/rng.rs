//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through SubsystemRng instances derived
//! from the single master seed handed to the engine.
//!
//! Each subsystem gets a fresh RNG stream every day, seeded from
//! (master_seed, subsystem slot, day). This means:
//!   - Adding a new subsystem never changes existing subsystems' streams.
//!   - Any single day of any single phase can be replayed in isolation.

use crate::types::Day;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

const SLOT_MIX: u64 = 0x9e37_79b9_7f4a_7c15;
const DAY_MIX:  u64 = 0xbf58_476d_1ce4_e5b9;

/// A named, deterministic RNG for a single subsystem.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Create a subsystem RNG from the master seed and a stable
    /// subsystem index. The index must never change once assigned.
    pub fn new(master_seed: u64, subsystem_index: u64) -> Self {
        let derived_seed = master_seed ^ subsystem_index.wrapping_mul(SLOT_MIX);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a uniform fraction in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Pick a rank in [1, n], the way the contact sampler numbers the pool.
    pub fn rank_in(&mut self, n: u64) -> u64 {
        self.next_u64_below(n) + 1
    }

    /// Bernoulli trial: returns true with probability p.
    /// p = 0.0 never fires, p = 1.0 always fires.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Source of every subsystem RNG for a single run.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// RNG stream for one subsystem on one simulated day.
    pub fn for_subsystem_at_day(&self, slot: SubsystemSlot, day: Day) -> SubsystemRng {
        let day_seed = self.master_seed ^ day.wrapping_mul(DAY_MIX);
        SubsystemRng::new(day_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable subsystem slot assignments.
/// NEVER reorder or remove entries — only append.
/// Reordering changes every subsystem's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SubsystemSlot {
    Interaction = 0,
    Quarantine = 1,
    Illness = 2,
    Hospital = 3,
}

impl SubsystemSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Interaction => "interaction",
            Self::Quarantine => "quarantine",
            Self::Illness => "illness",
            Self::Hospital => "hospital",
        }
    }
}
