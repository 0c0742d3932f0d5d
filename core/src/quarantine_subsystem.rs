//! Quarantine subsystem — resolves everyone isolating at home.
//!
//! This subsystem:
//!   1. Releases healthy people whose day at home is over back into public.
//!   2. Rolls `home_recovery` once for every mild case at home.
//!   3. Rolls `home_recovery` once for every incubating person at home who
//!      has spent at least one full day isolating (pipeline slot ≥ 1). A
//!      one-day pipeline has no such slot, so its only slot is rolled the
//!      same day, before the illness phase would complete it.
//!
//! A recovery sends the person back out healthy; anything else means the
//! illness got worse at home and they join the queue for a hospital bed.
//! Households are not modelled — nobody at home infects anybody.
//!
//! Execution: every day, after interaction.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    population::PopulationState,
    rng::SubsystemRng,
    subsystem::SimSubsystem,
    types::Count,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuarantineOutcome {
    pub released_healthy: Count,
    pub recovered:        Count,
    pub escalated:        Count,
}

pub fn resolve_quarantine(
    state: &mut PopulationState,
    config: &SimConfig,
    rng: &mut SubsystemRng,
) -> QuarantineOutcome {
    let home_recovery = config.probabilities.home_recovery;
    let mut outcome = QuarantineOutcome {
        released_healthy: std::mem::take(&mut state.healthy_at_home),
        ..Default::default()
    };

    let mut roll = |rng: &mut SubsystemRng, n: Count| {
        for _ in 0..n {
            if rng.chance(home_recovery) {
                outcome.recovered += 1;
            } else {
                outcome.escalated += 1;
            }
        }
    };

    roll(rng, state.mild_at_home);
    state.mild_at_home = 0;

    // Slot 0 was filled by today's interactions; they start tomorrow,
    // unless slot 0 is also the last slot and they finish incubating tonight.
    let first = 1usize.min(state.incubating_at_home.len() - 1);
    for slot in first..state.incubating_at_home.len() {
        let isolating = state.incubating_at_home.slot(slot);
        roll(rng, isolating);
        state.incubating_at_home.remove(slot, isolating);
    }

    state.healthy_in_public += outcome.released_healthy + outcome.recovered;
    state.severe_waiting_for_bed += outcome.escalated;
    outcome
}

pub struct QuarantineSubsystem {
    config: SimConfig,
}

impl QuarantineSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for QuarantineSubsystem {
    fn name(&self) -> &'static str { "quarantine" }

    fn update(
        &mut self,
        state: &mut PopulationState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        let outcome = resolve_quarantine(state, &self.config, rng);

        log::debug!(
            "day={} quarantine: released={} recovered={} escalated={}",
            state.day,
            outcome.released_healthy,
            outcome.recovered,
            outcome.escalated
        );

        Ok(vec![SimEvent::QuarantineResolved {
            day:              state.day,
            released_healthy: outcome.released_healthy,
            recovered:        outcome.recovered,
            escalated:        outcome.escalated,
        }])
    }
}
