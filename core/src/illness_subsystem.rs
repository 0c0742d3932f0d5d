//! Illness progression — mild cases re-evaluated, incubation advanced.
//!
//! Two independent groups move each day:
//!   1. Mild cases out in public roll `mild_symptoms`. Staying mild means
//!      a second roll on `ms_staying_home` picks where they spend the next
//!      day; otherwise they escalate straight into the bed queue.
//!   2. Both incubation pipelines age one day. Whoever falls off the end
//!      develops symptoms: mild (home or public) or severe (bed queue).
//!
//! Must run after interaction (which fills slot 0) and before hospital
//! (which drains the bed queue filled here).

use crate::{
    config::{ProbabilityTable, SimConfig},
    error::SimResult,
    event::SimEvent,
    population::PopulationState,
    rng::SubsystemRng,
    subsystem::SimSubsystem,
    types::Count,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IllnessOutcome {
    pub completed_incubation:  Count,
    pub became_mild_at_home:   Count,
    pub became_mild_in_public: Count,
    pub escalated_to_severe:   Count,
}

/// Where a symptomatic person ends up after one roll.
#[derive(Debug, Default)]
struct SymptomSplit {
    mild_at_home:   Count,
    mild_in_public: Count,
    severe:         Count,
}

fn split_symptoms(n: Count, p: &ProbabilityTable, rng: &mut SubsystemRng) -> SymptomSplit {
    let mut split = SymptomSplit::default();
    for _ in 0..n {
        if !rng.chance(p.mild_symptoms) {
            split.severe += 1;
        } else if rng.chance(p.ms_staying_home) {
            split.mild_at_home += 1;
        } else {
            split.mild_in_public += 1;
        }
    }
    split
}

pub fn advance_illness(
    state: &mut PopulationState,
    config: &SimConfig,
    rng: &mut SubsystemRng,
) -> IllnessOutcome {
    let p = &config.probabilities;

    // 1. Mild cases in public.
    let mild = split_symptoms(std::mem::take(&mut state.mild_in_public), p, rng);

    // 2. Incubation completes.
    let completed = state.incubating_in_public.shift() + state.incubating_at_home.shift();
    let onset = split_symptoms(completed, p, rng);

    let outcome = IllnessOutcome {
        completed_incubation:  completed,
        became_mild_at_home:   onset.mild_at_home,
        became_mild_in_public: onset.mild_in_public,
        escalated_to_severe:   mild.severe + onset.severe,
    };

    state.mild_at_home += mild.mild_at_home + onset.mild_at_home;
    state.mild_in_public += mild.mild_in_public + onset.mild_in_public;
    state.severe_waiting_for_bed += outcome.escalated_to_severe;
    outcome
}

pub struct IllnessSubsystem {
    config: SimConfig,
}

impl IllnessSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for IllnessSubsystem {
    fn name(&self) -> &'static str { "illness" }

    fn update(
        &mut self,
        state: &mut PopulationState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        let outcome = advance_illness(state, &self.config, rng);

        log::debug!(
            "day={} illness: completed={} mild_home={} mild_public={} severe={}",
            state.day,
            outcome.completed_incubation,
            outcome.became_mild_at_home,
            outcome.became_mild_in_public,
            outcome.escalated_to_severe
        );

        Ok(vec![SimEvent::IllnessAdvanced {
            day:                   state.day,
            completed_incubation:  outcome.completed_incubation,
            became_mild_at_home:   outcome.became_mild_at_home,
            became_mild_in_public: outcome.became_mild_in_public,
            escalated_to_severe:   outcome.escalated_to_severe,
        }])
    }
}
