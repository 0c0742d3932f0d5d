//! Interaction subsystem — daily random contact and infection spread.
//!
//! Everyone out in public today forms one virtual pool:
//!   - healthy people in public
//!   - incubating people in public who are already contagious
//!   - mild cases who still go out
//!
//! The pool is drained in groups of `average_daily_interactions`, sampling
//! without replacement. Nobody is materialised: a draw picks a rank in
//! [1, remaining] and classifies it against the contagious, symptomatic
//! and healthy sub-ranges, in that order. Healthy people who share a group
//! with at least one contagious person may catch the disease; those who
//! don't may get spooked and stay home.
//!
//! Drawing stops once the pool is empty or no contagious people remain in
//! it — healthy-only groups change nothing.
//!
//! Execution: every day, first phase.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    population::PopulationState,
    rng::SubsystemRng,
    subsystem::SimSubsystem,
    types::Count,
};

// ── Public types ─────────────────────────────────────────────────────────────

/// Tally of one day's contact rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionOutcome {
    pub rounds:             u64,
    pub drawn:              Count,
    pub infected_in_public: Count,
    pub infected_at_home:   Count,
    pub withdrew_home:      Count,
}

impl InteractionOutcome {
    pub fn infected(&self) -> Count {
        self.infected_in_public + self.infected_at_home
    }
}

// ── Contact pool ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    Incubating,
    Symptomatic,
    Healthy,
}

/// Remaining head counts of today's pool. Ranks 1..=incubating are
/// contagious incubating people, the next `symptomatic` ranks are mild
/// cases, and everything above is healthy.
#[derive(Debug, Clone, Copy)]
struct ContactPool {
    total:       Count,
    incubating:  Count,
    symptomatic: Count,
}

impl ContactPool {
    fn for_today(state: &PopulationState) -> Self {
        let incubating = state.incubating_in_public.contagious();
        let symptomatic = state.mild_in_public;
        Self {
            total: state.healthy_in_public + incubating + symptomatic,
            incubating,
            symptomatic,
        }
    }

    fn contagious(&self) -> Count {
        self.incubating + self.symptomatic
    }

    /// Remove one uniformly chosen person from the pool.
    fn draw(&mut self, rng: &mut SubsystemRng) -> Contact {
        let rank = rng.rank_in(self.total);
        self.total -= 1;

        if rank <= self.incubating {
            self.incubating -= 1;
            Contact::Incubating
        } else if (self.incubating + 1..=self.incubating + self.symptomatic).contains(&rank) {
            self.symptomatic -= 1;
            Contact::Symptomatic
        } else {
            Contact::Healthy
        }
    }
}

/// Run the day's contact rounds against `state`.
pub fn resolve_interactions(
    state: &mut PopulationState,
    config: &SimConfig,
    rng: &mut SubsystemRng,
) -> InteractionOutcome {
    let p = &config.probabilities;
    let group_size = config.population.average_daily_interactions;
    let mut pool = ContactPool::for_today(state);
    let mut outcome = InteractionOutcome::default();

    while pool.total > 0 && pool.contagious() > 0 {
        let group = group_size.min(pool.total);
        let mut contagious_present = 0;
        let mut healthy_present = 0;

        for _ in 0..group {
            match pool.draw(rng) {
                Contact::Healthy => healthy_present += 1,
                Contact::Incubating | Contact::Symptomatic => contagious_present += 1,
            }
        }
        outcome.rounds += 1;
        outcome.drawn += group;

        if contagious_present == 0 {
            continue;
        }

        for _ in 0..healthy_present {
            if rng.chance(p.getting_sick) {
                if rng.chance(p.healthy_staying_home) {
                    outcome.infected_at_home += 1;
                } else {
                    outcome.infected_in_public += 1;
                }
            } else if rng.chance(p.healthy_staying_home) {
                outcome.withdrew_home += 1;
            }
        }
    }

    // Everyone counted above was drawn from healthy_in_public exactly once.
    state.healthy_in_public -= outcome.infected() + outcome.withdrew_home;
    state.healthy_at_home += outcome.withdrew_home;
    state.incubating_in_public.infect(outcome.infected_in_public);
    state.incubating_at_home.infect(outcome.infected_at_home);

    outcome
}

// ── Subsystem ────────────────────────────────────────────────────────────────

pub struct InteractionSubsystem {
    config: SimConfig,
}

impl InteractionSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for InteractionSubsystem {
    fn name(&self) -> &'static str { "interaction" }

    fn update(
        &mut self,
        state: &mut PopulationState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        let outcome = resolve_interactions(state, &self.config, rng);

        log::debug!(
            "day={} interaction: rounds={} drawn={} infected={} (home={}) withdrew={}",
            state.day,
            outcome.rounds,
            outcome.drawn,
            outcome.infected(),
            outcome.infected_at_home,
            outcome.withdrew_home
        );

        Ok(vec![SimEvent::InteractionsResolved {
            day:                state.day,
            rounds:             outcome.rounds,
            drawn:              outcome.drawn,
            infected_in_public: outcome.infected_in_public,
            infected_at_home:   outcome.infected_at_home,
            withdrew_home:      outcome.withdrew_home,
        }])
    }
}
