//! Hospital subsystem — discharges, deaths, and bed allocation.
//!
//! Two passes, in order:
//!   1. Discharge: every inpatient draws one fraction f in [0, 1).
//!        f < hospital_recovery                   → recovered, bed freed
//!        f < hospital_recovery + hospital_death  → died, bed freed
//!        otherwise                               → stays another day
//!      Recovered patients roll `post_recovery_paranoia` to decide whether
//!      they spend a day self-quarantining at home.
//!   2. Admission: the bed queue fills free beds in bulk. Waiting patients
//!      are interchangeable counts, so there is no priority order — the
//!      only limit is capacity.
//!
//! free beds + occupied beds == hospital_capacity, always.
//!
//! Execution: every day, last phase.

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
pub struct DischargeOutcome {
    pub recovered_to_home:   Count,
    pub recovered_to_public: Count,
    pub died:                Count,
}

impl DischargeOutcome {
    pub fn recovered(&self) -> Count {
        self.recovered_to_home + self.recovered_to_public
    }
}

pub fn discharge_patients(
    state: &mut PopulationState,
    config: &SimConfig,
    rng: &mut SubsystemRng,
) -> DischargeOutcome {
    let p = &config.probabilities;
    let death_threshold = p.hospital_recovery + p.hospital_death;
    let mut outcome = DischargeOutcome::default();

    for _ in 0..state.severe_in_bed {
        let f = rng.next_f64();
        if f < p.hospital_recovery {
            if rng.chance(p.post_recovery_paranoia) {
                outcome.recovered_to_home += 1;
            } else {
                outcome.recovered_to_public += 1;
            }
        } else if f < death_threshold {
            outcome.died += 1;
        }
    }

    for _ in 0..outcome.recovered() + outcome.died {
        state.discharge();
    }
    state.healthy_at_home += outcome.recovered_to_home;
    state.healthy_in_public += outcome.recovered_to_public;
    state.dead += outcome.died;
    outcome
}

/// Fill free beds from the queue. Returns how many were admitted.
pub fn admit_patients(state: &mut PopulationState) -> Count {
    let admitted = state.severe_waiting_for_bed.min(state.available_hospital_beds);
    state.admit(admitted);
    admitted
}

pub struct HospitalSubsystem {
    config: SimConfig,
}

impl HospitalSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for HospitalSubsystem {
    fn name(&self) -> &'static str { "hospital" }

    fn update(
        &mut self,
        state: &mut PopulationState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        let discharged = discharge_patients(state, &self.config, rng);
        let admitted = admit_patients(state);

        log::debug!(
            "day={} hospital: recovered={} died={} admitted={} waiting={} free_beds={}",
            state.day,
            discharged.recovered(),
            discharged.died,
            admitted,
            state.severe_waiting_for_bed,
            state.available_hospital_beds
        );

        Ok(vec![SimEvent::HospitalResolved {
            day:           state.day,
            recovered:     discharged.recovered(),
            died:          discharged.died,
            admitted,
            still_waiting: state.severe_waiting_for_bed,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ProbabilityTable,
        rng::{RngBank, SubsystemSlot},
    };

    fn setup(capacity: Count, p: ProbabilityTable) -> (SimConfig, PopulationState) {
        let mut config = SimConfig::default_test();
        config.population.initial_sick = 0;
        config.population.hospital_capacity = capacity;
        config.probabilities = p;
        let state = PopulationState::new(&config.population);
        (config, state)
    }

    fn rng() -> SubsystemRng {
        RngBank::new(31).for_subsystem_at_day(SubsystemSlot::Hospital, 1)
    }

    fn hospitalise(state: &mut PopulationState, waiting: Count, in_bed: Count) {
        state.healthy_in_public -= waiting + in_bed;
        state.severe_waiting_for_bed = waiting + in_bed;
        state.admit(in_bed);
    }

    #[test]
    fn no_beds_leaves_everyone_waiting() {
        let (_, mut state) = setup(0, ProbabilityTable::default());
        hospitalise(&mut state, 5, 0);

        let admitted = admit_patients(&mut state);

        assert_eq!(admitted, 0);
        assert_eq!(state.severe_waiting_for_bed, 5);
        assert_eq!(state.available_hospital_beds, 0);
        state.check_invariants().unwrap();
    }

    #[test]
    fn certain_recovery_frees_the_bed() {
        let p = ProbabilityTable {
            hospital_recovery: 1.0,
            hospital_death: 0.0,
            post_recovery_paranoia: 0.0,
            ..Default::default()
        };
        let (config, mut state) = setup(10, p);
        hospitalise(&mut state, 0, 1);
        let healthy_before = state.healthy_in_public;

        let outcome = discharge_patients(&mut state, &config, &mut rng());

        assert_eq!(outcome.recovered_to_public, 1);
        assert_eq!(state.severe_in_bed, 0);
        assert_eq!(state.available_hospital_beds, 10);
        assert_eq!(state.dead, 0);
        assert_eq!(state.healthy_in_public, healthy_before + 1);
        state.check_invariants().unwrap();
    }

    #[test]
    fn paranoid_survivors_quarantine_at_home() {
        let p = ProbabilityTable {
            hospital_recovery: 1.0,
            post_recovery_paranoia: 1.0,
            ..Default::default()
        };
        let (config, mut state) = setup(10, p);
        hospitalise(&mut state, 0, 4);

        let outcome = discharge_patients(&mut state, &config, &mut rng());

        assert_eq!(outcome.recovered_to_home, 4);
        assert_eq!(state.healthy_at_home, 4);
    }

    #[test]
    fn certain_death_is_counted_and_frees_the_bed() {
        let p = ProbabilityTable { hospital_death: 1.0, ..Default::default() };
        let (config, mut state) = setup(10, p);
        hospitalise(&mut state, 0, 3);

        let outcome = discharge_patients(&mut state, &config, &mut rng());

        assert_eq!(outcome.died, 3);
        assert_eq!(state.dead, 3);
        assert_eq!(state.available_hospital_beds, 10);
        state.check_invariants().unwrap();
    }

    #[test]
    fn zero_odds_keep_patients_in_bed() {
        let (config, mut state) = setup(10, ProbabilityTable::default());
        hospitalise(&mut state, 0, 6);
        let before = state.clone();

        let outcome = discharge_patients(&mut state, &config, &mut rng());

        assert_eq!(outcome, DischargeOutcome::default());
        assert_eq!(state, before);
    }

    #[test]
    fn admission_is_capped_by_free_beds() {
        let (_, mut state) = setup(10, ProbabilityTable::default());
        hospitalise(&mut state, 15, 4);

        let admitted = admit_patients(&mut state);

        assert_eq!(admitted, 6);
        assert_eq!(state.severe_in_bed, 10);
        assert_eq!(state.severe_waiting_for_bed, 9);
        assert_eq!(state.available_hospital_beds, 0);
        state.check_invariants().unwrap();
    }

    #[test]
    fn short_queue_is_admitted_in_full() {
        let (_, mut state) = setup(10, ProbabilityTable::default());
        hospitalise(&mut state, 3, 0);

        assert_eq!(admit_patients(&mut state), 3);
        assert_eq!(state.severe_waiting_for_bed, 0);
        assert_eq!(state.available_hospital_beds, 7);
    }
}
