//! Population state — the single mutable aggregate every phase works on.
//!
//! Incubating people live in two pipelines, one for those moving about in
//! public and one for those isolating at home. The asymptomatic head counts
//! are the pipeline totals, so they can never drift from the pipelines.

use crate::{
    config::PopulationConfig,
    error::{SimError, SimResult},
    pipeline::IncubationPipeline,
    snapshot::DaySnapshot,
    types::{Count, Day},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationState {
    pub day:                     Day,
    pub total_population:        Count,
    pub hospital_capacity:       Count,

    pub healthy_at_home:         Count,
    pub healthy_in_public:       Count,
    pub incubating_at_home:      IncubationPipeline,
    pub incubating_in_public:    IncubationPipeline,
    pub mild_at_home:            Count,
    pub mild_in_public:          Count,
    pub severe_waiting_for_bed:  Count,
    pub severe_in_bed:           Count,
    pub dead:                    Count,
    pub available_hospital_beds: Count,
}

impl PopulationState {
    /// Day-0 state: everyone healthy and out, `initial_sick` freshly
    /// infected in public, every bed free.
    pub fn new(config: &PopulationConfig) -> Self {
        let mut incubating_in_public =
            IncubationPipeline::new(config.incubation_period, config.infectious_since_day);
        incubating_in_public.infect(config.initial_sick);

        Self {
            day:                     0,
            total_population:        config.total_population,
            hospital_capacity:       config.hospital_capacity,
            healthy_at_home:         0,
            healthy_in_public:       config.total_population - config.initial_sick,
            incubating_at_home:      IncubationPipeline::new(
                config.incubation_period,
                config.infectious_since_day,
            ),
            incubating_in_public,
            mild_at_home:            0,
            mild_in_public:          0,
            severe_waiting_for_bed:  0,
            severe_in_bed:           0,
            dead:                    0,
            available_hospital_beds: config.hospital_capacity,
        }
    }

    pub fn asymptomatic_at_home(&self) -> Count {
        self.incubating_at_home.total()
    }

    pub fn asymptomatic_in_public(&self) -> Count {
        self.incubating_in_public.total()
    }

    pub fn healthy(&self) -> Count {
        self.healthy_at_home + self.healthy_in_public
    }

    pub fn asymptomatic(&self) -> Count {
        self.asymptomatic_at_home() + self.asymptomatic_in_public()
    }

    pub fn mild(&self) -> Count {
        self.mild_at_home + self.mild_in_public
    }

    pub fn severe(&self) -> Count {
        self.severe_waiting_for_bed + self.severe_in_bed
    }

    /// Everyone, living or dead, across every compartment.
    pub fn accounted(&self) -> Count {
        self.healthy() + self.asymptomatic() + self.mild() + self.severe() + self.dead
    }

    /// Move `count` waiting patients into free beds.
    pub(crate) fn admit(&mut self, count: Count) {
        self.severe_waiting_for_bed -= count;
        self.available_hospital_beds -= count;
        self.severe_in_bed += count;
    }

    /// Free one bed.
    pub(crate) fn discharge(&mut self) {
        self.severe_in_bed -= 1;
        self.available_hospital_beds += 1;
    }

    /// Closed-population and fixed-bed checks. A failure here means an
    /// engine corrupted the state; the run must stop.
    pub fn check_invariants(&self) -> SimResult<()> {
        let accounted = self.accounted();
        if accounted != self.total_population {
            return Err(SimError::InvariantViolation {
                day:    self.day,
                detail: format!(
                    "population not conserved: {accounted} accounted for, expected {}",
                    self.total_population
                ),
            });
        }
        let beds = self.available_hospital_beds + self.severe_in_bed;
        if beds != self.hospital_capacity {
            return Err(SimError::InvariantViolation {
                day:    self.day,
                detail: format!(
                    "beds not conserved: {} free + {} occupied != capacity {}",
                    self.available_hospital_beds, self.severe_in_bed, self.hospital_capacity
                ),
            });
        }
        Ok(())
    }

    /// Deep copy for the archive. Never touches `self`.
    pub fn snapshot(&self) -> DaySnapshot {
        DaySnapshot {
            day:                     self.day,
            total_population:        self.total_population,
            healthy_at_home:         self.healthy_at_home,
            healthy_in_public:       self.healthy_in_public,
            asymptomatic_at_home:    self.asymptomatic_at_home(),
            asymptomatic_in_public:  self.asymptomatic_in_public(),
            mild_at_home:            self.mild_at_home,
            mild_in_public:          self.mild_in_public,
            severe_waiting_for_bed:  self.severe_waiting_for_bed,
            severe_in_bed:           self.severe_in_bed,
            dead:                    self.dead,
            available_hospital_beds: self.available_hospital_beds,
            incubating_at_home:      self.incubating_at_home.to_vec(),
            incubating_in_public:    self.incubating_in_public.to_vec(),
        }
    }
}
