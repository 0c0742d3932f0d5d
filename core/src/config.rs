use crate::{
    error::{SimError, SimResult},
    types::{Count, Day},
};
use serde::{Deserialize, Serialize};

/// Every probability that drives a stochastic transition.
/// Fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbabilityTable {
    /// A healthy person in a group with a contagious person gets infected.
    pub getting_sick: f64,
    /// A healthy (or freshly infected) person retreats home after contact.
    pub healthy_staying_home: f64,
    /// Someone leaving incubation, or already mild, stays mild.
    pub mild_symptoms: f64,
    /// A mild case spends the next day at home.
    pub ms_staying_home: f64,
    pub hospital_recovery: f64,
    pub hospital_death: f64,
    /// Someone isolating at home gets better without treatment.
    pub home_recovery: f64,
    /// A discharged patient quarantines at home for a day.
    pub post_recovery_paranoia: f64,
}

impl Default for ProbabilityTable {
    fn default() -> Self {
        Self {
            getting_sick:           0.0,
            healthy_staying_home:   0.0,
            mild_symptoms:          0.0,
            ms_staying_home:        0.0,
            hospital_recovery:      0.0,
            hospital_death:         0.0,
            home_recovery:          0.0,
            post_recovery_paranoia: 0.5,
        }
    }
}

impl ProbabilityTable {
    fn entries(&self) -> [(&'static str, f64); 8] {
        [
            ("getting_sick",           self.getting_sick),
            ("healthy_staying_home",   self.healthy_staying_home),
            ("mild_symptoms",          self.mild_symptoms),
            ("ms_staying_home",        self.ms_staying_home),
            ("hospital_recovery",      self.hospital_recovery),
            ("hospital_death",         self.hospital_death),
            ("home_recovery",          self.home_recovery),
            ("post_recovery_paranoia", self.post_recovery_paranoia),
        ]
    }

    pub fn validate(&self) -> SimResult<()> {
        for (field, p) in self.entries() {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::config(field, format!("must be in [0, 1], got {p}")));
            }
        }
        let hospital_total = self.hospital_recovery + self.hospital_death;
        if hospital_total > 1.0 {
            return Err(SimError::config(
                "hospital_death",
                format!("hospital_recovery + hospital_death must not exceed 1, got {hospital_total}"),
            ));
        }
        Ok(())
    }
}

/// Scalar shape of the population and the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub total_population: Count,
    /// Infected people placed in incubation slot 0 before day 1.
    pub initial_sick: Count,
    /// Length of the incubation pipeline, in days.
    pub incubation_period: usize,
    /// First pipeline slot whose occupants can infect others.
    pub infectious_since_day: usize,
    /// Size of each random contact group.
    pub average_daily_interactions: u64,
    pub hospital_capacity: Count,
    pub simulation_days: Day,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            total_population:           10_000_000,
            initial_sick:               150,
            incubation_period:          10,
            infectious_since_day:       1,
            average_daily_interactions: 6,
            hospital_capacity:          30_000,
            simulation_days:            120,
        }
    }
}

impl PopulationConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.incubation_period == 0 {
            return Err(SimError::config("incubation_period", "must be at least 1"));
        }
        if self.infectious_since_day == 0 || self.infectious_since_day > self.incubation_period {
            return Err(SimError::config(
                "infectious_since_day",
                format!(
                    "must be in [1, {}], got {}",
                    self.incubation_period, self.infectious_since_day
                ),
            ));
        }
        if self.average_daily_interactions == 0 {
            return Err(SimError::config("average_daily_interactions", "must be at least 1"));
        }
        if self.initial_sick > self.total_population {
            return Err(SimError::config(
                "initial_sick",
                format!(
                    "{} exceeds total_population {}",
                    self.initial_sick, self.total_population
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub population:    PopulationConfig,
    #[serde(default)]
    pub probabilities: ProbabilityTable,
}

impl SimConfig {
    /// Load a scenario file (JSON) and validate it.
    /// In tests, use SimConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.population.validate()?;
        self.probabilities.validate()
    }

    /// Small, fast scenario with an epidemic that actually spreads.
    pub fn default_test() -> Self {
        Self {
            population: PopulationConfig {
                total_population:           2_000,
                initial_sick:               20,
                incubation_period:          5,
                infectious_since_day:       2,
                average_daily_interactions: 6,
                hospital_capacity:          40,
                simulation_days:            60,
            },
            probabilities: ProbabilityTable {
                getting_sick:           0.30,
                healthy_staying_home:   0.10,
                mild_symptoms:          0.80,
                ms_staying_home:        0.60,
                hospital_recovery:      0.20,
                hospital_death:         0.05,
                home_recovery:          0.40,
                post_recovery_paranoia: 0.50,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_field(config: &SimConfig) -> &'static str {
        match config.validate() {
            Err(SimError::InvalidConfig { field, .. }) => field,
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn default_test_config_is_valid() {
        SimConfig::default_test().validate().unwrap();
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_incubation_period_is_rejected() {
        let mut config = SimConfig::default_test();
        config.population.incubation_period = 0;
        assert_eq!(rejected_field(&config), "incubation_period");
    }

    #[test]
    fn infectious_offset_outside_pipeline_is_rejected() {
        let mut config = SimConfig::default_test();
        config.population.infectious_since_day = 0;
        assert_eq!(rejected_field(&config), "infectious_since_day");

        config.population.infectious_since_day = config.population.incubation_period + 1;
        assert_eq!(rejected_field(&config), "infectious_since_day");

        config.population.infectious_since_day = config.population.incubation_period;
        config.validate().unwrap();
    }

    #[test]
    fn probabilities_outside_unit_interval_are_rejected() {
        let mut config = SimConfig::default_test();
        config.probabilities.getting_sick = 1.5;
        assert_eq!(rejected_field(&config), "getting_sick");

        let mut config = SimConfig::default_test();
        config.probabilities.home_recovery = -0.1;
        assert_eq!(rejected_field(&config), "home_recovery");

        let mut config = SimConfig::default_test();
        config.probabilities.ms_staying_home = f64::NAN;
        assert_eq!(rejected_field(&config), "ms_staying_home");
    }

    #[test]
    fn hospital_outcomes_may_not_exceed_one() {
        let mut config = SimConfig::default_test();
        config.probabilities.hospital_recovery = 0.7;
        config.probabilities.hospital_death = 0.4;
        assert_eq!(rejected_field(&config), "hospital_death");
    }

    #[test]
    fn oversized_counts_are_rejected() {
        let mut config = SimConfig::default_test();
        config.population.initial_sick = config.population.total_population + 1;
        assert_eq!(rejected_field(&config), "initial_sick");

        let mut config = SimConfig::default_test();
        config.population.average_daily_interactions = 0;
        assert_eq!(rejected_field(&config), "average_daily_interactions");
    }

    #[test]
    fn missing_probabilities_take_defaults() {
        let json = r#"{
            "population": {
                "total_population": 100,
                "initial_sick": 1,
                "incubation_period": 3,
                "infectious_since_day": 1,
                "average_daily_interactions": 4,
                "hospital_capacity": 5,
                "simulation_days": 10
            },
            "probabilities": { "getting_sick": 0.25 }
        }"#;
        let config: SimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.probabilities.getting_sick, 0.25);
        assert_eq!(config.probabilities.post_recovery_paranoia, 0.5);
        assert_eq!(config.probabilities.hospital_death, 0.0);
    }

    #[test]
    fn shipped_scenario_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/scenario.json");
        let config = SimConfig::load(path).unwrap();
        assert_eq!(config.population, PopulationConfig::default());
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = SimConfig::load("/nonexistent/scenario.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/scenario.json"));
    }
}
