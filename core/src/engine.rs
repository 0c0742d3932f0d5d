//! The simulation engine — one closed population, one day at a time.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Interaction subsystem  (contact rounds, new infections)
//!   2. Quarantine subsystem   (everyone isolating at home)
//!   3. Illness subsystem      (mild re-evaluation, incubation shift)
//!   4. Hospital subsystem     (discharge pass, admission pass)
//!   then: invariant check → snapshot → archive → next day
//!
//! RULES:
//!   - Subsystems execute in registration order, every day.
//!   - Each subsystem sees the state exactly as the previous one left it.
//!   - All randomness flows through the RngBank.
//!   - A day either completes all phases or the run is aborted for good.

use crate::{
    clock::{RunPhase, SimClock},
    config::SimConfig,
    error::{SimError, SimResult},
    event::{EventLogEntry, SimEvent},
    hospital_subsystem::HospitalSubsystem,
    illness_subsystem::IllnessSubsystem,
    interaction_subsystem::InteractionSubsystem,
    observer::SimObserver,
    population::PopulationState,
    quarantine_subsystem::QuarantineSubsystem,
    rng::{RngBank, SubsystemSlot},
    snapshot::{DaySnapshot, SnapshotArchive},
    store::SimStore,
    subsystem::SimSubsystem,
    types::{Day, RunId},
};

pub struct SimEngine {
    pub run_id:   RunId,
    pub clock:    SimClock,
    pub rng_bank: RngBank,
    config:       SimConfig,
    state:        PopulationState,
    archive:      SnapshotArchive,
    subsystems:   Vec<(SubsystemSlot, Box<dyn SimSubsystem>)>,
    store:        Option<SimStore>,
}

impl SimEngine {
    /// Engine with validated configuration and no subsystems registered.
    pub fn new(run_id: RunId, seed: u64, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            run_id,
            clock:      SimClock::new(config.population.simulation_days),
            rng_bank:   RngBank::new(seed),
            state:      PopulationState::new(&config.population),
            archive:    SnapshotArchive::new(),
            subsystems: Vec::new(),
            store:      None,
            config,
        })
    }

    /// Build a fully wired engine with all subsystems registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(run_id: RunId, seed: u64, config: SimConfig) -> SimResult<Self> {
        let mut engine = SimEngine::new(run_id, seed, config)?;

        // EXECUTION ORDER — fixed, documented, never reordered.
        let config = engine.config.clone();
        engine.register(
            SubsystemSlot::Interaction,
            Box::new(InteractionSubsystem::new(config.clone())),
        );
        engine.register(
            SubsystemSlot::Quarantine,
            Box::new(QuarantineSubsystem::new(config.clone())),
        );
        engine.register(
            SubsystemSlot::Illness,
            Box::new(IllnessSubsystem::new(config.clone())),
        );
        engine.register(
            SubsystemSlot::Hospital,
            Box::new(HospitalSubsystem::new(config)),
        );
        log::debug!("engine built with {} subsystems", engine.subsystems.len());
        Ok(engine)
    }

    /// Fully wired engine over `SimConfig::default_test()`.
    pub fn build_test(run_id: RunId, seed: u64) -> SimResult<Self> {
        Self::build(run_id, seed, SimConfig::default_test())
    }

    /// Register a subsystem. Call in the documented execution order.
    pub fn register(&mut self, slot: SubsystemSlot, subsystem: Box<dyn SimSubsystem>) {
        self.subsystems.push((slot, subsystem));
    }

    /// Persist every event and snapshot from now on.
    /// The store must already be migrated and hold this run's row.
    pub fn attach_store(&mut self, store: SimStore) {
        self.store = Some(store);
    }

    pub fn store(&self) -> Option<&SimStore> {
        self.store.as_ref()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Live population state. Read-only: only subsystems mutate it.
    pub fn state(&self) -> &PopulationState {
        &self.state
    }

    pub fn archive(&self) -> &SnapshotArchive {
        &self.archive
    }

    /// Snapshot of the live state, without archiving it.
    pub fn current_snapshot(&self) -> DaySnapshot {
        self.state.snapshot()
    }

    pub fn is_completed(&self) -> bool {
        self.clock.is_completed()
    }

    /// Advance one day. This is the core simulation step.
    ///
    /// Any error aborts the run: every later call returns `RunAborted`.
    pub fn step_day<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Vec<SimEvent>> {
        match self.clock.phase {
            RunPhase::Completed { day } => return Err(SimError::RunCompleted { day }),
            RunPhase::Aborted { day } => return Err(SimError::RunAborted { day }),
            RunPhase::Initialized | RunPhase::Running { .. } => {}
        }

        let result = self.run_one_day(observer);
        if let Err(e) = &result {
            log::error!("run {} aborted on day {}: {e}", self.run_id, self.clock.current_day);
            self.clock.abort();
        }
        result
    }

    fn run_one_day<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Vec<SimEvent>> {
        if self.clock.phase == RunPhase::Initialized {
            self.initialize_run(observer)?;
        }

        let day = self.clock.advance();
        self.state.day = day;
        observer.on_day_start(day);

        let started = SimEvent::DayStarted { day };
        persist_event(self.store.as_ref(), &self.run_id, day, "engine", &started)?;
        observer.on_event(&started);
        let mut day_events = vec![started];

        // Execute each subsystem in registration order.
        for (slot, subsystem) in &mut self.subsystems {
            let mut rng = self.rng_bank.for_subsystem_at_day(*slot, day);
            let new_events = subsystem.update(&mut self.state, &mut rng)?;

            for event in &new_events {
                persist_event(self.store.as_ref(), &self.run_id, day, subsystem.name(), event)?;
                observer.on_event(event);
            }
            day_events.extend(new_events);
        }

        self.state.check_invariants()?;

        let snapshot = self.state.snapshot();
        if let Some(store) = &self.store {
            store.save_snapshot(&self.run_id, day, &serde_json::to_string(&snapshot)?)?;
            log::debug!("Snapshot saved for day {day}");
        }

        let completed = SimEvent::DayCompleted {
            day,
            sick: snapshot.sick(),
            dead: snapshot.dead,
        };
        persist_event(self.store.as_ref(), &self.run_id, day, "engine", &completed)?;
        observer.on_event(&completed);
        day_events.push(completed);

        self.archive.push(snapshot);
        self.clock.finish_day();
        if let Some(latest) = self.archive.latest() {
            observer.on_day_end(latest);
        }

        if self.clock.is_completed() {
            log::info!(
                "run {} completed after {day} days: {} dead, {} still sick",
                self.run_id,
                self.state.dead,
                self.state.total_population - self.state.dead - self.state.healthy()
            );
            observer.on_run_end(day);
        }

        Ok(day_events)
    }

    /// Run up to `n` days, stopping early at the configured day count.
    pub fn run_days<O: SimObserver>(&mut self, n: Day, observer: &mut O) -> SimResult<()> {
        for _ in 0..n.min(self.clock.days_remaining()) {
            self.step_day(observer)?;
        }
        Ok(())
    }

    /// Run every remaining day.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.run_days(self.clock.days_remaining(), observer)
    }

    /// Query persisted events for a specific day.
    /// Used by the determinism test and replay tooling.
    pub fn store_events_for_day(&self, day: Day) -> SimResult<Vec<EventLogEntry>> {
        match &self.store {
            Some(store) => store.events_for_day(&self.run_id, day),
            None => Ok(Vec::new()),
        }
    }

    /// Emit RunInitialized at day 0 so seed differences are observable.
    fn initialize_run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        log::info!(
            "run {} starting: seed={} population={} days={}",
            self.run_id,
            self.rng_bank.master_seed(),
            self.config.population.total_population,
            self.clock.total_days
        );
        let init_event = SimEvent::RunInitialized {
            run_id: self.run_id.clone(),
            seed:   self.rng_bank.master_seed(),
        };
        persist_event(self.store.as_ref(), &self.run_id, 0, "engine", &init_event)?;
        observer.on_event(&init_event);
        Ok(())
    }
}

fn persist_event(
    store: Option<&SimStore>,
    run_id: &str,
    day: Day,
    subsystem: &str,
    event: &SimEvent,
) -> SimResult<()> {
    let Some(store) = store else {
        return Ok(());
    };
    let entry = EventLogEntry {
        id:         None,
        run_id:     run_id.to_string(),
        day,
        subsystem:  subsystem.to_string(),
        event_type: event.type_name().to_string(),
        payload:    serde_json::to_string(event)?,
    };
    store.append_event(&entry)
}
