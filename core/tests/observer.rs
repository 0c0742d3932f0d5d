//! The per-day observer hook sees every phase in order.

use epidemic_core::{
    engine::SimEngine, event::SimEvent, types::Day, DaySnapshot, SimObserver,
};

#[derive(Default)]
struct Recorder {
    started:   Vec<Day>,
    ended:     Vec<Day>,
    run_ended: Vec<Day>,
    events:    Vec<&'static str>,
    dead:      Vec<u64>,
}

impl SimObserver for Recorder {
    fn on_day_start(&mut self, day: Day) {
        self.started.push(day);
    }

    fn on_event(&mut self, event: &SimEvent) {
        self.events.push(event.type_name());
    }

    fn on_day_end(&mut self, snapshot: &DaySnapshot) {
        self.ended.push(snapshot.day);
        self.dead.push(snapshot.dead);
    }

    fn on_run_end(&mut self, final_day: Day) {
        self.run_ended.push(final_day);
    }
}

#[test]
fn observer_sees_every_day_and_phase_in_order() {
    let mut engine = SimEngine::build_test("observed".into(), 5).unwrap();
    let days = engine.config().population.simulation_days;
    let mut recorder = Recorder::default();

    engine.run(&mut recorder).unwrap();

    let expected_days: Vec<Day> = (1..=days).collect();
    assert_eq!(recorder.started, expected_days);
    assert_eq!(recorder.ended, expected_days);
    assert_eq!(recorder.run_ended, vec![days]);

    assert_eq!(recorder.events[0], "run_initialized");
    assert_eq!(
        &recorder.events[1..7],
        &[
            "day_started",
            "interactions_resolved",
            "quarantine_resolved",
            "illness_advanced",
            "hospital_resolved",
            "day_completed",
        ]
    );
    assert_eq!(recorder.events.len() as u64, 1 + 6 * days);
}

#[test]
fn observer_snapshots_match_the_archive() {
    let mut engine = SimEngine::build_test("mirror".into(), 6).unwrap();
    let mut recorder = Recorder::default();

    engine.run(&mut recorder).unwrap();

    let archived: Vec<u64> = engine.archive().iter().map(|s| s.dead).collect();
    assert_eq!(recorder.dead, archived);
}
