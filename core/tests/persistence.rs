//! Attached stores mirror the in-memory archive and event stream.

use epidemic_core::{engine::SimEngine, store::SimStore, NoopObserver};

fn persisted_engine(run_id: &str, seed: u64) -> SimEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = SimStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.insert_run(run_id, seed, "test").unwrap();

    let mut engine = SimEngine::build_test(run_id.into(), seed).unwrap();
    engine.attach_store(store);
    engine
}

#[test]
fn stored_snapshots_match_the_archive() {
    let mut engine = persisted_engine("persisted", 11);
    engine.run(&mut NoopObserver).unwrap();

    let store = engine.store().expect("store attached");
    let stored = store.snapshots("persisted").unwrap();

    assert_eq!(stored.as_slice(), engine.archive().as_slice());
}

#[test]
fn every_event_is_logged_once() {
    let mut engine = persisted_engine("logged", 12);
    engine.run_days(4, &mut NoopObserver).unwrap();

    let store = engine.store().expect("store attached");
    // RunInitialized plus six events per day.
    assert_eq!(store.event_count("logged").unwrap(), 1 + 6 * 4);

    let day_zero = engine.store_events_for_day(0).unwrap();
    assert_eq!(day_zero.len(), 1);
    assert_eq!(day_zero[0].event_type, "run_initialized");

    let day_three: Vec<String> = engine
        .store_events_for_day(3)
        .unwrap()
        .into_iter()
        .map(|e| e.subsystem)
        .collect();
    assert_eq!(
        day_three,
        vec!["engine", "interaction", "quarantine", "illness", "hospital", "engine"]
    );
}

#[test]
fn latest_stored_snapshot_matches_the_archive() {
    let mut engine = persisted_engine("resume", 13);
    engine.run_days(7, &mut NoopObserver).unwrap();

    let store = engine.store().expect("store attached");
    let latest = store.latest_snapshot_before("resume", 100).unwrap().unwrap();

    assert_eq!(latest.day, 7);
    assert_eq!(&latest, engine.archive().latest().unwrap());
}
