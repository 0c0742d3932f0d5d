//! SQLite persistence for runs, the event log and day snapshots.
//!
//! All SQL lives here; the engine only calls these methods.

use rusqlite::{params, Connection, OptionalExtension};
use crate::{
    error::SimResult,
    event::EventLogEntry,
    snapshot::DaySnapshot,
    types::Day,
};

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) the results database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, version: &str) -> SimResult<()> {
        let started_at = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, started_at],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, day, subsystem, event_type, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.run_id,
                entry.day as i64,
                entry.subsystem,
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    pub fn events_for_day(&self, run_id: &str, day: Day) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, day, subsystem, event_type, payload
             FROM event_log WHERE run_id = ?1 AND day = ?2
             ORDER BY id ASC"
        )?;
        let entries = stmt.query_map(params![run_id, day as i64], |row| {
            Ok(EventLogEntry {
                id:         Some(row.get(0)?),
                run_id:     row.get(1)?,
                day:        row.get::<_, i64>(2)? as u64,
                subsystem:  row.get(3)?,
                event_type: row.get(4)?,
                payload:    row.get(5)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, run_id: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Snapshot ───────────────────────────────────────────────

    pub fn save_snapshot(&self, run_id: &str, day: Day, state_json: &str) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO snapshot (run_id, day, state_json) VALUES (?1, ?2, ?3)",
            params![run_id, day as i64, state_json],
        )?;
        Ok(())
    }

    /// Every archived day of a run, in day order.
    pub fn snapshots(&self, run_id: &str) -> SimResult<Vec<DaySnapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT state_json FROM snapshot WHERE run_id = ?1 ORDER BY day ASC"
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let mut snapshots = Vec::with_capacity(rows.len());
        for json in &rows {
            snapshots.push(serde_json::from_str(json)?);
        }
        Ok(snapshots)
    }

    pub fn latest_snapshot_before(
        &self, run_id: &str, day: Day
    ) -> SimResult<Option<DaySnapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT state_json FROM snapshot
             WHERE run_id = ?1 AND day <= ?2
             ORDER BY day DESC LIMIT 1"
        )?;
        let json = stmt.query_row(params![run_id, day as i64], |row| {
            row.get::<_, String>(0)
        }).optional()?;
        Ok(json.map(|j| serde_json::from_str::<DaySnapshot>(&j)).transpose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SimConfig, population::PopulationState};

    fn store_with_run(run_id: &str) -> SimStore {
        let store = SimStore::in_memory().unwrap();
        store.migrate().unwrap();
        store.insert_run(run_id, 7, "test").unwrap();
        store
    }

    #[test]
    fn snapshots_round_trip_in_day_order() {
        let store = store_with_run("snap");
        let mut state = PopulationState::new(&SimConfig::default_test().population);
        let mut saved = Vec::new();
        for day in [2, 1, 3] {
            state.day = day;
            let snapshot = state.snapshot();
            store.save_snapshot("snap", day, &serde_json::to_string(&snapshot).unwrap()).unwrap();
            saved.push(snapshot);
        }
        saved.sort_by_key(|s| s.day);

        assert_eq!(store.snapshots("snap").unwrap(), saved);
        assert_eq!(store.latest_snapshot_before("snap", 2).unwrap().map(|s| s.day), Some(2));
        assert!(store.latest_snapshot_before("snap", 0).unwrap().is_none());
    }

    #[test]
    fn events_are_read_back_per_day() {
        let store = store_with_run("events");
        for (day, kind) in [(1, "a"), (1, "b"), (2, "c")] {
            store.append_event(&EventLogEntry {
                id:         None,
                run_id:     "events".into(),
                day,
                subsystem:  "engine".into(),
                event_type: kind.into(),
                payload:    "{}".into(),
            }).unwrap();
        }

        let day_one: Vec<_> = store.events_for_day("events", 1).unwrap()
            .into_iter().map(|e| e.event_type).collect();
        assert_eq!(day_one, vec!["a", "b"]);
        assert_eq!(store.event_count("events").unwrap(), 3);
    }

    #[test]
    fn unreadable_snapshot_row_is_an_error_not_a_miss() {
        let store = store_with_run("blob");
        store.conn.execute(
            "INSERT INTO snapshot (run_id, day, state_json) VALUES ('blob', 1, X'00')",
            [],
        ).unwrap();

        assert!(store.latest_snapshot_before("blob", 1).is_err());
        assert!(store.latest_snapshot_before("blob", 0).unwrap().is_none());
    }

    #[test]
    fn snapshots_require_a_known_run() {
        let store = store_with_run("known");
        assert!(store.save_snapshot("unknown", 1, "{}").is_err());
    }
}
