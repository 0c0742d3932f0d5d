//! Phase events — the structured record of what happened each day.
//!
//! Subsystems return events describing the transitions they applied.
//! The engine forwards them to the observer and, when a store is
//! attached, persists them to the event log.

use crate::types::{Count, Day, RunId};
use serde::{Deserialize, Serialize};

/// Every event emitted during simulation.
/// Variants may be added — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    RunInitialized {
        run_id: RunId,
        seed: u64,
    },
    DayStarted {
        day: Day,
    },
    DayCompleted {
        day: Day,
        sick: Count,
        dead: Count,
    },

    // ── Interaction ────────────────────────────────
    InteractionsResolved {
        day: Day,
        rounds: u64,
        drawn: Count,
        infected_in_public: Count,
        infected_at_home: Count,
        withdrew_home: Count,
    },

    // ── Quarantine ─────────────────────────────────
    QuarantineResolved {
        day: Day,
        released_healthy: Count,
        recovered: Count,
        escalated: Count,
    },

    // ── Illness progression ────────────────────────
    IllnessAdvanced {
        day: Day,
        completed_incubation: Count,
        became_mild_at_home: Count,
        became_mild_in_public: Count,
        escalated_to_severe: Count,
    },

    // ── Hospital ───────────────────────────────────
    HospitalResolved {
        day: Day,
        recovered: Count,
        died: Count,
        admitted: Count,
        still_waiting: Count,
    },
}

impl SimEvent {
    /// Stable string name, used for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            SimEvent::RunInitialized { .. }       => "run_initialized",
            SimEvent::DayStarted { .. }           => "day_started",
            SimEvent::DayCompleted { .. }         => "day_completed",
            SimEvent::InteractionsResolved { .. } => "interactions_resolved",
            SimEvent::QuarantineResolved { .. }   => "quarantine_resolved",
            SimEvent::IllnessAdvanced { .. }      => "illness_advanced",
            SimEvent::HospitalResolved { .. }     => "hospital_resolved",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub day: Day,
    pub subsystem: String,
    pub event_type: String,
    pub payload: String, // JSON-serialized SimEvent
}
