//! Day-end snapshots and the append-only archive that owns them.
//!
//! A snapshot is a value copy of the population taken after the hospital
//! phase. Once archived it is never mutated.

use crate::types::{Count, Day};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySnapshot {
    pub day:                     Day,
    pub total_population:        Count,
    pub healthy_at_home:         Count,
    pub healthy_in_public:       Count,
    pub asymptomatic_at_home:    Count,
    pub asymptomatic_in_public:  Count,
    pub mild_at_home:            Count,
    pub mild_in_public:          Count,
    pub severe_waiting_for_bed:  Count,
    pub severe_in_bed:           Count,
    pub dead:                    Count,
    pub available_hospital_beds: Count,
    /// Per-slot incubation counts, youngest first.
    pub incubating_at_home:      Vec<Count>,
    pub incubating_in_public:    Vec<Count>,
}

impl DaySnapshot {
    pub fn healthy(&self) -> Count {
        self.healthy_at_home + self.healthy_in_public
    }

    pub fn asymptomatic(&self) -> Count {
        self.asymptomatic_at_home + self.asymptomatic_in_public
    }

    pub fn mild(&self) -> Count {
        self.mild_at_home + self.mild_in_public
    }

    pub fn severe(&self) -> Count {
        self.severe_waiting_for_bed + self.severe_in_bed
    }

    /// Everyone currently infected: not healthy and not dead.
    pub fn sick(&self) -> Count {
        self.total_population - self.dead - self.healthy()
    }

    pub fn total(&self) -> Count {
        self.healthy() + self.asymptomatic() + self.mild() + self.severe() + self.dead
    }
}

/// Owned, append-only history of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotArchive {
    days: Vec<DaySnapshot>,
}

impl SnapshotArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: DaySnapshot) {
        debug_assert!(
            self.days.last().map_or(true, |last| last.day < snapshot.day),
            "snapshots must be archived in day order"
        );
        self.days.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Snapshot for a given day, if that day has been archived.
    pub fn day(&self, day: Day) -> Option<&DaySnapshot> {
        // Days are 1-based and archived without gaps.
        let index = usize::try_from(day.checked_sub(1)?).ok()?;
        self.days.get(index).filter(|s| s.day == day)
    }

    pub fn latest(&self) -> Option<&DaySnapshot> {
        self.days.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DaySnapshot> {
        self.days.iter()
    }

    pub fn as_slice(&self) -> &[DaySnapshot] {
        &self.days
    }

    pub fn into_vec(self) -> Vec<DaySnapshot> {
        self.days
    }
}
