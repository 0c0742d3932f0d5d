//! Incubation pipeline — head counts per day since infection.
//!
//! Slot 0 holds people infected today, slot `len - 1` people on their last
//! day of incubation. Shifting rotates the buffer in place: the oldest slot
//! falls off and is returned, everyone else ages one day, and slot 0 reopens
//! empty.

use crate::types::Count;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncubationPipeline {
    slots:            VecDeque<Count>,
    infectious_since: usize,
}

impl IncubationPipeline {
    /// Empty pipeline of `period` slots. Occupants of slot
    /// `infectious_since` and later are contagious.
    ///
    /// Panics if `period` is zero or the offset lies outside `[1, period]`;
    /// callers validate configuration first.
    pub fn new(period: usize, infectious_since: usize) -> Self {
        assert!(period >= 1, "incubation period must be at least one day");
        assert!(
            (1..=period).contains(&infectious_since),
            "infectious offset {infectious_since} outside [1, {period}]"
        );
        Self {
            slots: VecDeque::from(vec![0; period]),
            infectious_since,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn infectious_since(&self) -> usize {
        self.infectious_since
    }

    /// Count in one slot; out-of-range slots are empty.
    pub fn slot(&self, index: usize) -> Count {
        self.slots.get(index).copied().unwrap_or(0)
    }

    pub fn total(&self) -> Count {
        self.slots.iter().sum()
    }

    /// People far enough into incubation to infect others.
    pub fn contagious(&self) -> Count {
        self.slots.iter().skip(self.infectious_since).sum()
    }

    /// Newly infected today.
    pub fn infect(&mut self, count: Count) {
        self.slots[0] += count;
    }

    /// Take `count` people out of a slot (recovered or escalated early).
    ///
    /// Panics if the slot holds fewer than `count`.
    pub fn remove(&mut self, index: usize, count: Count) {
        let slot = &mut self.slots[index];
        assert!(*slot >= count, "removing {count} from slot {index} holding {slot}");
        *slot -= count;
    }

    /// Age every occupant by one day and return the people who just
    /// completed incubation.
    pub fn shift(&mut self) -> Count {
        let completed = self.slots.pop_back().unwrap_or(0);
        self.slots.push_front(0);
        completed
    }

    /// Per-slot counts, youngest first.
    pub fn to_vec(&self) -> Vec<Count> {
        self.slots.iter().copied().collect()
    }
}
