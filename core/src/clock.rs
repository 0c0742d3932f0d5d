//! Simulation clock — owns the day counter and the run phase.

use crate::types::Day;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RunPhase {
    Initialized,
    Running { day: Day },
    Completed { day: Day },
    /// A day failed part-way; the state is not trusted any more.
    Aborted { day: Day },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub current_day: Day,
    pub total_days:  Day,
    pub phase:       RunPhase,
}

impl SimClock {
    pub fn new(total_days: Day) -> Self {
        Self {
            current_day: 0,
            total_days,
            phase: if total_days == 0 {
                RunPhase::Completed { day: 0 }
            } else {
                RunPhase::Initialized
            },
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.phase, RunPhase::Completed { .. })
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self.phase, RunPhase::Aborted { .. })
    }

    pub fn days_remaining(&self) -> Day {
        self.total_days - self.current_day
    }

    /// Advance one day. Returns the new day number.
    /// Panics if called after completion or abort; callers must check.
    pub fn advance(&mut self) -> Day {
        assert!(
            !self.is_completed() && !self.is_aborted(),
            "advance() called on a finished clock: {:?}",
            self.phase
        );
        self.current_day += 1;
        self.phase = RunPhase::Running { day: self.current_day };
        self.current_day
    }

    /// Stop the run for good at the current day.
    pub fn abort(&mut self) {
        self.phase = RunPhase::Aborted { day: self.current_day };
    }

    /// Close out the current day; the run completes on the last one.
    pub fn finish_day(&mut self) {
        if !self.is_aborted() && self.current_day >= self.total_days {
            self.phase = RunPhase::Completed { day: self.current_day };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_through_every_phase() {
        let mut clock = SimClock::new(2);
        assert_eq!(clock.phase, RunPhase::Initialized);

        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.phase, RunPhase::Running { day: 1 });
        clock.finish_day();
        assert!(!clock.is_completed());

        assert_eq!(clock.advance(), 2);
        clock.finish_day();
        assert_eq!(clock.phase, RunPhase::Completed { day: 2 });
        assert_eq!(clock.days_remaining(), 0);
    }

    #[test]
    fn abort_is_final() {
        let mut clock = SimClock::new(5);
        clock.advance();
        clock.abort();
        assert_eq!(clock.phase, RunPhase::Aborted { day: 1 });
        assert!(!clock.is_completed());
        clock.finish_day();
        assert!(clock.is_aborted());
    }

    #[test]
    fn zero_day_run_starts_completed() {
        assert!(SimClock::new(0).is_completed());
    }

    #[test]
    #[should_panic]
    fn advancing_a_completed_clock_panics() {
        let mut clock = SimClock::new(1);
        clock.advance();
        clock.finish_day();
        clock.advance();
    }
}
