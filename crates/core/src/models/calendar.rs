use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// A single open range within one day, `[open, close)` as wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenInterval {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl OpenInterval {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self { open, close }
    }
}

/// The weekly opening pattern: an ordered interval set per weekday.
#[derive(Debug, Clone, Default)]
pub struct WeeklyHours {
    intervals: [Vec<OpenInterval>; 7],
}

impl WeeklyHours {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, weekday: Weekday, interval: OpenInterval) {
        self.intervals[weekday.num_days_from_monday() as usize].push(interval);
    }

    pub fn for_weekday(&self, weekday: Weekday) -> &[OpenInterval] {
        &self.intervals[weekday.num_days_from_monday() as usize]
    }
}

/// A date-specific override of the weekly pattern. Takes absolute precedence
/// for its date: either a full-day closure or a replacement interval set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityException {
    pub date: NaiveDate,
    pub is_closed: bool,
    pub intervals: Vec<OpenInterval>,
}

/// The effective calendar state of a single date after exception overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayState {
    Closed,
    Open(Vec<OpenInterval>),
}

impl DayState {
    pub fn intervals(&self) -> &[OpenInterval] {
        match self {
            DayState::Closed => &[],
            DayState::Open(intervals) => intervals,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, DayState::Closed)
    }
}
