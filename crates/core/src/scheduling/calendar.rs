use chrono::{Datelike, NaiveDate};

use crate::errors::{EngineError, EngineResult};
use crate::models::calendar::{AvailabilityException, DayState, OpenInterval, WeeklyHours};

/// Resolves the effective open intervals for a single date.
///
/// An exception for the date wins outright: its closure flag or replacement
/// intervals are used and the weekly pattern is ignored. Otherwise the
/// weekday's rows from the weekly pattern apply. A date with no intervals at
/// all is closed, which is a normal state rather than an error.
///
/// Stored intervals must be sorted and disjoint with `open < close`; anything
/// else is a data-integrity problem and fails with a configuration error
/// instead of being silently patched.
pub fn resolve_day(
    date: NaiveDate,
    hours: &WeeklyHours,
    exception: Option<&AvailabilityException>,
) -> EngineResult<DayState> {
    let intervals: Vec<OpenInterval> = match exception {
        Some(exception) => {
            if exception.is_closed {
                return Ok(DayState::Closed);
            }
            exception.intervals.clone()
        }
        None => hours.for_weekday(date.weekday()).to_vec(),
    };

    if intervals.is_empty() {
        return Ok(DayState::Closed);
    }

    validate_intervals(date, &intervals)?;
    Ok(DayState::Open(intervals))
}

fn validate_intervals(date: NaiveDate, intervals: &[OpenInterval]) -> EngineResult<()> {
    for interval in intervals {
        if interval.open >= interval.close {
            return Err(EngineError::Configuration(format!(
                "open interval for {} has open {} >= close {}",
                date, interval.open, interval.close
            )));
        }
    }

    for pair in intervals.windows(2) {
        if pair[1].open < pair[0].close {
            return Err(EngineError::Configuration(format!(
                "open intervals for {} are unsorted or overlapping: [{}, {}) and [{}, {})",
                date, pair[0].open, pair[0].close, pair[1].open, pair[1].close
            )));
        }
    }

    Ok(())
}
