use chrono::{Duration, NaiveTime};

use crate::errors::{EngineError, EngineResult};
use crate::models::calendar::DayState;

/// Generates the candidate start times for a resolved day.
///
/// Each effective interval `[open, close)` independently emits
/// `open + k * granularity` for every candidate whose following step still
/// fits (`candidate + granularity <= close`). Intervals never merge, so a
/// lunch gap between two intervals stays slot-free. The result is ascending
/// and deduplicated.
pub fn generate_slots(day: &DayState, granularity: Duration) -> EngineResult<Vec<NaiveTime>> {
    if granularity <= Duration::zero() {
        return Err(EngineError::Configuration(format!(
            "slot granularity must be positive, got {} minutes",
            granularity.num_minutes()
        )));
    }

    let mut slots = Vec::new();
    for interval in day.intervals() {
        let mut cursor = interval.open;
        loop {
            // overflowing_add_signed wraps past midnight; a wrap ends the walk
            let (next, wrapped) = cursor.overflowing_add_signed(granularity);
            if wrapped != 0 || next > interval.close {
                break;
            }
            slots.push(cursor);
            cursor = next;
        }
    }

    slots.sort();
    slots.dedup();
    Ok(slots)
}
