//! # Availability Calculation
//!
//! The core algorithm of the booking engine: it turns a resolved day, a
//! service definition, the engine settings and the live booking set into the
//! ordered list of bookable start instants.
//!
//! The calculation works in the business timezone's wall clock and returns
//! UTC instants:
//!
//! 1. Generate candidate start times at the configured granularity
//! 2. Keep candidates whose full required span (buffers + duration) fits
//!    inside a single effective interval, never straddling a gap
//! 3. Drop candidates overlapping the occupied interval of any non-cancelled
//!    booking (strict open-interval overlap, so back-to-back is allowed)
//! 4. Drop candidates starting before `now` plus the minimum lead time
//!
//! The function is pure: `now` is a parameter, so callers inject the clock
//! and repeated calls over unchanged data return identical results.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::errors::EngineResult;
use crate::models::booking::Booking;
use crate::models::calendar::{DayState, OpenInterval};
use crate::models::service::Service;
use crate::models::settings::EngineSettings;
use crate::scheduling::slots::generate_slots;

/// Computes the bookable start instants for `date`.
///
/// `bookings` must already be filtered to the configured conflict scope;
/// cancelled rows are ignored here regardless. An empty result means closed
/// or fully booked, never an error.
pub fn available_slots(
    date: NaiveDate,
    service: &Service,
    settings: &EngineSettings,
    day: &DayState,
    bookings: &[Booking],
    now: DateTime<Utc>,
) -> EngineResult<Vec<DateTime<Utc>>> {
    let span = service.required_span();
    let candidates = generate_slots(day, settings.granularity())?;

    let occupied: Vec<(DateTime<Utc>, DateTime<Utc>)> = bookings
        .iter()
        .filter(|booking| booking.occupies_calendar())
        .map(Booking::occupied_interval)
        .collect();

    let earliest = now + settings.minimum_lead();

    let mut slots = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !fits_single_interval(candidate, span, day.intervals()) {
            continue;
        }
        // Wall times erased by a DST gap cannot be booked
        let Some(start) = local_instant(date, candidate, settings.timezone) else {
            continue;
        };
        let end = start + span;
        if occupied
            .iter()
            .any(|&(busy_start, busy_end)| start < busy_end && busy_start < end)
        {
            continue;
        }
        if start < earliest {
            continue;
        }
        slots.push(start);
    }

    Ok(slots)
}

/// Membership check the committer runs against a freshly derived slot set.
pub fn slot_is_available(requested_start: DateTime<Utc>, slots: &[DateTime<Utc>]) -> bool {
    slots.binary_search(&requested_start).is_ok()
}

/// Resolves a wall-clock time on `date` in the business timezone to a UTC
/// instant. Ambiguous times (clocks rolling back) resolve to the earlier
/// occurrence; nonexistent times (clocks jumping forward) yield `None`.
pub fn local_instant(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    date.and_time(time)
        .and_local_timezone(tz)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// The UTC window to fetch bookings for when computing `date`'s availability.
/// Covers the local day padded by one day on each side, which absorbs
/// timezone offset skew and buffers reaching across midnight.
pub fn day_window_utc(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_instant(date, NaiveTime::MIN, tz)
        .unwrap_or_else(|| DateTime::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc));
    let next_date = date + Duration::days(1);
    let end = local_instant(next_date, NaiveTime::MIN, tz).unwrap_or_else(|| {
        DateTime::from_naive_utc_and_offset(next_date.and_time(NaiveTime::MIN), Utc)
    });
    (start - Duration::days(1), end + Duration::days(1))
}

fn fits_single_interval(candidate: NaiveTime, span: Duration, intervals: &[OpenInterval]) -> bool {
    let (end, wrapped) = candidate.overflowing_add_signed(span);
    if wrapped != 0 {
        return false;
    }
    intervals
        .iter()
        .any(|interval| interval.open <= candidate && end <= interval.close)
}
