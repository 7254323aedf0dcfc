//! Booking persistence, including the transactional committer.
//!
//! `create_booking` is the only write path that can race: two customers may
//! submit the same slot concurrently. The committer closes the
//! check-then-insert window by taking a Postgres advisory transaction lock
//! keyed on the calendar date and conflict scope, then re-deriving the
//! available slots from a fresh read before inserting. The loser of a race
//! observes the winner's row under the lock and gets a conflict error with
//! no insert performed.

use crate::models::DbBooking;
use crate::repositories::{availability_exception, business_hours};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::Result;
use salonsync_core::errors::{EngineError, EngineResult};
use salonsync_core::models::booking::{Booking, BookingStatus};
use salonsync_core::models::service::Service;
use salonsync_core::models::settings::{ConflictScope, EngineSettings};
use salonsync_core::scheduling::{
    available_slots, day_window_utc, local_instant, resolve_day, slot_is_available,
};
use sqlx::postgres::PgExecutor;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Input to the booking committer. The service is resolved (and checked for
/// existence/activity) by the caller before commit.
#[derive(Debug, Clone)]
pub struct NewBooking<'a> {
    pub service: &'a Service,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
}

/// Fetches the non-cancelled bookings whose reserved time touches the given
/// UTC window, optionally restricted to one service. Generic over the
/// executor so the committer can run it inside its transaction.
pub async fn get_bookings_in_window<'e, E>(
    executor: E,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    service_id: Option<Uuid>,
) -> Result<Vec<DbBooking>>
where
    E: PgExecutor<'e>,
{
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, service_id, customer_name, customer_email, date, start_at, end_at,
               buffer_before_minutes, buffer_after_minutes, status, created_at
        FROM bookings
        WHERE status <> 'cancelled'
          AND start_at < $2
          AND end_at > $1
          AND ($3::uuid IS NULL OR service_id = $3)
        ORDER BY start_at ASC
        "#,
    )
    .bind(window_start)
    .bind(window_end)
    .bind(service_id)
    .fetch_all(executor)
    .await?;

    Ok(bookings)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, service_id, customer_name, customer_email, date, start_at, end_at,
               buffer_before_minutes, buffer_after_minutes, status, created_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Applies a status transition, enforcing the booking state machine:
/// pending -> confirmed, pending/confirmed -> cancelled, cancelled terminal.
/// Used by the external admin layer; cancelling frees the slot immediately
/// because every availability read filters on status.
pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    next: BookingStatus,
) -> EngineResult<DbBooking> {
    let current = get_booking_by_id(pool, id)
        .await
        .map_err(EngineError::Storage)?
        .ok_or_else(|| EngineError::Validation(format!("Booking {id} not found")))?;

    let current_status = BookingStatus::parse(&current.status).ok_or_else(|| {
        EngineError::Configuration(format!("unknown booking status: {}", current.status))
    })?;

    if !current_status.can_transition_to(next) {
        return Err(EngineError::Validation(format!(
            "Booking {} cannot move from {} to {}",
            id,
            current_status.as_str(),
            next.as_str()
        )));
    }

    // Conditional on the status we validated against, so a transition that
    // lands in between cannot be overwritten. No matching row means another
    // writer moved the booking first; the caller must re-read and retry.
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        UPDATE bookings
        SET status = $2
        WHERE id = $1 AND status = $3
        RETURNING id, service_id, customer_name, customer_email, date, start_at, end_at,
                  buffer_before_minutes, buffer_after_minutes, status, created_at
        "#,
    )
    .bind(id)
    .bind(next.as_str())
    .bind(current_status.as_str())
    .fetch_optional(pool)
    .await
    .map_err(storage)?
    .ok_or_else(|| {
        EngineError::Conflict(format!("Booking {id} was updated concurrently"))
    })?;

    Ok(booking)
}

/// Atomically validates and persists a new booking.
///
/// Inside a single transaction: takes the advisory lock for (date, scope),
/// re-reads the calendar and the live bookings, recomputes the available
/// slots with the injected `now`, verifies the requested start is still a
/// member, and inserts with the deployment's initial status. Any failure
/// leaves the table untouched.
pub async fn create_booking(
    pool: &Pool<Postgres>,
    settings: &EngineSettings,
    request: NewBooking<'_>,
    now: DateTime<Utc>,
) -> EngineResult<DbBooking> {
    let mut tx = pool.begin().await.map_err(storage)?;

    // Serialize commits touching the same date and scope; released at
    // commit/rollback
    let scope_key = match settings.conflict_scope {
        ConflictScope::Service => format!("{}:{}", request.date, request.service.id),
        ConflictScope::Global => format!("{}:global", request.date),
    };
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(&scope_key)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

    // Fresh read of the calendar under the lock
    let hours = business_hours::get_weekly_hours(&mut *tx)
        .await
        .map_err(EngineError::Storage)?;
    let exception = availability_exception::get_exception_by_date(&mut *tx, request.date)
        .await
        .map_err(EngineError::Storage)?
        .map(crate::models::DbAvailabilityException::into_domain);
    let day = resolve_day(request.date, &hours, exception.as_ref())?;

    let (window_start, window_end) = day_window_utc(request.date, settings.timezone);
    let scope_service = match settings.conflict_scope {
        ConflictScope::Service => Some(request.service.id),
        ConflictScope::Global => None,
    };
    let bookings: Vec<Booking> =
        get_bookings_in_window(&mut *tx, window_start, window_end, scope_service)
            .await
            .map_err(EngineError::Storage)?
            .into_iter()
            .map(DbBooking::into_domain)
            .collect::<Result<_>>()
            .map_err(EngineError::Storage)?;

    let slots = available_slots(request.date, request.service, settings, &day, &bookings, now)?;

    let start_at = local_instant(request.date, request.start_time, settings.timezone)
        .ok_or_else(|| {
            EngineError::Validation(format!(
                "Start time {} does not exist on {} in {}",
                request.start_time, request.date, settings.timezone
            ))
        })?;

    if !slot_is_available(start_at, &slots) {
        tracing::debug!(
            "Booking conflict: date={}, start={}, service={}",
            request.date,
            request.start_time,
            request.service.id
        );
        return Err(EngineError::Conflict(format!(
            "Slot {} on {} is no longer available",
            request.start_time, request.date
        )));
    }

    let id = Uuid::new_v4();
    let end_at = start_at + request.service.duration();
    let status = settings.initial_status();

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (id, service_id, customer_name, customer_email, date, start_at, end_at,
                              buffer_before_minutes, buffer_after_minutes, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id, service_id, customer_name, customer_email, date, start_at, end_at,
                  buffer_before_minutes, buffer_after_minutes, status, created_at
        "#,
    )
    .bind(id)
    .bind(request.service.id)
    .bind(request.customer_name)
    .bind(request.customer_email)
    .bind(request.date)
    .bind(start_at)
    .bind(end_at)
    .bind(request.service.buffer_before_minutes)
    .bind(request.service.buffer_after_minutes)
    .bind(status.as_str())
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await
    .map_err(storage)?;

    tx.commit().await.map_err(storage)?;

    tracing::debug!(
        "Booking committed: id={}, service={}, start_at={}",
        booking.id,
        booking.service_id,
        booking.start_at
    );
    Ok(booking)
}

fn storage(err: sqlx::Error) -> EngineError {
    EngineError::Storage(eyre::Report::new(err))
}
