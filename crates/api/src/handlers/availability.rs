//! # Availability Handler
//!
//! This module contains the handler for the availability query: the ordered
//! list of bookable start instants for one date and one service.
//!
//! ## Availability Algorithm
//!
//! The handler orchestrates the pure engine in `salonsync-core`:
//!
//! 1. Validate the date and service id from the query string
//! 2. Load engine settings and resolve the service (active services only)
//! 3. Resolve the effective day: a date exception overrides the weekly
//!    business-hours pattern outright
//! 4. Fetch the non-cancelled bookings touching the date's padded UTC
//!    window, restricted to the service when the conflict scope is
//!    per-service
//! 5. Compute the available slots with the current clock
//!
//! The computation is side-effect free and idempotent, so the UI can poll
//! this endpoint safely. A closed or fully booked day returns an empty slot
//! list, not an error; only malformed input or an unknown service fails.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use salonsync_core::errors::EngineError;
use salonsync_core::models::booking::AvailabilityResponse;
use salonsync_core::models::settings::ConflictScope;
use salonsync_core::scheduling::{available_slots, day_window_utc, resolve_day};
use salonsync_db::models::{DbAvailabilityException, DbBooking};

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the availability endpoint
///
/// # Fields
///
/// * `date` - Calendar date in ISO-8601 (YYYY-MM-DD), interpreted in the
///   business timezone
/// * `service_id` - UUID of the service to check availability for
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// ISO-8601 date to query
    pub date: String,

    /// Service UUID
    pub service_id: String,
}

/// Returns the bookable start times for a date and service
///
/// # Endpoint
///
/// ```text
/// GET /api/availability?date=2026-09-07&service_id=<uuid>
/// ```
///
/// # Errors
///
/// * `EngineError::Validation` - Malformed date or service id
/// * `EngineError::ServiceNotFound` - Service absent or inactive
/// * `EngineError::Configuration` - Malformed stored calendar data
/// * `EngineError::Storage` - Database error (retriable)
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    // STEP 1: Input validation
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d").map_err(|_| {
        AppError(EngineError::Validation(format!(
            "Invalid date '{}'. Expected YYYY-MM-DD",
            query.date
        )))
    })?;
    let service_id = Uuid::parse_str(&query.service_id).map_err(|_| {
        AppError(EngineError::Validation(format!(
            "Invalid service id '{}'. Expected a UUID",
            query.service_id
        )))
    })?;

    // STEP 2: Load settings and the service
    let settings = super::load_settings(&state).await?;
    let service = super::load_active_service(&state, service_id).await?;

    // STEP 3: Resolve the effective day
    let hours = salonsync_db::repositories::business_hours::get_weekly_hours(&state.db_pool)
        .await
        .map_err(EngineError::Storage)?;
    let exception = salonsync_db::repositories::availability_exception::get_exception_by_date(
        &state.db_pool,
        date,
    )
    .await
    .map_err(EngineError::Storage)?
    .map(DbAvailabilityException::into_domain);
    let day = resolve_day(date, &hours, exception.as_ref())?;

    // STEP 4: Fetch bookings in the conflict scope
    let (window_start, window_end) = day_window_utc(date, settings.timezone);
    let scope_service = match settings.conflict_scope {
        ConflictScope::Service => Some(service.id),
        ConflictScope::Global => None,
    };
    let bookings = salonsync_db::repositories::booking::get_bookings_in_window(
        &state.db_pool,
        window_start,
        window_end,
        scope_service,
    )
    .await
    .map_err(EngineError::Storage)?
    .into_iter()
    .map(DbBooking::into_domain)
    .collect::<eyre::Result<Vec<_>>>()
    .map_err(EngineError::Storage)?;

    // STEP 5: Compute the slots
    let slots = available_slots(date, &service, &settings, &day, &bookings, Utc::now())?;

    Ok(Json(AvailabilityResponse {
        date,
        service_id,
        slots,
    }))
}
