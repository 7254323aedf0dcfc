//! # Booking Handler
//!
//! This module contains the handler for committing a new booking. The actual
//! conflict control lives in `salonsync_db::repositories::booking`: the
//! committer re-derives availability inside a transaction so that two
//! concurrent requests for the same slot resolve to exactly one booking and
//! one conflict response.

use axum::{extract::State, Json};
use chrono::{NaiveDate, NaiveTime, Utc};
use std::sync::Arc;

use salonsync_core::errors::EngineError;
use salonsync_core::models::booking::{
    BookingStatus, CreateBookingRequest, CreateBookingResponse,
};
use salonsync_db::repositories::booking::NewBooking;

use crate::{middleware::error_handling::AppError, ApiState};

/// Commits a new booking for a service, date and start time
///
/// # Endpoint
///
/// ```text
/// POST /api/bookings
/// {
///   "service_id": "<uuid>",
///   "date": "2026-09-07",
///   "start_time": "10:30",
///   "customer_name": "Dana Meyer",
///   "customer_email": "dana@example.com"
/// }
/// ```
///
/// # Errors
///
/// * `EngineError::Validation` - Malformed date/time or missing customer data
/// * `EngineError::ServiceNotFound` - Service absent or inactive
/// * `EngineError::Conflict` - Slot taken by a concurrent booking or expired
///   past the lead time; the caller should re-query availability
/// * `EngineError::Storage` - Database error (retriable)
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    // STEP 1: Input validation
    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d").map_err(|_| {
        AppError(EngineError::Validation(format!(
            "Invalid date '{}'. Expected YYYY-MM-DD",
            payload.date
        )))
    })?;
    let start_time = parse_start_time(&payload.start_time)?;

    let customer_name = payload.customer_name.trim();
    if customer_name.is_empty() {
        return Err(AppError(EngineError::Validation(
            "Customer name must not be empty".to_string(),
        )));
    }
    let customer_email = payload.customer_email.trim();
    if customer_email.is_empty() || !customer_email.contains('@') {
        return Err(AppError(EngineError::Validation(format!(
            "Invalid customer email '{}'",
            payload.customer_email
        ))));
    }

    // STEP 2: Load settings and the service
    let settings = super::load_settings(&state).await?;
    let service = super::load_active_service(&state, payload.service_id).await?;

    // STEP 3: Commit atomically; the committer re-validates availability
    let booking = salonsync_db::repositories::booking::create_booking(
        &state.db_pool,
        &settings,
        NewBooking {
            service: &service,
            date,
            start_time,
            customer_name,
            customer_email,
        },
        Utc::now(),
    )
    .await?;

    let status = BookingStatus::parse(&booking.status).ok_or_else(|| {
        AppError(EngineError::Configuration(format!(
            "unknown booking status: {}",
            booking.status
        )))
    })?;

    Ok(Json(CreateBookingResponse {
        booking_id: booking.id,
        status,
        start_at: booking.start_at,
        end_at: booking.end_at,
    }))
}

fn parse_start_time(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| {
            AppError(EngineError::Validation(format!(
                "Invalid start time '{value}'. Expected HH:MM or HH:MM:SS"
            )))
        })
}
