use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use salonsync_api::middleware::error_handling::AppError;
use salonsync_core::errors::EngineError;
use salonsync_core::models::booking::{BookingStatus, CreateBookingRequest};
use salonsync_core::models::calendar::{OpenInterval, WeeklyHours};
use salonsync_core::models::settings::ConflictScope;
use salonsync_core::scheduling::{
    available_slots, day_window_utc, local_instant, resolve_day, slot_is_available,
};
use salonsync_db::models::{DbBooking, DbService, DbSettings};

use crate::test_utils::TestContext;

// Mirrors the create_booking handler flow up to the commit decision: the
// mocks stand in for the committer's in-transaction re-read, so the
// membership check exercises the same logic the committer runs.
async fn commit_decision_via_mocks(
    ctx: &TestContext,
    payload: CreateBookingRequest,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, BookingStatus), AppError> {
    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d").map_err(|_| {
        AppError(EngineError::Validation(format!(
            "Invalid date '{}'. Expected YYYY-MM-DD",
            payload.date
        )))
    })?;
    let start_time = NaiveTime::parse_from_str(&payload.start_time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&payload.start_time, "%H:%M"))
        .map_err(|_| {
            AppError(EngineError::Validation(format!(
                "Invalid start time '{}'. Expected HH:MM or HH:MM:SS",
                payload.start_time
            )))
        })?;

    if payload.customer_name.trim().is_empty() {
        return Err(AppError(EngineError::Validation(
            "Customer name must not be empty".to_string(),
        )));
    }
    if !payload.customer_email.contains('@') {
        return Err(AppError(EngineError::Validation(format!(
            "Invalid customer email '{}'",
            payload.customer_email
        ))));
    }

    let settings = ctx
        .settings_repo
        .get_settings()
        .await
        .map_err(EngineError::Storage)?
        .into_domain()
        .map_err(|e| AppError(EngineError::Configuration(e.to_string())))?;

    let service = ctx
        .service_repo
        .get_service_by_id(payload.service_id)
        .await
        .map_err(EngineError::Storage)?
        .filter(|s| s.active)
        .ok_or_else(|| {
            EngineError::ServiceNotFound(format!("Service {} not found", payload.service_id))
        })?
        .into_domain();

    let hours = ctx
        .calendar_repo
        .get_weekly_hours()
        .await
        .map_err(EngineError::Storage)?;
    let day = resolve_day(date, &hours, None)?;

    let (window_start, window_end) = day_window_utc(date, settings.timezone);
    let scope_service = match settings.conflict_scope {
        ConflictScope::Service => Some(service.id),
        ConflictScope::Global => None,
    };
    let bookings = ctx
        .booking_repo
        .get_bookings_in_window(window_start, window_end, scope_service)
        .await
        .map_err(EngineError::Storage)?
        .into_iter()
        .map(DbBooking::into_domain)
        .collect::<eyre::Result<Vec<_>>>()
        .map_err(EngineError::Storage)?;

    let slots = available_slots(date, &service, &settings, &day, &bookings, now)?;

    let start_at = local_instant(date, start_time, settings.timezone).ok_or_else(|| {
        AppError(EngineError::Validation(format!(
            "Start time {start_time} does not exist on {date}"
        )))
    })?;

    if !slot_is_available(start_at, &slots) {
        return Err(AppError(EngineError::Conflict(format!(
            "Slot {start_time} on {date} is no longer available"
        ))));
    }

    Ok((start_at, settings.initial_status()))
}

fn db_settings(auto_confirm: bool) -> DbSettings {
    DbSettings {
        id: 1,
        slot_granularity_minutes: 30,
        minimum_lead_minutes: 60,
        timezone: "UTC".to_string(),
        conflict_scope: "global".to_string(),
        auto_confirm,
    }
}

fn db_service(id: Uuid) -> DbService {
    DbService {
        id,
        name: "Haircut".to_string(),
        duration_minutes: 60,
        buffer_before_minutes: 0,
        buffer_after_minutes: 0,
        active: true,
        created_at: Utc::now(),
    }
}

fn monday_hours() -> WeeklyHours {
    let mut hours = WeeklyHours::new();
    hours.add(
        Weekday::Mon,
        OpenInterval::new(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        ),
    );
    hours
}

fn payload(service_id: Uuid, date: &str, start_time: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        service_id,
        date: date.to_string(),
        start_time: start_time.to_string(),
        customer_name: "Dana Meyer".to_string(),
        customer_email: "dana@example.com".to_string(),
    }
}

fn existing_booking(service_id: Uuid, start_at: DateTime<Utc>) -> DbBooking {
    DbBooking {
        id: Uuid::new_v4(),
        service_id,
        customer_name: "Robin Faber".to_string(),
        customer_email: "robin@example.com".to_string(),
        date: start_at.date_naive(),
        start_at,
        end_at: start_at + chrono::Duration::minutes(60),
        buffer_before_minutes: 0,
        buffer_after_minutes: 0,
        status: "confirmed".to_string(),
        created_at: Utc::now(),
    }
}

fn week_before() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap()
}

fn expect_happy_calendar(ctx: &mut TestContext, auto_confirm: bool, existing: Vec<DbBooking>) {
    ctx.settings_repo
        .expect_get_settings()
        .returning(move || Ok(db_settings(auto_confirm)));
    ctx.service_repo
        .expect_get_service_by_id()
        .returning(|id| Ok(Some(db_service(id))));
    ctx.calendar_repo
        .expect_get_weekly_hours()
        .returning(|| Ok(monday_hours()));
    ctx.booking_repo
        .expect_get_bookings_in_window()
        .returning(move |_, _, _| Ok(existing.clone()));
}

#[tokio::test]
async fn test_booking_request_deserializes() {
    let service_id = Uuid::new_v4();
    let json = format!(
        r#"{{"service_id":"{service_id}","date":"2026-09-07","start_time":"10:30","customer_name":"Dana Meyer","customer_email":"dana@example.com"}}"#
    );

    let request: CreateBookingRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(request.service_id, service_id);
    assert_eq!(request.start_time, "10:30");
}

#[tokio::test]
async fn test_malformed_start_time_is_a_validation_error() {
    let ctx = TestContext::new();
    let result = commit_decision_via_mocks(
        &ctx,
        payload(Uuid::new_v4(), "2026-09-07", "half past ten"),
        week_before(),
    )
    .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn test_missing_email_at_sign_is_a_validation_error() {
    let ctx = TestContext::new();
    let mut request = payload(Uuid::new_v4(), "2026-09-07", "10:30");
    request.customer_email = "dana.example.com".to_string();

    let result = commit_decision_via_mocks(&ctx, request, week_before()).await;

    assert!(matches!(
        result.unwrap_err(),
        AppError(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn test_free_slot_commits_with_policy_status() {
    let mut ctx = TestContext::new();
    expect_happy_calendar(&mut ctx, false, vec![]);

    let (start_at, status) = commit_decision_via_mocks(
        &ctx,
        payload(Uuid::new_v4(), "2026-09-07", "10:30"),
        week_before(),
    )
    .await
    .unwrap();

    assert_eq!(start_at, Utc.with_ymd_and_hms(2026, 9, 7, 10, 30, 0).unwrap());
    assert_eq!(status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_auto_confirm_policy_confirms_immediately() {
    let mut ctx = TestContext::new();
    expect_happy_calendar(&mut ctx, true, vec![]);

    let (_, status) = commit_decision_via_mocks(
        &ctx,
        payload(Uuid::new_v4(), "2026-09-07", "10:30"),
        week_before(),
    )
    .await
    .unwrap();

    assert_eq!(status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_taken_slot_is_a_conflict() {
    let service_id = Uuid::new_v4();
    let taken = Utc.with_ymd_and_hms(2026, 9, 7, 10, 30, 0).unwrap();

    let mut ctx = TestContext::new();
    expect_happy_calendar(&mut ctx, false, vec![existing_booking(service_id, taken)]);

    let result = commit_decision_via_mocks(
        &ctx,
        payload(service_id, "2026-09-07", "10:30"),
        week_before(),
    )
    .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError(EngineError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_slot_past_lead_time_is_a_conflict() {
    let mut ctx = TestContext::new();
    expect_happy_calendar(&mut ctx, false, vec![]);

    // Asking for 09:00 at 08:30 with a 60min lead time
    let now = Utc.with_ymd_and_hms(2026, 9, 7, 8, 30, 0).unwrap();
    let result =
        commit_decision_via_mocks(&ctx, payload(Uuid::new_v4(), "2026-09-07", "09:00"), now).await;

    assert!(matches!(
        result.unwrap_err(),
        AppError(EngineError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_off_grid_start_time_is_a_conflict() {
    let mut ctx = TestContext::new();
    expect_happy_calendar(&mut ctx, false, vec![]);

    // 10:17 is not a generated candidate at 30min granularity
    let result = commit_decision_via_mocks(
        &ctx,
        payload(Uuid::new_v4(), "2026-09-07", "10:17"),
        week_before(),
    )
    .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError(EngineError::Conflict(_))
    ));
}
