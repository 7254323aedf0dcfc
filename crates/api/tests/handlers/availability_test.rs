use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use salonsync_api::handlers::availability::AvailabilityQuery;
use salonsync_api::middleware::error_handling::AppError;
use salonsync_core::errors::EngineError;
use salonsync_core::models::booking::AvailabilityResponse;
use salonsync_core::models::calendar::{OpenInterval, WeeklyHours};
use salonsync_core::models::settings::ConflictScope;
use salonsync_core::scheduling::{available_slots, day_window_utc, resolve_day};
use salonsync_db::models::{DbBooking, DbService, DbSettings};

use crate::test_utils::TestContext;

// Mirrors the get_availability handler flow against the mock repositories,
// which stand in for the pool-bound repository functions.
async fn availability_via_mocks(
    ctx: &TestContext,
    query: AvailabilityQuery,
    now: DateTime<Utc>,
) -> Result<AvailabilityResponse, AppError> {
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

    let settings = ctx
        .settings_repo
        .get_settings()
        .await
        .map_err(EngineError::Storage)?
        .into_domain()
        .map_err(|e| AppError(EngineError::Configuration(e.to_string())))?;

    let service = ctx
        .service_repo
        .get_service_by_id(service_id)
        .await
        .map_err(EngineError::Storage)?
        .filter(|s| s.active)
        .ok_or_else(|| {
            EngineError::ServiceNotFound(format!("Service {service_id} not found or inactive"))
        })?
        .into_domain();

    let hours = ctx
        .calendar_repo
        .get_weekly_hours()
        .await
        .map_err(EngineError::Storage)?;
    let exception = ctx
        .calendar_repo
        .get_exception_by_date(date)
        .await
        .map_err(EngineError::Storage)?
        .map(salonsync_db::models::DbAvailabilityException::into_domain);
    let day = resolve_day(date, &hours, exception.as_ref())?;

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

    Ok(AvailabilityResponse {
        date,
        service_id,
        slots,
    })
}

fn db_settings() -> DbSettings {
    DbSettings {
        id: 1,
        slot_granularity_minutes: 30,
        minimum_lead_minutes: 60,
        timezone: "UTC".to_string(),
        conflict_scope: "global".to_string(),
        auto_confirm: false,
    }
}

fn db_service(id: Uuid, active: bool) -> DbService {
    DbService {
        id,
        name: "Haircut".to_string(),
        duration_minutes: 60,
        buffer_before_minutes: 0,
        buffer_after_minutes: 0,
        active,
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

fn query(date: &str, service_id: &str) -> AvailabilityQuery {
    AvailabilityQuery {
        date: date.to_string(),
        service_id: service_id.to_string(),
    }
}

fn week_before() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn test_malformed_date_is_a_validation_error() {
    let ctx = TestContext::new();
    let result =
        availability_via_mocks(&ctx, query("07.09.2026", &Uuid::new_v4().to_string()), week_before())
            .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn test_malformed_service_id_is_a_validation_error() {
    let ctx = TestContext::new();
    let result = availability_via_mocks(&ctx, query("2026-09-07", "haircut"), week_before()).await;

    assert!(matches!(
        result.unwrap_err(),
        AppError(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn test_unknown_service_is_not_found() {
    let mut ctx = TestContext::new();
    let service_id = Uuid::new_v4();

    ctx.settings_repo
        .expect_get_settings()
        .returning(|| Ok(db_settings()));
    ctx.service_repo
        .expect_get_service_by_id()
        .with(predicate::eq(service_id))
        .returning(|_| Ok(None));

    let result =
        availability_via_mocks(&ctx, query("2026-09-07", &service_id.to_string()), week_before())
            .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError(EngineError::ServiceNotFound(_))
    ));
}

#[tokio::test]
async fn test_inactive_service_is_not_found() {
    let mut ctx = TestContext::new();
    let service_id = Uuid::new_v4();

    ctx.settings_repo
        .expect_get_settings()
        .returning(|| Ok(db_settings()));
    ctx.service_repo
        .expect_get_service_by_id()
        .returning(move |id| Ok(Some(db_service(id, false))));

    let result =
        availability_via_mocks(&ctx, query("2026-09-07", &service_id.to_string()), week_before())
            .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError(EngineError::ServiceNotFound(_))
    ));
}

#[tokio::test]
async fn test_open_day_returns_slots() {
    let mut ctx = TestContext::new();
    let service_id = Uuid::new_v4();

    ctx.settings_repo
        .expect_get_settings()
        .returning(|| Ok(db_settings()));
    ctx.service_repo
        .expect_get_service_by_id()
        .returning(move |id| Ok(Some(db_service(id, true))));
    ctx.calendar_repo
        .expect_get_weekly_hours()
        .returning(|| Ok(monday_hours()));
    ctx.calendar_repo
        .expect_get_exception_by_date()
        .returning(|_| Ok(None));
    ctx.booking_repo
        .expect_get_bookings_in_window()
        .returning(|_, _, _| Ok(vec![]));

    // 2026-09-07 is a Monday
    let response =
        availability_via_mocks(&ctx, query("2026-09-07", &service_id.to_string()), week_before())
            .await
            .unwrap();

    assert_eq!(response.service_id, service_id);
    assert_eq!(
        response.slots,
        vec![
            Utc.with_ymd_and_hms(2026, 9, 7, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 9, 7, 9, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 9, 7, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 9, 7, 10, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 9, 7, 11, 0, 0).unwrap(),
        ]
    );
}

#[tokio::test]
async fn test_closed_day_returns_empty_slots_not_an_error() {
    let mut ctx = TestContext::new();
    let service_id = Uuid::new_v4();

    ctx.settings_repo
        .expect_get_settings()
        .returning(|| Ok(db_settings()));
    ctx.service_repo
        .expect_get_service_by_id()
        .returning(move |id| Ok(Some(db_service(id, true))));
    ctx.calendar_repo
        .expect_get_weekly_hours()
        .returning(|| Ok(monday_hours()));
    ctx.calendar_repo
        .expect_get_exception_by_date()
        .returning(|_| Ok(None));
    ctx.booking_repo
        .expect_get_bookings_in_window()
        .returning(|_, _, _| Ok(vec![]));

    // 2026-09-08 is a Tuesday with no business hours
    let response =
        availability_via_mocks(&ctx, query("2026-09-08", &service_id.to_string()), week_before())
            .await
            .unwrap();

    assert!(response.slots.is_empty());
}
