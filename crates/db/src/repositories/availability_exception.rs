use crate::models::DbAvailabilityException;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use salonsync_core::models::calendar::OpenInterval;
use sqlx::postgres::PgExecutor;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};

/// Creates or replaces the exception for a date. An empty interval list with
/// `is_closed = false` still means the day is closed; callers usually set
/// one or the other.
pub async fn set_exception(
    pool: &Pool<Postgres>,
    date: NaiveDate,
    is_closed: bool,
    intervals: &[OpenInterval],
) -> Result<DbAvailabilityException> {
    tracing::debug!(
        "Setting availability exception: date={}, closed={}, intervals={}",
        date,
        is_closed,
        intervals.len()
    );

    let exception = sqlx::query_as::<_, DbAvailabilityException>(
        r#"
        INSERT INTO availability_exceptions (date, is_closed, intervals, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (date) DO UPDATE
        SET is_closed = EXCLUDED.is_closed, intervals = EXCLUDED.intervals
        RETURNING date, is_closed, intervals, created_at
        "#,
    )
    .bind(date)
    .bind(is_closed)
    .bind(Json(intervals.to_vec()))
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(exception)
}

pub async fn get_exception_by_date<'e, E>(
    executor: E,
    date: NaiveDate,
) -> Result<Option<DbAvailabilityException>>
where
    E: PgExecutor<'e>,
{
    let exception = sqlx::query_as::<_, DbAvailabilityException>(
        r#"
        SELECT date, is_closed, intervals, created_at
        FROM availability_exceptions
        WHERE date = $1
        "#,
    )
    .bind(date)
    .fetch_optional(executor)
    .await?;

    Ok(exception)
}

/// Removes the override so the weekly pattern applies again.
pub async fn clear_exception(pool: &Pool<Postgres>, date: NaiveDate) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM availability_exceptions
        WHERE date = $1
        "#,
    )
    .bind(date)
    .execute(pool)
    .await?;

    Ok(())
}
