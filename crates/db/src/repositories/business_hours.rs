use crate::models::DbBusinessHours;
use chrono::Weekday;
use eyre::{eyre, Result};
use salonsync_core::models::calendar::{OpenInterval, WeeklyHours};
use sqlx::postgres::PgExecutor;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Replaces the interval rows for one weekday (0 = Monday).
pub async fn set_weekday_hours(
    pool: &Pool<Postgres>,
    weekday: i16,
    intervals: &[OpenInterval],
) -> Result<()> {
    if !(0..=6).contains(&weekday) {
        return Err(eyre!("invalid weekday index: {weekday}"));
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM business_hours
        WHERE weekday = $1
        "#,
    )
    .bind(weekday)
    .execute(&mut *tx)
    .await?;

    for interval in intervals {
        sqlx::query(
            r#"
            INSERT INTO business_hours (id, weekday, open_time, close_time)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(weekday)
        .bind(interval.open)
        .bind(interval.close)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Fetches the full weekly pattern as a domain `WeeklyHours`. Generic over
/// the executor so the booking committer can reuse it inside a transaction.
pub async fn get_weekly_hours<'e, E>(executor: E) -> Result<WeeklyHours>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, DbBusinessHours>(
        r#"
        SELECT id, weekday, open_time, close_time
        FROM business_hours
        ORDER BY weekday ASC, open_time ASC
        "#,
    )
    .fetch_all(executor)
    .await?;

    let mut hours = WeeklyHours::new();
    for row in rows {
        let weekday = weekday_from_index(row.weekday)?;
        hours.add(weekday, OpenInterval::new(row.open_time, row.close_time));
    }

    Ok(hours)
}

fn weekday_from_index(index: i16) -> Result<Weekday> {
    Ok(match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        6 => Weekday::Sun,
        other => return Err(eyre!("invalid weekday index in business_hours: {other}")),
    })
}
