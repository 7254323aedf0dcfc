use crate::models::DbSettings;
use eyre::Result;
use sqlx::{Pool, Postgres};

/// Loads the single settings row. The schema seeds it, so a missing row is
/// a storage error rather than a normal state.
pub async fn get_settings(pool: &Pool<Postgres>) -> Result<DbSettings> {
    let settings = sqlx::query_as::<_, DbSettings>(
        r#"
        SELECT id, slot_granularity_minutes, minimum_lead_minutes, timezone, conflict_scope, auto_confirm
        FROM settings
        WHERE id = 1
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(settings)
}

pub async fn update_settings(
    pool: &Pool<Postgres>,
    slot_granularity_minutes: i32,
    minimum_lead_minutes: i32,
    timezone: &str,
    conflict_scope: &str,
    auto_confirm: bool,
) -> Result<DbSettings> {
    let settings = sqlx::query_as::<_, DbSettings>(
        r#"
        UPDATE settings
        SET slot_granularity_minutes = $1,
            minimum_lead_minutes = $2,
            timezone = $3,
            conflict_scope = $4,
            auto_confirm = $5
        WHERE id = 1
        RETURNING id, slot_granularity_minutes, minimum_lead_minutes, timezone, conflict_scope, auto_confirm
        "#,
    )
    .bind(slot_granularity_minutes)
    .bind(minimum_lead_minutes)
    .bind(timezone)
    .bind(conflict_scope)
    .bind(auto_confirm)
    .fetch_one(pool)
    .await?;

    Ok(settings)
}
