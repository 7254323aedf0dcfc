use crate::models::DbService;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_service(
    pool: &Pool<Postgres>,
    name: &str,
    duration_minutes: i32,
    buffer_before_minutes: i32,
    buffer_after_minutes: i32,
) -> Result<DbService> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating service: id={}, name={}, duration={}min",
        id,
        name,
        duration_minutes
    );

    let service = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (id, name, duration_minutes, buffer_before_minutes, buffer_after_minutes, active, created_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6)
        RETURNING id, name, duration_minutes, buffer_before_minutes, buffer_after_minutes, active, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(duration_minutes)
    .bind(buffer_before_minutes)
    .bind(buffer_after_minutes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(service)
}

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, name, duration_minutes, buffer_before_minutes, buffer_after_minutes, active, created_at
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn list_active_services(pool: &Pool<Postgres>) -> Result<Vec<DbService>> {
    let services = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, name, duration_minutes, buffer_before_minutes, buffer_after_minutes, active, created_at
        FROM services
        WHERE active = TRUE
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(services)
}

/// Deactivation hides a service from new bookings without touching the rows
/// that already reference it.
pub async fn deactivate_service(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE services
        SET active = FALSE
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
