use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
            buffer_before_minutes INTEGER NOT NULL DEFAULT 0 CHECK (buffer_before_minutes >= 0),
            buffer_after_minutes INTEGER NOT NULL DEFAULT 0 CHECK (buffer_after_minutes >= 0),
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create business_hours table (weekday 0 = Monday)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS business_hours (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            weekday SMALLINT NOT NULL CHECK (weekday BETWEEN 0 AND 6),
            open_time TIME NOT NULL,
            close_time TIME NOT NULL,
            CONSTRAINT valid_open_interval CHECK (close_time > open_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create availability_exceptions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS availability_exceptions (
            date DATE PRIMARY KEY,
            is_closed BOOLEAN NOT NULL DEFAULT FALSE,
            intervals JSONB NOT NULL DEFAULT '[]',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            service_id UUID NOT NULL REFERENCES services(id),
            customer_name VARCHAR(255) NOT NULL,
            customer_email VARCHAR(255) NOT NULL,
            date DATE NOT NULL,
            start_at TIMESTAMP WITH TIME ZONE NOT NULL,
            end_at TIMESTAMP WITH TIME ZONE NOT NULL,
            buffer_before_minutes INTEGER NOT NULL DEFAULT 0,
            buffer_after_minutes INTEGER NOT NULL DEFAULT 0,
            status VARCHAR(32) NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'confirmed', 'cancelled')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_booking_range CHECK (end_at > start_at)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create settings table and seed the single row
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            slot_granularity_minutes INTEGER NOT NULL CHECK (slot_granularity_minutes > 0),
            minimum_lead_minutes INTEGER NOT NULL CHECK (minimum_lead_minutes >= 0),
            timezone VARCHAR(64) NOT NULL,
            conflict_scope VARCHAR(16) NOT NULL CHECK (conflict_scope IN ('service', 'global')),
            auto_confirm BOOLEAN NOT NULL DEFAULT FALSE
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO settings (id, slot_granularity_minutes, minimum_lead_minutes, timezone, conflict_scope, auto_confirm)
        VALUES (1, 15, 60, 'UTC', 'global', FALSE)
        ON CONFLICT (id) DO NOTHING;
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes; the partial unique index backs up the committer's
    // advisory lock for the exact-duplicate case. Multi-statement blocks
    // must go through the simple query protocol.
    pool.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_business_hours_weekday ON business_hours(weekday);
        CREATE INDEX IF NOT EXISTS idx_bookings_date ON bookings(date);
        CREATE INDEX IF NOT EXISTS idx_bookings_service_id ON bookings(service_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_start_at ON bookings(start_at);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_live_slot
            ON bookings(service_id, start_at) WHERE status <> 'cancelled';
        "#,
    )
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
