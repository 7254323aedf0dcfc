use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use eyre::eyre;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use salonsync_core::models::booking::{Booking, BookingStatus};
use salonsync_core::models::calendar::{AvailabilityException, OpenInterval};
use salonsync_core::models::service::Service;
use salonsync_core::models::settings::{ConflictScope, EngineSettings};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub buffer_before_minutes: i32,
    pub buffer_after_minutes: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl DbService {
    pub fn into_domain(self) -> Service {
        Service {
            id: self.id,
            name: self.name,
            duration_minutes: self.duration_minutes,
            buffer_before_minutes: self.buffer_before_minutes,
            buffer_after_minutes: self.buffer_after_minutes,
            active: self.active,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBusinessHours {
    pub id: Uuid,
    pub weekday: i16,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbAvailabilityException {
    pub date: NaiveDate,
    pub is_closed: bool,
    pub intervals: Json<Vec<OpenInterval>>,
    pub created_at: DateTime<Utc>,
}

impl DbAvailabilityException {
    pub fn into_domain(self) -> AvailabilityException {
        AvailabilityException {
            date: self.date,
            is_closed: self.is_closed,
            intervals: self.intervals.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub service_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub date: NaiveDate,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub buffer_before_minutes: i32,
    pub buffer_after_minutes: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DbBooking {
    pub fn into_domain(self) -> eyre::Result<Booking> {
        let status = BookingStatus::parse(&self.status)
            .ok_or_else(|| eyre!("unknown booking status: {}", self.status))?;
        Ok(Booking {
            id: self.id,
            service_id: self.service_id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            date: self.date,
            start_at: self.start_at,
            end_at: self.end_at,
            buffer_before_minutes: self.buffer_before_minutes,
            buffer_after_minutes: self.buffer_after_minutes,
            status,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSettings {
    pub id: i32,
    pub slot_granularity_minutes: i32,
    pub minimum_lead_minutes: i32,
    pub timezone: String,
    pub conflict_scope: String,
    pub auto_confirm: bool,
}

impl DbSettings {
    pub fn into_domain(self) -> eyre::Result<EngineSettings> {
        let timezone = self
            .timezone
            .parse::<Tz>()
            .map_err(|_| eyre!("unknown timezone in settings: {}", self.timezone))?;
        let conflict_scope = ConflictScope::parse(&self.conflict_scope)
            .ok_or_else(|| eyre!("unknown conflict scope in settings: {}", self.conflict_scope))?;
        Ok(EngineSettings {
            slot_granularity_minutes: self.slot_granularity_minutes,
            minimum_lead_minutes: self.minimum_lead_minutes,
            timezone,
            conflict_scope,
            auto_confirm: self.auto_confirm,
        })
    }
}
