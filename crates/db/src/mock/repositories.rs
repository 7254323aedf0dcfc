use chrono::{DateTime, NaiveDate, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbAvailabilityException, DbBooking, DbService, DbSettings};
use salonsync_core::models::calendar::WeeklyHours;

// Mock repositories for testing
mock! {
    pub ServiceRepo {
        pub async fn create_service(
            &self,
            name: &'static str,
            duration_minutes: i32,
            buffer_before_minutes: i32,
            buffer_after_minutes: i32,
        ) -> eyre::Result<DbService>;

        pub async fn get_service_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbService>>;

        pub async fn list_active_services(&self) -> eyre::Result<Vec<DbService>>;

        pub async fn deactivate_service(&self, id: Uuid) -> eyre::Result<()>;
    }
}

mock! {
    pub CalendarRepo {
        pub async fn get_weekly_hours(&self) -> eyre::Result<WeeklyHours>;

        pub async fn get_exception_by_date(
            &self,
            date: NaiveDate,
        ) -> eyre::Result<Option<DbAvailabilityException>>;
    }
}

mock! {
    pub SettingsRepo {
        pub async fn get_settings(&self) -> eyre::Result<DbSettings>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn get_bookings_in_window(
            &self,
            window_start: DateTime<Utc>,
            window_end: DateTime<Utc>,
            service_id: Option<Uuid>,
        ) -> eyre::Result<Vec<DbBooking>>;

        pub async fn get_booking_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbBooking>>;
    }
}
