use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub buffer_before_minutes: i32,
    pub buffer_after_minutes: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Service {
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Total span a booking of this service occupies, buffers included.
    pub fn required_span(&self) -> Duration {
        Duration::minutes(i64::from(
            self.buffer_before_minutes + self.duration_minutes + self.buffer_after_minutes,
        ))
    }
}
