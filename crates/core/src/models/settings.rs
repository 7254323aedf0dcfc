use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::booking::BookingStatus;

/// The grouping within which overlapping bookings are disallowed:
/// per service, or across all services (single shared practitioner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictScope {
    Service,
    Global,
}

impl ConflictScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictScope::Service => "service",
            ConflictScope::Global => "global",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "service" => Some(ConflictScope::Service),
            "global" => Some(ConflictScope::Global),
            _ => None,
        }
    }
}

/// Deployment-wide engine configuration, loaded once per request and passed
/// explicitly into every engine call.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub slot_granularity_minutes: i32,
    pub minimum_lead_minutes: i32,
    pub timezone: Tz,
    pub conflict_scope: ConflictScope,
    pub auto_confirm: bool,
}

impl EngineSettings {
    pub fn granularity(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_granularity_minutes))
    }

    pub fn minimum_lead(&self) -> Duration {
        Duration::minutes(i64::from(self.minimum_lead_minutes))
    }

    /// Initial status for newly committed bookings (deployment policy).
    pub fn initial_status(&self) -> BookingStatus {
        if self.auto_confirm {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        }
    }
}
