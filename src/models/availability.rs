use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "availability_status", rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Unavailable,
}

/// One user's stance on one slot. The store keeps at most one per (user, slot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserAvailability {
    pub id: Uuid,
    pub user_id: String,
    pub event_id: Uuid,
    #[serde(rename = "timeslotId")]
    pub timeslot_id: Uuid,
    pub status: AvailabilityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAvailability {
    pub fn new(
        event_id: Uuid,
        user_id: impl Into<String>,
        timeslot_id: Uuid,
        status: AvailabilityStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            event_id,
            timeslot_id,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == AvailabilityStatus::Available
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityRequest {
    #[serde(rename = "timeslotId")]
    pub timeslot_id: Uuid,
    pub status: AvailabilityStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityStatusRequest {
    pub status: AvailabilityStatus,
}
