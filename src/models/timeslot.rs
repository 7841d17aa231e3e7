use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: Uuid,
    pub event_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(event_id: Uuid, request: TimeSlotRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            event_id,
            start_time: request.start_time,
            end_time: request.end_time,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, request: TimeSlotRequest) {
        self.start_time = request.start_time;
        self.end_time = request.end_time;
        self.updated_at = Utc::now();
    }

    pub fn length(&self) -> Duration {
        self.end_time - self.start_time
    }
}

/// Body for both creating and rescheduling a slot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl TimeSlotRequest {
    /// Zero-length slots are accepted here; the recommendation engine drops them.
    pub fn is_ordered(&self) -> bool {
        self.end_time >= self.start_time
    }
}
