use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub organizer_id: String,
    /// Minutes a slot must span to host this event.
    pub required_duration: i32,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(request: CreateEventRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            organizer_id: request.organizer_id,
            required_duration: request.required_duration,
            status: EventStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an update in place. The identifier and creation time never change.
    pub fn apply(&mut self, request: UpdateEventRequest) {
        self.title = request.title;
        self.description = request.description;
        self.organizer_id = request.organizer_id;
        self.required_duration = request.required_duration;
        if let Some(status) = request.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "organizerId must not be empty"))]
    pub organizer_id: String,
    #[validate(range(min = 1, message = "requiredDuration must be a positive number of minutes"))]
    pub required_duration: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "organizerId must not be empty"))]
    pub organizer_id: String,
    #[validate(range(min = 1, message = "requiredDuration must be a positive number of minutes"))]
    pub required_duration: i32,
    #[serde(default)]
    pub status: Option<EventStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    pub organizer_id: Option<String>,
}
