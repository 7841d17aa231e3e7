//! Persistence boundary for events, time slots and availability records.
//!
//! The recommendation engine only reads through [`SchedulerStore::snapshot`];
//! the HTTP handlers use the full read/write surface.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AvailabilityStatus, Event, TimeSlot, TimeSlotRequest, UpdateEventRequest,
    UserAvailability,
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn event_not_found(id: Uuid) -> Self {
        StoreError::NotFound(format!("Event '{}'", id))
    }

    pub fn timeslot_not_found(id: Uuid) -> Self {
        StoreError::NotFound(format!("Time slot '{}'", id))
    }

    pub fn availability_not_found(user_id: &str, timeslot_id: Uuid) -> Self {
        StoreError::NotFound(format!(
            "Availability of user '{}' for time slot '{}'",
            user_id, timeslot_id
        ))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Everything the engine needs about one event, read at a single point in time.
#[derive(Debug, Clone)]
pub struct EventSnapshot {
    pub event: Event,
    pub slots: Vec<TimeSlot>,
    pub availability: Vec<UserAvailability>,
}

/// Result of an availability upsert.
#[derive(Debug, Clone)]
pub struct Upserted {
    pub record: UserAvailability,
    pub created: bool,
}

#[async_trait]
pub trait SchedulerStore: Send + Sync {
    async fn create_event(&self, event: Event) -> StoreResult<Event>;

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Event>;

    /// Events ordered by creation time, optionally restricted to one organizer.
    async fn list_events(&self, organizer_id: Option<&str>) -> StoreResult<Vec<Event>>;

    async fn update_event(&self, event_id: Uuid, update: UpdateEventRequest)
        -> StoreResult<Event>;

    /// Removes the event together with its slots and availability records.
    async fn delete_event(&self, event_id: Uuid) -> StoreResult<()>;

    async fn create_slot(&self, slot: TimeSlot) -> StoreResult<TimeSlot>;

    /// Slots of the event ordered by start time. Fails if the event is unknown.
    async fn list_slots(&self, event_id: Uuid) -> StoreResult<Vec<TimeSlot>>;

    /// Fails with `NotFound` unless the slot exists and belongs to `event_id`.
    async fn get_slot(&self, event_id: Uuid, timeslot_id: Uuid) -> StoreResult<TimeSlot>;

    async fn update_slot(
        &self,
        event_id: Uuid,
        timeslot_id: Uuid,
        update: TimeSlotRequest,
    ) -> StoreResult<TimeSlot>;

    /// Removes the slot together with its availability records.
    async fn delete_slot(&self, event_id: Uuid, timeslot_id: Uuid) -> StoreResult<()>;

    /// Inserts or replaces the record keyed by (user, slot). Keeps the
    /// existing identifier and creation time when replacing.
    async fn upsert_availability(&self, record: UserAvailability) -> StoreResult<Upserted>;

    async fn list_availability(&self, event_id: Uuid) -> StoreResult<Vec<UserAvailability>>;

    async fn list_user_availability(
        &self,
        event_id: Uuid,
        user_id: &str,
    ) -> StoreResult<Vec<UserAvailability>>;

    async fn update_availability(
        &self,
        event_id: Uuid,
        user_id: &str,
        timeslot_id: Uuid,
        status: AvailabilityStatus,
    ) -> StoreResult<UserAvailability>;

    async fn delete_availability(
        &self,
        event_id: Uuid,
        user_id: &str,
        timeslot_id: Uuid,
    ) -> StoreResult<()>;

    /// Consistent read of an event, its slots and its availability records.
    async fn snapshot(&self, event_id: Uuid) -> StoreResult<EventSnapshot>;
}
