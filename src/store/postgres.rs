use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{EventSnapshot, SchedulerStore, StoreError, StoreResult, Upserted};
use crate::models::{
    AvailabilityStatus, Event, TimeSlot, TimeSlotRequest, UpdateEventRequest, UserAvailability,
};

const EVENT_COLUMNS: &str =
    "id, title, description, organizer_id, required_duration, status, created_at, updated_at";
const SLOT_COLUMNS: &str = "id, event_id, start_time, end_time, created_at, updated_at";
const AVAILABILITY_COLUMNS: &str =
    "id, user_id, event_id, timeslot_id, status, created_at, updated_at";

#[derive(FromRow)]
struct UpsertedRow {
    #[sqlx(flatten)]
    record: UserAvailability,
    inserted: bool,
}

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!("Successfully connected to database");

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;

        tracing::info!("Migrations run successfully");

        Ok(Self::new(pool))
    }

    async fn ensure_event(&self, event_id: Uuid) -> StoreResult<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;
        if exists {
            Ok(())
        } else {
            Err(StoreError::event_not_found(event_id))
        }
    }
}

#[async_trait]
impl SchedulerStore for PgStore {
    async fn create_event(&self, event: Event) -> StoreResult<Event> {
        let query = format!(
            "INSERT INTO events ({EVENT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {EVENT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Event>(&query)
            .bind(event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.organizer_id)
            .bind(event.required_duration)
            .bind(event.status)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Event> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query_as::<_, Event>(&query)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| StoreError::event_not_found(event_id))
    }

    async fn list_events(&self, organizer_id: Option<&str>) -> StoreResult<Vec<Event>> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE ($1::TEXT IS NULL OR organizer_id = $1) \
             ORDER BY created_at, id"
        );
        let events = sqlx::query_as::<_, Event>(&query)
            .bind(organizer_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn update_event(
        &self,
        event_id: Uuid,
        update: UpdateEventRequest,
    ) -> StoreResult<Event> {
        let query = format!(
            "UPDATE events SET title = $2, description = $3, organizer_id = $4, \
             required_duration = $5, status = COALESCE($6, status), updated_at = $7 \
             WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Event>(&query)
            .bind(event_id)
            .bind(&update.title)
            .bind(&update.description)
            .bind(&update.organizer_id)
            .bind(update.required_duration)
            .bind(update.status)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| StoreError::event_not_found(event_id))
    }

    async fn delete_event(&self, event_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::event_not_found(event_id));
        }
        Ok(())
    }

    async fn create_slot(&self, slot: TimeSlot) -> StoreResult<TimeSlot> {
        self.ensure_event(slot.event_id).await?;
        let query = format!(
            "INSERT INTO time_slots ({SLOT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {SLOT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, TimeSlot>(&query)
            .bind(slot.id)
            .bind(slot.event_id)
            .bind(slot.start_time)
            .bind(slot.end_time)
            .bind(slot.created_at)
            .bind(slot.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn list_slots(&self, event_id: Uuid) -> StoreResult<Vec<TimeSlot>> {
        self.ensure_event(event_id).await?;
        let query = format!(
            "SELECT {SLOT_COLUMNS} FROM time_slots WHERE event_id = $1 ORDER BY start_time, id"
        );
        let slots = sqlx::query_as::<_, TimeSlot>(&query)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(slots)
    }

    async fn get_slot(&self, event_id: Uuid, timeslot_id: Uuid) -> StoreResult<TimeSlot> {
        let query =
            format!("SELECT {SLOT_COLUMNS} FROM time_slots WHERE id = $1 AND event_id = $2");
        let row = sqlx::query_as::<_, TimeSlot>(&query)
            .bind(timeslot_id)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| StoreError::timeslot_not_found(timeslot_id))
    }

    async fn update_slot(
        &self,
        event_id: Uuid,
        timeslot_id: Uuid,
        update: TimeSlotRequest,
    ) -> StoreResult<TimeSlot> {
        let query = format!(
            "UPDATE time_slots SET start_time = $3, end_time = $4, updated_at = $5 \
             WHERE id = $1 AND event_id = $2 RETURNING {SLOT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TimeSlot>(&query)
            .bind(timeslot_id)
            .bind(event_id)
            .bind(update.start_time)
            .bind(update.end_time)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| StoreError::timeslot_not_found(timeslot_id))
    }

    async fn delete_slot(&self, event_id: Uuid, timeslot_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM time_slots WHERE id = $1 AND event_id = $2")
            .bind(timeslot_id)
            .bind(event_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::timeslot_not_found(timeslot_id));
        }
        Ok(())
    }

    async fn upsert_availability(&self, record: UserAvailability) -> StoreResult<Upserted> {
        self.ensure_event(record.event_id).await?;
        self.get_slot(record.event_id, record.timeslot_id).await?;

        let query = format!(
            "INSERT INTO user_availability ({AVAILABILITY_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (user_id, timeslot_id) \
             DO UPDATE SET status = EXCLUDED.status, updated_at = EXCLUDED.updated_at \
             RETURNING {AVAILABILITY_COLUMNS}, (xmax = 0) AS inserted"
        );
        let row = sqlx::query_as::<_, UpsertedRow>(&query)
            .bind(record.id)
            .bind(&record.user_id)
            .bind(record.event_id)
            .bind(record.timeslot_id)
            .bind(record.status)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(Upserted {
            record: row.record,
            created: row.inserted,
        })
    }

    async fn list_availability(&self, event_id: Uuid) -> StoreResult<Vec<UserAvailability>> {
        let query = format!(
            "SELECT {AVAILABILITY_COLUMNS} FROM user_availability \
             WHERE event_id = $1 ORDER BY user_id, timeslot_id"
        );
        let records = sqlx::query_as::<_, UserAvailability>(&query)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn list_user_availability(
        &self,
        event_id: Uuid,
        user_id: &str,
    ) -> StoreResult<Vec<UserAvailability>> {
        let query = format!(
            "SELECT {AVAILABILITY_COLUMNS} FROM user_availability \
             WHERE event_id = $1 AND user_id = $2 ORDER BY timeslot_id"
        );
        let records = sqlx::query_as::<_, UserAvailability>(&query)
            .bind(event_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn update_availability(
        &self,
        event_id: Uuid,
        user_id: &str,
        timeslot_id: Uuid,
        status: AvailabilityStatus,
    ) -> StoreResult<UserAvailability> {
        let query = format!(
            "UPDATE user_availability SET status = $4, updated_at = $5 \
             WHERE event_id = $1 AND user_id = $2 AND timeslot_id = $3 \
             RETURNING {AVAILABILITY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserAvailability>(&query)
            .bind(event_id)
            .bind(user_id)
            .bind(timeslot_id)
            .bind(status)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| StoreError::availability_not_found(user_id, timeslot_id))
    }

    async fn delete_availability(
        &self,
        event_id: Uuid,
        user_id: &str,
        timeslot_id: Uuid,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "DELETE FROM user_availability \
             WHERE event_id = $1 AND user_id = $2 AND timeslot_id = $3",
        )
        .bind(event_id)
        .bind(user_id)
        .bind(timeslot_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::availability_not_found(user_id, timeslot_id));
        }
        Ok(())
    }

    async fn snapshot(&self, event_id: Uuid) -> StoreResult<EventSnapshot> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let event_query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let event = sqlx::query_as::<_, Event>(&event_query)
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::event_not_found(event_id))?;

        let slot_query = format!(
            "SELECT {SLOT_COLUMNS} FROM time_slots WHERE event_id = $1 ORDER BY start_time, id"
        );
        let slots = sqlx::query_as::<_, TimeSlot>(&slot_query)
            .bind(event_id)
            .fetch_all(&mut *tx)
            .await?;

        let availability_query = format!(
            "SELECT {AVAILABILITY_COLUMNS} FROM user_availability \
             WHERE event_id = $1 ORDER BY user_id, timeslot_id"
        );
        let availability = sqlx::query_as::<_, UserAvailability>(&availability_query)
            .bind(event_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(EventSnapshot {
            event,
            slots,
            availability,
        })
    }
}
