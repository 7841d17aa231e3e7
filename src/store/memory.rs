use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventSnapshot, SchedulerStore, StoreError, StoreResult, Upserted};
use crate::models::{
    AvailabilityStatus, Event, TimeSlot, TimeSlotRequest, UpdateEventRequest, UserAvailability,
};

#[derive(Default)]
struct Tables {
    events: HashMap<Uuid, Event>,
    slots: HashMap<Uuid, TimeSlot>,
    /// Keyed by (user, slot) so a second submission replaces the first.
    availability: HashMap<(String, Uuid), UserAvailability>,
}

impl Tables {
    fn event(&self, event_id: Uuid) -> StoreResult<&Event> {
        self.events
            .get(&event_id)
            .ok_or_else(|| StoreError::event_not_found(event_id))
    }

    fn slot(&self, event_id: Uuid, timeslot_id: Uuid) -> StoreResult<&TimeSlot> {
        self.slots
            .get(&timeslot_id)
            .filter(|slot| slot.event_id == event_id)
            .ok_or_else(|| StoreError::timeslot_not_found(timeslot_id))
    }

    fn slots_of(&self, event_id: Uuid) -> Vec<TimeSlot> {
        let mut slots: Vec<TimeSlot> = self
            .slots
            .values()
            .filter(|slot| slot.event_id == event_id)
            .cloned()
            .collect();
        slots.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
        slots
    }

    fn availability_of(&self, event_id: Uuid) -> Vec<UserAvailability> {
        let mut records: Vec<UserAvailability> = self
            .availability
            .values()
            .filter(|record| record.event_id == event_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.user_id
                .cmp(&b.user_id)
                .then(a.timeslot_id.cmp(&b.timeslot_id))
        });
        records
    }
}

/// Process-local store. All tables sit behind one lock so a snapshot never
/// mixes states from before and after a write.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SchedulerStore for InMemoryStore {
    async fn create_event(&self, event: Event) -> StoreResult<Event> {
        let mut tables = self.tables.write().await;
        tables.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Event> {
        let tables = self.tables.read().await;
        tables.event(event_id).cloned()
    }

    async fn list_events(&self, organizer_id: Option<&str>) -> StoreResult<Vec<Event>> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|event| organizer_id.map_or(true, |id| event.organizer_id == id))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn update_event(
        &self,
        event_id: Uuid,
        update: UpdateEventRequest,
    ) -> StoreResult<Event> {
        let mut tables = self.tables.write().await;
        let event = tables
            .events
            .get_mut(&event_id)
            .ok_or_else(|| StoreError::event_not_found(event_id))?;
        event.apply(update);
        Ok(event.clone())
    }

    async fn delete_event(&self, event_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.events.remove(&event_id).is_none() {
            return Err(StoreError::event_not_found(event_id));
        }
        tables.slots.retain(|_, slot| slot.event_id != event_id);
        tables
            .availability
            .retain(|_, record| record.event_id != event_id);
        Ok(())
    }

    async fn create_slot(&self, slot: TimeSlot) -> StoreResult<TimeSlot> {
        let mut tables = self.tables.write().await;
        tables.event(slot.event_id)?;
        tables.slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn list_slots(&self, event_id: Uuid) -> StoreResult<Vec<TimeSlot>> {
        let tables = self.tables.read().await;
        tables.event(event_id)?;
        Ok(tables.slots_of(event_id))
    }

    async fn get_slot(&self, event_id: Uuid, timeslot_id: Uuid) -> StoreResult<TimeSlot> {
        let tables = self.tables.read().await;
        tables.slot(event_id, timeslot_id).cloned()
    }

    async fn update_slot(
        &self,
        event_id: Uuid,
        timeslot_id: Uuid,
        update: TimeSlotRequest,
    ) -> StoreResult<TimeSlot> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .slots
            .get_mut(&timeslot_id)
            .filter(|slot| slot.event_id == event_id)
            .ok_or_else(|| StoreError::timeslot_not_found(timeslot_id))?;
        slot.apply(update);
        Ok(slot.clone())
    }

    async fn delete_slot(&self, event_id: Uuid, timeslot_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.slot(event_id, timeslot_id)?;
        tables.slots.remove(&timeslot_id);
        tables
            .availability
            .retain(|_, record| record.timeslot_id != timeslot_id);
        Ok(())
    }

    async fn upsert_availability(&self, record: UserAvailability) -> StoreResult<Upserted> {
        let mut tables = self.tables.write().await;
        tables.event(record.event_id)?;
        tables.slot(record.event_id, record.timeslot_id)?;

        match tables
            .availability
            .entry((record.user_id.clone(), record.timeslot_id))
        {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.status = record.status;
                existing.updated_at = record.updated_at;
                Ok(Upserted {
                    record: existing.clone(),
                    created: false,
                })
            }
            Entry::Vacant(entry) => {
                entry.insert(record.clone());
                Ok(Upserted {
                    record,
                    created: true,
                })
            }
        }
    }

    async fn list_availability(&self, event_id: Uuid) -> StoreResult<Vec<UserAvailability>> {
        let tables = self.tables.read().await;
        Ok(tables.availability_of(event_id))
    }

    async fn list_user_availability(
        &self,
        event_id: Uuid,
        user_id: &str,
    ) -> StoreResult<Vec<UserAvailability>> {
        let tables = self.tables.read().await;
        Ok(tables
            .availability_of(event_id)
            .into_iter()
            .filter(|record| record.user_id == user_id)
            .collect())
    }

    async fn update_availability(
        &self,
        event_id: Uuid,
        user_id: &str,
        timeslot_id: Uuid,
        status: AvailabilityStatus,
    ) -> StoreResult<UserAvailability> {
        let mut tables = self.tables.write().await;
        let record = tables
            .availability
            .get_mut(&(user_id.to_string(), timeslot_id))
            .filter(|record| record.event_id == event_id)
            .ok_or_else(|| StoreError::availability_not_found(user_id, timeslot_id))?;
        record.status = status;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_availability(
        &self,
        event_id: Uuid,
        user_id: &str,
        timeslot_id: Uuid,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let key = (user_id.to_string(), timeslot_id);
        let owned = tables
            .availability
            .get(&key)
            .map_or(false, |record| record.event_id == event_id);
        if !owned {
            return Err(StoreError::availability_not_found(user_id, timeslot_id));
        }
        tables.availability.remove(&key);
        Ok(())
    }

    async fn snapshot(&self, event_id: Uuid) -> StoreResult<EventSnapshot> {
        let tables = self.tables.read().await;
        let event = tables.event(event_id)?.clone();
        Ok(EventSnapshot {
            event,
            slots: tables.slots_of(event_id),
            availability: tables.availability_of(event_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateEventRequest, EventStatus};
    use chrono::{Duration, TimeZone};

    fn event() -> Event {
        Event::new(CreateEventRequest {
            title: "Planning".to_string(),
            description: None,
            organizer_id: "org".to_string(),
            required_duration: 30,
        })
    }

    fn slot(event_id: Uuid, hour: u32) -> TimeSlot {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, hour, 0, 0).unwrap();
        TimeSlot::new(
            event_id,
            TimeSlotRequest {
                start_time: start,
                end_time: start + Duration::hours(1),
            },
        )
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_record_per_user_and_slot() {
        let store = InMemoryStore::new();
        let event = store.create_event(event()).await.unwrap();
        let slot = store.create_slot(slot(event.id, 9)).await.unwrap();

        let first = store
            .upsert_availability(UserAvailability::new(
                event.id,
                "alice",
                slot.id,
                AvailabilityStatus::Available,
            ))
            .await
            .unwrap();
        assert!(first.created);

        let second = store
            .upsert_availability(UserAvailability::new(
                event.id,
                "alice",
                slot.id,
                AvailabilityStatus::Unavailable,
            ))
            .await
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.record.id, first.record.id);
        assert_eq!(second.record.status, AvailabilityStatus::Unavailable);

        let records = store.list_availability(event.id).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_rejects_slot_of_other_event() {
        let store = InMemoryStore::new();
        let first = store.create_event(event()).await.unwrap();
        let second = store.create_event(event()).await.unwrap();
        let foreign = store.create_slot(slot(second.id, 9)).await.unwrap();

        let result = store
            .upsert_availability(UserAvailability::new(
                first.id,
                "alice",
                foreign.id,
                AvailabilityStatus::Available,
            ))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_event_cascades() {
        let store = InMemoryStore::new();
        let event = store.create_event(event()).await.unwrap();
        let slot = store.create_slot(slot(event.id, 9)).await.unwrap();
        store
            .upsert_availability(UserAvailability::new(
                event.id,
                "alice",
                slot.id,
                AvailabilityStatus::Available,
            ))
            .await
            .unwrap();

        store.delete_event(event.id).await.unwrap();

        assert!(matches!(
            store.get_event(event.id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(store.list_availability(event.id).await.unwrap().is_empty());
        assert!(matches!(
            store.get_slot(event.id, slot.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_slot_drops_its_availability() {
        let store = InMemoryStore::new();
        let event = store.create_event(event()).await.unwrap();
        let morning = store.create_slot(slot(event.id, 9)).await.unwrap();
        let noon = store.create_slot(slot(event.id, 12)).await.unwrap();
        for slot_id in [morning.id, noon.id] {
            store
                .upsert_availability(UserAvailability::new(
                    event.id,
                    "bob",
                    slot_id,
                    AvailabilityStatus::Available,
                ))
                .await
                .unwrap();
        }

        store.delete_slot(event.id, morning.id).await.unwrap();

        let remaining = store.list_availability(event.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].timeslot_id, noon.id);
    }

    #[tokio::test]
    async fn test_list_slots_ordered_by_start() {
        let store = InMemoryStore::new();
        let event = store.create_event(event()).await.unwrap();
        store.create_slot(slot(event.id, 15)).await.unwrap();
        store.create_slot(slot(event.id, 8)).await.unwrap();
        store.create_slot(slot(event.id, 11)).await.unwrap();

        let hours: Vec<u32> = store
            .list_slots(event.id)
            .await
            .unwrap()
            .iter()
            .map(|slot| chrono::Timelike::hour(&slot.start_time))
            .collect();
        assert_eq!(hours, vec![8, 11, 15]);
    }

    #[tokio::test]
    async fn test_list_events_filters_by_organizer() {
        let store = InMemoryStore::new();
        store.create_event(event()).await.unwrap();
        let mut other = event();
        other.organizer_id = "someone-else".to_string();
        store.create_event(other).await.unwrap();

        assert_eq!(store.list_events(None).await.unwrap().len(), 2);
        let mine = store.list_events(Some("org")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].status, EventStatus::Active);
    }

    #[tokio::test]
    async fn test_snapshot_of_unknown_event() {
        let store = InMemoryStore::new();
        let result = store.snapshot(Uuid::new_v4()).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
