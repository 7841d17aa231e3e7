use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::eligibility::is_eligible;
use super::ranker::rank;
use super::resolver::AvailabilityResolver;
use super::scorer::availability_percentage;
use crate::models::Recommendation;
use crate::store::{EventSnapshot, SchedulerStore, StoreError, StoreResult};

/// Ranks an event's candidate slots by how many respondents can attend.
///
/// Holds no state of its own beyond the injected store, so clones can serve
/// any number of concurrent queries.
#[derive(Clone)]
pub struct RecommendationEngine {
    store: Arc<dyn SchedulerStore>,
    read_timeout: Duration,
}

impl RecommendationEngine {
    pub fn new(store: Arc<dyn SchedulerStore>, read_timeout: Duration) -> Self {
        Self {
            store,
            read_timeout,
        }
    }

    /// Fails with `NotFound` for an unknown event and with `Timeout` or
    /// `Database` when the store cannot deliver a snapshot. Never returns a
    /// partial ranking.
    pub async fn recommend(&self, event_id: Uuid) -> StoreResult<Vec<Recommendation>> {
        let snapshot = tokio::time::timeout(self.read_timeout, self.store.snapshot(event_id))
            .await
            .map_err(|_| StoreError::Timeout(self.read_timeout))??;

        Ok(recommend_from_snapshot(&snapshot))
    }
}

/// Pure ranking over one consistent read of an event.
pub fn recommend_from_snapshot(snapshot: &EventSnapshot) -> Vec<Recommendation> {
    let event = &snapshot.event;

    if snapshot.slots.is_empty() {
        tracing::debug!(event_id = %event.id, "No time slots, nothing to recommend");
        return Vec::new();
    }

    let resolver = AvailabilityResolver::new(event.id, &snapshot.availability);
    if resolver.known_users() == 0 {
        tracing::debug!(event_id = %event.id, "No availability submitted, nothing to recommend");
        return Vec::new();
    }

    let mut recommendations: Vec<Recommendation> = snapshot
        .slots
        .iter()
        .filter(|slot| slot.event_id == event.id)
        .filter(|slot| is_eligible(slot, event.required_duration))
        .filter_map(|slot| {
            let partition = resolver.resolve(slot.id);
            let percentage = availability_percentage(&partition)?;
            Some(Recommendation {
                timeslot: slot.clone(),
                available_users: partition.available,
                unavailable_users: partition.unavailable,
                availability_percentage: percentage,
            })
        })
        .collect();

    rank(&mut recommendations);

    tracing::debug!(
        event_id = %event.id,
        slots = snapshot.slots.len(),
        eligible = recommendations.len(),
        respondents = resolver.known_users(),
        "Computed slot recommendations"
    );

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AvailabilityStatus::{Available, Unavailable};
    use crate::models::{
        CreateEventRequest, Event, TimeSlot, TimeSlotRequest, UserAvailability,
    };
    use crate::store::{InMemoryStore, SchedulerStore};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};

    fn event(required_duration: i32) -> Event {
        Event::new(CreateEventRequest {
            title: "Design review".to_string(),
            description: None,
            organizer_id: "organizer".to_string(),
            required_duration,
        })
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, hour, 0, 0).unwrap()
    }

    fn slot(event: &Event, hour: u32, minutes: i64) -> TimeSlot {
        TimeSlot::new(
            event.id,
            TimeSlotRequest {
                start_time: at(hour),
                end_time: at(hour) + chrono::Duration::minutes(minutes),
            },
        )
    }

    fn snapshot(
        event: Event,
        slots: Vec<TimeSlot>,
        availability: Vec<UserAvailability>,
    ) -> EventSnapshot {
        EventSnapshot {
            event,
            slots,
            availability,
        }
    }

    #[test]
    fn test_no_slots_gives_empty_result() {
        let event = event(30);
        let records = vec![UserAvailability::new(
            event.id,
            "alice",
            uuid::Uuid::new_v4(),
            Available,
        )];
        assert!(recommend_from_snapshot(&snapshot(event, vec![], records)).is_empty());
    }

    #[test]
    fn test_no_respondents_gives_empty_result() {
        let event = event(30);
        let slots = vec![slot(&event, 9, 60), slot(&event, 13, 60)];
        assert!(recommend_from_snapshot(&snapshot(event, slots, vec![])).is_empty());
    }

    #[test]
    fn test_short_slot_is_dropped_even_with_full_availability() {
        let event = event(60);
        let a = slot(&event, 9, 90);
        let b = slot(&event, 14, 30);
        let records = vec![
            UserAvailability::new(event.id, "alice", a.id, Available),
            UserAvailability::new(event.id, "bob", a.id, Available),
            UserAvailability::new(event.id, "carol", a.id, Unavailable),
            UserAvailability::new(event.id, "alice", b.id, Available),
            UserAvailability::new(event.id, "bob", b.id, Available),
            UserAvailability::new(event.id, "carol", b.id, Available),
        ];

        let result = recommend_from_snapshot(&snapshot(event, vec![a.clone(), b], records));

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].timeslot.id, a.id);
        assert_eq!(result[0].available_users, vec!["alice", "bob"]);
        assert_eq!(result[0].unavailable_users, vec!["carol"]);
        assert!((result[0].availability_percentage - 66.67).abs() < 0.01);
    }

    #[test]
    fn test_equal_scores_rank_earlier_slot_first() {
        let event = event(30);
        let x = slot(&event, 9, 60);
        let y = slot(&event, 11, 60);
        let records = vec![
            UserAvailability::new(event.id, "alice", x.id, Available),
            UserAvailability::new(event.id, "alice", y.id, Available),
        ];

        let result =
            recommend_from_snapshot(&snapshot(event, vec![y.clone(), x.clone()], records));

        let order: Vec<_> = result.iter().map(|r| r.timeslot.id).collect();
        assert_eq!(order, vec![x.id, y.id]);
        assert!(result.iter().all(|r| r.availability_percentage == 100.0));
    }

    #[test]
    fn test_slot_without_answers_scores_zero() {
        let event = event(30);
        let answered = slot(&event, 9, 60);
        let silent = slot(&event, 10, 60);
        let records = vec![UserAvailability::new(
            event.id,
            "alice",
            answered.id,
            Available,
        )];

        let result = recommend_from_snapshot(&snapshot(
            event,
            vec![silent.clone(), answered.clone()],
            records,
        ));

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].timeslot.id, answered.id);
        assert_eq!(result[1].timeslot.id, silent.id);
        assert_eq!(result[1].availability_percentage, 0.0);
        assert_eq!(result[1].unavailable_users, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_recommend_unknown_event() {
        let engine =
            RecommendationEngine::new(Arc::new(InMemoryStore::new()), Duration::from_secs(1));
        let result = engine.recommend(uuid::Uuid::new_v4()).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_recommend_is_idempotent() {
        let store = Arc::new(InMemoryStore::new());
        let event = store.create_event(event(30)).await.unwrap();
        let mut slot_ids = Vec::new();
        for hour in [9, 10, 11, 12] {
            let created = store.create_slot(slot(&event, hour, 60)).await.unwrap();
            slot_ids.push(created.id);
        }
        for (user, slots) in [("alice", &slot_ids[..2]), ("bob", &slot_ids[1..])] {
            for slot_id in slots {
                store
                    .upsert_availability(UserAvailability::new(event.id, user, *slot_id, Available))
                    .await
                    .unwrap();
            }
        }

        let engine = RecommendationEngine::new(store, Duration::from_secs(1));
        let first = engine.recommend(event.id).await.unwrap();
        let second = engine.recommend(event.id).await.unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first[0].timeslot.id, slot_ids[1]);
    }

    struct StalledStore(InMemoryStore);

    #[async_trait]
    impl SchedulerStore for StalledStore {
        async fn create_event(&self, event: Event) -> StoreResult<Event> {
            self.0.create_event(event).await
        }
        async fn get_event(&self, event_id: Uuid) -> StoreResult<Event> {
            self.0.get_event(event_id).await
        }
        async fn list_events(&self, organizer_id: Option<&str>) -> StoreResult<Vec<Event>> {
            self.0.list_events(organizer_id).await
        }
        async fn update_event(
            &self,
            event_id: Uuid,
            update: crate::models::UpdateEventRequest,
        ) -> StoreResult<Event> {
            self.0.update_event(event_id, update).await
        }
        async fn delete_event(&self, event_id: Uuid) -> StoreResult<()> {
            self.0.delete_event(event_id).await
        }
        async fn create_slot(&self, slot: TimeSlot) -> StoreResult<TimeSlot> {
            self.0.create_slot(slot).await
        }
        async fn list_slots(&self, event_id: Uuid) -> StoreResult<Vec<TimeSlot>> {
            self.0.list_slots(event_id).await
        }
        async fn get_slot(&self, event_id: Uuid, timeslot_id: Uuid) -> StoreResult<TimeSlot> {
            self.0.get_slot(event_id, timeslot_id).await
        }
        async fn update_slot(
            &self,
            event_id: Uuid,
            timeslot_id: Uuid,
            update: TimeSlotRequest,
        ) -> StoreResult<TimeSlot> {
            self.0.update_slot(event_id, timeslot_id, update).await
        }
        async fn delete_slot(&self, event_id: Uuid, timeslot_id: Uuid) -> StoreResult<()> {
            self.0.delete_slot(event_id, timeslot_id).await
        }
        async fn upsert_availability(
            &self,
            record: UserAvailability,
        ) -> StoreResult<crate::store::Upserted> {
            self.0.upsert_availability(record).await
        }
        async fn list_availability(&self, event_id: Uuid) -> StoreResult<Vec<UserAvailability>> {
            self.0.list_availability(event_id).await
        }
        async fn list_user_availability(
            &self,
            event_id: Uuid,
            user_id: &str,
        ) -> StoreResult<Vec<UserAvailability>> {
            self.0.list_user_availability(event_id, user_id).await
        }
        async fn update_availability(
            &self,
            event_id: Uuid,
            user_id: &str,
            timeslot_id: Uuid,
            status: crate::models::AvailabilityStatus,
        ) -> StoreResult<UserAvailability> {
            self.0
                .update_availability(event_id, user_id, timeslot_id, status)
                .await
        }
        async fn delete_availability(
            &self,
            event_id: Uuid,
            user_id: &str,
            timeslot_id: Uuid,
        ) -> StoreResult<()> {
            self.0
                .delete_availability(event_id, user_id, timeslot_id)
                .await
        }
        async fn snapshot(&self, _event_id: Uuid) -> StoreResult<EventSnapshot> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_slow_store_surfaces_timeout() {
        let engine = RecommendationEngine::new(
            Arc::new(StalledStore(InMemoryStore::new())),
            Duration::from_millis(20),
        );
        let result = engine.recommend(uuid::Uuid::new_v4()).await;
        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }
}
