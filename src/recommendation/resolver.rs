use std::collections::{BTreeSet, HashSet};

use uuid::Uuid;

use crate::models::UserAvailability;

/// Users of one slot split by whether they marked it `available`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub available: Vec<String>,
    pub unavailable: Vec<String>,
}

impl Partition {
    pub fn total(&self) -> usize {
        self.available.len() + self.unavailable.len()
    }
}

/// Index over one event's availability records.
///
/// Known users are the distinct responders of the event; someone who never
/// submitted anything is not part of any partition. Users are kept sorted so
/// partitions come out in a stable order.
#[derive(Debug)]
pub struct AvailabilityResolver<'a> {
    users: BTreeSet<&'a str>,
    available: HashSet<(&'a str, Uuid)>,
}

impl<'a> AvailabilityResolver<'a> {
    pub fn new(event_id: Uuid, records: &'a [UserAvailability]) -> Self {
        let mut users = BTreeSet::new();
        let mut available = HashSet::new();

        for record in records.iter().filter(|r| r.event_id == event_id) {
            users.insert(record.user_id.as_str());
            if record.is_available() {
                available.insert((record.user_id.as_str(), record.timeslot_id));
            }
        }

        Self { users, available }
    }

    pub fn known_users(&self) -> usize {
        self.users.len()
    }

    /// An explicit `unavailable` and no answer for this slot both count as
    /// unavailable.
    pub fn resolve(&self, timeslot_id: Uuid) -> Partition {
        let mut partition = Partition::default();
        for user in &self.users {
            if self.available.contains(&(*user, timeslot_id)) {
                partition.available.push((*user).to_string());
            } else {
                partition.unavailable.push((*user).to_string());
            }
        }
        partition
    }
}
