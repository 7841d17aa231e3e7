use serde::Serialize;

use super::timeslot::TimeSlot;

/// A scored slot. Derived on every query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub timeslot: TimeSlot,
    pub available_users: Vec<String>,
    pub unavailable_users: Vec<String>,
    pub availability_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}
