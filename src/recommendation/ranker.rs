use std::cmp::Ordering;

use crate::models::Recommendation;

/// Highest availability first; ties go to the earlier slot, then to the lower
/// slot id so equal start times still order reproducibly.
pub fn compare(a: &Recommendation, b: &Recommendation) -> Ordering {
    b.availability_percentage
        .total_cmp(&a.availability_percentage)
        .then_with(|| a.timeslot.start_time.cmp(&b.timeslot.start_time))
        .then_with(|| a.timeslot.id.cmp(&b.timeslot.id))
}

pub fn rank(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(compare);
}
