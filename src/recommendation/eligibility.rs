use chrono::Duration;

use crate::models::TimeSlot;

/// A slot can host the event when it spans at least `required_minutes`.
/// Compared at full precision: 59m59s does not satisfy a 60 minute event.
pub fn is_eligible(slot: &TimeSlot, required_minutes: i32) -> bool {
    slot.length() >= Duration::minutes(i64::from(required_minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSlotRequest;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn slot_of(length: Duration) -> TimeSlot {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        TimeSlot::new(
            Uuid::new_v4(),
            TimeSlotRequest {
                start_time: start,
                end_time: start + length,
            },
        )
    }

    #[test]
    fn test_exact_length_is_eligible() {
        assert!(is_eligible(&slot_of(Duration::minutes(60)), 60));
    }

    #[test]
    fn test_longer_slot_is_eligible() {
        assert!(is_eligible(&slot_of(Duration::minutes(90)), 60));
    }

    #[test]
    fn test_short_slot_is_not_eligible() {
        assert!(!is_eligible(&slot_of(Duration::minutes(30)), 60));
    }

    #[test]
    fn test_sub_minute_shortfall_is_not_rounded_up() {
        let length = Duration::minutes(59) + Duration::seconds(59);
        assert!(!is_eligible(&slot_of(length), 60));

        let length = Duration::minutes(60) + Duration::milliseconds(1);
        assert!(is_eligible(&slot_of(length), 60));
    }

    #[test]
    fn test_zero_length_slot_is_not_eligible() {
        assert!(!is_eligible(&slot_of(Duration::zero()), 1));
    }
}
