pub mod availability;
pub mod event;
pub mod recommendation;
pub mod timeslot;

pub use availability::{
    AvailabilityRequest, AvailabilityStatus, AvailabilityStatusRequest, UserAvailability,
};
pub use event::{CreateEventRequest, Event, EventListQuery, EventStatus, UpdateEventRequest};
pub use recommendation::{Recommendation, RecommendationsResponse};
pub use timeslot::{TimeSlot, TimeSlotRequest};
