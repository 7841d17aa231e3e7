use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::availability::{
    delete_availability, get_user_availability, submit_availability, update_availability,
};
use crate::handlers::events::{create_event, delete_event, get_event, list_events, update_event};
use crate::handlers::health_check;
use crate::handlers::recommendations::get_recommendations;
use crate::handlers::timeslots::{
    create_timeslot, delete_timeslot, list_timeslots, update_timeslot,
};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/:event_id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route(
            "/events/:event_id/timeslots",
            get(list_timeslots).post(create_timeslot),
        )
        .route(
            "/events/:event_id/timeslots/:timeslot_id",
            put(update_timeslot).delete(delete_timeslot),
        )
        .route(
            "/events/:event_id/users/:user_id/availability",
            get(get_user_availability).post(submit_availability),
        )
        .route(
            "/events/:event_id/users/:user_id/availability/:timeslot_id",
            put(update_availability).delete(delete_availability),
        )
        .route(
            "/events/:event_id/recommendations",
            get(get_recommendations),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
}
