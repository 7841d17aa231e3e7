use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod availability;
pub mod events;
pub mod recommendations;
pub mod timeslots;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "slotwise-api",
    };

    success(payload, "Health check successful")
}
