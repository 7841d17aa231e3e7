use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::models::{TimeSlot, TimeSlotRequest};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, no_content, success};

fn validate_range(request: &TimeSlotRequest) -> Result<(), AppError> {
    if request.is_ordered() {
        Ok(())
    } else {
        Err(AppError::ValidationError(
            "End time must be after start time".to_string(),
        ))
    }
}

pub async fn create_timeslot(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TimeSlotRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path(event_id) = path?;
    state.store.get_event(event_id).await?;

    let Json(request) = payload?;
    validate_range(&request)?;

    let slot = state
        .store
        .create_slot(TimeSlot::new(event_id, request))
        .await?;
    tracing::info!(event_id = %event_id, timeslot_id = %slot.id, "Time slot created");

    Ok(created(slot, "Time slot created"))
}

pub async fn list_timeslots(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(event_id) = path?;
    let slots = state.store.list_slots(event_id).await?;
    Ok(success(slots, "Time slots retrieved"))
}

pub async fn update_timeslot(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    payload: Result<Json<TimeSlotRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path((event_id, timeslot_id)) = path?;
    state.store.get_slot(event_id, timeslot_id).await?;

    let Json(request) = payload?;
    validate_range(&request)?;

    let slot = state
        .store
        .update_slot(event_id, timeslot_id, request)
        .await?;
    tracing::info!(event_id = %event_id, timeslot_id = %timeslot_id, "Time slot updated");

    Ok(success(slot, "Time slot updated"))
}

pub async fn delete_timeslot(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Response, AppError> {
    let Path((event_id, timeslot_id)) = path?;
    state.store.delete_slot(event_id, timeslot_id).await?;
    tracing::info!(event_id = %event_id, timeslot_id = %timeslot_id, "Time slot deleted");
    Ok(no_content())
}
