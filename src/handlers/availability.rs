use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::models::{AvailabilityRequest, AvailabilityStatusRequest, UserAvailability};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, no_content, success};

/// Records a user's answer for one slot. A repeat submission for the same
/// slot replaces the earlier answer instead of adding a second record.
pub async fn submit_availability(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, String)>, PathRejection>,
    payload: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path((event_id, user_id)) = path?;
    state.store.get_event(event_id).await?;

    let Json(request) = payload?;
    state.store.get_slot(event_id, request.timeslot_id).await?;

    let upserted = state
        .store
        .upsert_availability(UserAvailability::new(
            event_id,
            user_id,
            request.timeslot_id,
            request.status,
        ))
        .await?;

    let record = upserted.record;
    tracing::info!(
        event_id = %event_id,
        user_id = %record.user_id,
        timeslot_id = %record.timeslot_id,
        status = ?record.status,
        created = upserted.created,
        "Availability recorded"
    );

    if upserted.created {
        Ok(created(record, "Availability recorded"))
    } else {
        Ok(success(record, "Availability replaced"))
    }
}

pub async fn get_user_availability(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, String)>, PathRejection>,
) -> Result<Response, AppError> {
    let Path((event_id, user_id)) = path?;
    let records = state
        .store
        .list_user_availability(event_id, &user_id)
        .await?;
    Ok(success(records, "Availability retrieved"))
}

pub async fn update_availability(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, String, Uuid)>, PathRejection>,
    payload: Result<Json<AvailabilityStatusRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path((event_id, user_id, timeslot_id)) = path?;
    let Json(request) = payload?;

    let record = state
        .store
        .update_availability(event_id, &user_id, timeslot_id, request.status)
        .await?;
    tracing::info!(
        event_id = %event_id,
        user_id = %user_id,
        timeslot_id = %timeslot_id,
        status = ?record.status,
        "Availability updated"
    );

    Ok(success(record, "Availability updated"))
}

pub async fn delete_availability(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, String, Uuid)>, PathRejection>,
) -> Result<Response, AppError> {
    let Path((event_id, user_id, timeslot_id)) = path?;
    state
        .store
        .delete_availability(event_id, &user_id, timeslot_id)
        .await?;
    tracing::info!(
        event_id = %event_id,
        user_id = %user_id,
        timeslot_id = %timeslot_id,
        "Availability deleted"
    );
    Ok(no_content())
}
