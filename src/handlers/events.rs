use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CreateEventRequest, Event, EventListQuery, UpdateEventRequest};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, no_content, success};

pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let event = state.store.create_event(Event::new(request)).await?;
    tracing::info!(event_id = %event.id, organizer_id = %event.organizer_id, "Event created");

    Ok(created(event, "Event created"))
}

pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<EventListQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let events = state.store.list_events(query.organizer_id.as_deref()).await?;
    Ok(success(events, "Events retrieved"))
}

pub async fn get_event(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(event_id) = path?;
    let event = state.store.get_event(event_id).await?;
    Ok(success(event, "Event retrieved"))
}

pub async fn update_event(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path(event_id) = path?;
    let Json(request) = payload?;
    request.validate()?;

    let event = state.store.update_event(event_id, request).await?;
    tracing::info!(event_id = %event.id, "Event updated");

    Ok(success(event, "Event updated"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(event_id) = path?;
    state.store.delete_event(event_id).await?;
    tracing::info!(event_id = %event_id, "Event deleted");
    Ok(no_content())
}
