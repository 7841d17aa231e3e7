use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use uuid::Uuid;

use crate::models::RecommendationsResponse;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn get_recommendations(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(event_id) = path?;
    let recommendations = state.engine.recommend(event_id).await?;
    Ok(success(
        RecommendationsResponse { recommendations },
        "Recommendations computed",
    ))
}
