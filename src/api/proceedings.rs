use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::domain::{CaseId, ProceedingId, RequestContext};
use crate::models::{Proceeding, ProceedingInput};

/// POST /cases/{id}/proceedings
pub async fn add_proceeding(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(case_id): Path<i32>,
    payload: Result<Json<ProceedingInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let proceeding = state
        .proceeding_service()
        .add_proceeding(&ctx, CaseId::new(case_id), input)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(proceeding))))
}

/// GET /proceedings/{id}
pub async fn get_proceeding(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Proceeding>>, ApiError> {
    let proceeding = state
        .proceeding_service()
        .get_proceeding(&ctx, ProceedingId::new(id))
        .await?;
    Ok(Json(ApiResponse::success(proceeding)))
}

/// PUT /proceedings/{id}
pub async fn update_proceeding(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i32>,
    payload: Result<Json<ProceedingInput>, JsonRejection>,
) -> Result<Json<ApiResponse<Proceeding>>, ApiError> {
    let Json(input) = payload?;
    let proceeding = state
        .proceeding_service()
        .update_proceeding(&ctx, ProceedingId::new(id), input)
        .await?;
    Ok(Json(ApiResponse::success(proceeding)))
}

/// DELETE /proceedings/{id}
pub async fn delete_proceeding(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = ProceedingId::new(id);
    state.proceeding_service().delete_proceeding(&ctx, id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Proceeding {id} deleted"
    )))))
}
