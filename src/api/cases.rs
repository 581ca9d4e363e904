use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::domain::{CaseId, RequestContext};
use crate::models::{Case, CaseWithProceedings};
use crate::services::{CaseForm, PendingUploads, UploadSlot};

const CLIENT_NAME_FIELD: &str = "client_name";
const CASE_STATUS_FIELD: &str = "case_status";

/// GET /cases
pub async fn list_cases(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<ApiResponse<Vec<Case>>>, ApiError> {
    let cases = state.case_service().list_cases(&ctx).await?;
    Ok(Json(ApiResponse::success(cases)))
}

/// POST /cases
pub async fn create_case(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_case_form(&state, multipart).await?;
    let case = state.case_service().create_case(&ctx, form).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(case))))
}

/// GET /cases/{id}
pub async fn get_case(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CaseWithProceedings>>, ApiError> {
    let case = state
        .case_service()
        .get_case_with_proceedings(&ctx, CaseId::new(id))
        .await?;
    Ok(Json(ApiResponse::success(case)))
}

/// PUT /cases/{id}
pub async fn update_case(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Case>>, ApiError> {
    let form = read_case_form(&state, multipart).await?;
    let case = state
        .case_service()
        .update_case(&ctx, CaseId::new(id), form)
        .await?;
    Ok(Json(ApiResponse::success(case)))
}

/// DELETE /cases/{id}
pub async fn delete_case(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = CaseId::new(id);
    state.case_service().delete_case(&ctx, id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Case {id} deleted"
    )))))
}

/// Collects the text fields and attachment slots of a case form. Both text
/// fields must be present (an empty value is fine); unknown fields are ignored.
async fn read_case_form(state: &AppState, mut multipart: Multipart) -> Result<CaseForm, ApiError> {
    let mut client_name: Option<String> = None;
    let mut case_status: Option<String> = None;
    let mut uploads = PendingUploads::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed form data: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(slot) = UploadSlot::from_field_name(&name) {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(format!("Failed to read {slot}: {e}")))?;

            if let Some(file) = state.uploads().accept(slot, &filename, bytes.to_vec())? {
                uploads.insert(file)?;
            }
            continue;
        }

        match name.as_str() {
            CLIENT_NAME_FIELD => client_name = Some(read_text(field).await?),
            CASE_STATUS_FIELD => case_status = Some(read_text(field).await?),
            _ => {}
        }
    }

    let client_name = client_name.ok_or_else(|| required(CLIENT_NAME_FIELD))?;
    let case_status = case_status.ok_or_else(|| required(CASE_STATUS_FIELD))?;

    Ok(CaseForm::new(client_name, case_status).with_uploads(uploads))
}

fn required(field: &str) -> ApiError {
    ApiError::validation(format!("{field} is required"))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed form data: {e}")))
}
