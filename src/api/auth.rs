use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, CredentialsRequest, MessageResponse};
use crate::domain::RequestContext;
use crate::services::UserInfo;

/// Session key holding the authenticated [`RequestContext`].
pub const SESSION_USER_KEY: &str = "user";

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without a logged-in session with 401. On success the
/// principal is attached to the request as an `Extension<RequestContext>`.
pub async fn auth_middleware(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = current_user(&session)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    tracing::Span::current().record("user_id", ctx.username.as_str());
    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}

/// True iff the session carries a logged-in principal.
pub async fn is_authenticated(session: &Session) -> bool {
    matches!(current_user(session).await, Ok(Some(_)))
}

async fn current_user(session: &Session) -> Result<Option<RequestContext>, ApiError> {
    session
        .get::<RequestContext>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let user = state
        .auth_service()
        .register(&payload.username, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// POST /auth/login
/// Verifies the credentials and stores the principal in a fresh session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let Json(payload) = payload?;
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;

    let ctx = RequestContext::new(user.id, user.username.clone());
    session
        .insert(SESSION_USER_KEY, &ctx)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("User logged in: {}", user.username);
    Ok(Json(ApiResponse::success(user)))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if is_authenticated(&session).await {
        session
            .flush()
            .await
            .map_err(|e| ApiError::internal(format!("Failed to clear session: {e}")))?;
    }

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Logged out",
    ))))
}

/// GET /auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = state.auth_service().get_user(ctx.user_id).await?;
    Ok(Json(ApiResponse::success(user)))
}
