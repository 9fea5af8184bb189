//! Registration and login handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use super::AppState;
use crate::web::dto::{
    ApiResponse, CaptchaCheckQuery, CaptchaCheckResponse, LoginRequest, RegisterRequest,
    SessionResponse,
};
use crate::web::error::ApiError;

fn session_response(state: &AppState, account: &str) -> SessionResponse {
    let session = state.sessions.create(account);
    SessionResponse {
        token: session.token,
        expires_in: state.auth.session_ttl_secs,
        account: account.to_string(),
    }
}

/// POST /api/register - Create an account and open a session.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    let account = crate::auth::register(
        state.store.as_ref(),
        &state.auth,
        &req.username,
        &req.password,
    )?;

    Ok(Json(ApiResponse::new(session_response(
        &state,
        &account.name,
    ))))
}

/// GET /api/login/captcha - Whether the next login attempt for an account
/// must carry a CAPTCHA token.
///
/// Login forms use this to decide whether to render the challenge widget
/// before submitting credentials.
pub async fn captcha_check(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CaptchaCheckQuery>,
) -> Result<Json<ApiResponse<CaptchaCheckResponse>>, ApiError> {
    let captcha_required = state
        .gate
        .captcha_required(state.store.as_ref(), &query.username)?;

    Ok(Json(ApiResponse::new(CaptchaCheckResponse {
        captcha_required,
    })))
}

/// POST /api/login - Attempt a login through the throttle gate.
///
/// Once the account has reached the failure threshold the request must
/// carry `captcha_token`; the gate answers 428 otherwise.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let account = state
        .gate
        .attempt_login(
            state.store.as_ref(),
            &req.username,
            &req.password,
            req.captcha_token.as_deref(),
        )
        .await?;

    Ok(Json(ApiResponse::new(session_response(
        &state,
        &account.name,
    ))))
}
