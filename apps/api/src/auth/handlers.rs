//! Axum route handlers for the Auth API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::auth::identity::UserProfile;
use crate::auth::session::{SignInOutcome, SignInRequest};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub identity_ready: bool,
    /// OAuth client id for the browser token flow. Absent when sign-in is disabled.
    pub client_id: Option<String>,
    pub signed_in: bool,
    pub profile: Option<UserProfile>,
}

/// GET /api/v1/auth/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let profile = state.identity.current_profile().await;
    Json(SessionResponse {
        identity_ready: state.identity.is_ready(),
        client_id: state.identity.client_id(),
        signed_in: profile.is_some(),
        profile,
    })
}

/// POST /api/v1/auth/sign-in
///
/// Answers 200 for any well-formed report; the outcome says whether the user is now
/// signed in.
pub async fn handle_sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<SignInOutcome>, AppError> {
    let Json(request) = payload?;
    Ok(Json(state.identity.sign_in(request).await))
}

/// POST /api/v1/auth/sign-out
pub async fn handle_sign_out(State(state): State<AppState>) -> StatusCode {
    state.identity.sign_out().await;
    StatusCode::NO_CONTENT
}
