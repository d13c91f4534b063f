//! Authentication endpoints

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde::Deserialize;

use showcase_core::auth::{AuthProvider, Identity, Session};

use crate::routes::{AppError, bearer_token};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/sign-out", post(sign_out))
        .route("/auth/me", get(me))
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/sign-in - Exchange credentials for a session token
async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.auth.sign_in(&req.email, &req.password).await?))
}

/// POST /auth/sign-out - End the current session
async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        state.auth.sign_out(token).await;
    }
    StatusCode::NO_CONTENT
}

/// GET /auth/me - The signed-in identity
async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Identity>, AppError> {
    let token = bearer_token(&headers).ok_or_else(AppError::unauthorized)?;
    state
        .auth
        .current_user(token)
        .await
        .map(Json)
        .ok_or_else(AppError::unauthorized)
}
