use axum::extract::State;
use axum::Json;
use vantage_core::auth::token::now_ms;
use vantage_core::{complete_callback, CallbackOutcome};

use crate::dto::{AuthStatus, CallbackRequest, LoginResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn login_url(State(state): State<AppState>) -> Result<Json<LoginResponse>, AppError> {
    let authorize_url = state.oauth.authorize_url()?;
    Ok(Json(LoginResponse { authorize_url }))
}

/// Always answers 200: a fragment without a token is a failed login, and
/// the browser still goes back to the dashboard.
pub async fn callback(
    State(state): State<AppState>,
    Json(req): Json<CallbackRequest>,
) -> Json<CallbackOutcome> {
    let outcome = complete_callback(&req.fragment, &state.tokens, now_ms());
    tracing::info!("Music callback handled (authenticated: {})", outcome.authenticated);
    Json(outcome)
}

pub async fn status(State(state): State<AppState>) -> Json<AuthStatus> {
    Json(AuthStatus {
        connected: state.tokens.is_connected(now_ms()),
    })
}

pub async fn logout(State(state): State<AppState>) -> Result<Json<AuthStatus>, AppError> {
    state.tokens.logout()?;
    Ok(Json(AuthStatus { connected: false }))
}
