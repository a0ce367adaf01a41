//! Session boundary route handlers.
//!
//! The dashboard never performs an OAuth handshake itself - it relays the
//! flow to the scanner backend, which owns the credentials. What the
//! session stores is the verified email the scanner hands back.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use parceldeck_core::Email;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Query parameters from the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to relay to the scanner.
    pub code: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Initiate login by redirecting to the scanner's authorization URL.
///
/// # Route
///
/// `GET /login`
pub async fn login(State(state): State<AppState>) -> Result<Response> {
    let challenge = state.scanner().authorization_url().await?;
    Ok(Redirect::to(&challenge.authorization_url).into_response())
}

/// Handle the OAuth callback.
///
/// Relays the authorization code to the scanner, stores the verified email
/// in the session, and sends the user on to the dashboard page.
///
/// # Route
///
/// `GET /oauth2callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Response> {
    // Check for OAuth errors reported by the provider
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!("OAuth error: {} - {}", error, description);
        return Ok(Redirect::to("/login?error=denied").into_response());
    }

    let Some(code) = query.code else {
        tracing::warn!("OAuth callback missing code");
        return Ok(Redirect::to("/login?error=missing_code").into_response());
    };

    let raw_email = state.scanner().exchange_code(&code).await?;
    let email = Email::parse(&raw_email)
        .map_err(|e| AppError::Internal(format!("scanner returned invalid email: {e}")))?;

    set_current_user(&session, &CurrentUser { email: email.clone() })
        .await
        .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;
    set_sentry_user(email.as_str());

    tracing::info!(email = %email, "user logged in");
    Ok(Redirect::to("/dashboard").into_response())
}

/// Log out: clear the session, the board, and the scanner-side session.
///
/// # Route
///
/// `POST /logout`
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Response> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    state.board().clear();
    clear_sentry_user();

    // Best-effort remote logout; the local session is gone either way.
    if let Err(e) = state.scanner().logout().await {
        tracing::warn!("scanner logout failed: {}", e);
    }

    Ok(Redirect::to("/login").into_response())
}
