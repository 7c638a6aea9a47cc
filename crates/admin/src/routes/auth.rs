//! Login, logout and session status.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_logged_in, is_logged_in, set_logged_in};
use crate::models::session_keys;
use crate::services::RecoverySession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub logged_in: bool,
}

/// Check the credential pair and set the session flag.
///
/// POST /admin/login
#[instrument(skip(state, session, form), fields(username = %form.username.trim()))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionStatus>> {
    if let Err(e) = state.credentials().verify(&form.username, &form.password) {
        tracing::warn!(error = %e, "Admin login rejected");
        return Err(e.into());
    }

    // New session id on privilege change.
    session.cycle_id().await?;
    set_logged_in(&session).await?;
    session
        .remove::<RecoverySession>(session_keys::RECOVERY)
        .await?;

    set_sentry_user(state.credentials().username());
    tracing::info!("Admin logged in");
    Ok(Json(SessionStatus { logged_in: true }))
}

/// POST /admin/logout
pub async fn logout(session: Session) -> Result<Json<SessionStatus>> {
    clear_logged_in(&session).await?;
    clear_sentry_user();
    tracing::info!("Admin logged out");
    Ok(Json(SessionStatus { logged_in: false }))
}

/// GET /admin/session
pub async fn status(session: Session) -> Json<SessionStatus> {
    Json(SessionStatus {
        logged_in: is_logged_in(&session).await,
    })
}
