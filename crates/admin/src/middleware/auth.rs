//! Login gate for the admin routes.
//!
//! The session carries a single `adminLogado` flag. Once set it unlocks every
//! protected route until logout or session expiry; the credentials are not
//! checked again.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::session_keys;

/// Extractor that requires a logged-in admin session.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(_admin: RequireAdmin, State(state): State<AppState>) -> Json<Counts> {
///     // only reached when the session flag is set
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

/// Rejection for requests without the session flag.
#[derive(Debug)]
pub struct AdminAuthRejection;

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Faça login para continuar." })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection)?;

        if is_logged_in(session).await {
            Ok(Self)
        } else {
            Err(AdminAuthRejection)
        }
    }
}

/// Whether the session carries the login flag. Read errors count as logged out.
pub async fn is_logged_in(session: &Session) -> bool {
    session
        .get::<bool>(session_keys::ADMIN_LOGGED_IN)
        .await
        .ok()
        .flatten()
        .unwrap_or(false)
}

/// Set the login flag.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_logged_in(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ADMIN_LOGGED_IN, true).await
}

/// Remove the login flag (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_logged_in(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<bool>(session_keys::ADMIN_LOGGED_IN).await?;
    Ok(())
}
