//! Unified error handling for admin.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use buffet_simone_core::auth::LoginError;
use buffet_simone_core::recovery::{INCORRECT_CODE_TITLE, RecoveryError};
use buffet_simone_core::validation::FieldErrors;
use buffet_simone_store::{PhotoLibraryError, StoreError};
use serde_json::json;
use thiserror::Error;

use crate::services::MenuError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Document store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Photo library operation failed or was rejected.
    #[error("{0}")]
    Gallery(#[from] PhotoLibraryError),

    /// Session read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// One or more form fields were rejected.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    Login(#[from] LoginError),

    #[error("{0}")]
    Recovery(#[from] RecoveryError),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        match err {
            MenuError::Validation(errors) => Self::Validation(errors),
            MenuError::Store(e) => Self::Store(e),
        }
    }
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Store(StoreError::NotFound { .. }) => false,
            Self::Gallery(e) => !e.is_user_error(),
            Self::Store(_) | Self::Session(_) | Self::Internal(_) => true,
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::NotFound { .. }) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Unavailable(_) | StoreError::Subscription(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Gallery(PhotoLibraryError::DuplicateCategory(_))
            | Self::Recovery(RecoveryError::IncorrectCode | RecoveryError::WrongStep) => {
                StatusCode::CONFLICT
            }
            Self::Gallery(e) if e.is_user_error() => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Validation(_) | Self::Login(LoginError::MissingFields) | Self::Recovery(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Login(LoginError::InvalidCredentials) | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Gallery(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = self.status();
        let body = match &self {
            Self::Validation(errors) => json!({ "errors": errors }),
            Self::Recovery(e) if e.is_blocking() => {
                json!({ "modal": INCORRECT_CODE_TITLE, "error": e.to_string() })
            }
            // Don't expose internal error details to clients
            _ if status == StatusCode::SERVICE_UNAVAILABLE => {
                json!({ "error": "Serviço indisponível, tente novamente." })
            }
            _ if self.is_server_error() => json!({ "error": "Internal server error" }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for admin actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}

/// Tag Sentry events with the logged-in panel user.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
