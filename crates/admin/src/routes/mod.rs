//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness
//! GET  /health/ready                    - Readiness
//!
//! # Auth (single username/password pair)
//! POST /admin/login                     - Check credentials, set the session flag
//! POST /admin/logout                    - Clear the session flag
//! GET  /admin/session                   - { logged_in }
//!
//! # Password recovery (simulated delivery)
//! GET  /admin/recovery                  - Current step
//! POST /admin/recovery/start            - Enter the email step
//! POST /admin/recovery/email            - Submit the email, issue a code
//! POST /admin/recovery/code/input       - Type into one code slot
//! POST /admin/recovery/code/key         - Key press in one code slot
//! POST /admin/recovery/code             - Check the code
//! POST /admin/recovery/password         - Set the new password
//! POST /admin/recovery/cancel           - Abandon the flow
//!
//! # Everything below requires the session flag
//! GET  /admin/dashboard                 - Counts
//! GET  /admin/dishes                    - Live dish list with category names
//! POST /admin/dishes                    - Add (202)
//! PUT  /admin/dishes/{id}               - Edit (202)
//! DELETE /admin/dishes/{id}?confirm=    - Delete (202) or cancel
//! GET  /admin/categories                - Live category list
//! POST /admin/categories                - Add (202)
//! PUT  /admin/categories/{id}           - Edit (202)
//! DELETE /admin/categories/{id}?confirm=
//! GET  /admin/photos                    - Photos, categories, selection
//! POST /admin/photos                    - Multipart upload (201)
//! DELETE /admin/photos/{id}?confirm=
//! POST /admin/photo-categories          - { label, icon_label } (201)
//! DELETE /admin/photo-categories/{label}?confirm=
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod dishes;
pub mod health;
pub mod photos;
pub mod recovery;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post, put},
};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the recovery routes router.
pub fn recovery_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recovery::show))
        .route("/start", post(recovery::start))
        .route("/email", post(recovery::email))
        .route("/code/input", post(recovery::code_input))
        .route("/code/key", post(recovery::code_key))
        .route("/code", post(recovery::code))
        .route("/password", post(recovery::password))
        .route("/cancel", post(recovery::cancel))
}

/// Create the `/admin` routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::status))
        .nest("/recovery", recovery_routes())
        .route("/dashboard", get(dashboard::index))
        .route("/dishes", get(dishes::index).post(dishes::create))
        .route("/dishes/{id}", put(dishes::update).delete(dishes::delete))
        .route("/categories", get(categories::index).post(categories::create))
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::delete),
        )
        .route(
            "/photos",
            get(photos::index)
                .post(photos::create)
                .layer(DefaultBodyLimit::max(photos::MAX_UPLOAD_BYTES)),
        )
        .route("/photos/{id}", axum::routing::delete(photos::delete))
        .route("/photo-categories", post(photos::create_category))
        .route(
            "/photo-categories/{label}",
            axum::routing::delete(photos::delete_category),
        )
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/admin", admin_routes())
}

/// The admin panel with its per-request middleware, ready to serve.
///
/// The session layer is passed in so tests can use an in-memory store.
/// Tracing and Sentry layers are added by the binary on top of this.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    routes()
        .layer(from_fn(security_headers_middleware))
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
