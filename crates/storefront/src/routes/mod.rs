//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (document store reachable)
//!
//! GET  /menu                   - Categories with their dishes
//!
//! # Cart
//! GET  /cart                   - Lines, total and count
//! POST /cart/add               - Add a menu item
//! POST /cart/remove            - Remove one line
//!
//! GET  /faq?q=                 - FAQ entries, optionally filtered
//! GET  /gallery?category=      - Filter chips and photos
//! POST /contact                - Quote request, returns a WhatsApp link
//! ```

pub mod cart;
pub mod contact;
pub mod faq;
pub mod gallery;
pub mod health;
pub mod menu;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/menu", get(menu::show))
        .nest("/cart", cart_routes())
        .route("/faq", get(faq::index))
        .route("/gallery", get(gallery::index))
        .route("/contact", post(contact::submit))
}

/// The storefront with its per-request middleware, ready to serve.
///
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
