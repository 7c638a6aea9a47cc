//! Session middleware configuration for admin.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions with
//! stricter settings than the storefront (SameSite=Strict, 24hr inactivity
//! expiry). Keeping the session in the database is what makes the login
//! flag survive restarts.

use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "bs_admin_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// How often expired session records are deleted.
pub const EXPIRED_SESSION_SWEEP: Duration = Duration::from_secs(60 * 60);

/// The `PostgreSQL` session store. Its table is created by `bs-cli migrate`.
#[must_use]
pub fn create_session_store(pool: &PgPool) -> PostgresStore {
    PostgresStore::new(pool.clone())
}

/// Delete expired session records every `period` until the store fails.
pub fn spawn_expired_session_cleanup<S>(store: S, period: Duration) -> JoinHandle<()>
where
    S: ExpiredDeletion + Clone + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = store.continuously_delete_expired(period).await {
            tracing::error!(error = %e, "Expired session cleanup stopped");
        }
    })
}

/// Wrap `store` in the admin session layer.
#[must_use]
pub fn create_session_layer<S: SessionStore + Clone>(
    store: S,
    secure: bool,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        // SameSite=Strict for admin (stricter than storefront's Lax)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
