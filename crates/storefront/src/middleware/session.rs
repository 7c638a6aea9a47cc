//! Session middleware configuration.
//!
//! Storefront sessions only carry the cart. They are stored in `PostgreSQL`
//! behind a browser-session cookie, so the cart goes away when the browser
//! closes; records left behind are swept by [`spawn_expired_session_cleanup`].

use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bs_session";

/// How often expired session records are deleted.
pub const EXPIRED_SESSION_SWEEP: Duration = Duration::from_secs(60 * 60);

/// The `PostgreSQL` session store. Its table is created by `bs-cli migrate`.
#[must_use]
pub fn create_session_store(pool: &PgPool) -> PostgresStore {
    PostgresStore::new(pool.clone())
}

/// Delete expired session records every `period` until the task is aborted
/// or the store fails.
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

/// Wrap `store` in the storefront session layer.
#[must_use]
pub fn create_session_layer<S: SessionStore + Clone>(
    store: S,
    secure: bool,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnSessionEnd)
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
