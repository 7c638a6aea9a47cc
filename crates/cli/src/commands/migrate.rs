//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! bs-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string. `ADMIN_DATABASE_URL`
//!   and `STOREFRONT_DATABASE_URL` are tried first, in that order, so the
//!   command works with either binary's `.env`.
//!
//! Both binaries share one database: the `documents` table behind the
//! document store, and the `tower_sessions` schema used by the admin panel.

use secrecy::SecretString;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;

use buffet_simone_store::{MIGRATOR, create_pool};

const DATABASE_URL_KEYS: [&str; 3] =
    ["ADMIN_DATABASE_URL", "STOREFRONT_DATABASE_URL", "DATABASE_URL"];

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// First database URL found in the environment.
///
/// # Errors
///
/// Returns `MigrationError::MissingDatabaseUrl` if none of the keys is set.
pub fn database_url() -> Result<SecretString, MigrationError> {
    dotenvy::dotenv().ok();

    DATABASE_URL_KEYS
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
        .map(SecretString::from)
        .ok_or(MigrationError::MissingDatabaseUrl)
}

/// Run the document store and session store migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    info!("Running document store migrations...");
    MIGRATOR.run(&pool).await?;

    info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    info!("Migrations complete!");
    Ok(())
}
