//! PostgreSQL document store.
//!
//! # Schema
//!
//! One `documents` table keyed by `(collection, id)` with a `jsonb` body.
//! A trigger calls `pg_notify('document_changes', collection)` after every
//! insert, update and delete (see `crates/store/migrations/`).
//!
//! # Subscriptions
//!
//! Each subscription holds its own `PgListener` on [`CHANGE_CHANNEL`] and
//! re-reads the whole collection whenever a notification names it. If the
//! listener connection drops, the error is delivered to the handler and the
//! full list is re-sent once the listener is back, since notifications sent
//! in between are lost.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use sqlx::types::Json;
use uuid::Uuid;

use super::{Collection, Document, DocumentStore, Fields, SnapshotHandler, Subscription};
use crate::error::{StoreError, StoreResult};

/// Notification channel written by the `documents` trigger.
pub const CHANGE_CHANNEL: &str = "document_changes";

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Document store backed by the `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn fetch_collection(pool: &PgPool, collection: Collection) -> StoreResult<Vec<Document>> {
    let rows: Vec<(String, Json<Fields>)> = sqlx::query_as(
        "SELECT id, data FROM documents WHERE collection = $1 ORDER BY created_at, id",
    )
    .bind(collection.name())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, Json(data))| Document { id, data })
        .collect())
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[tracing::instrument(skip(self, fields), fields(collection = %collection))]
    async fn create(&self, collection: Collection, fields: Fields) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection.name())
            .bind(&id)
            .bind(Json(fields))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    #[tracing::instrument(skip(self, fields), fields(collection = %collection))]
    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE documents SET data = $3, updated_at = now() \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection.name())
        .bind(id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_owned(),
            });
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(collection = %collection))]
    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.name())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_owned(),
            });
        }
        Ok(())
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        fetch_collection(&self.pool, collection).await
    }

    async fn subscribe(
        &self,
        collection: Collection,
        handler: SnapshotHandler,
    ) -> StoreResult<Subscription> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;

        let pool = self.pool.clone();
        let task = tokio::spawn(async move {
            handler(fetch_collection(&pool, collection).await);

            loop {
                match listener.recv().await {
                    Ok(notification) if notification.payload() == collection.name() => {
                        handler(fetch_collection(&pool, collection).await);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(%collection, error = %e, "Change listener failed");
                        handler(Err(StoreError::Subscription(e.to_string())));
                        tokio::time::sleep(RECONNECT_DELAY).await;
                        // The next recv() reconnects; resend to cover missed notifications.
                        handler(fetch_collection(&pool, collection).await);
                    }
                }
            }
        });

        Ok(Subscription::new(collection, task))
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
