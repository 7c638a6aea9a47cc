//! In-memory document store.
//!
//! Not durable: all documents are lost on restart. Used by tests and local
//! development without a database. Changes are fanned out to subscribers
//! through a broadcast channel; each subscriber re-reads the full collection
//! when its collection changes.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use super::{Collection, Document, DocumentStore, Fields, SnapshotHandler, Subscription};
use crate::error::{StoreError, StoreResult};

const CHANGE_BUFFER: usize = 64;

type Collections = HashMap<Collection, BTreeMap<String, Fields>>;

#[derive(Debug, Clone)]
enum Change {
    Written(Collection),
    Failed(Collection, String),
}

/// Document store kept entirely in process memory.
#[derive(Debug, Clone)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Collections>>,
    changes: broadcast::Sender<Change>,
    reject_writes: Arc<AtomicBool>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            changes,
            reject_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent create/update/delete fail (or succeed again).
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Deliver an error to every subscriber of `collection`, as a broken
    /// change feed would.
    pub fn fail_subscriptions(&self, collection: Collection, message: &str) {
        let _ = self
            .changes
            .send(Change::Failed(collection, message.to_owned()));
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes rejected".to_owned()));
        }
        Ok(())
    }

    fn notify(&self, collection: Collection) {
        // No receivers is fine.
        let _ = self.changes.send(Change::Written(collection));
    }
}

async fn snapshot(documents: &RwLock<Collections>, collection: Collection) -> Vec<Document> {
    documents
        .read()
        .await
        .get(&collection)
        .map(|docs| {
            docs.iter()
                .map(|(id, data)| Document {
                    id: id.clone(),
                    data: data.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: Collection, fields: Fields) -> StoreResult<String> {
        self.check_writable()?;
        let id = Uuid::new_v4().to_string();
        self.documents
            .write()
            .await
            .entry(collection)
            .or_default()
            .insert(id.clone(), fields);
        self.notify(collection);
        Ok(id)
    }

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()> {
        self.check_writable()?;
        {
            let mut documents = self.documents.write().await;
            let doc = documents
                .get_mut(&collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::NotFound {
                    collection,
                    id: id.to_owned(),
                })?;
            *doc = fields;
        }
        self.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        self.check_writable()?;
        let removed = self
            .documents
            .write()
            .await
            .get_mut(&collection)
            .and_then(|docs| docs.remove(id));
        if removed.is_none() {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_owned(),
            });
        }
        self.notify(collection);
        Ok(())
    }

    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        Ok(snapshot(&self.documents, collection).await)
    }

    async fn subscribe(
        &self,
        collection: Collection,
        handler: SnapshotHandler,
    ) -> StoreResult<Subscription> {
        // Subscribe before reading so no write can slip between the two.
        let mut changes = self.changes.subscribe();
        handler(Ok(snapshot(&self.documents, collection).await));

        let documents = Arc::clone(&self.documents);
        let task = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(Change::Written(changed)) if changed == collection => {
                        handler(Ok(snapshot(&documents, collection).await));
                    }
                    Ok(Change::Failed(failed, message)) if failed == collection => {
                        handler(Err(StoreError::Subscription(message)));
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(
                            %collection,
                            skipped,
                            "Subscriber lagged, resending snapshot"
                        );
                        handler(Ok(snapshot(&documents, collection).await));
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(Subscription::new(collection, task))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
