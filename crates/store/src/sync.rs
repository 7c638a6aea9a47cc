//! Live mirror of a remote collection.
//!
//! [`CollectionSync`] subscribes to one collection and keeps the decoded
//! records in a `watch` channel. Every delivered snapshot replaces the list
//! wholesale. When the feed reports an error the last good list is kept and
//! flagged as stale until the next successful delivery.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::document::{Collection, Document, DocumentStore, SnapshotHandler, Subscription};
use crate::error::{StoreError, StoreResult};

/// The mirrored list and its freshness.
#[derive(Debug, Clone)]
pub struct SyncedList<T> {
    pub items: Vec<T>,
    /// Set when the latest delivery was an error; `items` is the last good list.
    pub stale: bool,
    pub last_error: Option<String>,
    /// Number of deliveries applied so far.
    pub version: u64,
}

impl<T> Default for SyncedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            stale: false,
            last_error: None,
            version: 0,
        }
    }
}

/// Subscription-backed mirror of one collection.
///
/// Dropping it ends the subscription.
#[derive(Debug)]
pub struct CollectionSync<T> {
    collection: Collection,
    rx: watch::Receiver<SyncedList<T>>,
    _subscription: Subscription,
}

impl<T> CollectionSync<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Subscribe to `collection` on `store`.
    ///
    /// # Errors
    ///
    /// Returns the store error if the subscription cannot be opened.
    pub async fn start(store: &dyn DocumentStore, collection: Collection) -> StoreResult<Self> {
        let (tx, rx) = watch::channel(SyncedList::default());
        let handler: SnapshotHandler =
            Arc::new(move |delivery: StoreResult<Vec<Document>>| {
                apply(&tx, collection, delivery);
            });
        let subscription = store.subscribe(collection, handler).await?;

        tracing::info!(%collection, backend = store.backend_name(), "Collection sync started");
        Ok(Self {
            collection,
            rx,
            _subscription: subscription,
        })
    }

    #[must_use]
    pub const fn collection(&self) -> Collection {
        self.collection
    }

    /// Clone of the current list.
    #[must_use]
    pub fn snapshot(&self) -> SyncedList<T> {
        self.rx.borrow().clone()
    }

    /// Receiver notified on every delivery.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<SyncedList<T>> {
        self.rx.clone()
    }

    /// Wait until at least `version` deliveries have been applied.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Subscription` if the feed has shut down.
    pub async fn wait_for_version(&self, version: u64) -> StoreResult<SyncedList<T>> {
        let mut rx = self.rx.clone();
        let list = rx
            .wait_for(|list| list.version >= version)
            .await
            .map_err(|_| StoreError::Subscription(format!("{} feed closed", self.collection)))?;
        Ok(list.clone())
    }
}

fn apply<T: DeserializeOwned>(
    tx: &watch::Sender<SyncedList<T>>,
    collection: Collection,
    delivery: StoreResult<Vec<Document>>,
) {
    tx.send_modify(|list| {
        match delivery {
            Ok(documents) => {
                list.items = documents
                    .into_iter()
                    .filter_map(|doc| {
                        let id = doc.id.clone();
                        doc.into_record()
                            .map_err(|e| {
                                tracing::warn!(
                                    %collection,
                                    %id,
                                    error = %e,
                                    "Skipping undecodable document"
                                );
                            })
                            .ok()
                    })
                    .collect();
                list.stale = false;
                list.last_error = None;
            }
            Err(e) => {
                tracing::warn!(
                    %collection,
                    error = %e,
                    "Collection sync failed, keeping last list"
                );
                list.stale = true;
                list.last_error = Some(e.to_string());
            }
        }
        list.version += 1;
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use buffet_simone_core::catalog::{Category, Dish, NewCategory};
    use buffet_simone_core::types::Price;
    use serde_json::json;

    use super::*;
    use crate::document::{InMemoryDocumentStore, to_fields};

    async fn add_category(store: &InMemoryDocumentStore, name: &str) -> String {
        let body = NewCategory {
            name: name.into(),
            description: "desc".into(),
        };
        store
            .create(Collection::Categories, to_fields(&body).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initial_snapshot_and_replacement() {
        let store = InMemoryDocumentStore::new();
        add_category(&store, "Doces").await;

        let sync: CollectionSync<Category> =
            CollectionSync::start(&store, Collection::Categories).await.unwrap();
        let first = sync.wait_for_version(1).await.unwrap();
        assert_eq!(first.items.len(), 1);
        assert!(!first.stale);

        let id = add_category(&store, "Salgados").await;
        let second = sync.wait_for_version(2).await.unwrap();
        let mut names: Vec<_> = second.items.iter().map(|c| c.name.clone()).collect();
        names.sort();
        assert_eq!(names, ["Doces", "Salgados"]);

        store.delete(Collection::Categories, &id).await.unwrap();
        let third = sync.wait_for_version(3).await.unwrap();
        assert_eq!(third.items.len(), 1);
    }

    #[tokio::test]
    async fn test_error_keeps_last_list_and_marks_stale() {
        let store = InMemoryDocumentStore::new();
        add_category(&store, "Doces").await;
        let sync: CollectionSync<Category> =
            CollectionSync::start(&store, Collection::Categories).await.unwrap();
        sync.wait_for_version(1).await.unwrap();

        store.fail_subscriptions(Collection::Categories, "connection reset");
        let stale = sync.wait_for_version(2).await.unwrap();
        assert!(stale.stale);
        assert_eq!(stale.items.len(), 1);
        assert!(stale.last_error.unwrap().contains("connection reset"));

        add_category(&store, "Bebidas").await;
        let fresh = sync.wait_for_version(3).await.unwrap();
        assert!(!fresh.stale);
        assert!(fresh.last_error.is_none());
        assert_eq!(fresh.items.len(), 2);
    }

    #[tokio::test]
    async fn test_undecodable_documents_are_skipped() {
        let store = InMemoryDocumentStore::new();
        let dish = json!({ "nome": "Coxinha", "preco": 4.5, "categoriaId": "c1" });
        let broken = json!({ "nome": "Sem preço" });
        for body in [dish, broken] {
            store
                .create(Collection::Dishes, to_fields(&body).unwrap())
                .await
                .unwrap();
        }

        let sync: CollectionSync<Dish> =
            CollectionSync::start(&store, Collection::Dishes).await.unwrap();
        let list = sync.wait_for_version(1).await.unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].price, Price::from_cents(450));
    }
}
