//! Remote document store.
//!
//! Documents are schemaless JSON objects grouped in named collections. Ids
//! are assigned by the store on create. Subscribers receive the full current
//! list of a collection after every change; there are no diffs.

mod memory;
mod postgres;

use core::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::task::JoinHandle;

use crate::error::{StoreError, StoreResult};

pub use memory::InMemoryDocumentStore;
pub use postgres::{CHANGE_CHANNEL, PgDocumentStore};

/// Document fields, without the id.
pub type Fields = Map<String, Value>;

/// Named collections of the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// `pratos`: dishes.
    Dishes,
    /// `categorias`: dish categories.
    Categories,
}

impl Collection {
    pub const ALL: [Self; 2] = [Self::Dishes, Self::Categories];

    /// Name of the collection in the store.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dishes => "pratos",
            Self::Categories => "categorias",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| StoreError::Unavailable(format!("unknown collection: {s}")))
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub data: Fields,
}

impl Document {
    /// Flatten into `{ id, ...fields }` and decode as `T`.
    ///
    /// # Errors
    ///
    /// Returns the decode error if the fields do not match `T`.
    pub fn into_record<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        let mut object = self.data;
        object.insert("id".to_owned(), Value::String(self.id));
        serde_json::from_value(Value::Object(object))
    }
}

/// Encode a record as document fields.
///
/// # Errors
///
/// Returns `StoreError::Encode` if `value` does not serialize to a JSON
/// object.
pub fn to_fields<T: Serialize>(value: &T) -> StoreResult<Fields> {
    match serde_json::to_value(value) {
        Ok(Value::Object(mut fields)) => {
            fields.remove("id");
            Ok(fields)
        }
        Ok(other) => Err(StoreError::Encode(format!(
            "expected an object, got {other}"
        ))),
        Err(e) => Err(StoreError::Encode(e.to_string())),
    }
}

/// Callback receiving every snapshot of a subscribed collection.
pub type SnapshotHandler = Arc<dyn Fn(StoreResult<Vec<Document>>) + Send + Sync>;

/// A live subscription. Dropping it stops further deliveries.
#[derive(Debug)]
pub struct Subscription {
    collection: Collection,
    task: JoinHandle<()>,
}

impl Subscription {
    pub(crate) const fn new(collection: Collection, task: JoinHandle<()>) -> Self {
        Self { collection, task }
    }

    #[must_use]
    pub const fn collection(&self) -> Collection {
        self.collection
    }

    /// Stop deliveries now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        tracing::debug!(collection = %self.collection, "Unsubscribing");
        self.task.abort();
    }
}

/// Operations of the remote document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its new id.
    async fn create(&self, collection: Collection, fields: Fields) -> StoreResult<String>;

    /// Replace every field of an existing document.
    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()>;

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()>;

    /// Current documents of a collection, in store order.
    async fn list(&self, collection: Collection) -> StoreResult<Vec<Document>>;

    /// Deliver the current list to `handler` now and after every change
    /// until the returned [`Subscription`] is dropped.
    async fn subscribe(
        &self,
        collection: Collection,
        handler: SnapshotHandler,
    ) -> StoreResult<Subscription>;

    async fn health_check(&self) -> StoreResult<()>;

    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Row {
        id: String,
        nome: String,
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Dishes.name(), "pratos");
        assert_eq!(Collection::Categories.to_string(), "categorias");
        assert_eq!("pratos".parse::<Collection>().unwrap(), Collection::Dishes);
        assert!("fotos".parse::<Collection>().is_err());
    }

    #[test]
    fn test_into_record_flattens_id() {
        let Value::Object(data) = json!({ "nome": "Doces" }) else {
            unreachable!()
        };
        let doc = Document {
            id: "c1".into(),
            data,
        };
        let row: Row = doc.into_record().unwrap();
        assert_eq!(
            row,
            Row {
                id: "c1".into(),
                nome: "Doces".into()
            }
        );
    }

    #[test]
    fn test_to_fields_drops_id_and_rejects_scalars() {
        let fields = to_fields(&Row {
            id: "x".into(),
            nome: "Doces".into(),
        })
        .unwrap();
        assert_eq!(fields.get("nome"), Some(&json!("Doces")));
        assert!(!fields.contains_key("id"));

        assert!(matches!(to_fields(&5), Err(StoreError::Encode(_))));
    }
}
