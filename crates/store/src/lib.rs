//! Buffet Simone Store - Persistence adapters.
//!
//! # Remote data
//!
//! Dishes and dish categories live in a document store shared by the public
//! site and the admin panel. [`document::DocumentStore`] is the seam: the
//! PostgreSQL backend is used in production, the in-memory backend in tests.
//! [`sync::CollectionSync`] mirrors one collection into memory and keeps it
//! current from pushed snapshots.
//!
//! # Local data
//!
//! Gallery photos and photo categories are kept in a small key-value store
//! ([`local::LocalStore`]) through [`photos::PhotoLibrary`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod document;
pub mod error;
pub mod local;
pub mod photos;
pub mod pool;
pub mod sync;

pub use document::{
    Collection, Document, DocumentStore, InMemoryDocumentStore, PgDocumentStore, SnapshotHandler,
    Subscription,
};
pub use error::{LocalStoreError, PhotoLibraryError, StoreError, StoreResult};
pub use local::{FileLocalStore, LocalStore, MemoryLocalStore};
pub use photos::{NewPhoto, PhotoLibrary};
pub use pool::{MIGRATOR, create_pool};
pub use sync::{CollectionSync, SyncedList};
