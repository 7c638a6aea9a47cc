//! Error types for the store adapters.

use thiserror::Error;

use crate::document::Collection;

/// Errors from the remote document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with this id in the collection.
    #[error("{collection} document not found: {id}")]
    NotFound { collection: Collection, id: String },

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A record could not be turned into document fields.
    #[error("encoding error: {0}")]
    Encode(String),

    /// The change feed failed; the last delivered list may be stale.
    #[error("subscription error: {0}")]
    Subscription(String),

    /// The backend refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from a local key-value store.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    /// Keys are restricted to ASCII letters, digits, `-` and `_`.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    #[error("i/o error on key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the photo library.
#[derive(Debug, Error)]
pub enum PhotoLibraryError {
    #[error("Preencha todos os campos e escolha uma imagem!")]
    MissingFields,

    #[error("Informe o nome da categoria.")]
    LabelRequired,

    #[error("Selecione um ícone.")]
    IconRequired,

    #[error("A categoria \"{0}\" já existe!")]
    DuplicateCategory(String),

    #[error("local store error: {0}")]
    Store(#[from] LocalStoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PhotoLibraryError {
    /// Whether the error comes from user input rather than the store.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFields
                | Self::LabelRequired
                | Self::IconRequired
                | Self::DuplicateCategory(_)
        )
    }
}
