//! Local key-value store.
//!
//! Small string values under fixed keys, read once at start-up and written
//! back after every change.

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::LocalStoreError;

pub use file::FileLocalStore;
pub use memory::MemoryLocalStore;

/// Key holding the serialized photo list.
pub const PHOTOS_KEY: &str = "photos";

/// Key holding the serialized photo category list.
pub const CATEGORIES_KEY: &str = "categories";

#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Value stored under `key`, `None` if never set.
    async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;

    /// Remove `key`; removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), LocalStoreError>;

    fn backend_name(&self) -> &'static str;
}

/// Reject keys that could escape a directory or collide after encoding.
pub(crate) fn validate_key(key: &str) -> Result<(), LocalStoreError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(LocalStoreError::InvalidKey(key.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key(PHOTOS_KEY).is_ok());
        assert!(validate_key("adminLogado").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a.b").is_err());
    }
}
