//! Bundled site content.
//!
//! The FAQ lives in `content/faq.yaml` and is loaded once at startup.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// FAQ shipped with the binary, used when no content directory is given.
const BUNDLED_FAQ: &str = include_str!("../content/faq.yaml");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// One question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    fn matches(&self, needle: &str) -> bool {
        self.question.to_lowercase().contains(needle) || self.answer.to_lowercase().contains(needle)
    }
}

/// The FAQ entries in file order.
#[derive(Debug, Clone)]
pub struct FaqStore {
    entries: Arc<Vec<FaqEntry>>,
}

impl FaqStore {
    /// Load `faq.yaml` from `content_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let path = content_dir.join("faq.yaml");
        let raw = std::fs::read_to_string(&path)?;
        let store = Self::from_yaml(&raw)?;
        tracing::info!(path = %path.display(), entries = store.entries.len(), "Loaded FAQ");
        Ok(store)
    }

    /// Parse FAQ entries from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a list of entries.
    pub fn from_yaml(raw: &str) -> Result<Self, ContentError> {
        let entries: Vec<FaqEntry> = serde_yaml::from_str(raw)?;
        Ok(Self {
            entries: Arc::new(entries),
        })
    }

    /// The FAQ compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file is malformed.
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_yaml(BUNDLED_FAQ)
    }

    #[must_use]
    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    /// Entries whose question or answer contains `query`, ignoring case.
    /// A blank query returns every entry.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&FaqEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries
            .iter()
            .filter(|entry| entry.matches(&needle))
            .collect()
    }
}
