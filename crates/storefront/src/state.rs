//! Application state shared across handlers.

use std::sync::Arc;

use buffet_simone_core::catalog::{Category, Dish};
use buffet_simone_store::{
    Collection, CollectionSync, DocumentStore, LocalStore, PhotoLibrary, PhotoLibraryError,
    StoreResult, SyncedList,
};

use crate::config::StorefrontConfig;
use crate::content::FaqStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The dish and category lists
/// are kept current by their own subscriptions for as long as the state
/// lives.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    documents: Arc<dyn DocumentStore>,
    dishes: CollectionSync<Dish>,
    categories: CollectionSync<Category>,
    local: Arc<dyn LocalStore>,
    faq: FaqStore,
}

impl AppState {
    /// Create the state and start mirroring the menu collections.
    ///
    /// # Errors
    ///
    /// Returns the store error if a subscription cannot be opened.
    pub async fn new(
        config: StorefrontConfig,
        documents: Arc<dyn DocumentStore>,
        local: Arc<dyn LocalStore>,
        faq: FaqStore,
    ) -> StoreResult<Self> {
        let dishes = CollectionSync::start(documents.as_ref(), Collection::Dishes).await?;
        let categories = CollectionSync::start(documents.as_ref(), Collection::Categories).await?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                documents,
                dishes,
                categories,
                local,
                faq,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn documents(&self) -> &dyn DocumentStore {
        self.inner.documents.as_ref()
    }

    /// Current dish list.
    #[must_use]
    pub fn dishes(&self) -> SyncedList<Dish> {
        self.inner.dishes.snapshot()
    }

    /// Current category list.
    #[must_use]
    pub fn categories(&self) -> SyncedList<Category> {
        self.inner.categories.snapshot()
    }

    #[must_use]
    pub fn dish_sync(&self) -> &CollectionSync<Dish> {
        &self.inner.dishes
    }

    #[must_use]
    pub fn category_sync(&self) -> &CollectionSync<Category> {
        &self.inner.categories
    }

    #[must_use]
    pub fn faq(&self) -> &FaqStore {
        &self.inner.faq
    }

    /// Read the photo library afresh. The admin panel writes it from another
    /// process, so it is never cached here.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store cannot be read.
    pub async fn photo_library(&self) -> Result<PhotoLibrary, PhotoLibraryError> {
        PhotoLibrary::load(Arc::clone(&self.inner.local)).await
    }
}
