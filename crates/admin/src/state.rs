//! Application state shared across handlers.

use std::sync::Arc;

use buffet_simone_core::auth::AdminCredentials;
use buffet_simone_core::catalog::{Category, Dish};
use buffet_simone_store::{
    Collection, CollectionSync, DocumentStore, PhotoLibrary, StoreResult, SyncedList,
};

use crate::config::AdminConfig;
use crate::services::{CodeIssuer, GalleryController, MenuController};

/// Application state shared across all handlers.
///
/// Cheap to clone. The dish and category mirrors stay subscribed for as long
/// as any clone is alive.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    documents: Arc<dyn DocumentStore>,
    dishes: CollectionSync<Dish>,
    categories: CollectionSync<Category>,
    menu: MenuController,
    gallery: GalleryController,
    codes: CodeIssuer,
}

impl AppState {
    /// Create the state and start mirroring the menu collections.
    ///
    /// # Errors
    ///
    /// Returns the store error if a subscription cannot be opened.
    pub async fn new(
        config: AdminConfig,
        documents: Arc<dyn DocumentStore>,
        photos: Arc<PhotoLibrary>,
    ) -> StoreResult<Self> {
        let dishes = CollectionSync::start(documents.as_ref(), Collection::Dishes).await?;
        let categories = CollectionSync::start(documents.as_ref(), Collection::Categories).await?;
        let menu = MenuController::new(Arc::clone(&documents));
        let codes = CodeIssuer::new(config.recovery_code.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                documents,
                dishes,
                categories,
                menu,
                gallery: GalleryController::new(photos),
                codes,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn credentials(&self) -> &AdminCredentials {
        &self.inner.config.credentials
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
    pub fn menu(&self) -> &MenuController {
        &self.inner.menu
    }

    #[must_use]
    pub fn gallery(&self) -> &GalleryController {
        &self.inner.gallery
    }

    #[must_use]
    pub fn codes(&self) -> &CodeIssuer {
        &self.inner.codes
    }
}
