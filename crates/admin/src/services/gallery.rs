//! Gallery maintenance on top of the local photo library.

use std::sync::Arc;

use buffet_simone_core::catalog::{Photo, PhotoCategory};
use buffet_simone_core::types::PhotoId;
use buffet_simone_store::{NewPhoto, PhotoLibrary, PhotoLibraryError};
use serde::Serialize;

use super::menu::{Confirmation, DeleteOutcome};

/// Everything the gallery screen shows.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryView {
    pub photos: Vec<Photo>,
    pub categories: Vec<PhotoCategory>,
    pub selected_category: Option<String>,
}

/// Confirmation-gated wrapper over [`PhotoLibrary`].
#[derive(Debug, Clone)]
pub struct GalleryController {
    library: Arc<PhotoLibrary>,
}

impl GalleryController {
    #[must_use]
    pub const fn new(library: Arc<PhotoLibrary>) -> Self {
        Self { library }
    }

    #[must_use]
    pub fn library(&self) -> &PhotoLibrary {
        &self.library
    }

    pub async fn view(&self) -> GalleryView {
        GalleryView {
            photos: self.library.photos().await,
            categories: self.library.categories().await,
            selected_category: self.library.selected_category().await,
        }
    }

    /// # Errors
    ///
    /// `MissingFields` without a name, category or image; store errors.
    pub async fn add_photo(&self, photo: NewPhoto) -> Result<Photo, PhotoLibraryError> {
        self.library.add_photo(photo).await
    }

    /// Delete a photo once confirmed. `Ok(None)` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Store errors.
    pub async fn delete_photo(
        &self,
        id: &PhotoId,
        confirmation: Confirmation,
    ) -> Result<Option<DeleteOutcome>, PhotoLibraryError> {
        if confirmation == Confirmation::Declined {
            return Ok(Some(DeleteOutcome::Cancelled));
        }
        let deleted = self.library.delete_photo(id).await?;
        Ok(deleted.then_some(DeleteOutcome::Deleted))
    }

    /// # Errors
    ///
    /// `LabelRequired`, `IconRequired`, `DuplicateCategory`; store errors.
    pub async fn add_category(
        &self,
        label: &str,
        icon_label: &str,
    ) -> Result<PhotoCategory, PhotoLibraryError> {
        self.library.add_category(label, icon_label).await
    }

    /// Delete a photo category once confirmed. `Ok(None)` if no category has
    /// that label.
    ///
    /// # Errors
    ///
    /// Store errors.
    pub async fn delete_category(
        &self,
        label: &str,
        confirmation: Confirmation,
    ) -> Result<Option<DeleteOutcome>, PhotoLibraryError> {
        if confirmation == Confirmation::Declined {
            return Ok(Some(DeleteOutcome::Cancelled));
        }
        let deleted = self.library.delete_category(label).await?;
        Ok(deleted.then_some(DeleteOutcome::Deleted))
    }
}
