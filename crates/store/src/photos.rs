//! Gallery photos and photo categories.
//!
//! Both lists are read from the local store once, when the library is
//! loaded, and written back after every change. A write is attempted before
//! the in-memory list is touched, so a failed save leaves the library as it
//! was.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use buffet_simone_core::catalog::{IconLabel, Photo, PhotoCategory};
use buffet_simone_core::types::PhotoId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::error::PhotoLibraryError;
use crate::local::{CATEGORIES_KEY, LocalStore, PHOTOS_KEY};

/// Input of [`PhotoLibrary::add_photo`].
#[derive(Debug, Clone, Default)]
pub struct NewPhoto {
    pub name: String,
    pub description: String,
    pub category: String,
    /// MIME type of `bytes`, e.g. `image/jpeg`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct LibraryState {
    photos: Vec<Photo>,
    categories: Vec<PhotoCategory>,
    selected_category: Option<String>,
}

pub struct PhotoLibrary {
    store: Arc<dyn LocalStore>,
    state: Mutex<LibraryState>,
    recovered_from_corruption: bool,
}

impl std::fmt::Debug for PhotoLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoLibrary")
            .field("backend", &self.store.backend_name())
            .field("recovered_from_corruption", &self.recovered_from_corruption)
            .finish_non_exhaustive()
    }
}

/// Read and decode one key. Corrupt JSON yields `None` for the value and
/// `true` for the corruption flag.
async fn load_list<T: DeserializeOwned>(
    store: &dyn LocalStore,
    key: &str,
) -> Result<(Vec<T>, bool), PhotoLibraryError> {
    let Some(raw) = store.get(key).await? else {
        return Ok((Vec::new(), false));
    };
    match serde_json::from_str(&raw) {
        Ok(items) => Ok((items, false)),
        Err(e) => {
            tracing::warn!(key, error = %e, "Corrupt local data, starting empty");
            Ok((Vec::new(), true))
        }
    }
}

async fn save_list<T: Serialize>(
    store: &dyn LocalStore,
    key: &str,
    items: &[T],
) -> Result<(), PhotoLibraryError> {
    let json = serde_json::to_string(items)?;
    store.set(key, &json).await?;
    Ok(())
}

fn data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

impl PhotoLibrary {
    /// Load photos and categories from `store`.
    ///
    /// # Errors
    ///
    /// Returns `PhotoLibraryError::Store` if the store cannot be read.
    /// Undecodable data is not an error; see [`Self::recovered_from_corruption`].
    pub async fn load(store: Arc<dyn LocalStore>) -> Result<Self, PhotoLibraryError> {
        let (photos, photos_corrupt) = load_list::<Photo>(store.as_ref(), PHOTOS_KEY).await?;
        let (categories, categories_corrupt) =
            load_list::<PhotoCategory>(store.as_ref(), CATEGORIES_KEY).await?;

        tracing::info!(
            backend = store.backend_name(),
            photos = photos.len(),
            categories = categories.len(),
            "Photo library loaded"
        );

        Ok(Self {
            store,
            state: Mutex::new(LibraryState {
                photos,
                categories,
                selected_category: None,
            }),
            recovered_from_corruption: photos_corrupt || categories_corrupt,
        })
    }

    /// Whether stored data had to be discarded at load time.
    #[must_use]
    pub const fn recovered_from_corruption(&self) -> bool {
        self.recovered_from_corruption
    }

    pub async fn photos(&self) -> Vec<Photo> {
        self.state.lock().await.photos.clone()
    }

    pub async fn categories(&self) -> Vec<PhotoCategory> {
        self.state.lock().await.categories.clone()
    }

    /// Category preselected for the next photo upload.
    pub async fn selected_category(&self) -> Option<String> {
        self.state.lock().await.selected_category.clone()
    }

    pub async fn select_category(&self, label: Option<String>) {
        self.state.lock().await.selected_category = label.filter(|l| !l.trim().is_empty());
    }

    /// Encode the image, append the photo and save.
    ///
    /// # Errors
    ///
    /// `MissingFields` if name, category or image is missing; store and
    /// serialization errors otherwise.
    pub async fn add_photo(&self, new: NewPhoto) -> Result<Photo, PhotoLibraryError> {
        let name = new.name.trim();
        let category = new.category.trim();
        if name.is_empty() || category.is_empty() || new.bytes.is_empty() {
            return Err(PhotoLibraryError::MissingFields);
        }

        let content_type = if new.content_type.trim().is_empty() {
            "application/octet-stream"
        } else {
            new.content_type.trim()
        };
        let photo = Photo {
            id: PhotoId::generate(),
            name: name.to_owned(),
            description: new.description.trim().to_owned(),
            category: category.to_owned(),
            image: data_url(content_type, &new.bytes),
        };

        let mut state = self.state.lock().await;
        let mut photos = state.photos.clone();
        photos.push(photo.clone());
        save_list(self.store.as_ref(), PHOTOS_KEY, &photos).await?;
        state.photos = photos;

        tracing::info!(id = %photo.id, category = %photo.category, "Photo added");
        Ok(photo)
    }

    /// Remove the photo with `id`. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Store and serialization errors.
    pub async fn delete_photo(&self, id: &PhotoId) -> Result<bool, PhotoLibraryError> {
        let mut state = self.state.lock().await;
        let photos: Vec<Photo> = state
            .photos
            .iter()
            .filter(|photo| &photo.id != id)
            .cloned()
            .collect();
        if photos.len() == state.photos.len() {
            return Ok(false);
        }

        save_list(self.store.as_ref(), PHOTOS_KEY, &photos).await?;
        state.photos = photos;
        tracing::info!(%id, "Photo deleted");
        Ok(true)
    }

    /// Append a photo category and make it the selected one.
    ///
    /// # Errors
    ///
    /// `LabelRequired` for a blank label, `DuplicateCategory` if the label
    /// already exists ignoring case, `IconRequired` for a blank icon.
    pub async fn add_category(
        &self,
        label: &str,
        icon: &str,
    ) -> Result<PhotoCategory, PhotoLibraryError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(PhotoLibraryError::LabelRequired);
        }

        let mut state = self.state.lock().await;
        if state
            .categories
            .iter()
            .any(|c| c.label.to_lowercase() == label.to_lowercase())
        {
            return Err(PhotoLibraryError::DuplicateCategory(label.to_owned()));
        }
        if icon.trim().is_empty() {
            return Err(PhotoLibraryError::IconRequired);
        }

        let category = PhotoCategory {
            label: label.to_owned(),
            icon_label: IconLabel::from_label(icon.trim()),
        };
        let mut categories = state.categories.clone();
        categories.push(category.clone());
        save_list(self.store.as_ref(), CATEGORIES_KEY, &categories).await?;
        state.categories = categories;
        state.selected_category = Some(category.label.clone());

        tracing::info!(
            label = %category.label,
            icon = %category.icon_label,
            "Photo category added"
        );
        Ok(category)
    }

    /// Remove a category by label, ignoring case. Photos keep their label.
    ///
    /// # Errors
    ///
    /// Store and serialization errors.
    pub async fn delete_category(&self, label: &str) -> Result<bool, PhotoLibraryError> {
        let wanted = label.trim().to_lowercase();
        let mut state = self.state.lock().await;
        let categories: Vec<PhotoCategory> = state
            .categories
            .iter()
            .filter(|c| c.label.to_lowercase() != wanted)
            .cloned()
            .collect();
        if categories.len() == state.categories.len() {
            return Ok(false);
        }

        save_list(self.store.as_ref(), CATEGORIES_KEY, &categories).await?;
        state.categories = categories;
        if state
            .selected_category
            .as_ref()
            .is_some_and(|selected| selected.to_lowercase() == wanted)
        {
            state.selected_category = None;
        }
        tracing::info!(label, "Photo category deleted");
        Ok(true)
    }

    /// Drop every photo and category, in memory and in the store.
    ///
    /// # Errors
    ///
    /// Store errors.
    pub async fn reset(&self) -> Result<(), PhotoLibraryError> {
        let mut state = self.state.lock().await;
        self.store.remove(PHOTOS_KEY).await?;
        self.store.remove(CATEGORIES_KEY).await?;
        *state = LibraryState::default();
        tracing::warn!("Photo library reset");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::local::MemoryLocalStore;

    fn jpeg(name: &str, category: &str) -> NewPhoto {
        NewPhoto {
            name: name.into(),
            description: "Mesa posta".into(),
            category: category.into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    async fn library() -> (Arc<MemoryLocalStore>, PhotoLibrary) {
        let store = Arc::new(MemoryLocalStore::new());
        let library = PhotoLibrary::load(store.clone()).await.unwrap();
        (store, library)
    }

    #[tokio::test]
    async fn test_empty_store_loads_empty() {
        let (_, library) = library().await;
        assert!(library.photos().await.is_empty());
        assert!(library.categories().await.is_empty());
        assert!(!library.recovered_from_corruption());
    }

    #[tokio::test]
    async fn test_add_photo_encodes_and_persists() {
        let (store, library) = library().await;
        let photo = library.add_photo(jpeg("Casamento", "Festas")).await.unwrap();
        assert_eq!(photo.image, "data:image/jpeg;base64,/9j/");

        let saved = store.get(PHOTOS_KEY).await.unwrap().unwrap();
        let reloaded: Vec<Photo> = serde_json::from_str(&saved).unwrap();
        assert_eq!(reloaded, vec![photo]);
    }

    #[tokio::test]
    async fn test_add_photo_requires_fields() {
        let (_, library) = library().await;
        for photo in [
            jpeg(" ", "Festas"),
            jpeg("Casamento", ""),
            NewPhoto {
                bytes: Vec::new(),
                ..jpeg("Casamento", "Festas")
            },
        ] {
            assert!(matches!(
                library.add_photo(photo).await,
                Err(PhotoLibraryError::MissingFields)
            ));
        }
        assert!(library.photos().await.is_empty());
    }

    #[tokio::test]
    async fn test_photo_ids_are_distinct() {
        let (_, library) = library().await;
        let a = library.add_photo(jpeg("A", "Festas")).await.unwrap();
        let b = library.add_photo(jpeg("B", "Festas")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_delete_photo() {
        let (_, library) = library().await;
        let photo = library.add_photo(jpeg("A", "Festas")).await.unwrap();
        assert!(library.delete_photo(&photo.id).await.unwrap());
        assert!(!library.delete_photo(&photo.id).await.unwrap());
        assert!(library.photos().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_category_rules() {
        let (_, library) = library().await;
        let created = library.add_category(" Doces ", "Cookie").await.unwrap();
        assert_eq!(created.label, "Doces");
        assert_eq!(created.icon_label, IconLabel::Cookie);
        assert_eq!(library.selected_category().await.as_deref(), Some("Doces"));

        assert!(matches!(
            library.add_category("doces", "Cake").await,
            Err(PhotoLibraryError::DuplicateCategory(_))
        ));
        assert!(matches!(
            library.add_category("", "Cake").await,
            Err(PhotoLibraryError::LabelRequired)
        ));
        assert!(matches!(
            library.add_category("Bolos", "  ").await,
            Err(PhotoLibraryError::IconRequired)
        ));

        let fallback = library.add_category("Bolos", "Rocket").await.unwrap();
        assert_eq!(fallback.icon_label, IconLabel::Cake);
        assert_eq!(library.categories().await.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_category_keeps_photos() {
        let (_, library) = library().await;
        library.add_category("Festas", "PartyPopper").await.unwrap();
        library.add_photo(jpeg("A", "Festas")).await.unwrap();

        assert!(library.delete_category("FESTAS").await.unwrap());
        assert!(!library.delete_category("Festas").await.unwrap());
        assert!(library.categories().await.is_empty());
        assert_eq!(library.selected_category().await, None);
        assert_eq!(library.photos().await[0].category, "Festas");
    }

    #[tokio::test]
    async fn test_reload_sees_saved_state() {
        let (store, library) = library().await;
        library.add_category("Festas", "PartyPopper").await.unwrap();
        library.add_photo(jpeg("A", "Festas")).await.unwrap();

        let reloaded = PhotoLibrary::load(store).await.unwrap();
        assert_eq!(reloaded.photos().await.len(), 1);
        assert_eq!(reloaded.categories().await.len(), 1);
        assert_eq!(reloaded.selected_category().await, None);
    }

    #[tokio::test]
    async fn test_corrupt_data_recovers_empty() {
        let store = Arc::new(MemoryLocalStore::new());
        store.set(PHOTOS_KEY, "{not json").await.unwrap();
        store
            .set(CATEGORIES_KEY, r#"[{"label":"Festas","iconLabel":"Cake"}]"#)
            .await
            .unwrap();

        let library = PhotoLibrary::load(store.clone()).await.unwrap();
        assert!(library.recovered_from_corruption());
        assert!(library.photos().await.is_empty());
        assert_eq!(library.categories().await.len(), 1);
        // The corrupt blob stays until the next save.
        assert_eq!(store.get(PHOTOS_KEY).await.unwrap().as_deref(), Some("{not json"));
    }

    #[tokio::test]
    async fn test_reset_clears_store() {
        let (store, library) = library().await;
        library.add_category("Festas", "Cake").await.unwrap();
        library.reset().await.unwrap();
        assert!(library.categories().await.is_empty());
        assert_eq!(store.get(CATEGORIES_KEY).await.unwrap(), None);
    }
}
