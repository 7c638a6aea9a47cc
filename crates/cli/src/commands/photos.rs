//! Local photo store maintenance.
//!
//! `reset` is the manual way out when the store holds data the panel cannot
//! decode: loading such a store yields an empty gallery until the files are
//! overwritten.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use buffet_simone_store::{FileLocalStore, LocalStore, PhotoLibrary};

const DEFAULT_DIR: &str = "data/local";

fn store_dir(dir: Option<PathBuf>) -> PathBuf {
    dir.unwrap_or_else(|| {
        dotenvy::dotenv().ok();
        std::env::var("LOCAL_STORE_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_DIR), PathBuf::from)
    })
}

async fn open(dir: Option<PathBuf>) -> Result<PhotoLibrary, Box<dyn std::error::Error>> {
    let dir = store_dir(dir);
    info!(dir = %dir.display(), "Opening local store");
    let store: Arc<dyn LocalStore> = Arc::new(FileLocalStore::open(dir).await?);
    let library = PhotoLibrary::load(store).await?;
    if library.recovered_from_corruption() {
        warn!("Stored photo data could not be decoded; run `bs-cli photos reset` to clear it");
    }
    Ok(library)
}

/// Log every photo and photo category.
///
/// # Errors
///
/// Returns an error if the store directory cannot be opened or read.
pub async fn list(dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let library = open(dir).await?;

    let categories = library.categories().await;
    info!(count = categories.len(), "Photo categories");
    for category in &categories {
        info!(label = %category.label, icon = %category.icon_label, "  category");
    }

    let photos = library.photos().await;
    info!(count = photos.len(), "Photos");
    for photo in &photos {
        info!(
            id = %photo.id,
            name = %photo.name,
            category = %photo.category,
            bytes = photo.image.len(),
            "  photo"
        );
    }

    Ok(())
}

/// Delete every photo and photo category.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or written.
pub async fn reset(dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let library = open(dir).await?;
    let photos = library.photos().await.len();
    let categories = library.categories().await.len();

    library.reset().await?;

    info!(photos, categories, "Local photo store reset");
    Ok(())
}
