//! Photo gallery.

use axum::{
    Json,
    extract::{Query, State},
};
use buffet_simone_core::catalog::{GalleryChip, GalleryFilter, Photo, filter_photos, gallery_chips};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GalleryView {
    /// Active chip label.
    pub category: String,
    pub chips: Vec<GalleryChip>,
    pub photos: Vec<Photo>,
}

/// GET /gallery?category=
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<GalleryView>> {
    let library = state.photo_library().await?;
    let photos = library.photos().await;
    let categories = library.categories().await;

    let filter = GalleryFilter::from_label(query.category.as_deref());
    Ok(Json(GalleryView {
        category: filter.label().to_owned(),
        chips: gallery_chips(&categories, &filter),
        photos: filter_photos(&photos, &filter).into_iter().cloned().collect(),
    }))
}
