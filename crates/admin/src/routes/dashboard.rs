//! Dashboard overview.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::middleware::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub dishes: usize,
    pub categories: usize,
    pub photos: usize,
    pub photo_categories: usize,
    /// Set while either menu list could not be refreshed.
    pub stale: bool,
}

/// GET /admin/dashboard
pub async fn index(_admin: RequireAdmin, State(state): State<AppState>) -> Json<DashboardView> {
    let dishes = state.dishes();
    let categories = state.categories();
    let gallery = state.gallery().view().await;

    Json(DashboardView {
        dishes: dishes.items.len(),
        categories: categories.items.len(),
        photos: gallery.photos.len(),
        photo_categories: gallery.categories.len(),
        stale: dishes.stale || categories.stale,
    })
}
