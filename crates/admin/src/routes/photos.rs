//! Gallery maintenance: photos and photo categories.
//!
//! Changes are written to the local store before the call returns, so
//! these routes answer with the updated library.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use buffet_simone_core::types::PhotoId;
use buffet_simone_store::NewPhoto;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::dishes::ConfirmQuery;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::services::{DeleteOutcome, GalleryView};
use crate::state::AppState;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DeleteOutcome>,
    #[serde(flatten)]
    pub gallery: GalleryView,
}

#[derive(Debug, Deserialize)]
pub struct PhotoCategoryForm {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub icon_label: String,
}

fn bad_multipart(e: &axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(e.to_string())
}

/// GET /admin/photos
pub async fn index(_admin: RequireAdmin, State(state): State<AppState>) -> Json<GalleryView> {
    Json(state.gallery().view().await)
}

/// Multipart fields: `name`, `description`, `category` and `file`.
///
/// POST /admin/photos
#[instrument(skip(state, multipart))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<GalleryResponse>)> {
    let mut photo = NewPhoto::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| bad_multipart(&e))? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let content_type = field.content_type().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(|e| bad_multipart(&e))?;
                if !bytes.is_empty() && !content_type.starts_with("image/") {
                    return Err(AppError::BadRequest(format!(
                        "Arquivo não é uma imagem ({content_type})."
                    )));
                }
                photo.content_type = content_type;
                photo.bytes = bytes.to_vec();
            }
            "name" => photo.name = field.text().await.map_err(|e| bad_multipart(&e))?,
            "description" => {
                photo.description = field.text().await.map_err(|e| bad_multipart(&e))?;
            }
            "category" => photo.category = field.text().await.map_err(|e| bad_multipart(&e))?,
            _ => {} // ignore unknown fields
        }
    }

    let added = state.gallery().add_photo(photo).await?;
    add_breadcrumb("gallery", "Photo added", &[("photo_id", added.id.as_str())]);

    Ok((
        StatusCode::CREATED,
        Json(GalleryResponse {
            message: Some("Foto adicionada com sucesso!"),
            outcome: None,
            gallery: state.gallery().view().await,
        }),
    ))
}

/// DELETE /admin/photos/{id}?confirm=true
#[instrument(skip(state))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<GalleryResponse>> {
    let id = PhotoId::parse(&id)
        .map_err(|_| AppError::BadRequest("photo id is required".to_string()))?;
    let outcome = state
        .gallery()
        .delete_photo(&id, query.confirmation())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("foto {id}")))?;

    Ok(Json(GalleryResponse {
        message: (outcome == DeleteOutcome::Deleted).then_some("Foto excluída com sucesso!"),
        outcome: Some(outcome),
        gallery: state.gallery().view().await,
    }))
}

/// POST /admin/photo-categories
#[instrument(skip(state))]
pub async fn create_category(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(form): Json<PhotoCategoryForm>,
) -> Result<(StatusCode, Json<GalleryResponse>)> {
    let category = state
        .gallery()
        .add_category(&form.label, &form.icon_label)
        .await?;
    add_breadcrumb("gallery", "Photo category added", &[("label", category.label.as_str())]);

    Ok((
        StatusCode::CREATED,
        Json(GalleryResponse {
            message: Some("Categoria criada com sucesso!"),
            outcome: None,
            gallery: state.gallery().view().await,
        }),
    ))
}

/// DELETE /admin/photo-categories/{label}?confirm=true
#[instrument(skip(state))]
pub async fn delete_category(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(label): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<GalleryResponse>> {
    let outcome = state
        .gallery()
        .delete_category(&label, query.confirmation())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("categoria {label}")))?;

    Ok(Json(GalleryResponse {
        message: (outcome == DeleteOutcome::Deleted).then_some("Categoria excluída com sucesso!"),
        outcome: Some(outcome),
        gallery: state.gallery().view().await,
    }))
}
