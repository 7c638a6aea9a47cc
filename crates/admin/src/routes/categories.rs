//! Dish category maintenance. Same shape as the dish routes.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use buffet_simone_core::catalog::{Category, CategoryForm};
use buffet_simone_core::types::CategoryId;
use serde::Serialize;
use tracing::instrument;

use super::dishes::{ConfirmQuery, MutationResponse};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::services::DeleteOutcome;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<CategoryRow>,
    pub stale: bool,
}

#[derive(Debug, Serialize)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    /// Dishes currently pointing at this category.
    pub dishes: usize,
}

fn parse_category_id(raw: &str) -> Result<CategoryId> {
    CategoryId::parse(raw).map_err(|_| AppError::BadRequest("category id is required".to_string()))
}

/// GET /admin/categories
pub async fn index(_admin: RequireAdmin, State(state): State<AppState>) -> Json<CategoryList> {
    let categories = state.categories();
    let dishes = state.dishes();
    let row = |category: &Category| CategoryRow {
        id: category.id.clone(),
        name: category.name.clone(),
        description: category.description.clone(),
        dishes: dishes
            .items
            .iter()
            .filter(|dish| dish.category_id.as_ref() == Some(&category.id))
            .count(),
    };

    Json(CategoryList {
        categories: categories.items.iter().map(row).collect(),
        stale: categories.stale || dishes.stale,
    })
}

/// POST /admin/categories
#[instrument(skip(state, form))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(form): Json<CategoryForm>,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    let id = state.menu().add_category(&form).await?;
    add_breadcrumb("menu", "Category added", &[("category_id", id.as_str())]);
    Ok((
        StatusCode::ACCEPTED,
        Json(MutationResponse::created("Categoria criada com sucesso!", id.as_str())),
    ))
}

/// PUT /admin/categories/{id}
#[instrument(skip(state, form))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<CategoryForm>,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    let id = parse_category_id(&id)?;
    state.menu().edit_category(&id, &form).await?;
    add_breadcrumb("menu", "Category edited", &[("category_id", id.as_str())]);
    Ok((
        StatusCode::ACCEPTED,
        Json(MutationResponse::message("Categoria editada com sucesso!")),
    ))
}

/// DELETE /admin/categories/{id}?confirm=true
#[instrument(skip(state))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    let id = parse_category_id(&id)?;
    let outcome = state
        .menu()
        .delete_category(&id, query.confirmation())
        .await?;
    let status = match outcome {
        DeleteOutcome::Deleted => StatusCode::ACCEPTED,
        DeleteOutcome::Cancelled => StatusCode::OK,
    };
    Ok((
        status,
        Json(MutationResponse::deleted(outcome, "Categoria excluída com sucesso!")),
    ))
}
