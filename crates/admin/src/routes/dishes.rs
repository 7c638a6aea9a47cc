//! Dish maintenance.
//!
//! Writes answer `202 Accepted`: the list returned by `GET` changes only
//! once the store pushes the next snapshot.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use buffet_simone_core::catalog::{Category, Dish, DishForm, category_name_for};
use buffet_simone_core::types::{CategoryId, DishId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::services::{Confirmation, DeleteOutcome};
use crate::state::AppState;

/// Query of every delete route.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmQuery {
    pub confirm: Option<bool>,
}

impl ConfirmQuery {
    #[must_use]
    pub const fn confirmation(&self) -> Confirmation {
        Confirmation::from_flag(self.confirm)
    }
}

/// Body of a `202` or delete answer.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DeleteOutcome>,
}

impl MutationResponse {
    pub(crate) const fn message(message: &'static str) -> Self {
        Self {
            message,
            id: None,
            outcome: None,
        }
    }

    pub(crate) fn created(message: &'static str, id: &str) -> Self {
        Self {
            id: Some(id.to_owned()),
            ..Self::message(message)
        }
    }

    pub(crate) const fn deleted(outcome: DeleteOutcome, message: &'static str) -> Self {
        Self {
            message: match outcome {
                DeleteOutcome::Deleted => message,
                DeleteOutcome::Cancelled => "Exclusão cancelada.",
            },
            id: None,
            outcome: Some(outcome),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DishRow {
    pub id: DishId,
    pub name: String,
    pub description: String,
    /// e.g. `R$ 4,50`
    pub price: String,
    pub popular: bool,
    pub category_id: Option<CategoryId>,
    /// `None` when the category is unknown.
    pub category_name: Option<String>,
}

impl DishRow {
    #[must_use]
    pub fn new(dish: &Dish, categories: &[Category]) -> Self {
        Self {
            id: dish.id.clone(),
            name: dish.name.clone(),
            description: dish.description.clone(),
            price: dish.price.display(),
            popular: dish.popular,
            category_id: dish.category_id.clone(),
            category_name: category_name_for(dish, categories).map(str::to_owned),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DishList {
    pub dishes: Vec<DishRow>,
    pub stale: bool,
}

pub(crate) fn parse_dish_id(raw: &str) -> Result<DishId> {
    DishId::parse(raw).map_err(|_| AppError::BadRequest("dish id is required".to_string()))
}

/// GET /admin/dishes
pub async fn index(_admin: RequireAdmin, State(state): State<AppState>) -> Json<DishList> {
    let dishes = state.dishes();
    let categories = state.categories();
    Json(DishList {
        dishes: dishes
            .items
            .iter()
            .map(|dish| DishRow::new(dish, &categories.items))
            .collect(),
        stale: dishes.stale || categories.stale,
    })
}

/// POST /admin/dishes
#[instrument(skip(state, form))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(form): Json<DishForm>,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    let id = state.menu().add_dish(&form).await?;
    add_breadcrumb("menu", "Dish added", &[("dish_id", id.as_str())]);
    Ok((
        StatusCode::ACCEPTED,
        Json(MutationResponse::created("Prato adicionado com sucesso!", id.as_str())),
    ))
}

/// PUT /admin/dishes/{id}
#[instrument(skip(state, form))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<DishForm>,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    let id = parse_dish_id(&id)?;
    state.menu().edit_dish(&id, &form).await?;
    add_breadcrumb("menu", "Dish edited", &[("dish_id", id.as_str())]);
    Ok((
        StatusCode::ACCEPTED,
        Json(MutationResponse::message("Prato editado com sucesso!")),
    ))
}

/// DELETE /admin/dishes/{id}?confirm=true
#[instrument(skip(state))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConfirmQuery>,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    let id = parse_dish_id(&id)?;
    let outcome = state.menu().delete_dish(&id, query.confirmation()).await?;
    let status = match outcome {
        DeleteOutcome::Deleted => StatusCode::ACCEPTED,
        DeleteOutcome::Cancelled => StatusCode::OK,
    };
    Ok((
        status,
        Json(MutationResponse::deleted(outcome, "Prato excluído com sucesso!")),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use buffet_simone_core::types::Price;

    use super::*;

    fn dish(category: Option<&str>) -> Dish {
        Dish {
            id: DishId::parse("d1").unwrap(),
            name: "Coxinha".into(),
            description: String::new(),
            price: Price::from_cents(450),
            popular: false,
            category_id: category.map(|id| CategoryId::parse(id).unwrap()),
        }
    }

    #[test]
    fn test_row_resolves_category_name() {
        let categories = vec![Category {
            id: CategoryId::parse("c1").unwrap(),
            name: "Salgados".into(),
            description: String::new(),
        }];

        let row = DishRow::new(&dish(Some("c1")), &categories);
        assert_eq!(row.price, "R$ 4,50");
        assert_eq!(row.category_name.as_deref(), Some("Salgados"));

        let dangling = DishRow::new(&dish(Some("gone")), &categories);
        assert_eq!(dangling.category_name, None);
        assert_eq!(DishRow::new(&dish(None), &categories).category_name, None);
    }

    #[test]
    fn test_cancelled_delete_message() {
        let response =
            MutationResponse::deleted(DeleteOutcome::Cancelled, "Prato excluído com sucesso!");
        assert_eq!(response.message, "Exclusão cancelada.");
        let response =
            MutationResponse::deleted(DeleteOutcome::Deleted, "Prato excluído com sucesso!");
        assert_eq!(response.message, "Prato excluído com sucesso!");
    }
}
