//! Public menu.
//!
//! Built from the live dish and category lists on every request. The two
//! lists update independently, so a dish may briefly point at a category
//! that is already gone; such dishes are listed as uncategorized.

use axum::{Json, extract::State};
use buffet_simone_core::catalog::{Category, Dish};
use buffet_simone_core::types::{CategoryId, MenuItemId};
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

/// A dish as shown on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItemView {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    /// e.g. `R$ 4,50`
    pub price: String,
    /// Carries the "Popular" badge.
    pub popular: bool,
}

impl From<&Dish> for MenuItemView {
    fn from(dish: &Dish) -> Self {
        Self {
            id: MenuItemId::from(dish.id.clone()),
            name: dish.name.clone(),
            description: dish.description.clone(),
            price: dish.price.display(),
            popular: dish.popular,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSectionView {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub items: Vec<MenuItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuView {
    pub sections: Vec<MenuSectionView>,
    /// Dishes without a known category.
    pub uncategorized: Vec<MenuItemView>,
    /// Set while either list could not be refreshed.
    pub stale: bool,
}

/// Group dishes under their categories, in store order.
#[must_use]
pub fn build_menu(dishes: &[Dish], categories: &[Category]) -> Vec<MenuSectionView> {
    categories
        .iter()
        .map(|category| MenuSectionView {
            id: category.id.clone(),
            name: category.name.clone(),
            description: category.description.clone(),
            items: dishes
                .iter()
                .filter(|dish| dish.category_id.as_ref() == Some(&category.id))
                .map(MenuItemView::from)
                .collect(),
        })
        .collect()
}

/// Dishes whose category is absent or unknown.
#[must_use]
pub fn uncategorized(dishes: &[Dish], categories: &[Category]) -> Vec<MenuItemView> {
    dishes
        .iter()
        .filter(|dish| {
            dish.category_id
                .as_ref()
                .is_none_or(|id| !categories.iter().any(|c| &c.id == id))
        })
        .map(MenuItemView::from)
        .collect()
}

/// Show the menu.
///
/// GET /menu
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<MenuView> {
    let dishes = state.dishes();
    let categories = state.categories();

    Json(MenuView {
        sections: build_menu(&dishes.items, &categories.items),
        uncategorized: uncategorized(&dishes.items, &categories.items),
        stale: dishes.stale || categories.stale,
    })
}
