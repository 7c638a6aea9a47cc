//! Cart route handlers.
//!
//! The cart is stored in the session. Every response carries the whole
//! cart so the page can re-render from it.

use axum::{Json, extract::State};
use buffet_simone_core::cart::{Cart, CartLine, MenuItem};
use buffet_simone_core::types::{CartLineId, MenuItemId};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::session::{load_cart, save_cart};
use crate::routes::menu::MenuItemView;
use crate::state::AppState;

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    /// Sum of line prices, e.g. `8,30`.
    pub total: String,
    pub count: usize,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        for line in cart.unpriced_lines() {
            tracing::warn!(
                line_id = %line.id,
                price = %line.price,
                "Cart line price does not parse, counted as zero"
            );
        }
        Self {
            lines: cart.lines().to_vec(),
            total: cart.total_display(),
            count: cart.len(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

/// GET /cart
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add one line for a dish currently on the menu.
///
/// POST /cart/add
#[instrument(skip(state, session), fields(item_id = %form.item_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let item_id = MenuItemId::parse(&form.item_id)
        .map_err(|_| AppError::BadRequest("item_id is required".to_string()))?;

    let item = state
        .dishes()
        .items
        .iter()
        .map(MenuItemView::from)
        .find(|view| view.id == item_id)
        .map(|view| MenuItem {
            id: view.id,
            name: view.name,
            price: view.price,
        })
        .ok_or_else(|| AppError::NotFound(format!("menu item {item_id}")))?;

    let mut cart = load_cart(&session).await?;
    let line_id = cart.add(&item);
    save_cart(&session, &cart).await?;

    tracing::info!(%line_id, lines = cart.len(), "Added to cart");
    Ok(Json(CartView::from(&cart)))
}

/// Remove exactly one line. An unknown line id leaves the cart as is.
///
/// POST /cart/remove
#[instrument(skip(session), fields(line_id = %form.line_id))]
pub async fn remove(
    session: Session,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let line_id = CartLineId::parse(&form.line_id)
        .map_err(|_| AppError::BadRequest("line_id is required".to_string()))?;

    let mut cart = load_cart(&session).await?;
    if cart.remove(&line_id) {
        save_cart(&session, &cart).await?;
    } else {
        tracing::debug!("Cart line already gone");
    }

    Ok(Json(CartView::from(&cart)))
}
