//! Session-related types.
//!
//! The cart lives in the visitor's session and nowhere else.

use buffet_simone_core::cart::Cart;
use tower_sessions::Session;

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";
}

/// Cart of this session, empty if none was stored yet.
///
/// # Errors
///
/// Returns the session error if the store cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Store the cart in this session.
///
/// # Errors
///
/// Returns the session error if the store cannot be written.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}
