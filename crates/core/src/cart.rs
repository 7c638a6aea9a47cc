//! Session cart.
//!
//! A cart is an ordered list of lines, one per "add" action. Adding the same
//! menu item twice yields two lines with distinct ids, so removing one line
//! never touches the other. Prices are kept exactly as displayed on the menu
//! and parsed only when totalling.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::price::format_brl;
use crate::types::{CartLineId, MenuItemId, Price};

/// A menu entry as offered on the public site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    /// Locale-formatted display price, e.g. `R$ 4,50`.
    pub price: String,
}

/// One added item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub item_id: MenuItemId,
    pub name: String,
    pub price: String,
}

impl CartLine {
    /// Parsed line price, `None` when the stored text is not a price.
    #[must_use]
    pub fn parsed_price(&self) -> Option<Price> {
        Price::parse(&self.price).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Append a line for `item` and return its fresh id.
    pub fn add(&mut self, item: &MenuItem) -> CartLineId {
        let id = CartLineId::generate();
        self.lines.push(CartLine {
            id: id.clone(),
            item_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price.clone(),
        });
        id
    }

    /// Remove exactly the line with `id`. Returns `false` if no such line.
    pub fn remove(&mut self, id: &CartLineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.id != id);
        self.lines.len() != before
    }

    /// Sum of all line prices. Lines whose price does not parse count as zero.
    ///
    /// Saturates at `Decimal::MAX` instead of overflowing.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .filter_map(CartLine::parsed_price)
            .fold(Decimal::ZERO, |total, price| {
                total.checked_add(price.amount()).unwrap_or(Decimal::MAX)
            })
    }

    /// Total formatted with two decimals in pt-BR, e.g. `8,30`.
    #[must_use]
    pub fn total_display(&self) -> String {
        format_brl(self.total())
    }

    /// Lines whose price text could not be parsed.
    pub fn unpriced_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines
            .iter()
            .filter(|line| line.parsed_price().is_none())
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, price: &str) -> MenuItem {
        MenuItem {
            id: MenuItemId::parse(id).unwrap(),
            name: name.into(),
            price: price.into(),
        }
    }

    #[test]
    fn test_total_sums_display_prices() {
        let mut cart = Cart::new();
        cart.add(&item("a", "Coxinhas Premium", "R$ 4,50"));
        cart.add(&item("b", "Pastel de Queijo", "R$ 3,80"));
        assert_eq!(cart.total_display(), "8,30");
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_display(), "0,00");
    }

    #[test]
    fn test_repeated_add_creates_distinct_lines() {
        let mut cart = Cart::new();
        let coxinha = item("a", "Coxinha", "R$ 4,50");
        let first = cart.add(&coxinha);
        let second = cart.add(&coxinha);
        assert_ne!(first, second);

        assert!(cart.remove(&first));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].id, second);
    }

    #[test]
    fn test_add_then_remove_restores_content() {
        let mut cart = Cart::new();
        cart.add(&item("a", "Coxinha", "R$ 4,50"));
        let before = cart.clone();

        let id = cart.add(&item("b", "Pastel", "R$ 3,80"));
        assert!(cart.remove(&id));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(&item("a", "Coxinha", "R$ 4,50"));
        assert!(!cart.remove(&CartLineId::generate()));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_unparseable_price_counts_as_zero() {
        let mut cart = Cart::new();
        cart.add(&item("a", "Coxinha", "R$ 4,50"));
        cart.add(&item("b", "Brinde", "grátis"));
        assert_eq!(cart.total_display(), "4,50");
        assert_eq!(cart.unpriced_lines().count(), 1);
    }

    #[test]
    fn test_oversized_price_does_not_break_total() {
        let huge = "R$ 50.000.000.000.000.000.000.000.000.000,00";
        let mut cart = Cart::new();
        cart.add(&item("h", "Banquete", huge));
        cart.add(&item("h", "Banquete", huge));
        cart.add(&item("a", "Coxinha", "R$ 4,50"));

        assert_eq!(cart.total_display(), "4,50");
        assert_eq!(cart.unpriced_lines().count(), 2);
    }

    #[test]
    fn test_total_of_largest_prices() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add(&item("m", "Festa completa", "R$ 1.000.000,00"));
        }
        assert_eq!(cart.total_display(), "3.000.000,00");
    }

    #[test]
    fn test_thousands_total() {
        let mut cart = Cart::new();
        for _ in 0..25 {
            cart.add(&item("p", "Picanha na Chapa", "R$ 55,00"));
        }
        assert_eq!(cart.total_display(), "1.375,00");
    }

    #[test]
    fn test_serde_round_trip_for_session() {
        let mut cart = Cart::new();
        cart.add(&item("a", "Coxinha", "R$ 4,50"));
        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
