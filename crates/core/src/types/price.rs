//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as a non-negative [`Decimal`] amount in reais and
//! rendered in the pt-BR convention: `,` as decimal separator and `.` for
//! thousands grouping (`R$ 1.234,50`). On the wire (`preco` in the remote
//! store) a price is a plain JSON number.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Currency symbol prefix used for display.
pub const CURRENCY_SYMBOL: &str = "R$";

/// Largest price accepted from a form or a menu label: R$ 1.000.000,00.
pub const MAX_PRICE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 2);

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// No digits left after stripping the currency symbol and whitespace.
    #[error("price cannot be empty")]
    Empty,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The text is not a number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount is above [`MAX_PRICE`].
    #[error("price cannot exceed {}", format_brl(MAX_PRICE))]
    TooLarge,
}

/// A non-negative amount in reais.
///
/// ## Examples
///
/// ```
/// use buffet_simone_core::Price;
///
/// let price = Price::parse("R$ 4,50").unwrap();
/// assert_eq!(price.format_amount(), "4,50");
/// assert_eq!(price.display(), "R$ 4,50");
///
/// assert_eq!(Price::parse("1.234,5").unwrap().display(), "R$ 1.234,50");
/// assert!(Price::parse("-3").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of centavos.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Parse a price typed by a person or shown on the menu.
    ///
    /// The currency symbol and any whitespace are ignored. Either `,` or `.`
    /// may be the decimal separator; when both occur, the last one is the
    /// decimal separator and the other groups thousands. A separator that
    /// appears more than once is always a thousands separator.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing numeric remains, the text contains other
    /// characters, the amount is negative or it is above [`MAX_PRICE`].
    pub fn parse(text: &str) -> Result<Self, PriceError> {
        let cleaned: String = text
            .replace(CURRENCY_SYMBOL, "")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if cleaned.is_empty() {
            return Err(PriceError::Empty);
        }

        let (negative, digits) = cleaned
            .strip_prefix('-')
            .map_or((false, cleaned.as_str()), |rest| (true, rest));

        if digits.is_empty() {
            return Err(PriceError::Empty);
        }
        if !digits
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c == '.')
        {
            return Err(PriceError::Invalid(text.to_owned()));
        }

        let normalized = normalize_separators(digits);
        let amount =
            Decimal::from_str(&normalized).map_err(|_| PriceError::Invalid(text.to_owned()))?;

        if negative && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount > MAX_PRICE {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Amount formatted as pt-BR with two decimals, without symbol (`4,50`).
    #[must_use]
    pub fn format_amount(&self) -> String {
        format_brl(self.0)
    }

    /// Amount with currency symbol (`R$ 4,50`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_SYMBOL} {}", self.format_amount())
    }
}

/// Rewrite a digits-and-separators string to use `.` as the only decimal
/// point and no grouping.
fn normalize_separators(digits: &str) -> String {
    let commas = digits.matches(',').count();
    let dots = digits.matches('.').count();

    let decimal_sep = match (commas, dots) {
        (0, 0) => None,
        (c, 0) => (c == 1).then_some(','),
        (0, d) => (d == 1).then_some('.'),
        _ => digits.chars().rev().find(|c| matches!(c, ',' | '.')),
    };

    digits
        .chars()
        .filter_map(|c| match c {
            ',' | '.' if Some(c) == decimal_sep => Some('.'),
            ',' | '.' => None,
            other => Some(other),
        })
        .collect()
}

/// Format a decimal amount as pt-BR currency text without symbol.
///
/// Rounds half away from zero to two places, groups thousands with `.` and
/// uses `,` as decimal separator.
#[must_use]
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{frac_part}")
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}
