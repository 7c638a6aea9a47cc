//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Every ID in this
//! system is an opaque string: document ids are assigned by the remote store,
//! photo and cart-line ids are minted client-side.

use thiserror::Error;

/// Error returned when parsing an ID from blank input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("id cannot be empty")]
pub struct EmptyIdError;

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `parse()` rejecting blank input, `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>` and `FromStr`
///
/// # Example
///
/// ```rust
/// # use buffet_simone_core::define_id;
/// define_id!(TableId);
/// define_id!(GuestId);
///
/// let table = TableId::parse("t-1").unwrap();
/// assert_eq!(table.as_str(), "t-1");
/// assert!(GuestId::parse("  ").is_err());
///
/// // These are different types, so this won't compile:
/// // let _: GuestId = table;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an ID, rejecting empty or whitespace-only input.
            ///
            /// # Errors
            ///
            /// Returns `EmptyIdError` if the trimmed input is empty.
            pub fn parse(
                value: &str,
            ) -> ::core::result::Result<Self, $crate::types::id::EmptyIdError> {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err($crate::types::id::EmptyIdError);
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::EmptyIdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

/// Macro adding a random UUID v4 generator to an ID type.
///
/// Used for client-minted identifiers, which must not collide even when
/// two are created within the same clock tick.
macro_rules! generated_id {
    ($name:ident) => {
        impl $name {
            /// Mint a fresh, collision-resistant ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4().to_string())
            }
        }
    };
}

// Remote store documents
define_id!(DishId);
define_id!(CategoryId);

// Client-minted
define_id!(PhotoId);
define_id!(CartLineId);
generated_id!(PhotoId);
generated_id!(CartLineId);

// Public menu entries (derived from dish ids)
define_id!(MenuItemId);

impl From<DishId> for MenuItemId {
    fn from(id: DishId) -> Self {
        Self(id.into_inner())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_parse_trims_and_rejects_blank() {
        assert_eq!(DishId::parse("  abc ").unwrap().as_str(), "abc");
        assert_eq!(DishId::parse(""), Err(EmptyIdError));
        assert_eq!(CategoryId::parse("   "), Err(EmptyIdError));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<CartLineId> = (0..1000).map(|_| CartLineId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_serde_transparent() {
        let id = PhotoId::parse("p1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p1\"");
        let back: PhotoId = serde_json::from_str("\"p1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_menu_item_from_dish() {
        let dish = DishId::parse("d-9").unwrap();
        assert_eq!(MenuItemId::from(dish).as_str(), "d-9");
    }
}
