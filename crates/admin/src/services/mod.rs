//! Business logic for the admin panel.
//!
//! - [`menu`] - Dish and category writes to the document store
//! - [`gallery`] - Photo and photo category writes to the local store
//! - [`recovery`] - Session-held password recovery and its countdown

pub mod gallery;
pub mod menu;
pub mod recovery;

pub use gallery::{GalleryController, GalleryView};
pub use menu::{Confirmation, DeleteOutcome, MenuController, MenuError};
pub use recovery::{CodeIssuer, RecoverySession, RecoveryView};
