//! Storefront services.

pub mod contact;

pub use contact::{QuoteRequest, whatsapp_url};
