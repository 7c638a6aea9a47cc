//! Buffet Simone Core - Domain types and pure logic.
//!
//! This crate provides the types and rules shared by every Buffet Simone
//! component:
//! - `store` - Remote document store, collection sync and local store adapters
//! - `storefront` - Public site (menu, cart, quote request, FAQ, gallery)
//! - `admin` - Password-gated administration panel
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Everything here is synchronous and can be
//! exercised without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids and prices
//! - [`validation`] - Field validators with pt-BR messages
//! - [`catalog`] - Dishes, categories, photos and photo categories
//! - [`cart`] - Session cart of menu items
//! - [`recovery`] - Password recovery flow state machine
//! - [`auth`] - Admin credential check

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod recovery;
pub mod types;
pub mod validation;

pub use types::*;
