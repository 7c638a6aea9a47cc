//! Buffet Simone Admin library.
//!
//! This crate provides the admin panel as a library, allowing it to be
//! tested and reused.
//!
//! # Security
//!
//! Everything except login, session status and password recovery sits
//! behind a single username/password pair. The login flag lives in a
//! `PostgreSQL`-backed session, so it survives restarts.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
