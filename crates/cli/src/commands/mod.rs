//! CLI command implementations.

pub mod migrate;
pub mod photos;
pub mod seed;
