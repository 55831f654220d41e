//! # tastetrail_core
//!
//! Core domain logic for TasteTrail: user credentials, session tokens,
//! and the recipe/user storage backends (PostgreSQL or in-memory).

pub mod auth;
pub mod migrate;
pub mod mode;
pub mod models;
pub mod store;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
