//! Business logic between handlers and the store.

pub mod auth;
pub mod recipes;
