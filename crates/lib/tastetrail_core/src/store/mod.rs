//! User and recipe persistence.
//!
//! [`Store`] is the one storage interface the rest of the system sees. It has
//! two implementations, selected once at startup by [`crate::mode`]:
//!
//! - [`postgres::PgStore`]: durable, backed by PostgreSQL.
//! - [`memory::MemoryStore`]: ephemeral, process-local, lost on restart.
//!
//! Both return the same domain types, so responses look identical whichever
//! backend is active. Ids are opaque strings; an id that does not resolve
//! (including one that is not even well-formed) yields `Ok(None)`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::mode::StorageMode;
use crate::models::auth::{NewUser, ProfileUpdate, User, UserWithPassword};
use crate::models::recipe::{NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeWithOwner};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for users and recipes.
#[async_trait]
pub trait Store: Send + Sync {
    /// Which backend this is. Fixed for the lifetime of the store.
    fn mode(&self) -> StorageMode;

    /// Insert a user. Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;

    /// Look up a user (with password hash) by exact email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserWithPassword>>;

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>>;

    /// Apply a partial profile update and refresh `updated_at`.
    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> StoreResult<Option<User>>;

    /// All users in creation order.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Set or clear the admin flag of the user with this email.
    async fn set_admin(&self, email: &str, is_admin: bool) -> StoreResult<Option<User>>;

    async fn create_recipe(&self, new_recipe: NewRecipe) -> StoreResult<Recipe>;

    /// Recipes matching `filter`, in insertion order.
    async fn list_recipes(&self, filter: &RecipeFilter) -> StoreResult<Vec<Recipe>>;

    /// Every recipe with its owner's display fields resolved where possible.
    async fn list_recipes_with_owners(&self) -> StoreResult<Vec<RecipeWithOwner>>;

    async fn get_recipe(&self, id: &str) -> StoreResult<Option<Recipe>>;

    /// Merge `changes` into a recipe and refresh `updated_at`.
    async fn update_recipe(&self, id: &str, changes: RecipeChanges)
    -> StoreResult<Option<Recipe>>;

    /// Remove a recipe, returning what was deleted.
    async fn delete_recipe(&self, id: &str) -> StoreResult<Option<Recipe>>;
}
