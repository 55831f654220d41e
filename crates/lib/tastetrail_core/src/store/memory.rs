//! In-memory store used in ephemeral (demo) mode.
//!
//! Users and recipes live in insertion-ordered vectors behind
//! `tokio::sync::RwLock`s. Every mutation holds the write guard for its whole
//! check-then-write sequence, which is what keeps emails unique when
//! registrations race.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{Store, StoreError, StoreResult};
use crate::mode::StorageMode;
use crate::models::auth::{NewUser, ProfileUpdate, User, UserWithPassword};
use crate::models::recipe::{
    NewRecipe, OwnerSummary, Recipe, RecipeChanges, RecipeFilter, RecipeWithOwner,
};
use crate::uuid::uuidv7;

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<UserWithPassword>>,
    recipes: RwLock<Vec<Recipe>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn mode(&self) -> StorageMode {
        StorageMode::Ephemeral
    }

    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.user.email == new_user.email) {
            return Err(StoreError::Conflict(format!(
                "email {} already registered",
                new_user.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: uuidv7().to_string(),
            name: new_user.name,
            email: new_user.email,
            dietary_preferences: Default::default(),
            is_admin: false,
            created_at: now,
            updated_at: now,
        };
        users.push(UserWithPassword {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });
        debug!(user_id = %user.id, "created in-memory user");
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserWithPassword>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user.email == email).cloned())
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| u.user.clone()))
    }

    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(entry) = users.iter_mut().find(|u| u.user.id == id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            entry.user.name = name;
        }
        if let Some(prefs) = update.dietary_preferences {
            entry.user.dietary_preferences = prefs;
        }
        entry.user.updated_at = Utc::now();
        Ok(Some(entry.user.clone()))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.iter().map(|u| u.user.clone()).collect())
    }

    async fn set_admin(&self, email: &str, is_admin: bool) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(entry) = users.iter_mut().find(|u| u.user.email == email) else {
            return Ok(None);
        };
        entry.user.is_admin = is_admin;
        entry.user.updated_at = Utc::now();
        Ok(Some(entry.user.clone()))
    }

    async fn create_recipe(&self, new_recipe: NewRecipe) -> StoreResult<Recipe> {
        // Owners that do not resolve to a user are stored as `None`.
        let owner = match new_recipe.owner {
            Some(id) if self.users.read().await.iter().any(|u| u.user.id == id) => Some(id),
            _ => None,
        };
        let now = Utc::now();
        let recipe = Recipe {
            id: uuidv7().to_string(),
            title: new_recipe.title,
            description: new_recipe.description,
            prep_time: new_recipe.prep_time,
            cook_time: new_recipe.cook_time,
            diet: new_recipe.diet,
            cuisines: new_recipe.cuisines,
            ingredients: new_recipe.ingredients,
            steps: new_recipe.steps,
            images: new_recipe.images,
            rating: new_recipe.rating,
            owner,
            created_at: now,
            updated_at: now,
        };
        self.recipes.write().await.push(recipe.clone());
        Ok(recipe)
    }

    async fn list_recipes(&self, filter: &RecipeFilter) -> StoreResult<Vec<Recipe>> {
        let recipes = self.recipes.read().await;
        Ok(recipes
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn list_recipes_with_owners(&self) -> StoreResult<Vec<RecipeWithOwner>> {
        let recipes = self.recipes.read().await;
        let users = self.users.read().await;
        Ok(recipes
            .iter()
            .map(|r| {
                let owner_details = r.owner.as_deref().and_then(|owner_id| {
                    users
                        .iter()
                        .find(|u| u.user.id == owner_id)
                        .map(|u| OwnerSummary {
                            id: u.user.id.clone(),
                            name: u.user.name.clone(),
                            email: u.user.email.clone(),
                        })
                });
                RecipeWithOwner {
                    recipe: r.clone(),
                    owner_details,
                }
            })
            .collect())
    }

    async fn get_recipe(&self, id: &str) -> StoreResult<Option<Recipe>> {
        let recipes = self.recipes.read().await;
        Ok(recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn update_recipe(
        &self,
        id: &str,
        changes: RecipeChanges,
    ) -> StoreResult<Option<Recipe>> {
        let mut recipes = self.recipes.write().await;
        let Some(recipe) = recipes.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        changes.apply(recipe, Utc::now());
        Ok(Some(recipe.clone()))
    }

    async fn delete_recipe(&self, id: &str) -> StoreResult<Option<Recipe>> {
        let mut recipes = self.recipes.write().await;
        let Some(idx) = recipes.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        Ok(Some(recipes.remove(idx)))
    }
}
