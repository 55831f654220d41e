//! Recipe service: validation, ownership checks and store calls.

use tastetrail_core::models::recipe::{Recipe, RecipeFilter, RecipePayload, RecipeWithOwner};
use tastetrail_core::store::Store;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// Who is asking to change a recipe.
#[derive(Debug, Clone, Copy)]
pub enum Actor<'a> {
    /// A signed-in user; must own the recipe or be an admin.
    User(&'a str),
    /// The admin surface, already gated by `require_admin`.
    Admin,
}

fn recipe_not_found() -> AppError {
    AppError::NotFound("Recipe not found".into())
}

pub async fn create_recipe(
    store: &dyn Store,
    payload: RecipePayload,
    owner: Option<&str>,
) -> AppResult<Recipe> {
    let new_recipe = payload.into_new_recipe(owner.map(str::to_string))?;
    let recipe = store.create_recipe(new_recipe).await?;
    info!(recipe_id = %recipe.id, owner = ?recipe.owner, "created recipe");
    Ok(recipe)
}

pub async fn list_recipes(store: &dyn Store, filter: &RecipeFilter) -> AppResult<Vec<Recipe>> {
    Ok(store.list_recipes(filter).await?)
}

pub async fn list_recipes_with_owners(store: &dyn Store) -> AppResult<Vec<RecipeWithOwner>> {
    Ok(store.list_recipes_with_owners().await?)
}

pub async fn get_recipe(store: &dyn Store, id: &str) -> AppResult<Recipe> {
    store.get_recipe(id).await?.ok_or_else(recipe_not_found)
}

/// Merge the provided fields into an existing recipe.
pub async fn update_recipe(
    store: &dyn Store,
    id: &str,
    payload: RecipePayload,
    actor: Actor<'_>,
) -> AppResult<Recipe> {
    let changes = payload.into_changes()?;
    let existing = get_recipe(store, id).await?;
    ensure_can_modify(store, &existing, actor).await?;

    // The recipe may have been deleted since the ownership check.
    store
        .update_recipe(id, changes)
        .await?
        .ok_or_else(recipe_not_found)
}

/// Delete a recipe, returning what was removed.
pub async fn delete_recipe(store: &dyn Store, id: &str, actor: Actor<'_>) -> AppResult<Recipe> {
    let existing = get_recipe(store, id).await?;
    ensure_can_modify(store, &existing, actor).await?;

    let deleted = store
        .delete_recipe(id)
        .await?
        .ok_or_else(recipe_not_found)?;
    info!(recipe_id = %deleted.id, "deleted recipe");
    Ok(deleted)
}

/// Owners may modify their recipes; admins may modify any.
///
/// The admin flag is read from the store, never from the token.
async fn ensure_can_modify(store: &dyn Store, recipe: &Recipe, actor: Actor<'_>) -> AppResult<()> {
    let user_id = match actor {
        Actor::Admin => return Ok(()),
        Actor::User(id) => id,
    };
    if recipe.owner.as_deref() == Some(user_id) {
        return Ok(());
    }
    let is_admin = store
        .get_user(user_id)
        .await?
        .is_some_and(|u| u.is_admin);
    if is_admin {
        return Ok(());
    }
    debug!(recipe_id = %recipe.id, %user_id, "recipe modification denied");
    Err(AppError::Forbidden("Not allowed to modify this recipe".into()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tastetrail_core::models::Diet;
    use tastetrail_core::models::auth::NewUser;
    use tastetrail_core::store::memory::MemoryStore;

    use super::*;

    fn payload(value: serde_json::Value) -> RecipePayload {
        serde_json::from_value(value).unwrap()
    }

    async fn user(store: &MemoryStore, email: &str) -> String {
        store
            .create_user(NewUser {
                name: "U".into(),
                email: email.into(),
                password_hash: "h".into(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_drops_blank_ingredients_and_coerces_times() {
        let store = MemoryStore::new();
        let owner = user(&store, "cook@example.com").await;
        let recipe = create_recipe(
            &store,
            payload(json!({
                "title": "Salad",
                "prepTime": "15",
                "cookTime": -3,
                "ingredients": [{"name": "Kale"}, {"name": "  "}],
                "steps": ["Chop", ""],
            })),
            Some(&owner),
        )
        .await
        .unwrap();

        assert_eq!(recipe.prep_time, 15);
        assert_eq!(recipe.cook_time, 0);
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.ingredients[0].name, "Kale");
        assert_eq!(recipe.steps, vec!["Chop"]);
        assert_eq!(recipe.owner.as_deref(), Some(owner.as_str()));
    }

    #[tokio::test]
    async fn create_requires_title() {
        let store = MemoryStore::new();
        let err = create_recipe(&store, payload(json!({"title": " "})), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn owner_non_owner_and_admin_updates() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com").await;
        let other = user(&store, "other@example.com").await;
        let admin = user(&store, "admin@example.com").await;
        store.set_admin("admin@example.com", true).await.unwrap();

        let recipe = create_recipe(&store, payload(json!({"title": "Stew"})), Some(&owner))
            .await
            .unwrap();

        let by_owner = update_recipe(
            &store,
            &recipe.id,
            payload(json!({"diet": "paleo"})),
            Actor::User(&owner),
        )
        .await
        .unwrap();
        assert_eq!(by_owner.diet, Diet::Paleo);
        assert_eq!(by_owner.title, "Stew");

        let denied = update_recipe(
            &store,
            &recipe.id,
            payload(json!({"title": "Mine now"})),
            Actor::User(&other),
        )
        .await
        .unwrap_err();
        assert!(matches!(denied, AppError::Forbidden(_)));

        let by_admin = update_recipe(
            &store,
            &recipe.id,
            payload(json!({"title": "Admin edit"})),
            Actor::User(&admin),
        )
        .await
        .unwrap();
        assert_eq!(by_admin.title, "Admin edit");
    }

    #[tokio::test]
    async fn delete_checks_ownership_and_existence() {
        let store = MemoryStore::new();
        let owner = user(&store, "o@example.com").await;
        let recipe = create_recipe(&store, payload(json!({"title": "Pie"})), Some(&owner))
            .await
            .unwrap();

        let denied = delete_recipe(&store, &recipe.id, Actor::User("someone-else"))
            .await
            .unwrap_err();
        assert!(matches!(denied, AppError::Forbidden(_)));

        let deleted = delete_recipe(&store, &recipe.id, Actor::Admin).await.unwrap();
        assert_eq!(deleted.id, recipe.id);

        let gone = delete_recipe(&store, &recipe.id, Actor::Admin)
            .await
            .unwrap_err();
        assert!(matches!(gone, AppError::NotFound(m) if m == "Recipe not found"));
    }

    #[tokio::test]
    async fn update_with_unknown_diet_is_rejected() {
        let store = MemoryStore::new();
        let recipe = create_recipe(&store, payload(json!({"title": "Soup"})), None)
            .await
            .unwrap();
        let err = update_recipe(
            &store,
            &recipe.id,
            payload(json!({"diet": "carnivore"})),
            Actor::Admin,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
