//! Admin surface. Every route here sits behind `require_auth` and `require_admin`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use tastetrail_core::models::auth::User;
use tastetrail_core::models::recipe::{Recipe, RecipePayload, RecipeWithOwner};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::recipes::{self, Actor};

/// `GET /api/admin/recipes` — every recipe with its owner's details.
pub async fn list_recipes_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RecipeWithOwner>>> {
    let list = recipes::list_recipes_with_owners(state.store.as_ref()).await?;
    Ok(Json(list))
}

/// `POST /api/admin/recipes` — the admin becomes the owner.
pub async fn create_recipe_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<RecipePayload>,
) -> AppResult<(StatusCode, Json<Recipe>)> {
    let recipe =
        recipes::create_recipe(state.store.as_ref(), body, Some(admin.user_id())).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn update_recipe_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<RecipePayload>,
) -> AppResult<Json<Recipe>> {
    let recipe = recipes::update_recipe(state.store.as_ref(), &id, body, Actor::Admin).await?;
    Ok(Json(recipe))
}

pub async fn delete_recipe_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Recipe>> {
    let recipe = recipes::delete_recipe(state.store.as_ref(), &id, Actor::Admin).await?;
    Ok(Json(recipe))
}

/// `GET /api/admin/users`
pub async fn list_users_handler(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.store.list_users().await?))
}
