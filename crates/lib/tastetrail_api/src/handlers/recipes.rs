//! Public and owner-scoped recipe handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use tastetrail_core::models::recipe::{Recipe, RecipeFilter, RecipePayload};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::RecipeQuery;
use crate::services::recipes::{self, Actor};

/// `GET /api/recipes` — filtered listing (`q`, `diet`, `ingredient`, `maxPrepTime`).
pub async fn list_recipes_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RecipeQuery>,
) -> AppResult<Json<Vec<Recipe>>> {
    let filter = RecipeFilter::try_from(query)?;
    let list = recipes::list_recipes(state.store.as_ref(), &filter).await?;
    Ok(Json(list))
}

/// `GET /api/recipes/{id}`
pub async fn get_recipe_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Recipe>> {
    let recipe = recipes::get_recipe(state.store.as_ref(), &id).await?;
    Ok(Json(recipe))
}

/// `POST /api/recipes` — the caller becomes the owner.
pub async fn create_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<RecipePayload>,
) -> AppResult<(StatusCode, Json<Recipe>)> {
    let recipe =
        recipes::create_recipe(state.store.as_ref(), body, Some(user.user_id())).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// `PUT /api/recipes/{id}` — owner or admin only.
pub async fn update_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<RecipePayload>,
) -> AppResult<Json<Recipe>> {
    let recipe = recipes::update_recipe(
        state.store.as_ref(),
        &id,
        body,
        Actor::User(user.user_id()),
    )
    .await?;
    Ok(Json(recipe))
}

/// `DELETE /api/recipes/{id}` — owner or admin only.
pub async fn delete_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Recipe>> {
    let recipe =
        recipes::delete_recipe(state.store.as_ref(), &id, Actor::User(user.user_id())).await?;
    Ok(Json(recipe))
}
