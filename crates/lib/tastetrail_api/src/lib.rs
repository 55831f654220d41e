//! # tastetrail_api
//!
//! HTTP API library for TasteTrail.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tastetrail_core::store::Store;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{admin, auth, health, recipes};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend chosen at startup. Its mode never changes.
    pub store: Arc<dyn Store>,
    /// API configuration.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
///
/// Everything is served under `/api`.
pub fn router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/forgot-password", post(auth::forgot_password_handler))
        .route("/recipes", get(recipes::list_recipes_handler))
        .route("/recipes/{id}", get(recipes::get_recipe_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(
            "/auth/profile",
            get(auth::get_profile_handler).put(auth::update_profile_handler),
        )
        .route("/recipes", post(recipes::create_recipe_handler))
        .route(
            "/recipes/{id}",
            put(recipes::update_recipe_handler).delete(recipes::delete_recipe_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Admin routes. The last layer added runs first, so auth precedes the admin check.
    let admin = Router::new()
        .route(
            "/admin/recipes",
            get(admin::list_recipes_handler).post(admin::create_recipe_handler),
        )
        .route(
            "/admin/recipes/{id}",
            put(admin::update_recipe_handler).delete(admin::delete_recipe_handler),
        )
        .route("/admin/users", get(admin::list_users_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_admin,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // A known path with an unsupported method is treated as an unknown route.
    let api = Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin)
        .method_not_allowed_fallback(handlers::not_found_handler);

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
