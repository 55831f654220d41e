//! Request and response bodies of the HTTP API.
//!
//! Domain types from `tastetrail_core` (users, recipes) are serialized
//! directly; the types here are the envelopes around them.

use serde::{Deserialize, Serialize};
use tastetrail_core::mode::StorageMode;
use tastetrail_core::models::Diet;
use tastetrail_core::models::auth::{DietaryPreferences, User};
use tastetrail_core::models::recipe::RecipeFilter;

use crate::error::AppError;

/// `POST /api/auth/register` body. Missing fields deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// `PUT /api/auth/profile` body. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub dietary_preferences: Option<DietaryPreferences>,
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

/// Body of every error and of informational responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub demo_mode: bool,
    pub mode: StorageMode,
}

/// Query string of `GET /api/recipes`. Blank values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeQuery {
    pub q: Option<String>,
    pub diet: Option<String>,
    pub ingredient: Option<String>,
    pub max_prep_time: Option<String>,
}

impl TryFrom<RecipeQuery> for RecipeFilter {
    type Error = AppError;

    fn try_from(query: RecipeQuery) -> Result<Self, Self::Error> {
        fn present(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        }

        let diet = present(query.diet)
            .map(|d| d.parse::<Diet>())
            .transpose()?;
        let max_prep_time = present(query.max_prep_time)
            .map(|m| {
                m.parse::<u32>().map_err(|_| {
                    AppError::Validation("maxPrepTime must be a non-negative integer".into())
                })
            })
            .transpose()?;

        Ok(RecipeFilter {
            q: present(query.q),
            diet,
            ingredient: present(query.ingredient),
            max_prep_time,
        })
    }
}
