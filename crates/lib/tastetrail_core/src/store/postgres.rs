//! PostgreSQL store used in durable mode.
//!
//! Email uniqueness is enforced by the `users.email` UNIQUE constraint;
//! a unique violation surfaces as [`StoreError::Conflict`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::mode::StorageMode;
use crate::models::Diet;
use crate::models::auth::{DietaryPreferences, NewUser, ProfileUpdate, User, UserWithPassword};
use crate::models::recipe::{
    Ingredient, NewRecipe, OwnerSummary, Recipe, RecipeChanges, RecipeFilter, RecipeWithOwner,
};
use crate::uuid::{parse_id, uuidv7};

const USER_COLUMNS: &str = "id, name, email, password_hash, diet, allergies, cuisines, \
     is_admin, created_at, updated_at";

const RECIPE_COLUMNS: &str = "r.id, r.title, r.description, r.prep_time, r.cook_time, r.diet, \
     r.cuisines, r.ingredients, r.steps, r.images, r.rating, r.owner_id, r.created_at, \
     r.updated_at";

/// `translate` arguments that lowercase ASCII letters only, matching
/// `RecipeFilter::matches`. `lower()` would also fold non-ASCII letters.
const ASCII_FOLD: &str = "'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz'";

/// Row returned by user queries.
#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    diet: String,
    allergies: Vec<String>,
    cuisines: Vec<String>,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserWithPassword {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let diet = parse_stored_diet(&row.diet)?;
        Ok(UserWithPassword {
            user: User {
                id: row.id.to_string(),
                name: row.name,
                email: row.email,
                dietary_preferences: DietaryPreferences {
                    diet,
                    allergies: row.allergies,
                    cuisines: row.cuisines,
                },
                is_admin: row.is_admin,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            password_hash: row.password_hash,
        })
    }
}

/// Row returned by recipe queries.
#[derive(Debug, Clone, sqlx::FromRow)]
struct RecipeRow {
    id: Uuid,
    title: String,
    description: String,
    prep_time: i32,
    cook_time: i32,
    diet: String,
    cuisines: Vec<String>,
    ingredients: Json<Vec<Ingredient>>,
    steps: Vec<String>,
    images: Vec<String>,
    rating: f64,
    owner_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = StoreError;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        Ok(Recipe {
            id: row.id.to_string(),
            title: row.title,
            description: row.description,
            prep_time: minutes_from_db(row.prep_time),
            cook_time: minutes_from_db(row.cook_time),
            diet: parse_stored_diet(&row.diet)?,
            cuisines: row.cuisines,
            ingredients: row.ingredients.0,
            steps: row.steps,
            images: row.images,
            rating: row.rating,
            owner: row.owner_id.map(|id| id.to_string()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Recipe row joined with its owner's display fields.
#[derive(Debug, Clone, sqlx::FromRow)]
struct RecipeOwnerRow {
    #[sqlx(flatten)]
    recipe: RecipeRow,
    owner_name: Option<String>,
    owner_email: Option<String>,
}

impl TryFrom<RecipeOwnerRow> for RecipeWithOwner {
    type Error = StoreError;

    fn try_from(row: RecipeOwnerRow) -> Result<Self, Self::Error> {
        let owner_details = match (row.recipe.owner_id, row.owner_name, row.owner_email) {
            (Some(id), Some(name), Some(email)) => Some(OwnerSummary {
                id: id.to_string(),
                name,
                email,
            }),
            _ => None,
        };
        Ok(RecipeWithOwner {
            recipe: Recipe::try_from(row.recipe)?,
            owner_details,
        })
    }
}

fn parse_stored_diet(diet: &str) -> StoreResult<Diet> {
    diet.parse()
        .map_err(|_| StoreError::Corrupt(format!("unknown diet '{diet}' in database")))
}

fn minutes_from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn minutes_to_db(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Durable store over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an already-migrated pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn mode(&self) -> StorageMode {
        StorageMode::Durable
    }

    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(uuidv7())
            .bind(&new_user.name)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict(format!("email {} already registered", new_user.email))
                } else {
                    StoreError::from(e)
                }
            })?;
        Ok(UserWithPassword::try_from(row)?.user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserWithPassword>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(UserWithPassword::try_from).transpose()
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .map(UserWithPassword::try_from)
            .transpose()?
            .map(|u| u.user))
    }

    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> StoreResult<Option<User>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let (diet, allergies, cuisines) = match update.dietary_preferences {
            Some(p) => (Some(p.diet.as_str()), Some(p.allergies), Some(p.cuisines)),
            None => (None, None, None),
        };
        let sql = format!(
            "UPDATE users SET \
               name = COALESCE($2, name), \
               diet = COALESCE($3, diet), \
               allergies = COALESCE($4, allergies), \
               cuisines = COALESCE($5, cuisines), \
               updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(update.name)
            .bind(diet)
            .bind(allergies)
            .bind(cuisines)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .map(UserWithPassword::try_from)
            .transpose()?
            .map(|u| u.user))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY seq ASC");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|r| UserWithPassword::try_from(r).map(|u| u.user))
            .collect()
    }

    async fn set_admin(&self, email: &str, is_admin: bool) -> StoreResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET is_admin = $2, updated_at = now() \
             WHERE email = $1 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .bind(is_admin)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .map(UserWithPassword::try_from)
            .transpose()?
            .map(|u| u.user))
    }

    async fn create_recipe(&self, new_recipe: NewRecipe) -> StoreResult<Recipe> {
        // Owners that do not resolve to a user are stored as NULL.
        let owner = new_recipe.owner.as_deref().and_then(parse_id);
        let sql = format!(
            r#"
            INSERT INTO recipes AS r
                (id, title, description, prep_time, cook_time, diet, cuisines,
                 ingredients, steps, images, rating, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    (SELECT u.id FROM users u WHERE u.id = $12))
            RETURNING {RECIPE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(uuidv7())
            .bind(&new_recipe.title)
            .bind(&new_recipe.description)
            .bind(minutes_to_db(new_recipe.prep_time))
            .bind(minutes_to_db(new_recipe.cook_time))
            .bind(new_recipe.diet.as_str())
            .bind(&new_recipe.cuisines)
            .bind(Json(&new_recipe.ingredients))
            .bind(&new_recipe.steps)
            .bind(&new_recipe.images)
            .bind(new_recipe.rating)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Recipe::try_from(row)
    }

    async fn list_recipes(&self, filter: &RecipeFilter) -> StoreResult<Vec<Recipe>> {
        let sql = format!(
            r#"
            SELECT {RECIPE_COLUMNS}
            FROM recipes r
            WHERE ($1::text IS NULL
                   OR strpos(translate(r.title, {ASCII_FOLD}), $1) > 0
                   OR strpos(translate(r.description, {ASCII_FOLD}), $1) > 0)
              AND ($2::text IS NULL OR r.diet = $2)
              AND ($3::text IS NULL OR EXISTS (
                    SELECT 1 FROM jsonb_array_elements(r.ingredients) AS ing
                    WHERE strpos(translate(ing->>'name', {ASCII_FOLD}), $3) > 0))
              AND ($4::int IS NULL OR r.prep_time <= $4)
            ORDER BY r.seq ASC
            "#
        );
        let rows = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(filter.q.as_deref().map(str::to_ascii_lowercase))
            .bind(filter.diet.map(|d| d.as_str()))
            .bind(filter.ingredient.as_deref().map(str::to_ascii_lowercase))
            .bind(filter.max_prep_time.map(minutes_to_db))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Recipe::try_from).collect()
    }

    async fn list_recipes_with_owners(&self) -> StoreResult<Vec<RecipeWithOwner>> {
        let sql = format!(
            r#"
            SELECT {RECIPE_COLUMNS}, u.name AS owner_name, u.email AS owner_email
            FROM recipes r
            LEFT JOIN users u ON u.id = r.owner_id
            ORDER BY r.seq ASC
            "#
        );
        let rows = sqlx::query_as::<_, RecipeOwnerRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(RecipeWithOwner::try_from).collect()
    }

    async fn get_recipe(&self, id: &str) -> StoreResult<Option<Recipe>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1");
        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Recipe::try_from).transpose()
    }

    async fn update_recipe(
        &self,
        id: &str,
        changes: RecipeChanges,
    ) -> StoreResult<Option<Recipe>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let sql = format!(
            r#"
            UPDATE recipes AS r SET
                title = COALESCE($2, r.title),
                description = COALESCE($3, r.description),
                prep_time = COALESCE($4, r.prep_time),
                cook_time = COALESCE($5, r.cook_time),
                diet = COALESCE($6, r.diet),
                cuisines = COALESCE($7, r.cuisines),
                ingredients = COALESCE($8, r.ingredients),
                steps = COALESCE($9, r.steps),
                images = COALESCE($10, r.images),
                rating = COALESCE($11, r.rating),
                updated_at = now()
            WHERE r.id = $1
            RETURNING {RECIPE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.prep_time.map(minutes_to_db))
            .bind(changes.cook_time.map(minutes_to_db))
            .bind(changes.diet.map(|d| d.as_str()))
            .bind(changes.cuisines)
            .bind(changes.ingredients.map(Json))
            .bind(changes.steps)
            .bind(changes.images)
            .bind(changes.rating)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Recipe::try_from).transpose()
    }

    async fn delete_recipe(&self, id: &str) -> StoreResult<Option<Recipe>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let sql = format!("DELETE FROM recipes AS r WHERE r.id = $1 RETURNING {RECIPE_COLUMNS}");
        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Recipe::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_conversions_saturate() {
        assert_eq!(minutes_from_db(-3), 0);
        assert_eq!(minutes_from_db(42), 42);
        assert_eq!(minutes_to_db(u32::MAX), i32::MAX);
        assert_eq!(minutes_to_db(42), 42);
    }

    #[test]
    fn unknown_stored_diet_is_corrupt() {
        assert!(matches!(
            parse_stored_diet("carnivore"),
            Err(StoreError::Corrupt(_))
        ));
        assert_eq!(parse_stored_diet("keto").unwrap(), Diet::Keto);
    }
}
