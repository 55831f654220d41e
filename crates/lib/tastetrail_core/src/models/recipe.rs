//! Recipe domain models, request payload normalization, and list filtering.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Diet, ValidationError, normalize_list};

/// Upper bound for coerced times; PostgreSQL stores them as `INTEGER`.
const MAX_MINUTES: u32 = i32::MAX as u32;

/// Shopping-list category of an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientCategory {
    Produce,
    Meat,
    Dairy,
    Grains,
    Canned,
    Condiments,
    Spices,
    #[default]
    Misc,
}

impl IngredientCategory {
    pub const ALL: [IngredientCategory; 8] = [
        IngredientCategory::Produce,
        IngredientCategory::Meat,
        IngredientCategory::Dairy,
        IngredientCategory::Grains,
        IngredientCategory::Canned,
        IngredientCategory::Condiments,
        IngredientCategory::Spices,
        IngredientCategory::Misc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientCategory::Produce => "produce",
            IngredientCategory::Meat => "meat",
            IngredientCategory::Dairy => "dairy",
            IngredientCategory::Grains => "grains",
            IngredientCategory::Canned => "canned",
            IngredientCategory::Condiments => "condiments",
            IngredientCategory::Spices => "spices",
            IngredientCategory::Misc => "misc",
        }
    }
}

impl fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngredientCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IngredientCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError(format!("Unknown ingredient category '{s}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub category: IngredientCategory,
}

/// Domain recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub diet: Diet,
    pub cuisines: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    pub images: Vec<String>,
    pub rating: f64,
    /// Owning user ID, if any.
    pub owner: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Display fields of a recipe's owner, resolved for the admin listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Recipe plus its resolved owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeWithOwner {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub owner_details: Option<OwnerSummary>,
}

/// A validated recipe ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub diet: Diet,
    pub cuisines: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    pub images: Vec<String>,
    pub rating: f64,
    pub owner: Option<String>,
}

/// A validated partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub diet: Option<Diet>,
    pub cuisines: Option<Vec<String>>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub steps: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub rating: Option<f64>,
}

impl RecipeChanges {
    /// Merge the provided fields into `recipe` and bump `updated_at`.
    pub fn apply(&self, recipe: &mut Recipe, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            recipe.title = title.clone();
        }
        if let Some(description) = &self.description {
            recipe.description = description.clone();
        }
        if let Some(prep_time) = self.prep_time {
            recipe.prep_time = prep_time;
        }
        if let Some(cook_time) = self.cook_time {
            recipe.cook_time = cook_time;
        }
        if let Some(diet) = self.diet {
            recipe.diet = diet;
        }
        if let Some(cuisines) = &self.cuisines {
            recipe.cuisines = cuisines.clone();
        }
        if let Some(ingredients) = &self.ingredients {
            recipe.ingredients = ingredients.clone();
        }
        if let Some(steps) = &self.steps {
            recipe.steps = steps.clone();
        }
        if let Some(images) = &self.images {
            recipe.images = images.clone();
        }
        if let Some(rating) = self.rating {
            recipe.rating = rating;
        }
        recipe.updated_at = now;
    }
}

/// Ingredient as sent by clients; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Recipe body of create and update requests.
///
/// Times are taken as raw JSON so that numbers and numeric strings are both
/// accepted; see [`coerce_minutes`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub prep_time: Option<Value>,
    pub cook_time: Option<Value>,
    pub diet: Option<String>,
    pub cuisines: Option<Vec<String>>,
    pub ingredients: Option<Vec<IngredientPayload>>,
    pub steps: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub rating: Option<f64>,
}

impl RecipePayload {
    /// Validate a creation payload. The title is required.
    pub fn into_new_recipe(self, owner: Option<String>) -> Result<NewRecipe, ValidationError> {
        let title = required_title(self.title.as_deref())?
            .ok_or_else(|| ValidationError::new("Title is required"))?;
        Ok(NewRecipe {
            title,
            description: self.description.unwrap_or_default(),
            prep_time: self.prep_time.as_ref().map(coerce_minutes).unwrap_or(0),
            cook_time: self.cook_time.as_ref().map(coerce_minutes).unwrap_or(0),
            diet: parse_diet(self.diet.as_deref())?.unwrap_or_default(),
            cuisines: normalize_list(self.cuisines.unwrap_or_default()),
            ingredients: normalize_ingredients(self.ingredients.unwrap_or_default())?,
            steps: normalize_list(self.steps.unwrap_or_default()),
            images: normalize_list(self.images.unwrap_or_default()),
            rating: validate_rating(self.rating)?.unwrap_or(0.0),
            owner,
        })
    }

    /// Validate an update payload. Only provided fields are carried over.
    pub fn into_changes(self) -> Result<RecipeChanges, ValidationError> {
        Ok(RecipeChanges {
            title: required_title(self.title.as_deref())?,
            description: self.description,
            prep_time: self.prep_time.as_ref().map(coerce_minutes),
            cook_time: self.cook_time.as_ref().map(coerce_minutes),
            diet: parse_diet(self.diet.as_deref())?,
            cuisines: self.cuisines.map(normalize_list),
            ingredients: self.ingredients.map(normalize_ingredients).transpose()?,
            steps: self.steps.map(normalize_list),
            images: self.images.map(normalize_list),
            rating: validate_rating(self.rating)?,
        })
    }
}

/// A provided title must not be blank.
fn required_title(title: Option<&str>) -> Result<Option<String>, ValidationError> {
    match title.map(str::trim) {
        None => Ok(None),
        Some("") => Err(ValidationError::new("Title is required")),
        Some(t) => Ok(Some(t.to_string())),
    }
}

/// An empty diet string means "no preference".
fn parse_diet(diet: Option<&str>) -> Result<Option<Diet>, ValidationError> {
    match diet.map(str::trim) {
        None => Ok(None),
        Some("") => Ok(Some(Diet::None)),
        Some(d) => d.parse().map(Some),
    }
}

fn validate_rating(rating: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match rating {
        Some(r) if !r.is_finite() || r < 0.0 => {
            Err(ValidationError::new("Rating must be a non-negative number"))
        }
        other => Ok(other),
    }
}

/// Drop ingredients with a blank name; default the category to `misc`.
fn normalize_ingredients(
    ingredients: Vec<IngredientPayload>,
) -> Result<Vec<Ingredient>, ValidationError> {
    let mut out = Vec::with_capacity(ingredients.len());
    for ing in ingredients {
        let name = ing.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        let category = match ing.category.as_deref().map(str::trim) {
            None | Some("") => IngredientCategory::default(),
            Some(c) => c.parse()?,
        };
        out.push(Ingredient {
            name: name.to_string(),
            quantity: ing.quantity.unwrap_or_default().trim().to_string(),
            category,
        });
    }
    Ok(out)
}

/// Coerce a JSON time value to whole minutes.
///
/// Finite, non-negative numbers (or strings holding one) keep their integer
/// part. Everything else, including negatives, `null`, and text, becomes 0.
pub fn coerce_minutes(value: &Value) -> u32 {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() && n >= 0.0 => n.trunc().min(MAX_MINUTES as f64) as u32,
        _ => 0,
    }
}

/// Recipe list filter. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Case-insensitive substring of title or description.
    pub q: Option<String>,
    pub diet: Option<Diet>,
    /// Case-insensitive substring of any ingredient name.
    pub ingredient: Option<String>,
    /// Inclusive upper bound on prep time.
    pub max_prep_time: Option<u32>,
}

impl RecipeFilter {
    /// In-memory counterpart of the PostgreSQL filter query.
    ///
    /// Case folding is ASCII-only on both sides, so `É` and `é` stay distinct.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(q) = &self.q {
            let q = q.to_ascii_lowercase();
            if !recipe.title.to_ascii_lowercase().contains(&q)
                && !recipe.description.to_ascii_lowercase().contains(&q)
            {
                return false;
            }
        }
        if let Some(diet) = self.diet
            && recipe.diet != diet
        {
            return false;
        }
        if let Some(ingredient) = &self.ingredient {
            let needle = ingredient.to_ascii_lowercase();
            if !recipe
                .ingredients
                .iter()
                .any(|i| i.name.to_ascii_lowercase().contains(&needle))
            {
                return false;
            }
        }
        if let Some(max) = self.max_prep_time
            && recipe.prep_time > max
        {
            return false;
        }
        true
    }
}
