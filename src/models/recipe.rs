//! Recipe row, request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Recipe database row
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub recipe_id: i64,
    pub recipe_name: String,
    pub ingredients: String,
    pub directions: String,
    pub category_id: i64,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

/// Recipe representation for API responses
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub recipe_id: i64,
    pub recipe_name: String,
    pub ingredients: String,
    pub directions: String,
    pub category_id: i64,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            recipe_id: recipe.recipe_id,
            recipe_name: recipe.recipe_name,
            ingredients: recipe.ingredients,
            directions: recipe.directions,
            category_id: recipe.category_id,
            date_created: recipe.date_created,
            date_modified: recipe.date_modified,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub recipe_name: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub directions: String,
}

/// Partial update: absent fields keep their current value
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub recipe_name: Option<String>,
    pub ingredients: Option<String>,
    pub directions: Option<String>,
}
