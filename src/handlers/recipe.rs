//! 菜谱管理的 HTTP 处理器
//!
//! 菜谱总是通过父分类访问：先用属主解析分类，再在分类范围内操作。
//! 分类不属于当前用户时直接 404，菜谱操作不会执行。

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{
        category::ListQuery,
        recipe::{CreateRecipeRequest, RecipeResponse, UpdateRecipeRequest},
    },
    repository::{CategoryRepository, RecipeRepository},
    validation,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 解析属主的分类，拿不到即 404
async fn resolve_category(
    state: &AppState,
    user_id: i64,
    category_id: i64,
) -> Result<i64, AppError> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .find_by_id(user_id, category_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(category.category_id)
}

/// 在分类下创建菜谱
pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(category_id): Path<i64>,
    Json(req): Json<CreateRecipeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category_id = resolve_category(&state, auth_context.user_id, category_id).await?;

    validation::validate_name(&req.recipe_name, "recipe_name")?;
    let recipe_name = req.recipe_name.trim();

    let repo = RecipeRepository::new(state.db.clone());

    if repo.find_by_name(category_id, recipe_name).await?.is_some() {
        return Err(AppError::Conflict(
            "Recipe already exists in this category.".to_string(),
        ));
    }

    let recipe = repo
        .create(category_id, recipe_name, &req.ingredients, &req.directions)
        .await?;

    Ok((StatusCode::CREATED, Json(RecipeResponse::from(recipe))))
}

/// 分页列出分类下的菜谱
pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(category_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let category_id = resolve_category(&state, auth_context.user_id, category_id).await?;

    let repo = RecipeRepository::new(state.db.clone());

    let (page, per_page) = query.normalized();
    let total = repo.count(category_id, &query.q).await?;
    let recipes = repo
        .list(category_id, &query.q, per_page, query.offset())
        .await?;

    let items: Vec<RecipeResponse> = recipes.into_iter().map(Into::into).collect();

    Ok(Json(json!({
        "recipes": items,
        "total": total,
        "page": page,
        "per_page": per_page,
    })))
}

/// 获取菜谱详情
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path((category_id, recipe_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let category_id = resolve_category(&state, auth_context.user_id, category_id).await?;

    let repo = RecipeRepository::new(state.db.clone());
    let recipe = repo
        .find_by_id(category_id, recipe_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(RecipeResponse::from(recipe)))
}

/// 更新菜谱，缺省字段保持原值
pub async fn update_recipe(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path((category_id, recipe_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateRecipeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category_id = resolve_category(&state, auth_context.user_id, category_id).await?;

    let recipe_name = match &req.recipe_name {
        Some(name) => {
            validation::validate_name(name, "recipe_name")?;
            Some(name.trim())
        }
        None => None,
    };

    let repo = RecipeRepository::new(state.db.clone());

    if let Some(name) = recipe_name {
        if let Some(existing) = repo.find_by_name(category_id, name).await? {
            if existing.recipe_id != recipe_id {
                return Err(AppError::Conflict(
                    "Recipe already exists in this category.".to_string(),
                ));
            }
        }
    }

    let recipe = repo
        .update(
            category_id,
            recipe_id,
            recipe_name,
            req.ingredients.as_deref(),
            req.directions.as_deref(),
        )
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(RecipeResponse::from(recipe)))
}

/// 删除菜谱
pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path((category_id, recipe_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let category_id = resolve_category(&state, auth_context.user_id, category_id).await?;

    let repo = RecipeRepository::new(state.db.clone());
    let deleted = repo.delete(category_id, recipe_id).await?;

    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({
        "message": format!("Recipe {} deleted successfully.", recipe_id)
    })))
}
