//! 分类管理的 HTTP 处理器
//!
//! 所有操作都以网关解析出的 user_id 为范围；
//! 解析不到的分类一律 404，属主过滤就是授权检查。

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::category::{
        CategoryResponse, CreateCategoryRequest, ListQuery, UpdateCategoryRequest,
    },
    repository::CategoryRepository,
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

/// 创建分类
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_name(&req.category_name, "category_name")?;
    let category_name = req.category_name.trim();

    let repo = CategoryRepository::new(state.db.clone());

    if repo
        .find_by_name(auth_context.user_id, category_name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Category already exists.".to_string()));
    }

    let category = repo.create(auth_context.user_id, category_name).await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse::from(category)),
    ))
}

/// 分页列出分类
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CategoryRepository::new(state.db.clone());

    let (page, per_page) = query.normalized();
    let total = repo.count(auth_context.user_id, &query.q).await?;
    let categories = repo
        .list(auth_context.user_id, &query.q, per_page, query.offset())
        .await?;

    let items: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();

    Ok(Json(json!({
        "categories": items,
        "total": total,
        "page": page,
        "per_page": per_page,
    })))
}

/// 获取分类详情
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(category_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .find_by_id(auth_context.user_id, category_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(CategoryResponse::from(category)))
}

/// 重命名分类
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(category_id): Path<i64>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_name(&req.category_name, "category_name")?;
    let category_name = req.category_name.trim();

    let repo = CategoryRepository::new(state.db.clone());

    // 改名不能撞上同属主的其他分类
    if let Some(existing) = repo
        .find_by_name(auth_context.user_id, category_name)
        .await?
    {
        if existing.category_id != category_id {
            return Err(AppError::Conflict("Category already exists.".to_string()));
        }
    }

    let category = repo
        .update(auth_context.user_id, category_id, category_name)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(CategoryResponse::from(category)))
}

/// 删除分类（级联删除其下菜谱）
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(category_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CategoryRepository::new(state.db.clone());
    let deleted = repo.delete(auth_context.user_id, category_id).await?;

    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({
        "message": format!("Category {} deleted successfully.", category_id)
    })))
}
