//! Recipe repository (数据库访问层)
//!
//! 菜谱查询都以 category_id 为范围；调用方必须先用属主解析出分类，
//! 菜谱的有效属主通过分类传递。

use crate::{error::AppError, models::recipe::Recipe, repository::map_unique_violation};
use sqlx::PgPool;

pub struct RecipeRepository {
    db: PgPool,
}

impl RecipeRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 在分类下创建菜谱
    pub async fn create(
        &self,
        category_id: i64,
        recipe_name: &str,
        ingredients: &str,
        directions: &str,
    ) -> Result<Recipe, AppError> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (recipe_name, ingredients, directions, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(recipe_name)
        .bind(ingredients)
        .bind(directions)
        .bind(category_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Recipe already exists in this category."))?;

        Ok(recipe)
    }

    /// 按分类查找菜谱
    pub async fn find_by_id(
        &self,
        category_id: i64,
        recipe_id: i64,
    ) -> Result<Option<Recipe>, AppError> {
        let recipe = sqlx::query_as::<_, Recipe>(
            "SELECT * FROM recipes WHERE recipe_id = $1 AND category_id = $2",
        )
        .bind(recipe_id)
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(recipe)
    }

    /// 按分类和名称查找菜谱（查重用）
    pub async fn find_by_name(
        &self,
        category_id: i64,
        recipe_name: &str,
    ) -> Result<Option<Recipe>, AppError> {
        let recipe = sqlx::query_as::<_, Recipe>(
            "SELECT * FROM recipes WHERE category_id = $1 AND recipe_name = $2",
        )
        .bind(category_id)
        .bind(recipe_name)
        .fetch_optional(&self.db)
        .await?;

        Ok(recipe)
    }

    /// 分页列出分类下的菜谱，支持名称子串过滤（忽略大小写）
    pub async fn list(
        &self,
        category_id: i64,
        filter: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Recipe>, AppError> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT * FROM recipes
            WHERE category_id = $1 AND recipe_name ILIKE '%' || $2 || '%'
            ORDER BY recipe_id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(category_id)
        .bind(filter)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(recipes)
    }

    /// 统计分类下匹配过滤条件的菜谱数量
    pub async fn count(&self, category_id: i64, filter: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM recipes
            WHERE category_id = $1 AND recipe_name ILIKE '%' || $2 || '%'
            "#,
        )
        .bind(category_id)
        .bind(filter)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    /// 更新菜谱，缺省字段保持原值
    pub async fn update(
        &self,
        category_id: i64,
        recipe_id: i64,
        recipe_name: Option<&str>,
        ingredients: Option<&str>,
        directions: Option<&str>,
    ) -> Result<Option<Recipe>, AppError> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            UPDATE recipes
            SET
                recipe_name = COALESCE($3, recipe_name),
                ingredients = COALESCE($4, ingredients),
                directions = COALESCE($5, directions),
                date_modified = NOW()
            WHERE recipe_id = $1 AND category_id = $2
            RETURNING *
            "#,
        )
        .bind(recipe_id)
        .bind(category_id)
        .bind(recipe_name)
        .bind(ingredients)
        .bind(directions)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Recipe already exists in this category."))?;

        Ok(recipe)
    }

    /// 删除菜谱
    pub async fn delete(&self, category_id: i64, recipe_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM recipes WHERE recipe_id = $1 AND category_id = $2")
            .bind(recipe_id)
            .bind(category_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
