//! Category repository (数据库访问层)
//!
//! 所有查询都带 user_id 过滤：非属主的分类既不可见也不可改。

use crate::{error::AppError, models::category::Category, repository::map_unique_violation};
use sqlx::PgPool;

pub struct CategoryRepository {
    db: PgPool,
}

impl CategoryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 创建分类
    pub async fn create(&self, user_id: i64, category_name: &str) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (category_name, user_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(category_name)
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Category already exists."))?;

        Ok(category)
    }

    /// 按属主查找分类
    pub async fn find_by_id(
        &self,
        user_id: i64,
        category_id: i64,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE category_id = $1 AND user_id = $2",
        )
        .bind(category_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(category)
    }

    /// 按属主和名称查找分类（查重用）
    pub async fn find_by_name(
        &self,
        user_id: i64,
        category_name: &str,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE user_id = $1 AND category_name = $2",
        )
        .bind(user_id)
        .bind(category_name)
        .fetch_optional(&self.db)
        .await?;

        Ok(category)
    }

    /// 分页列出属主的分类，支持名称子串过滤（忽略大小写）
    pub async fn list(
        &self,
        user_id: i64,
        filter: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT * FROM categories
            WHERE user_id = $1 AND category_name ILIKE '%' || $2 || '%'
            ORDER BY category_id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(filter)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    /// 统计属主名下匹配过滤条件的分类数量
    pub async fn count(&self, user_id: i64, filter: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM categories
            WHERE user_id = $1 AND category_name ILIKE '%' || $2 || '%'
            "#,
        )
        .bind(user_id)
        .bind(filter)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    /// 重命名分类
    pub async fn update(
        &self,
        user_id: i64,
        category_id: i64,
        category_name: &str,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET category_name = $3, date_modified = NOW()
            WHERE category_id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(category_id)
        .bind(user_id)
        .bind(category_name)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Category already exists."))?;

        Ok(category)
    }

    /// 删除分类，级联删除其下所有菜谱（外键 ON DELETE CASCADE）
    pub async fn delete(&self, user_id: i64, category_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1 AND user_id = $2")
            .bind(category_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
