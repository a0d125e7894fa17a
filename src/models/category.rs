//! Category row, request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category database row
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    pub user_id: i64,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

/// Category representation for API responses
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub category_id: i64,
    pub category_name: String,
    pub created_by: i64,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            category_id: category.category_id,
            category_name: category.category_name,
            created_by: category.user_id,
            date_created: category.date_created,
            date_modified: category.date_modified,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub category_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub category_name: String,
}

/// Query parameters for list endpoints
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    /// 名称子串过滤，忽略大小写
    #[serde(default)]
    pub q: String,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    5
}

impl ListQuery {
    /// 归一化分页参数：page 至少为 1，per_page 限制在 1..=100
    pub fn normalized(&self) -> (i64, i64) {
        (self.page.max(1), self.per_page.clamp(1, 100))
    }

    /// SQL OFFSET
    ///
    /// page 来自请求方，i64::MAX 级别的值不能触发乘法溢出。
    pub fn offset(&self) -> i64 {
        let (page, per_page) = self.normalized();
        (page - 1).saturating_mul(per_page)
    }
}
