//! Database repository layer
//!
//! 所有分类/菜谱查询都带 owner 过滤条件，owner 过滤即授权边界。

pub mod category_repo;
pub mod recipe_repo;
pub mod token_repo;
pub mod user_repo;

pub use category_repo::CategoryRepository;
pub use recipe_repo::RecipeRepository;
pub use token_repo::TokenRepository;
pub use user_repo::UserRepository;

use crate::error::AppError;

/// 唯一约束冲突映射为 409，其余数据库错误保持 500
pub(crate) fn map_unique_violation(e: sqlx::Error, conflict_message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(conflict_message.to_string())
        }
        _ => AppError::Database(e),
    }
}
