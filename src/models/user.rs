//! User row type

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// User database row
///
/// 密码只存哈希，任何响应 DTO 都不携带此行。
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}
