//! User repository (数据库访问层)

use crate::{error::AppError, models::user::User, repository::map_unique_violation};
use sqlx::PgPool;

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据邮箱查找用户
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 创建用户
    ///
    /// 数据库唯一约束兜底邮箱查重，并发注册同一邮箱时也返回 409。
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        security_question: Option<&str>,
        security_answer: Option<&str>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, security_question, security_answer)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(security_question)
        .bind(security_answer)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "User already exists. Please login."))?;

        Ok(user)
    }

    /// 更新密码
    pub async fn update_password(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, date_modified = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
