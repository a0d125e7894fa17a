//! 令牌撤销表（数据库访问层）
//!
//! 以令牌原文为键的扁平集合。条目一旦写入，对应令牌即使签名有效、
//! 未到期也不再通过认证。

use crate::error::AppError;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct TokenRepository {
    db: PgPool,
}

impl TokenRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 撤销令牌，重复撤销是幂等操作
    ///
    /// expires_at 取令牌自身的 exp：过了这个时间令牌本身已失效，
    /// 条目就可以被清理。
    pub async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (token, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(token)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// 令牌是否已被撤销
    pub async fn is_revoked(&self, token: &str) -> Result<bool, AppError> {
        let revoked: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token = $1)")
                .bind(token)
                .fetch_one(&self.db)
                .await?;

        Ok(revoked)
    }

    /// 清理已过期的撤销条目，返回删除数量
    ///
    /// 过期令牌永远无法再次通过校验，删除条目不影响安全性。
    pub async fn prune_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < NOW()")
            .execute(&self.db)
            .await?;

        let pruned = result.rows_affected();
        if pruned > 0 {
            tracing::info!(pruned, "Pruned expired revoked tokens");
        }

        Ok(pruned)
    }
}
