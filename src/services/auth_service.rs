//! 认证服务：注册、登录、登出、密码重置

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    config::AppConfig,
    error::AppError,
    models::auth::{LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest},
    repository::{TokenRepository, UserRepository},
    validation,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

pub struct AuthService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_service: Arc<JwtService>, config: Arc<AppConfig>) -> Self {
        Self {
            db,
            jwt_service,
            config,
        }
    }

    /// 用户注册
    pub async fn register(&self, req: RegisterRequest) -> Result<(), AppError> {
        validation::validate_email(&req.email)?;
        validation::validate_password(&req.password, self.config.security.password_min_length)?;

        let user_repo = UserRepository::new(self.db.clone());

        // 先查重给出友好提示；并发竞争由唯一约束兜底
        if user_repo.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::Conflict(
                "User already exists. Please login.".to_string(),
            ));
        }

        let hasher = PasswordHasher::new();
        let password_hash = hasher.hash(&req.password)?;

        let user = user_repo
            .create(
                &req.email,
                &password_hash,
                req.security_question.as_deref(),
                req.security_answer.as_deref(),
            )
            .await?;

        tracing::info!(user_id = user.user_id, "User registered");
        Ok(())
    }

    /// 用户登录，签发访问令牌
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        // 未知邮箱和密码错误返回同一个 401，不区分两种失败
        let user = user_repo
            .find_by_email(&req.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let hasher = PasswordHasher::new();
        hasher.verify(&req.password, &user.password_hash)?;

        let access_token = self.jwt_service.issue(user.user_id)?;

        tracing::info!(user_id = user.user_id, "User logged in");

        Ok(LoginResponse {
            message: "You logged in successfully.".to_string(),
            access_token,
            expires_in: self.jwt_service.token_exp_secs(),
        })
    }

    /// 登出：将当前令牌写入撤销表
    pub async fn logout(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
        user_id: i64,
    ) -> Result<(), AppError> {
        let token_repo = TokenRepository::new(self.db.clone());
        token_repo.revoke(token, expires_at).await?;

        // 顺手清理已过期的撤销条目，撤销表不会无限增长；
        // 清理失败不影响登出本身，但要留痕
        if let Err(e) = token_repo.prune_expired().await {
            tracing::warn!("Failed to prune revoked tokens: {}", e);
        }

        tracing::info!(user_id, "User logged out");
        Ok(())
    }

    /// 密码重置
    ///
    /// 安全答案与存储值明文比对。原系统即如此，意图不明确，
    /// 保持原行为（见 DESIGN.md）。
    pub async fn reset_password(&self, req: ResetPasswordRequest) -> Result<(), AppError> {
        validation::validate_password(&req.new_password, self.config.security.password_min_length)?;

        let user_repo = UserRepository::new(self.db.clone());
        let user = user_repo
            .find_by_email(&req.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let stored_answer = user
            .security_answer
            .as_deref()
            .ok_or(AppError::InvalidCredentials)?;

        if stored_answer != req.security_answer {
            tracing::debug!(user_id = user.user_id, "Security answer mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let hasher = PasswordHasher::new();
        let password_hash = hasher.hash(&req.new_password)?;
        user_repo.update_password(user.user_id, &password_hash).await?;

        tracing::info!(user_id = user.user_id, "Password reset");
        Ok(())
    }
}
