//! 认证中间件（认证网关）
//!
//! 认证失败即终止请求，handler 不会执行。
//! 检查顺序：缺失 → 格式错误 → 已撤销 → 解码（过期/无效）。

use crate::{error::AppError, middleware::AppState, repository::TokenRepository};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

/// 认证上下文（附加到请求扩展）
///
/// 保留原始令牌和过期时间，登出时写入撤销表需要。
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::MissingToken)
    }
}

/// 从 Authorization 头提取令牌
///
/// 区分"缺失"和"格式错误"：头必须是空白分隔的两段，且 scheme 为 Bearer。
/// 解析是可失败操作，绝不做未检查的 split 取下标。
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    let header = headers
        .get("authorization")
        .ok_or(AppError::MissingToken)?
        .to_str()
        .map_err(|_| AppError::MalformedAuthHeader)?;

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Ok(token.to_string())
        }
        _ => Err(AppError::MalformedAuthHeader),
    }
}

/// 认证中间件 - 保护路由必须通过
pub async fn bearer_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. 从 Authorization 头提取令牌
    let token = extract_token(req.headers())?;

    // 2. 撤销检查先于解码：登出的令牌即使签名有效也拒绝
    let token_repo = TokenRepository::new(state.db.clone());
    if token_repo.is_revoked(&token).await? {
        return Err(AppError::TokenRevoked);
    }

    // 3. 验证签名与过期时间
    let claims = state.jwt_service.decode_claims(&token)?;
    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::TokenInvalid)?;

    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .ok_or(AppError::TokenInvalid)?;

    // 4. 附加认证上下文到请求扩展
    req.extensions_mut().insert(AuthContext {
        user_id,
        token,
        expires_at,
    });

    Ok(next.run(req).await)
}
