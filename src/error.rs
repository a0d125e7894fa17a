//! 统一错误模型
//! 定义所有错误类型和错误响应格式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用错误类型
///
/// 每种错误只对应一个 HTTP 状态码，映射集中在这里，
/// handler 不允许自行选择状态码。
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authorization header is missing")]
    MissingToken,

    #[error("Malformed authorization header")]
    MalformedAuthHeader,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingToken
            | AppError::MalformedAuthHeader
            | AppError::TokenExpired
            | AppError::TokenRevoked
            | AppError::TokenInvalid
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::MissingToken => {
                "Authorization header is missing. Please provide a token.".to_string()
            }
            AppError::MalformedAuthHeader => {
                "Invalid authorization header. Expected: Bearer <token>.".to_string()
            }
            AppError::TokenExpired => "Token expired. Please log in again.".to_string(),
            AppError::TokenRevoked => "You are logged out. Please log in again.".to_string(),
            AppError::TokenInvalid => "Invalid token. Please register or log in.".to_string(),
            AppError::InvalidCredentials => {
                "Invalid email or password, please try again.".to_string()
            }
            AppError::Validation(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::NotFound => "Resource not found.".to_string(),
            // 内部错误一律脱敏，不把异常文本回给客户端
            AppError::Database(_) => "Database error occurred.".to_string(),
            AppError::Config(_) => "Configuration error.".to_string(),
            AppError::Internal => "Internal server error.".to_string(),
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }
}

/// 错误响应 DTO，响应体固定为 {"message": "<text>"}
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 5xx 记录完整错误，4xx 只在 debug 级别记录
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Application error");
        } else {
            tracing::debug!(code = self.code(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            message: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// 从 String 转换为 AppError::Config
impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Config(s)
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::MissingToken.code(), 401);
        assert_eq!(AppError::MalformedAuthHeader.code(), 401);
        assert_eq!(AppError::TokenExpired.code(), 401);
        assert_eq!(AppError::TokenRevoked.code(), 401);
        assert_eq!(AppError::TokenInvalid.code(), 401);
        assert_eq!(AppError::InvalidCredentials.code(), 401);
        assert_eq!(AppError::Validation("x".to_string()).code(), 422);
        assert_eq!(AppError::Conflict("x".to_string()).code(), 409);
        assert_eq!(AppError::NotFound.code(), 404);
        assert_eq!(AppError::Internal.code(), 500);
    }

    #[test]
    fn test_user_message_no_sensitive_info() {
        let error = AppError::Database(sqlx::Error::RowNotFound);
        let message = error.user_message();
        assert_eq!(message, "Database error occurred.");
        assert!(!message.contains("sqlx"));
    }

    #[test]
    fn test_auth_failures_have_distinct_messages() {
        let messages = [
            AppError::MissingToken.user_message(),
            AppError::MalformedAuthHeader.user_message(),
            AppError::TokenExpired.user_message(),
            AppError::TokenRevoked.user_message(),
            AppError::TokenInvalid.user_message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
