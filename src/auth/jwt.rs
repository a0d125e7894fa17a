//! JWT token generation and validation

use crate::{config::AppConfig, error::AppError};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

/// Why a token failed to decode.
///
/// Callers must branch on this instead of inspecting a message string.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AppError::TokenExpired,
            TokenError::Invalid => AppError::TokenInvalid,
        }
    }
}

/// JWT service
///
/// Built once from validated config at startup; the signing secret is
/// immutable afterwards.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_exp_secs: u64,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config(
                "JWT secret too short (min 32 chars)".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_exp_secs: config.security.token_exp_secs,
        })
    }

    /// Issue a signed access token for a user
    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::seconds(self.token_exp_secs as i64);

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {:?}", e);
            AppError::Internal
        })
    }

    /// Verify signature and expiry, returning the validated claims
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Token validation failed: {:?}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        Ok(data.claims)
    }

    /// Verify signature and expiry, returning the embedded user ID
    pub fn decode(&self, token: &str) -> Result<i64, TokenError> {
        let claims = self.decode_claims(token)?;
        claims.sub.parse::<i64>().map_err(|_| TokenError::Invalid)
    }

    /// Token lifetime in seconds
    pub fn token_exp_secs(&self) -> u64 {
        self.token_exp_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig};
    use secrecy::Secret;

    fn test_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                addr: "127.0.0.1:3000".to_string(),
                graceful_shutdown_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: Secret::new("postgresql://localhost/test".to_string()),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 30,
                idle_timeout_secs: 600,
                max_lifetime_secs: 1800,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: Secret::new("test_secret_key_32_characters_long!".to_string()),
                token_exp_secs: 86400,
                password_min_length: 6,
                max_request_body_bytes: 1048576,
            },
        }
    }

    #[test]
    fn test_issue_and_decode() {
        let service = JwtService::from_config(&test_config()).unwrap();

        let token = service.issue(42).unwrap();
        let user_id = service.decode(&token).unwrap();
        assert_eq!(user_id, 42);
    }

    #[test]
    fn test_decode_garbage_is_invalid() {
        let service = JwtService::from_config(&test_config()).unwrap();
        assert_eq!(service.decode("not_a_token"), Err(TokenError::Invalid));
        assert_eq!(service.decode(""), Err(TokenError::Invalid));
    }

    #[test]
    fn test_decode_expired_token() {
        let service = JwtService::from_config(&test_config()).unwrap();

        // Craft a token whose expiry is already in the past
        let claims = Claims {
            sub: "42".to_string(),
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_key_32_characters_long!".as_bytes()),
        )
        .unwrap();

        assert_eq!(service.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_decode_wrong_secret_is_invalid() {
        let service = JwtService::from_config(&test_config()).unwrap();

        let claims = Claims {
            sub: "42".to_string(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        };
        let forged = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("another_secret_key_32_characters_x!".as_bytes()),
        )
        .unwrap();

        assert_eq!(service.decode(&forged), Err(TokenError::Invalid));
    }

    #[test]
    fn test_decode_tampered_token_is_invalid() {
        let service = JwtService::from_config(&test_config()).unwrap();

        let token = service.issue(42).unwrap();
        let mut tampered = token.clone();
        tampered.replace_range(token.len() - 2.., "xx");

        assert_eq!(service.decode(&tampered), Err(TokenError::Invalid));
    }

    #[test]
    fn test_non_numeric_subject_is_invalid() {
        let service = JwtService::from_config(&test_config()).unwrap();

        let claims = Claims {
            sub: "not-a-number".to_string(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_key_32_characters_long!".as_bytes()),
        )
        .unwrap();

        assert_eq!(service.decode(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_secret_too_short_rejected() {
        let mut config = test_config();
        config.security.jwt_secret = Secret::new("short".to_string());
        assert!(JwtService::from_config(&config).is_err());
    }
}
