//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{bearer_auth_middleware, extract_token, AuthContext};
pub use password::PasswordHasher;
