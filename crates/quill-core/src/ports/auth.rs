//! Authentication ports. Tokens are issued by an external identity service;
//! this side only validates them.

use uuid::Uuid;

use crate::domain::{Actor, Role};

/// Claims carried by a bearer token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub name: String,
    pub role: Role,
    pub exp: i64,
}

impl TokenClaims {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Sign a token for a user. Used by tooling and tests.
    fn generate_token(&self, user_id: Uuid, name: &str, role: Role) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
