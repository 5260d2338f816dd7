//! Authentication port. Tokens are issued elsewhere; this side only checks them.

/// Claims carried by an admin access token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub admin_id: i32,
    pub email: String,
    pub roles: Vec<String>,
    pub exp: i64,
}

/// Validates bearer tokens presented to the admin API.
pub trait TokenService: Send + Sync {
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

    #[error("Insufficient permissions")]
    InsufficientPermissions,
}
