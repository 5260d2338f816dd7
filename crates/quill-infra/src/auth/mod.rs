//! Authentication implementations.

mod jwt;

pub use jwt::{DEFAULT_ISSUER, DEFAULT_SECRET, JwtConfig, JwtTokenService};
