//! Caller-side credential helpers
//!
//! - [`bearer::parse_bearer`] extracts the access token from an
//!   `Authorization` header value, independent of any web framework.
//! - [`jwt::SessionJwt`] issues and verifies the host's own session tokens
//!   once the provider login has completed.

pub mod bearer;
pub mod jwt;

pub use bearer::parse_bearer;
pub use jwt::{SessionJwt, SessionTokens, TokenKind};
