//! Netcord - OAuth2 token-and-identity engine
//!
//! This library implements the authorization-code flow against the
//! provider's OAuth2 endpoints and the identity resources a user token
//! grants access to. The host application owns routing, sessions and token
//! storage; the engine owns the protocol.
//!
//! # Architecture
//!
//! - `client`: the [`Netcord`] engine (authorization URLs, token lifecycle,
//!   scope-gated resource fetches)
//! - `transport`: HTTP transport trait, reqwest implementation and response
//!   classification
//! - `cache`: per-instance TTL cache and the `with_cache` combinator
//! - `state`: single-use CSRF state nonces
//! - `models`: token, user, guild and application records
//! - `auth`: `Authorization` header parsing and host session JWTs
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//!
//! # Example
//!
//! ```no_run
//! use netcord::{Config, Netcord};
//!
//! #[tokio::main]
//! async fn main() -> netcord::Result<()> {
//!     let config = Config::load("netcord.yaml")?;
//!     let netcord = Netcord::new(config)?;
//!
//!     let url = netcord.build_authorization_url(Some("session-id"), &[]);
//!     println!("Visit {url}");
//!
//!     // After the redirect back:
//!     netcord.verify_state("session-id", "state-from-callback")?;
//!     let token = netcord.exchange_code("code-from-callback").await?;
//!     let user = netcord.fetch_user(&token.access_token).await?;
//!     println!("Hello {}", user.display_name());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cache;
pub mod cdn;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod scopes;
pub mod snowflake;
pub mod state;
mod store;
pub mod transport;

// Re-export commonly used types
pub use cache::{Cache, CacheOptions};
pub use client::Netcord;
pub use config::Config;
pub use error::{NetcordError, Result};
pub use models::{Application, AuthorizationInfo, Guild, GuildRole, Token, TokenTypeHint, User};
pub use scopes::{Scope, ScopeSet};
pub use state::StateStore;
