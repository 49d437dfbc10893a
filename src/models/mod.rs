//! Records exchanged with the provider
//!
//! All records ignore fields they do not model, so new provider fields do
//! not break deserialization.
//!
//! - [`token`]       -- OAuth2 token endpoint response
//! - [`user`]        -- current user and user-by-id lookups
//! - [`guild`]       -- partial guilds from the current user's guild list
//! - [`application`] -- application metadata and token introspection

pub mod application;
pub mod guild;
pub mod token;
pub mod user;

pub use application::{Application, AuthorizationInfo};
pub use guild::{Guild, GuildRole};
pub use token::{Token, TokenTypeHint};
pub use user::User;
