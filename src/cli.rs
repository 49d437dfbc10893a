//! Command-line interface definition for Netcord
//!
//! This module defines the CLI structure using clap's derive API. Every
//! subcommand maps onto one engine operation and prints its result as JSON.

use clap::{Parser, Subcommand};

use crate::models::TokenTypeHint;

/// Netcord - OAuth2 operator tool
///
/// Build authorization URLs, exchange and manage tokens, and inspect the
/// identity resources a token grants access to.
#[derive(Parser, Debug, Clone)]
#[command(name = "netcord")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "netcord.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Netcord
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print an authorization URL
    AuthorizeUrl {
        /// Session identifier to bind a state nonce to
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Exchange an authorization code for a token
    Exchange {
        /// Code received on the redirect URI
        #[arg(long)]
        code: String,
    },

    /// Renew a token with its refresh token
    Refresh {
        #[arg(long, env = "NETCORD_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: String,
    },

    /// Revoke an access or refresh token
    Revoke {
        #[arg(long, env = "NETCORD_ACCESS_TOKEN", hide_env_values = true)]
        token: String,

        /// access_token or refresh_token
        #[arg(long)]
        hint: Option<TokenTypeHint>,
    },

    /// Show the user an access token belongs to
    Whoami {
        #[arg(long, env = "NETCORD_ACCESS_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// List the guilds of the token's user
    Guilds {
        #[arg(long, env = "NETCORD_ACCESS_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Look up a user by id (requires bot_token)
    User {
        #[arg(long)]
        id: String,
    },

    /// Show application metadata (requires bot_token)
    Application,

    /// Check whether an access token is still accepted
    Check {
        #[arg(long, env = "NETCORD_ACCESS_TOKEN", hide_env_values = true)]
        token: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
