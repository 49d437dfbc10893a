//! Netcord - OAuth2 operator CLI
//!
#![doc = "Main entry point for the netcord binary."]

use anyhow::Result;
use serde::Serialize;
use serde_json::json;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use netcord::cli::{Cli, Commands};
use netcord::{Config, Netcord};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config = Config::load(&cli.config)?;
    let netcord = Netcord::new(config)?;

    match cli.command {
        Commands::AuthorizeUrl { session } => {
            let url = netcord.build_authorization_url(session.as_deref(), &[]);
            print_json(&json!({ "url": url }))
        }
        Commands::Exchange { code } => {
            tracing::info!("Exchanging authorization code");
            print_json(&netcord.exchange_code(&code).await?)
        }
        Commands::Refresh { refresh_token } => {
            print_json(&netcord.refresh_token(&refresh_token).await?)
        }
        Commands::Revoke { token, hint } => {
            let revoked = netcord.revoke_token(&token, hint).await?;
            print_json(&json!({ "revoked": revoked }))
        }
        Commands::Whoami { token } => {
            let user = netcord.fetch_user(&token).await?;
            let cdn = &netcord.config().cdn_base;
            print_json(&json!({
                "user": user,
                "display_name": user.display_name(),
                "avatar_url": user.avatar_url(cdn),
                "created_at": user.created_at().ok(),
            }))
        }
        Commands::Guilds { token } => {
            let guilds = netcord.fetch_guilds(&token).await?;
            tracing::debug!(count = guilds.len(), "Fetched guilds");
            let cdn = &netcord.config().cdn_base;
            let rows: Vec<_> = guilds
                .iter()
                .map(|guild| {
                    json!({
                        "id": guild.id,
                        "name": guild.name,
                        "role": guild.member_role(),
                        "icon_url": guild.icon_url(cdn),
                    })
                })
                .collect();
            print_json(&rows)
        }
        Commands::User { id } => print_json(&netcord.fetch_user_by_id(&id).await?),
        Commands::Application => print_json(&netcord.fetch_application().await?),
        Commands::Check { token } => {
            let authenticated = netcord.is_authenticated(&token).await?;
            print_json(&json!({ "authenticated": authenticated }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize tracing/logging
///
/// Logs go to stderr so stdout stays valid JSON. `RUST_LOG` takes
/// precedence unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("netcord=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netcord=info"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
