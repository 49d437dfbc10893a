use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use wiremock::MockServer;

use netcord::{Config, Netcord};

/// `base64("1234567890:s3cret")`, the Basic credential of [`test_config`].
#[allow(dead_code)]
pub const BASIC_AUTH: &str = "Basic MTIzNDU2Nzg5MDpzM2NyZXQ=";

/// Configuration pointing the API base at `server`.
#[allow(dead_code)]
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::new("1234567890", "s3cret", "https://app.example.com/callback");
    config.api_base = server.uri();
    config.timeout_seconds = 5;
    config
}

/// Engine against `server` with the default scopes and no bot token.
#[allow(dead_code)]
pub fn netcord_for(server: &MockServer) -> Netcord {
    Netcord::new(test_config(server)).expect("test config must be valid")
}

#[allow(dead_code)]
pub fn user_body() -> serde_json::Value {
    serde_json::json!({
        "id": "80351110224678912",
        "username": "Nelly",
        "discriminator": "1337",
        "avatar": "8342729096ea3675442027381ff50dfe",
        "verified": true,
        "email": "nelly@example.com",
        "mfa_enabled": false,
        "locale": "en-US"
    })
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("netcord.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
