//! Token endpoint integration tests using wiremock
//!
//! Drives exchange, refresh and revoke against a mock provider and checks
//! the form parameters, the client credential and the error mapping.

mod common;

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{netcord_for, test_config, BASIC_AUTH};
use netcord::config::ClientAuthMethod;
use netcord::{Netcord, NetcordError, TokenTypeHint};

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_exchange_code_without_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .and(body_string_contains(
            "redirect_uri=https%3A%2F%2Fapp.example.com%2Fcallback",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "X",
            "token_type": "Bearer",
            "expires_in": 604800
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = netcord_for(&server)
        .exchange_code("the-code")
        .await
        .expect("exchange must succeed on 200");

    assert_eq!(token.access_token, "X");
    assert_eq!(token.token_type, "Bearer");
    assert!(token.refresh_token.is_none());
    assert!(!token.is_expired());

    server.verify().await;
}

#[tokio::test]
async fn test_exchange_code_invalid_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({"error": "invalid_grant"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = netcord_for(&server)
        .exchange_code("stale")
        .await
        .expect_err("400 must fail");

    match err {
        NetcordError::TokenExchange { status, detail } => {
            assert_eq!(status, 400);
            assert!(detail.contains("invalid_grant"), "detail was {detail:?}");
        }
        other => panic!("expected TokenExchange, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exchange_code_with_credentials_in_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("client_id=1234567890"))
        .and(body_string_contains("client_secret=s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "X",
            "token_type": "Bearer",
            "expires_in": 604800,
            "refresh_token": "R",
            "scope": "identify guilds"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.client_auth = ClientAuthMethod::Body;
    let netcord = Netcord::new(config).unwrap();

    let token = netcord.exchange_code("abc").await.unwrap();
    assert_eq!(token.refresh_token.as_deref(), Some("R"));
    assert!(token.has_scope("guilds"));

    server.verify().await;
}

#[tokio::test]
async fn test_exchange_code_non_json_success_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = netcord_for(&server).exchange_code("abc").await.unwrap_err();
    assert!(matches!(err, NetcordError::Decode(_)), "got {err:?}");
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_refresh_returns_replacement_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=old-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "new-access",
            "token_type": "Bearer",
            "expires_in": 604800,
            "refresh_token": "new-refresh",
            "scope": "identify email guilds"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = netcord_for(&server).refresh_token("old-refresh").await.unwrap();
    assert_eq!(token.access_token, "new-access");
    assert_eq!(token.refresh_token.as_deref(), Some("new-refresh"));

    server.verify().await;
}

#[tokio::test]
async fn test_refresh_error_uses_description() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "Unknown client"
        })))
        .mount(&server)
        .await;

    let err = netcord_for(&server).refresh_token("r").await.unwrap_err();
    assert_eq!(err.status_code(), 401);
    assert!(err.to_string().contains("Unknown client"));
}

// ---------------------------------------------------------------------------
// Revoke
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_revoke_with_hint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token/revoke"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_string_contains("token=tok"))
        .and(body_string_contains("token_type_hint=access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let revoked = netcord_for(&server)
        .revoke_token("tok", Some(TokenTypeHint::AccessToken))
        .await
        .unwrap();
    assert!(revoked);

    server.verify().await;
}

#[tokio::test]
async fn test_revoke_empty_body_is_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token/revoke"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(netcord_for(&server).revoke_token("tok", None).await.unwrap());
    server.verify().await;
}

#[tokio::test]
async fn test_revoke_failure_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token/revoke"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = netcord_for(&server).revoke_token("tok", None).await.unwrap_err();
    match err {
        NetcordError::TokenExchange { status, detail } => {
            assert_eq!(status, 503);
            assert_eq!(detail, "Failed to revoke token: HTTP 503");
        }
        other => panic!("expected TokenExchange, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Transport failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let mut config = netcord::Config::new("1234567890", "s3cret", "https://app.example.com/callback");
    config.api_base = format!("http://{address}");
    config.timeout_seconds = 2;
    let netcord = Netcord::new(config).unwrap();

    let err = netcord.exchange_code("abc").await.unwrap_err();
    assert!(matches!(err, NetcordError::Transport(_)), "got {err:?}");
}
