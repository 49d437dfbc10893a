//! The OAuth2 token-and-identity engine
//!
//! [`Netcord`] ties together the transport, the per-instance response
//! cache and the CSRF state store. It is cheap to clone; clones share the
//! same cache and pending states. Separate instances share nothing.
//!
//! Local preconditions (granted scope, bot credential, well-formed ids) are
//! checked before any request is built. Provider and network failures are
//! returned as typed errors and never retried.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::cache::{cache_key, Cache, CacheOptions};
use crate::config::{ClientAuthMethod, Config};
use crate::error::{NetcordError, Result};
use crate::models::{Application, AuthorizationInfo, Guild, Token, TokenTypeHint, User};
use crate::scopes::{Scope, ScopeSet};
use crate::snowflake;
use crate::state::StateStore;
use crate::transport::{decode, ApiRequest, Credential, HttpTransport, Transport};

/// Token endpoint, relative to the API base.
pub const TOKEN_PATH: &str = "/oauth2/token";

/// Revocation endpoint, relative to the API base.
pub const REVOKE_PATH: &str = "/oauth2/token/revoke";

/// OAuth2 client engine for one application registration.
///
/// # Examples
///
/// ```
/// use netcord::{Config, Netcord};
///
/// let config = Config::new("1234567890", "s3cret", "https://app.example.com/callback");
/// let netcord = Netcord::new(config).unwrap();
///
/// let url = netcord.build_authorization_url(Some("session-1"), &[]);
/// assert!(url.starts_with("https://discord.com/oauth2/authorize?client_id=1234567890"));
/// assert!(url.contains("scope=identify+email+guilds"));
/// assert!(url.contains("state="));
/// ```
#[derive(Debug, Clone)]
pub struct Netcord {
    config: Arc<Config>,
    authorize_url: Url,
    scopes: ScopeSet,
    transport: Arc<dyn Transport>,
    cache: Arc<Cache>,
    states: Arc<StateStore>,
}

impl Netcord {
    /// Builds an engine with the reqwest transport rooted at
    /// `config.api_base`.
    ///
    /// # Errors
    ///
    /// Returns [`NetcordError::Config`] if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(
            &config.api_base,
            Duration::from_secs(config.timeout_seconds),
        )?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Builds an engine on top of any [`Transport`].
    ///
    /// # Errors
    ///
    /// Returns [`NetcordError::Config`] if the configuration is invalid.
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        let authorize_url = Url::parse(&config.authorize_url)
            .map_err(|e| NetcordError::Config(format!("Invalid authorize_url: {e}")))?;
        let scopes = ScopeSet::new(&config.scopes);
        let cache = Cache::new(Duration::from_secs(config.cache_ttl_seconds));

        tracing::debug!(
            client_id = %config.client_id,
            scopes = %scopes.joined(),
            api_base = %config.api_base,
            "Netcord engine initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            authorize_url,
            scopes,
            transport,
            cache: Arc::new(cache),
            states: Arc::new(StateStore::new()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scopes requested at authorization and assumed granted.
    pub fn scopes(&self) -> &ScopeSet {
        &self.scopes
    }

    /// The instance response cache, for explicit invalidation.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// The instance CSRF state store.
    pub fn states(&self) -> &StateStore {
        &self.states
    }

    // -----------------------------------------------------------------
    // Authorization
    // -----------------------------------------------------------------

    /// Assembles the provider's authorize URL.
    ///
    /// With a `session_id`, a fresh state nonce is issued for that session
    /// (replacing any earlier one) and embedded as `state`. `extra_params`
    /// are appended after the standard parameters. No request is made.
    pub fn build_authorization_url(
        &self,
        session_id: Option<&str>,
        extra_params: &[(&str, &str)],
    ) -> String {
        let mut url = self.authorize_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", &self.config.redirect_uri)
                .append_pair("response_type", "code")
                .append_pair("scope", &self.scopes.joined());

            if let Some(session_id) = session_id {
                query.append_pair("state", &self.states.issue(session_id));
            }
            if !self.config.prompt.is_empty() {
                query.append_pair("prompt", &self.config.prompt);
            }
            for (name, value) in extra_params {
                query.append_pair(name, value);
            }
        }
        url.into()
    }

    /// Checks the `state` returned on the callback against the nonce issued
    /// for `session_id`. Single use: the nonce is consumed either way.
    ///
    /// # Errors
    ///
    /// Returns [`NetcordError::Forbidden`] for an unknown session or a
    /// mismatched state.
    pub fn verify_state(&self, session_id: &str, state: &str) -> Result<()> {
        self.states.verify(session_id, state)
    }

    // -----------------------------------------------------------------
    // Token lifecycle
    // -----------------------------------------------------------------

    /// Exchanges an authorization code for a token.
    ///
    /// # Errors
    ///
    /// - [`NetcordError::TokenExchange`] on a non-2xx response.
    /// - [`NetcordError::Transport`] or [`NetcordError::Decode`] otherwise.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        let form = vec![
            ("grant_type", "authorization_code".to_string()),
            ("code", code.to_string()),
            ("redirect_uri", self.config.redirect_uri.clone()),
        ];
        let body = self.token_request(TOKEN_PATH, form, "exchange code").await?;
        let token: Token = decode(body)?;

        tracing::info!(
            scopes = %token.scope.join(" "),
            expires_in = token.expires_in,
            "Exchanged authorization code"
        );
        Ok(token)
    }

    /// Renews a token with a refresh grant.
    ///
    /// The returned token may carry a new refresh token that replaces the
    /// one passed in.
    ///
    /// # Errors
    ///
    /// Same as [`exchange_code`](Self::exchange_code).
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token> {
        let form = vec![
            ("grant_type", "refresh_token".to_string()),
            ("refresh_token", refresh_token.to_string()),
        ];
        let body = self.token_request(TOKEN_PATH, form, "refresh token").await?;
        let token: Token = decode(body)?;

        tracing::info!(expires_in = token.expires_in, "Refreshed access token");
        Ok(token)
    }

    /// Revokes an access or refresh token.
    ///
    /// Returns `Ok(true)` on any 2xx. A non-2xx is reported as
    /// [`NetcordError::TokenExchange`] even when the provider merely says
    /// the token was already invalid; tolerating that is up to the caller.
    pub async fn revoke_token(&self, token: &str, hint: Option<TokenTypeHint>) -> Result<bool> {
        let mut form = vec![("token", token.to_string())];
        if let Some(hint) = hint {
            form.push(("token_type_hint", hint.as_str().to_string()));
        }
        self.token_request(REVOKE_PATH, form, "revoke token").await?;

        tracing::info!(hint = hint.map(|h| h.as_str()), "Revoked token");
        Ok(true)
    }

    async fn token_request(
        &self,
        path: &str,
        mut form: Vec<(&str, String)>,
        action: &str,
    ) -> Result<Option<Value>> {
        let mut request = ApiRequest::post(path);
        match self.config.client_auth {
            ClientAuthMethod::Basic => {
                request = request.auth(Credential::Basic {
                    client_id: self.config.client_id.clone(),
                    client_secret: self.config.client_secret.clone(),
                });
            }
            ClientAuthMethod::Body => {
                form.insert(0, ("client_secret", self.config.client_secret.clone()));
                form.insert(0, ("client_id", self.config.client_id.clone()));
            }
        }

        self.transport
            .send(request.form(form))
            .await
            .map_err(|err| match err {
                NetcordError::Upstream { status, detail } => {
                    tracing::warn!(status, action, %detail, "Token endpoint rejected request");
                    NetcordError::TokenExchange {
                        status,
                        detail: format!("Failed to {action}: {detail}"),
                    }
                }
                other => other,
            })
    }

    /// Returns `true` if the provider accepts `access_token`.
    ///
    /// Always hits the network. Any 2xx yields `Ok(true)` whatever the body,
    /// a 401 or 403 yields `Ok(false)`, and any other failure is returned as
    /// an error.
    pub async fn is_authenticated(&self, access_token: &str) -> Result<bool> {
        let request = ApiRequest::get("/oauth2/@me").auth(bearer(access_token));
        match self.send_resource(request, "check authentication").await {
            Ok(_) => Ok(true),
            Err(NetcordError::Authentication {
                status: 401 | 403, ..
            }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Introspects `access_token`: application, granted scopes, expiry and
    /// (with `identify`) the user. Never cached.
    pub async fn fetch_authorization_info(&self, access_token: &str) -> Result<AuthorizationInfo> {
        let request = ApiRequest::get("/oauth2/@me").auth(bearer(access_token));
        self.resource(request, "fetch authorization info").await
    }

    // -----------------------------------------------------------------
    // Identity resources
    // -----------------------------------------------------------------

    /// Fetches the current user, served from the cache when possible.
    ///
    /// # Errors
    ///
    /// - [`NetcordError::ScopeMissing`] without `identify`; no request is
    ///   made.
    /// - [`NetcordError::Authentication`] on a non-2xx response.
    pub async fn fetch_user(&self, access_token: &str) -> Result<User> {
        self.fetch_user_with(access_token, CacheOptions::default()).await
    }

    /// [`fetch_user`](Self::fetch_user) with explicit cache options.
    pub async fn fetch_user_with(&self, access_token: &str, options: CacheOptions) -> Result<User> {
        self.scopes.require(Scope::Identify)?;

        let key = cache_key("fetch_user", access_token);
        self.cache
            .with_cache(&key, options, move || async move {
                let request = ApiRequest::get("/users/@me").auth(bearer(access_token));
                self.resource(request, "fetch user info").await
            })
            .await
    }

    /// Fetches the current user's guilds. An empty list is a valid result.
    ///
    /// # Errors
    ///
    /// - [`NetcordError::ScopeMissing`] without `guilds`; no request is
    ///   made.
    /// - [`NetcordError::Authentication`] on a non-2xx response.
    pub async fn fetch_guilds(&self, access_token: &str) -> Result<Vec<Guild>> {
        self.fetch_guilds_with(access_token, CacheOptions::default()).await
    }

    /// [`fetch_guilds`](Self::fetch_guilds) with explicit cache options.
    pub async fn fetch_guilds_with(
        &self,
        access_token: &str,
        options: CacheOptions,
    ) -> Result<Vec<Guild>> {
        self.scopes.require(Scope::Guilds)?;

        let key = cache_key("fetch_guilds", access_token);
        self.cache
            .with_cache(&key, options, move || async move {
                let request = ApiRequest::get("/users/@me/guilds").auth(bearer(access_token));
                self.resource(request, "fetch user guilds").await
            })
            .await
    }

    /// Looks up any user by id with the bot credential.
    ///
    /// # Errors
    ///
    /// - [`NetcordError::MissingCredentials`] without a bot token.
    /// - [`NetcordError::InvalidRequest`] if `user_id` is not a snowflake.
    /// - [`NetcordError::Authentication`] on a non-2xx response.
    pub async fn fetch_user_by_id(&self, user_id: &str) -> Result<User> {
        self.fetch_user_by_id_with(user_id, CacheOptions::default()).await
    }

    /// [`fetch_user_by_id`](Self::fetch_user_by_id) with explicit cache
    /// options.
    pub async fn fetch_user_by_id_with(&self, user_id: &str, options: CacheOptions) -> Result<User> {
        let credential = self.bot_credential("fetch_user_by_id")?;
        let id = snowflake::parse(user_id)?;

        let key = cache_key("fetch_user_by_id", &id.to_string());
        self.cache
            .with_cache(&key, options, move || async move {
                let request = ApiRequest::get(format!("/users/{id}")).auth(credential);
                self.resource(request, "fetch user info").await
            })
            .await
    }

    /// Fetches this application's metadata with the bot credential.
    ///
    /// # Errors
    ///
    /// - [`NetcordError::MissingCredentials`] without a bot token.
    /// - [`NetcordError::Authentication`] on a non-2xx response.
    pub async fn fetch_application(&self) -> Result<Application> {
        self.fetch_application_with(CacheOptions::default()).await
    }

    /// [`fetch_application`](Self::fetch_application) with explicit cache
    /// options.
    pub async fn fetch_application_with(&self, options: CacheOptions) -> Result<Application> {
        let credential = self.bot_credential("fetch_application")?;

        let key = cache_key("fetch_application", &self.config.client_id);
        self.cache
            .with_cache(&key, options, move || async move {
                let request = ApiRequest::get("/applications/@me").auth(credential);
                self.resource(request, "fetch application").await
            })
            .await
    }

    fn bot_credential(&self, operation: &str) -> Result<Credential> {
        self.config
            .bot_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(|token| Credential::Bot(token.to_string()))
            .ok_or_else(|| {
                NetcordError::MissingCredentials(format!("bot_token is required for {operation}"))
            })
    }

    /// Sends a resource request and decodes the body.
    async fn resource<T: DeserializeOwned>(&self, request: ApiRequest, action: &str) -> Result<T> {
        decode(self.send_resource(request, action).await?)
    }

    /// Sends a resource request. A non-2xx becomes
    /// [`NetcordError::Authentication`] with the provider's status.
    async fn send_resource(&self, request: ApiRequest, action: &str) -> Result<Option<Value>> {
        self.transport.send(request).await.map_err(|err| match err {
            NetcordError::Upstream { status, detail } => {
                tracing::warn!(status, action, %detail, "Provider rejected resource request");
                NetcordError::Authentication {
                    status,
                    detail: format!("Failed to {action}: {detail}"),
                }
            }
            other => other,
        })
    }
}

fn bearer(access_token: &str) -> Credential {
    Credential::Bearer(access_token.to_string())
}
