//! Microsoft identity OAuth client.
//!
//! Implements the delegated authorization-code flow against Azure AD:
//!
//! 1. Generate the authorization URL with [`AuthService::authorization_url`]
//! 2. Redirect the user to Microsoft's login page
//! 3. Microsoft redirects back with an authorization code
//! 4. Exchange it with [`AuthService::exchange_code`]
//! 5. Later calls use [`AuthService::access_token`], which serves the cached
//!    token while it is fresh and silently refreshes it when it is not
//!
//! Tokens are persisted through [`store::TokenStore`] so the login survives
//! restarts. When no Azure credentials are configured every method returns
//! [`AuthError::NotConfigured`]; the photos endpoint uses that to degrade to
//! placeholder images instead of failing.

pub mod store;

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config::AzureConfig;
use store::{StoredToken, TokenStore};

/// Graph scopes requested for the delegated token.
const SCOPES: &str = "Files.Read offline_access";

/// Seconds of remaining validity below which a token is refreshed early.
const EXPIRY_LEEWAY_SECS: i64 = 60;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the OAuth token service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Azure credentials are absent or placeholders; auth is disabled.
    #[error("Azure credentials not configured")]
    NotConfigured,

    /// No usable token and no way to refresh one silently.
    #[error("User login required")]
    LoginRequired,

    /// The identity provider rejected a token request.
    #[error("Token request rejected: {0}")]
    Rejected(String),

    /// HTTP transport failure talking to the identity provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The acquired token could not be persisted.
    #[error("Failed to persist token: {0}")]
    Persist(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
}

/// OAuth client for the Microsoft identity platform.
#[derive(Clone)]
pub struct AuthService {
    inner: Arc<AuthServiceInner>,
}

struct AuthServiceInner {
    client: reqwest::Client,
    config: Option<AzureConfig>,
    store: TokenStore,
}

impl AuthService {
    /// Create the auth service. `config` is `None` when credentials are not
    /// configured, in which case every operation fails with `NotConfigured`.
    #[must_use]
    pub fn new(config: Option<AzureConfig>, store: TokenStore) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            inner: Arc::new(AuthServiceInner {
                client,
                config,
                store,
            }),
        }
    }

    fn config(&self) -> Result<&AzureConfig, AuthError> {
        self.inner.config.as_ref().ok_or(AuthError::NotConfigured)
    }

    /// Whether Azure credentials are configured at all.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.config.is_some()
    }

    /// Authorization URL to redirect the user to for login.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` when auth is disabled.
    pub fn authorization_url(&self) -> Result<String, AuthError> {
        let config = self.config()?;
        Ok(format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/authorize?\
            client_id={}&\
            response_type=code&\
            redirect_uri={}&\
            response_mode=query&\
            scope={}",
            config.tenant_id,
            urlencoding::encode(&config.client_id),
            urlencoding::encode(&config.redirect_uri),
            urlencoding::encode(SCOPES),
        ))
    }

    fn token_endpoint(config: &AzureConfig) -> String {
        format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            config.tenant_id
        )
    }

    /// Exchange an authorization code for tokens and persist them.
    ///
    /// # Errors
    ///
    /// Returns an error if auth is disabled, the exchange is rejected, or
    /// the token cannot be persisted.
    pub async fn exchange_code(&self, code: &str) -> Result<(), AuthError> {
        let config = self.config()?;
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", &config.client_id),
            ("client_secret", &config.client_secret),
            ("code", code),
            ("redirect_uri", &config.redirect_uri),
            ("scope", SCOPES),
        ];
        let token = self.request_token(Self::token_endpoint(config), &params).await?;
        self.persist(token)?;
        tracing::info!("OAuth code exchanged; token cached");
        Ok(())
    }

    /// Return a valid bearer token, refreshing silently if needed.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` when auth is disabled and `LoginRequired` when
    /// there is no token and no working refresh token.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let config = self.config()?;
        let Some(token) = self.inner.store.current() else {
            return Err(AuthError::LoginRequired);
        };

        let now = chrono::Utc::now().timestamp();
        if token.is_fresh(now, EXPIRY_LEEWAY_SECS) {
            return Ok(token.access_token);
        }

        let Some(refresh_token) = token.refresh_token else {
            return Err(AuthError::LoginRequired);
        };

        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", &config.client_id),
            ("client_secret", &config.client_secret),
            ("refresh_token", &refresh_token),
            ("scope", SCOPES),
        ];
        let refreshed = match self.request_token(Self::token_endpoint(config), &params).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Silent token refresh failed");
                return Err(AuthError::LoginRequired);
            }
        };

        let access_token = refreshed.access_token.clone();
        self.persist(refreshed)?;
        Ok(access_token)
    }

    async fn request_token(
        &self,
        url: String,
        params: &[(&str, &str)],
    ) -> Result<StoredToken, AuthError> {
        let response = self.inner.client.post(&url).form(params).send().await?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected(detail));
        }

        let token: TokenResponse = response.json().await?;
        Ok(StoredToken {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: chrono::Utc::now().timestamp() + token.expires_in,
        })
    }

    fn persist(&self, token: StoredToken) -> Result<(), AuthError> {
        self.inner.store.store(token)?;
        Ok(())
    }
}
