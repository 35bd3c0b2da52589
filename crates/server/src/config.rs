//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CATALOG_HOST` - Bind address (default: 127.0.0.1)
//! - `CATALOG_PORT` - Listen port (default: 8000)
//! - `CATALOG_FRONTEND_DIR` - Static frontend directory (default: frontend)
//! - `CATALOG_TOKEN_CACHE` - Token cache file (default: token_cache.json)
//! - `AZURE_CLIENT_ID` - Azure AD application (client) ID
//! - `AZURE_CLIENT_SECRET` - Azure AD client secret
//! - `AZURE_TENANT_ID` - Azure AD tenant ID
//! - `AZURE_REDIRECT_URI` - OAuth redirect URI registered for the app
//!
//! The four `AZURE_*` variables are required as a group: if any is missing or
//! holds an obvious placeholder value, OneDrive access is disabled and the
//! photos endpoint serves placeholder images instead.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the single-page frontend
    pub frontend_dir: PathBuf,
    /// Path of the persisted OAuth token blob
    pub token_cache_path: PathBuf,
    /// Azure AD credentials; `None` disables OneDrive access
    pub azure: Option<AzureConfig>,
}

/// Azure AD app registration used for the Microsoft Graph OAuth flow.
#[derive(Clone)]
pub struct AzureConfig {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub redirect_uri: String,
}

impl std::fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("tenant_id", &self.tenant_id)
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    /// Missing Azure credentials are not an error; they disable auth.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("CATALOG_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CATALOG_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_PORT".to_string(), e.to_string()))?;
        let frontend_dir = PathBuf::from(get_env_or_default("CATALOG_FRONTEND_DIR", "frontend"));
        let token_cache_path =
            PathBuf::from(get_env_or_default("CATALOG_TOKEN_CACHE", "token_cache.json"));
        let azure = AzureConfig::from_env();

        if azure.is_none() {
            tracing::warn!("Azure credentials not set or invalid; OneDrive access disabled");
        }

        Ok(Self {
            host,
            port,
            frontend_dir,
            token_cache_path,
            azure,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AzureConfig {
    /// Read the Azure credential set, returning `None` unless all four
    /// variables are present and look usable.
    fn from_env() -> Option<Self> {
        let client_id = get_optional_env("AZURE_CLIENT_ID")?;
        let client_secret = get_optional_env("AZURE_CLIENT_SECRET")?;
        let tenant_id = get_optional_env("AZURE_TENANT_ID")?;
        let redirect_uri = get_optional_env("AZURE_REDIRECT_URI")?;

        // A committed .env template often ships with dummy values like
        // "seu-tenant-id"; treat those the same as unset.
        for value in [&client_id, &client_secret, &tenant_id] {
            if is_placeholder(value) {
                return None;
            }
        }

        Some(Self {
            client_id,
            client_secret,
            tenant_id,
            redirect_uri,
        })
    }
}

/// Whether an env value is an obvious stand-in rather than a credential.
fn is_placeholder(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower.is_empty() || lower == "none" || lower.contains("seu")
}

/// Get an optional environment variable, treating empty as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
