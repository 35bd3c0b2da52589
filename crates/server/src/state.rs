//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::AuthService;
use crate::auth::store::TokenStore;
use crate::config::Config;
use crate::graph::GraphClient;
use crate::images::ImageFinder;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Owns the single process-wide image cache
/// (inside the finder), created once at startup and never torn down.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    graph: GraphClient,
    finder: ImageFinder<GraphClient>,
    auth: AuthService,
    http: reqwest::Client,
}

impl AppState {
    /// Build the state: load the persisted token blob, wire the auth service
    /// into the Graph client and the Graph client into the image finder.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let store = TokenStore::load(config.token_cache_path.clone());
        let auth = AuthService::new(config.azure.clone(), store);
        let graph = GraphClient::new(auth.clone());
        let finder = ImageFinder::new(graph.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                graph,
                finder,
                auth,
                http: reqwest::Client::new(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    #[must_use]
    pub fn graph(&self) -> &GraphClient {
        &self.inner.graph
    }

    #[must_use]
    pub fn finder(&self) -> &ImageFinder<GraphClient> {
        &self.inner.finder
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Plain HTTP client for the spreadsheet fetcher.
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }
}
