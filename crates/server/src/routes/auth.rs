//! OAuth route handlers.
//!
//! - Login: redirects to the Microsoft identity authorization page
//! - Callback: exchanges the authorization code and persists the token

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthError;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Query parameters from the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
}

/// `GET /auth/login` - redirect to the identity provider.
pub async fn login(State(state): State<AppState>) -> Result<Redirect> {
    let url = state.auth().authorization_url()?;
    Ok(Redirect::to(&url))
}

/// `GET /auth/callback?code=&error=` - finish the OAuth flow.
///
/// Provider errors, a missing code and a rejected exchange all answer 400;
/// only a missing configuration is a server-side failure.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = query.error {
        tracing::warn!(%error, "OAuth provider returned an error");
        return bad_request(&error);
    }
    let Some(code) = query.code else {
        return bad_request("Missing code");
    };

    match state.auth().exchange_code(&code).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e @ (AuthError::NotConfigured | AuthError::Persist(_))) => {
            ApiError::Auth(e).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "OAuth code exchange failed");
            bad_request(&e.to_string())
        }
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
