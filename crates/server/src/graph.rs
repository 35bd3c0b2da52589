//! Microsoft Graph client for OneDrive folder access.
//!
//! Two capabilities, matching what the image finder needs: resolve a public
//! share link to a (drive, item) pair, and list the direct children of an
//! item. Auth failures and transport failures are kept distinct so the
//! boundary can pick degrade-vs-fail behavior.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

use crate::auth::{AuthError, AuthService};

const BASE_URL: &str = "https://graph.microsoft.com/v1.0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the Graph client.
#[derive(Debug, Error)]
pub enum GraphError {
    /// No valid credentials or token available.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Network-level failure or timeout.
    #[error("Graph transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Graph answered with a non-success status.
    #[error("Graph returned HTTP {status}: {detail}")]
    Status {
        status: reqwest::StatusCode,
        detail: String,
    },

    /// A share link could not be mapped to a drive/item pair.
    #[error("Cannot resolve share link: {0}")]
    Resolution(String),
}

/// Address of a folder or file in OneDrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRef {
    pub drive_id: String,
    pub item_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentReference {
    #[serde(rename = "driveId")]
    pub drive_id: Option<String>,
}

/// A drive item as returned by the Graph `children` and `driveItem` calls.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriveItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Folder facet. Presence of the key marks a folder even when the facet
    /// itself is an empty object, so this must stay an `Option`, not a bool.
    #[serde(default)]
    pub folder: Option<serde_json::Value>,
    #[serde(rename = "webUrl")]
    pub web_url: Option<String>,
    #[serde(rename = "@microsoft.graph.downloadUrl")]
    pub download_url: Option<String>,
    #[serde(rename = "parentReference", default)]
    pub parent_reference: Option<ParentReference>,
}

impl DriveItem {
    /// Whether this item is a folder.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    /// Direct content URL: the provider's pre-authenticated download URL when
    /// present, otherwise the Graph content endpoint for the item.
    #[must_use]
    pub fn content_url(&self, drive_id: &str) -> String {
        self.download_url.clone().unwrap_or_else(|| {
            format!("{BASE_URL}/drives/{drive_id}/items/{}/content", self.id)
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChildrenResponse {
    #[serde(default)]
    value: Vec<DriveItem>,
}

/// Remote folder listing capability, abstracted so the image finder can be
/// exercised against an in-memory tree in tests.
pub trait FolderSource: Send + Sync {
    /// Resolve a public share link to the drive/item pair it points at.
    fn resolve_share(
        &self,
        share_url: &str,
    ) -> impl Future<Output = Result<FolderRef, GraphError>> + Send;

    /// List the direct children of an item.
    fn list_children(
        &self,
        drive_id: &str,
        item_id: &str,
    ) -> impl Future<Output = Result<Vec<DriveItem>, GraphError>> + Send;
}

/// Convert a OneDrive share URL into Graph `shares/{id}` syntax.
///
/// The URL is stripped of query parameters (share links carry `?e=...`),
/// base64-url encoded without padding and prefixed with `u!`.
#[must_use]
pub fn encode_share_url(url: &str) -> String {
    let clean = url.split('?').next().unwrap_or(url);
    format!("u!{}", URL_SAFE_NO_PAD.encode(clean.as_bytes()))
}

/// HTTP client for the Microsoft Graph drive API.
#[derive(Clone)]
pub struct GraphClient {
    inner: Arc<GraphClientInner>,
}

struct GraphClientInner {
    client: reqwest::Client,
    auth: AuthService,
}

impl GraphClient {
    #[must_use]
    pub fn new(auth: AuthService) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            inner: Arc::new(GraphClientInner { client, auth }),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, GraphError> {
        let token = self.inner.auth.access_token().await?;
        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, %url, "Graph request failed");
            return Err(GraphError::Status { status, detail });
        }

        Ok(response.json().await?)
    }

    /// Fetch the drive item a share link points at.
    async fn share_root(&self, share_url: &str) -> Result<DriveItem, GraphError> {
        let share_id = encode_share_url(share_url);
        self.get_json(format!("{BASE_URL}/shares/{share_id}/driveItem"))
            .await
    }
}

impl FolderSource for GraphClient {
    fn resolve_share(
        &self,
        share_url: &str,
    ) -> impl Future<Output = Result<FolderRef, GraphError>> + Send {
        async move {
            let item = self.share_root(share_url).await?;
            let drive_id = item
                .parent_reference
                .as_ref()
                .and_then(|p| p.drive_id.clone())
                .ok_or_else(|| {
                    GraphError::Resolution("share item has no driveId".to_string())
                })?;
            if item.id.is_empty() {
                return Err(GraphError::Resolution("share item has no id".to_string()));
            }
            Ok(FolderRef {
                drive_id,
                item_id: item.id,
            })
        }
    }

    fn list_children(
        &self,
        drive_id: &str,
        item_id: &str,
    ) -> impl Future<Output = Result<Vec<DriveItem>, GraphError>> + Send {
        async move {
            let response: ChildrenResponse = self
                .get_json(format!("{BASE_URL}/drives/{drive_id}/items/{item_id}/children"))
                .await?;
            Ok(response.value)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_share_url_strips_query_and_padding() {
        let encoded = encode_share_url("https://1drv.ms/f/c/abc123?e=xyz");
        assert!(encoded.starts_with("u!"));
        assert!(!encoded.contains('='));
        // query string must not influence the id
        assert_eq!(encoded, encode_share_url("https://1drv.ms/f/c/abc123"));
    }

    #[test]
    fn test_folder_marker_is_key_presence() {
        let folder: DriveItem =
            serde_json::from_str(r#"{"id":"1","name":"pics","folder":{}}"#).unwrap();
        assert!(folder.is_folder());

        let file: DriveItem =
            serde_json::from_str(r#"{"id":"2","name":"6649.jpg","size":123}"#).unwrap();
        assert!(!file.is_folder());
    }

    #[test]
    fn test_content_url_prefers_download_url() {
        let item: DriveItem = serde_json::from_str(
            r#"{"id":"2","name":"a.jpg","@microsoft.graph.downloadUrl":"https://dl/x"}"#,
        )
        .unwrap();
        assert_eq!(item.content_url("d1"), "https://dl/x");
    }

    #[test]
    fn test_content_url_synthesized_when_absent() {
        let item: DriveItem = serde_json::from_str(r#"{"id":"2","name":"a.jpg"}"#).unwrap();
        assert_eq!(
            item.content_url("d1"),
            "https://graph.microsoft.com/v1.0/drives/d1/items/2/content"
        );
    }

    #[test]
    fn test_children_response_parses_graph_shape() {
        let response: ChildrenResponse = serde_json::from_str(
            r#"{"value":[{"id":"1","name":"sub","folder":{"childCount":2}},{"id":"2","name":"6649.jpg","webUrl":"https://w"}]}"#,
        )
        .unwrap();
        assert_eq!(response.value.len(), 2);
        assert!(response.value[0].is_folder());
        assert_eq!(response.value[1].web_url.as_deref(), Some("https://w"));
    }
}
