//! Catalog route handlers: sheet data, legacy photos, product images.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use catalog_core::{FolderEntry, ImageMatch, PhotoCategories, categorize};

use crate::auth::AuthError;
use crate::error::{ApiError, Result};
use crate::graph::{FolderSource, GraphError};
use crate::sheet::{self, SheetRow};
use crate::state::AppState;

/// Query parameters for the photo endpoints.
#[derive(Debug, Deserialize)]
pub struct PhotosQuery {
    #[serde(rename = "shareUrl")]
    pub share_url: Option<String>,
    pub code: Option<String>,
}

/// Query parameters for the sheet endpoint.
#[derive(Debug, Deserialize)]
pub struct SheetQuery {
    pub url: Option<String>,
}

/// Response body for the product-images endpoint.
#[derive(Debug, Serialize)]
pub struct ProductImages {
    pub codigo: String,
    pub imagens: Vec<ImageMatch>,
}

/// `GET /catalog/items` - placeholder kept for frontend compatibility.
pub async fn items() -> Json<Vec<SheetRow>> {
    Json(Vec::new())
}

/// `GET /catalog/sheet?url=` - rows of the public Google Sheet as JSON.
pub async fn sheet_data(
    State(state): State<AppState>,
    Query(query): Query<SheetQuery>,
) -> Result<Json<Vec<SheetRow>>> {
    let url = query.url.ok_or(ApiError::MissingParam("url"))?;
    let rows = sheet::fetch_sheet(state.http(), &url).await?;
    Ok(Json(rows))
}

/// `GET /catalog/photos?shareUrl=&code=` - legacy categorized photo slots.
///
/// When OneDrive access is unavailable (credentials missing or the share
/// cannot be resolved) this endpoint deliberately degrades to placeholder
/// image URLs instead of erroring, so the frontend keeps rendering.
pub async fn photos(
    State(state): State<AppState>,
    Query(query): Query<PhotosQuery>,
) -> Result<Json<PhotoCategories>> {
    let share_url = query.share_url.ok_or(ApiError::MissingParam("shareUrl"))?;

    match share_entries(&state, &share_url).await {
        Ok(entries) => Ok(Json(categorize(&entries, query.code.as_deref()))),
        Err(e) if is_degradable(&e) => {
            tracing::warn!(error = %e, "Photos disabled; serving placeholders");
            Ok(Json(placeholder_categories(query.code.as_deref())))
        }
        Err(e) => Err(e.into()),
    }
}

/// `GET /catalog/produtos/{codigo}/imagens?shareUrl=` - every image variant
/// for a product code, found by recursive traversal of the shared folder.
pub async fn product_images(
    State(state): State<AppState>,
    Path(codigo): Path<String>,
    Query(query): Query<PhotosQuery>,
) -> Result<Json<ProductImages>> {
    let share_url = query.share_url.ok_or(ApiError::MissingParam("shareUrl"))?;
    let imagens = state.finder().find_images(&share_url, &codigo).await?;
    Ok(Json(ProductImages { codigo, imagens }))
}

/// List the direct children of the shared folder as categorizer input.
async fn share_entries(state: &AppState, share_url: &str) -> std::result::Result<Vec<FolderEntry>, GraphError> {
    let root = state.graph().resolve_share(share_url).await?;
    let children = state
        .graph()
        .list_children(&root.drive_id, &root.item_id)
        .await?;
    Ok(children
        .into_iter()
        .map(|item| FolderEntry {
            name: item.name,
            web_url: item.web_url,
        })
        .collect())
}

/// Failures that mean "OneDrive is not usable right now" rather than a bug:
/// these degrade to placeholders on the legacy endpoint.
fn is_degradable(err: &GraphError) -> bool {
    matches!(
        err,
        GraphError::Auth(AuthError::NotConfigured) | GraphError::Resolution(_)
    )
}

fn placeholder_categories(code: Option<&str>) -> PhotoCategories {
    let url = |label: &str| {
        let suffix = code.map(|c| format!("+{c}")).unwrap_or_default();
        Some(format!("https://placehold.co/150x150?text={label}{suffix}"))
    };
    PhotoCategories {
        white_background: url("Branco"),
        ambient: url("Ambient"),
        measures: url("Medidas"),
    }
}
