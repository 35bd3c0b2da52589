//! Shared result types produced by the matching and categorization logic.

use serde::{Deserialize, Serialize};

/// A product image discovered during folder traversal.
///
/// Ordering key is `variant` ascending; ties keep discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMatch {
    /// Original filename, e.g. `6649-1.jpg`.
    pub name: String,
    /// Variant number encoded in the filename; `0` when absent.
    pub variant: u32,
    /// Direct content URL for the file.
    pub url: String,
}

/// A single entry of a remote folder listing, reduced to what the
/// categorizer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    /// Filename as reported by the provider.
    pub name: String,
    /// Browser-facing URL for the file, when the provider exposes one.
    pub web_url: Option<String>,
}

/// Categorized photo slots for the legacy photos endpoint.
///
/// Each slot holds at most one URL; unfilled slots serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoCategories {
    pub white_background: Option<String>,
    pub ambient: Option<String>,
    pub measures: Option<String>,
}
