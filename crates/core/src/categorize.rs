//! Single-level keyword categorization for the legacy photos endpoint.
//!
//! Predates the recursive image finder: looks only at the direct children of
//! a folder and picks one representative URL per slot based on keywords in the
//! filename (Portuguese and English spellings).

use crate::types::{FolderEntry, PhotoCategories};

const WHITE_KEYWORDS: &[&str] = &["branco", "white"];
const AMBIENT_KEYWORDS: &[&str] = &["ambient", "ambiente"];
const MEASURE_KEYWORDS: &[&str] = &["medida", "measure"];

fn matches_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| name.contains(kw))
}

/// Classify `items` into the three legacy photo slots.
///
/// When `code` is given, only items whose name contains it
/// (case-insensitively) are considered. The first matching item fills a slot;
/// later candidates for an already-filled slot are ignored. All three slots
/// are always returned, unfilled ones as `None`.
#[must_use]
pub fn categorize(items: &[FolderEntry], code: Option<&str>) -> PhotoCategories {
    let code_lower = code.map(str::to_lowercase);
    let mut result = PhotoCategories::default();

    for item in items {
        let name = item.name.to_lowercase();
        if let Some(code) = &code_lower
            && !name.contains(code.as_str())
        {
            continue;
        }
        if result.white_background.is_none() && matches_any(&name, WHITE_KEYWORDS) {
            result.white_background = item.web_url.clone();
        }
        if result.ambient.is_none() && matches_any(&name, AMBIENT_KEYWORDS) {
            result.ambient = item.web_url.clone();
        }
        if result.measures.is_none() && matches_any(&name, MEASURE_KEYWORDS) {
            result.measures = item.web_url.clone();
        }
    }

    result
}
