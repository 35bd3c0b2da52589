//! Filename grammar for product images.
//!
//! A product photo is named `<code>.<ext>` or `<code>[-_]<variant>.<ext>`,
//! where `code` and `variant` are runs of digits and `ext` is one of the
//! accepted image extensions. `6649.jpg` is variant 0 of product 6649;
//! `6649-2.png` is variant 2.

use std::sync::LazyLock;

use regex::Regex;

/// Extensions accepted as product images (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

static FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)(?:[-_](\d+))?\.(jpg|jpeg|png|webp)$").expect("Invalid regex")
});

/// Return the variant number encoded in `filename` if it is an image of the
/// product identified by `code`.
///
/// The embedded code must equal `code` byte-for-byte. A filename without a
/// variant suffix is variant `0`. Any filename outside the grammar (wrong
/// extension, non-digit code, extra separators) returns `None` - it simply is
/// not an image for this code, never an error.
#[must_use]
pub fn variant_for(filename: &str, code: &str) -> Option<u32> {
    let caps = FILENAME_RE.captures(filename)?;
    if caps.get(1).map(|m| m.as_str()) != Some(code) {
        return None;
    }
    match caps.get(2) {
        // The regex guarantees digits, so the only parse failure is a run
        // too long for u32; saturate rather than dropping a valid name.
        Some(m) => Some(m.as_str().parse().unwrap_or(u32::MAX)),
        None => Some(0),
    }
}

/// Whether `filename` carries an accepted image extension.
#[must_use]
pub fn has_image_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
