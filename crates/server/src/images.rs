//! Recursive image discovery over a shared OneDrive folder.
//!
//! Given a share link and a product code, walks the folder tree depth-first
//! down to a bounded depth, collects every file whose name matches the
//! product-image grammar, and returns the matches ordered by variant. Results
//! are memoized per `(share_url, code)` in a TTL cache so repeated lookups do
//! not hammer the Graph API.

use std::future::Future;
use std::pin::Pin;

use catalog_core::matcher::{has_image_extension, variant_for};
use catalog_core::{ImageMatch, TtlCache};

use crate::graph::{FolderSource, GraphError};

/// Folders nested deeper than this are silently not expanded.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Memoization key: the share link plus the product code.
type ImageKey = (String, String);

/// Orchestrates traversal, matching and caching.
pub struct ImageFinder<C> {
    source: C,
    cache: TtlCache<ImageKey, Vec<ImageMatch>>,
    max_depth: u32,
}

impl<C: FolderSource> ImageFinder<C> {
    /// Finder with the default depth bound and a one-hour cache.
    #[must_use]
    pub fn new(source: C) -> Self {
        Self::with_settings(source, DEFAULT_MAX_DEPTH, TtlCache::new())
    }

    /// Finder with explicit depth bound and cache, used by tests and anywhere
    /// the cache lifecycle needs to be owned elsewhere.
    #[must_use]
    pub fn with_settings(
        source: C,
        max_depth: u32,
        cache: TtlCache<ImageKey, Vec<ImageMatch>>,
    ) -> Self {
        Self {
            source,
            cache,
            max_depth,
        }
    }

    /// All image variants for `code` under the shared folder, ordered by
    /// variant ascending (ties keep discovery order). An empty list is a
    /// valid result and is cached like any other.
    ///
    /// # Errors
    ///
    /// Auth, transport and resolution errors from the folder source propagate
    /// unchanged; nothing is cached on failure.
    pub async fn find_images(
        &self,
        share_url: &str,
        code: &str,
    ) -> Result<Vec<ImageMatch>, GraphError> {
        let key = (share_url.to_string(), code.to_string());
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(code, "Image lookup served from cache");
            return Ok(hit);
        }

        let root = self.source.resolve_share(share_url).await?;
        let mut matches = Vec::new();
        self.walk(&root.drive_id, &root.item_id, code, 0, &mut matches)
            .await?;
        matches.sort_by_key(|m| m.variant);

        tracing::debug!(code, count = matches.len(), "Image traversal complete");
        self.cache.insert(key, matches.clone());
        Ok(matches)
    }

    /// Depth-first walk of one folder. Children are visited in the order the
    /// provider returns them; subfolders are descended into immediately.
    fn walk<'a>(
        &'a self,
        drive_id: &'a str,
        item_id: &'a str,
        code: &'a str,
        depth: u32,
        out: &'a mut Vec<ImageMatch>,
    ) -> Pin<Box<dyn Future<Output = Result<(), GraphError>> + Send + 'a>> {
        Box::pin(async move {
            if depth > self.max_depth {
                return Ok(());
            }
            let children = self.source.list_children(drive_id, item_id).await?;
            for child in children {
                if child.is_folder() {
                    self.walk(drive_id, &child.id, code, depth + 1, out).await?;
                } else if has_image_extension(&child.name) {
                    if let Some(variant) = variant_for(&child.name, code) {
                        let url = child.content_url(drive_id);
                        out.push(ImageMatch {
                            name: child.name,
                            variant,
                            url,
                        });
                    }
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::graph::{DriveItem, FolderRef};

    fn folder(id: &str, name: &str) -> DriveItem {
        DriveItem {
            id: id.to_string(),
            name: name.to_string(),
            folder: Some(serde_json::json!({})),
            ..DriveItem::default()
        }
    }

    fn file(id: &str, name: &str) -> DriveItem {
        DriveItem {
            id: id.to_string(),
            name: name.to_string(),
            ..DriveItem::default()
        }
    }

    /// In-memory folder tree keyed by item id.
    struct FakeSource {
        tree: HashMap<String, Vec<DriveItem>>,
        list_calls: AtomicUsize,
        fail_next_resolve: AtomicBool,
    }

    impl FakeSource {
        fn new(tree: HashMap<String, Vec<DriveItem>>) -> Self {
            Self {
                tree,
                list_calls: AtomicUsize::new(0),
                fail_next_resolve: AtomicBool::new(false),
            }
        }
    }

    impl FolderSource for &FakeSource {
        async fn resolve_share(&self, _share_url: &str) -> Result<FolderRef, GraphError> {
            if self.fail_next_resolve.swap(false, Ordering::SeqCst) {
                return Err(GraphError::Resolution("boom".to_string()));
            }
            Ok(FolderRef {
                drive_id: "d1".to_string(),
                item_id: "root".to_string(),
            })
        }

        async fn list_children(
            &self,
            _drive_id: &str,
            item_id: &str,
        ) -> Result<Vec<DriveItem>, GraphError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.tree.get(item_id).cloned().unwrap_or_default())
        }
    }

    fn sample_tree() -> HashMap<String, Vec<DriveItem>> {
        // root: 6649.jpg + subfolder { 6649-1.jpg, junk.txt }
        HashMap::from([
            (
                "root".to_string(),
                vec![file("f0", "6649.jpg"), folder("sub", "extras")],
            ),
            (
                "sub".to_string(),
                vec![file("f1", "6649-1.jpg"), file("f2", "junk.txt")],
            ),
        ])
    }

    #[tokio::test]
    async fn test_finds_and_orders_variants_across_subfolders() {
        let source = FakeSource::new(sample_tree());
        let finder = ImageFinder::new(&source);

        let matches = finder.find_images("https://share", "6649").await.unwrap();
        let names: Vec<_> = matches.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["6649.jpg", "6649-1.jpg"]);
        assert_eq!(matches[0].variant, 0);
        assert_eq!(matches[1].variant, 1);
        assert_eq!(
            matches[0].url,
            "https://graph.microsoft.com/v1.0/drives/d1/items/f0/content"
        );
    }

    #[tokio::test]
    async fn test_sort_is_stable_on_equal_variants() {
        let tree = HashMap::from([
            (
                "root".to_string(),
                vec![folder("a", "a"), folder("b", "b")],
            ),
            ("a".to_string(), vec![file("f1", "6649_1.jpg")]),
            ("b".to_string(), vec![file("f2", "6649-1.png")]),
        ]);
        let source = FakeSource::new(tree);
        let finder = ImageFinder::new(&source);

        let matches = finder.find_images("https://share", "6649").await.unwrap();
        let names: Vec<_> = matches.iter().map(|m| m.name.as_str()).collect();
        // both variant 1: discovery order preserved
        assert_eq!(names, vec!["6649_1.jpg", "6649-1.png"]);
    }

    #[tokio::test]
    async fn test_depth_bound_prunes_deep_folders() {
        // root -> l1 -> l2, with an image only at l2
        let tree = HashMap::from([
            ("root".to_string(), vec![folder("l1", "one")]),
            ("l1".to_string(), vec![folder("l2", "two")]),
            ("l2".to_string(), vec![file("f1", "6649.jpg")]),
        ]);
        let source = FakeSource::new(tree);
        // max_depth 1: l2 sits at depth 2 and must not be expanded
        let finder = ImageFinder::with_settings(&source, 1, TtlCache::new());

        let matches = finder.find_images("https://share", "6649").await.unwrap();
        assert!(matches.is_empty());
        // root and l1 listed, l2 pruned
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let source = FakeSource::new(sample_tree());
        let finder = ImageFinder::new(&source);

        let first = finder.find_images("https://share", "6649").await.unwrap();
        let calls_after_first = source.list_calls.load(Ordering::SeqCst);
        let second = finder.find_images("https://share", "6649").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.list_calls.load(Ordering::SeqCst), calls_after_first);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_a_new_traversal() {
        let source = FakeSource::new(sample_tree());
        let finder =
            ImageFinder::with_settings(&source, DEFAULT_MAX_DEPTH, TtlCache::with_ttl(Duration::from_millis(20)));

        finder.find_images("https://share", "6649").await.unwrap();
        let calls_after_first = source.list_calls.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(40)).await;
        finder.find_images("https://share", "6649").await.unwrap();
        assert!(source.list_calls.load(Ordering::SeqCst) > calls_after_first);
    }

    #[tokio::test]
    async fn test_empty_result_is_cached_too() {
        let source = FakeSource::new(sample_tree());
        let finder = ImageFinder::new(&source);

        let matches = finder.find_images("https://share", "9999").await.unwrap();
        assert!(matches.is_empty());
        let calls_after_first = source.list_calls.load(Ordering::SeqCst);

        finder.find_images("https://share", "9999").await.unwrap();
        assert_eq!(source.list_calls.load(Ordering::SeqCst), calls_after_first);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let source = FakeSource::new(sample_tree());
        source.fail_next_resolve.store(true, Ordering::SeqCst);
        let finder = ImageFinder::new(&source);

        assert!(finder.find_images("https://share", "6649").await.is_err());

        // the failed call must not have poisoned the cache
        let matches = finder.find_images("https://share", "6649").await.unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[tokio::test]
    async fn test_distinct_codes_have_distinct_cache_entries() {
        let source = FakeSource::new(sample_tree());
        let finder = ImageFinder::new(&source);

        let a = finder.find_images("https://share", "6649").await.unwrap();
        let b = finder.find_images("https://share", "1234").await.unwrap();
        assert_eq!(a.len(), 2);
        assert!(b.is_empty());
    }
}
