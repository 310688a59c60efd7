//! Recursive media discovery over the host file browser.

use std::collections::HashSet;

use tracing::instrument;

use crate::domain::{has_media_extension, Result};
use crate::host::{FileBrowser, Notifier};
use crate::index::cache::MediaIndexCache;

/// Recursively lists every media file under `root` on `source`.
///
/// Traversal is depth-first in the order the browser reports entries:
/// a directory's files come before its subdirectories' contents. A
/// visited set guards against listing cycles. Any browse failure
/// aborts the whole walk; the user gets one warning toast and the
/// caller an empty listing, never a partial one.
#[instrument(skip(browser, notifier))]
pub fn list_all_media(
    browser: &dyn FileBrowser,
    notifier: &dyn Notifier,
    source: &str,
    root: &str,
) -> Vec<String> {
    let mut files = Vec::new();
    let mut visited = HashSet::new();
    match walk(browser, source, root, &mut visited, &mut files) {
        Ok(()) => {
            tracing::debug!(count = files.len(), "folder walk complete");
            files
        }
        Err(e) => {
            tracing::warn!(error = %e, "folder walk failed");
            notifier.warn(&format!("Could not browse folder '{root}': {e}"));
            Vec::new()
        }
    }
}

fn walk(
    browser: &dyn FileBrowser,
    source: &str,
    dir: &str,
    visited: &mut HashSet<String>,
    out: &mut Vec<String>,
) -> Result<()> {
    if !visited.insert(format!("{source}:{dir}")) {
        return Ok(());
    }
    let listing = browser.browse(source, dir)?;
    out.extend(listing.files.into_iter().filter(|f| has_media_extension(f)));
    for sub in &listing.dirs {
        walk(browser, source, sub, visited, out)?;
    }
    Ok(())
}

/// Cache-aware wrapper around [`list_all_media`].
///
/// `force` bypasses and refreshes the cached listing. Failed walks
/// cache their empty result too, so a broken folder does not hammer
/// the browser on every view-model rebuild until the next refresh.
pub fn list_all_media_cached(
    cache: &mut MediaIndexCache,
    browser: &dyn FileBrowser,
    notifier: &dyn Notifier,
    source: &str,
    root: &str,
    force: bool,
) -> Vec<String> {
    if !force {
        if let Some(hit) = cache.get(source, root) {
            return hit.clone();
        }
    }
    let files = list_all_media(browser, notifier, source, root);
    cache.put(source, root, files.clone());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fixtures::{CollectingNotifier, StubBrowser};

    fn tree() -> StubBrowser {
        let mut b = StubBrowser::new();
        b.add_dir(
            "data",
            "fx",
            &["fx/orb.webm", "fx/readme.txt", "fx/flame.png?v=2"],
            &["fx/sub", "fx/empty"],
        );
        b.add_dir("data", "fx/sub", &["fx/sub/rain.mp4"], &[]);
        b.add_dir("data", "fx/empty", &[], &[]);
        b
    }

    #[test]
    fn walk_is_depth_first_and_media_only() {
        let browser = tree();
        let notifier = CollectingNotifier::new();
        let files = list_all_media(&browser, &notifier, "data", "fx");
        assert_eq!(
            files,
            vec!["fx/orb.webm", "fx/flame.png?v=2", "fx/sub/rain.mp4"]
        );
        assert!(notifier.warns.borrow().is_empty());
    }

    #[test]
    fn cycle_does_not_loop() {
        let mut browser = StubBrowser::new();
        browser.add_dir("data", "a", &["a/x.webm"], &["b"]);
        browser.add_dir("data", "b", &["b/y.webm"], &["a"]);
        let notifier = CollectingNotifier::new();
        let files = list_all_media(&browser, &notifier, "data", "a");
        assert_eq!(files, vec!["a/x.webm", "b/y.webm"]);
    }

    #[test]
    fn browse_error_yields_empty_and_warns() {
        let mut browser = StubBrowser::new();
        browser.add_dir("data", "fx", &["fx/orb.webm"], &["fx/missing"]);
        let notifier = CollectingNotifier::new();
        let files = list_all_media(&browser, &notifier, "data", "fx");
        assert!(files.is_empty());
        assert_eq!(notifier.warns.borrow().len(), 1);
    }

    #[test]
    fn cache_hits_skip_the_browser() {
        let browser = tree();
        let notifier = CollectingNotifier::new();
        let mut cache = MediaIndexCache::new();

        let first = list_all_media_cached(&mut cache, &browser, &notifier, "data", "fx", false);
        assert_eq!(first.len(), 3);

        // Poison the cache to prove the second read never walks.
        cache.put("data", "fx", vec!["cached.webm".into()]);
        let second = list_all_media_cached(&mut cache, &browser, &notifier, "data", "fx", false);
        assert_eq!(second, vec!["cached.webm"]);

        let forced = list_all_media_cached(&mut cache, &browser, &notifier, "data", "fx", true);
        assert_eq!(forced.len(), 3);
    }
}
