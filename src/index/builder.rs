//! Category index construction.
//!
//! Builds the flat list of grid entries from the configured
//! categories: each category contributes its recursive folder listing
//! plus allowlisted extras, with denylisted files removed and
//! duplicates within a category collapsed on the stripped path.

use std::collections::HashSet;

use tracing::instrument;

use crate::domain::{basename, has_media_extension, strip_query};
use crate::host::{FileBrowser, Notifier};
use crate::index::cache::MediaIndexCache;
use crate::index::walker::list_all_media_cached;
use crate::storage::categories::is_hidden;
use crate::storage::models::Category;

/// One grid entry in the built index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Raw path, query string intact.
    pub path: String,
    /// Basename of the stripped path; aliasing and sanitization apply
    /// at display time.
    pub name: String,
    /// Slot key of the contributing category.
    pub category_key: String,
    pub source: String,
}

/// Builds the full index across `categories`, in category order.
///
/// `force` refreshes cached folder listings. Categories without a
/// configured folder still contribute their allowlisted extras.
#[instrument(skip_all, fields(categories = categories.len(), force))]
pub fn build_index(
    cache: &mut MediaIndexCache,
    browser: &dyn FileBrowser,
    notifier: &dyn Notifier,
    categories: &[Category],
    force: bool,
) -> Vec<IndexEntry> {
    let mut index = Vec::new();
    for category in categories {
        let record = &category.record;
        let mut seen: HashSet<String> = HashSet::new();

        let listed = if record.folder.trim().is_empty() {
            Vec::new()
        } else {
            list_all_media_cached(
                cache,
                browser,
                notifier,
                &record.source,
                record.folder.trim(),
                force,
            )
        };

        // Listed files were already extension-filtered by the walk;
        // allowlisted extras have not been.
        let extras = record
            .extra_files
            .iter()
            .filter(|p| has_media_extension(p))
            .cloned();
        for path in listed.into_iter().chain(extras) {
            if is_hidden(record, &path) {
                continue;
            }
            if !seen.insert(strip_query(&path).to_string()) {
                continue;
            }
            index.push(IndexEntry {
                name: basename(&path).to_string(),
                source: record.source.clone(),
                category_key: category.key.clone(),
                path,
            });
        }
    }
    tracing::debug!(entries = index.len(), "index built");
    index
}
