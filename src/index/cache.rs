//! Session-lifetime cache of recursive folder listings.
//!
//! Listings are keyed by `(source, root)` and live until explicitly
//! invalidated. Two concurrent misses for the same key would both
//! walk; the embedding shells drive the panel from a single thread so
//! the duplicate work cannot happen in practice and is accepted.

use std::collections::HashMap;

/// Cache of flattened media listings per `(source, root)` pair.
#[derive(Debug, Default)]
pub struct MediaIndexCache {
    entries: HashMap<(String, String), Vec<String>>,
}

impl MediaIndexCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, source: &str, root: &str) -> Option<&Vec<String>> {
        self.entries.get(&(source.to_string(), root.to_string()))
    }

    pub fn put(&mut self, source: &str, root: &str, files: Vec<String>) {
        self.entries
            .insert((source.to_string(), root.to_string()), files);
    }

    /// Drops every cached listing. Called on manual refresh and after
    /// category configuration changes.
    pub fn invalidate_all(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        tracing::debug!(dropped, "folder listing cache invalidated");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_source_scoped() {
        let mut cache = MediaIndexCache::new();
        cache.put("data", "fx", vec!["fx/a.webm".into()]);
        cache.put("s3", "fx", vec!["fx/b.webm".into()]);

        assert_eq!(cache.get("data", "fx").unwrap().len(), 1);
        assert_eq!(cache.get("s3", "fx").unwrap()[0], "fx/b.webm");
        assert!(cache.get("data", "maps").is_none());

        cache.invalidate_all();
        assert!(cache.is_empty());
    }
}
