//! Category store operations: the allow/deny overlay on top of folder
//! listings.
//!
//! A category's visible contents are the recursive folder listing,
//! plus the per-category allowlist (`extra_files`), minus the denylist
//! (`hidden_files`). Denylist matching is deliberately loose: an entry
//! hides a path when it equals the raw path, the query-stripped path,
//! or the stripped basename, so a file stays hidden even when the host
//! re-lists it with a fresh cache-busting query string.

use tracing::instrument;

use crate::domain::{basename, strip_query, OrbError, Result};
use crate::host::SettingsStore;
use crate::storage::models::{CategoriesMap, CategoryRecord, MAX_CATEGORIES};
use crate::storage::settings::{read_categories, write_categories};

/// True when the record's denylist hides this path.
#[must_use]
pub fn is_hidden(record: &CategoryRecord, path: &str) -> bool {
    let stripped = strip_query(path);
    let base = basename(path);
    record
        .hidden_files
        .iter()
        .any(|h| h == path || h == stripped || h == base)
}

/// Adds a file to a category's allowlist.
///
/// Returns `Ok(false)` without writing when a file with the same
/// stripped basename is already allowlisted. Any denylist entries that
/// would hide the new file are cleared, so adding a file always makes
/// it visible again.
#[instrument(skip(settings), fields(category = %key))]
pub fn add_file(settings: &dyn SettingsStore, key: &str, path: &str) -> Result<bool> {
    let mut map = read_categories(settings);
    let record = map
        .entry(key.to_string())
        .or_insert_with(|| CategoryRecord::named(key));

    let base = basename(path).to_string();
    let already = record
        .extra_files
        .iter()
        .any(|f| basename(f) == base);
    if already {
        tracing::debug!(path, "file already allowlisted, skipping");
        return Ok(false);
    }

    let stripped = strip_query(path).to_string();
    record
        .hidden_files
        .retain(|h| h != path && *h != stripped && *h != base);
    record.extra_files.push(path.to_string());

    write_categories(settings, &map)?;
    Ok(true)
}

/// Removes a file from a category.
///
/// Allowlisted entries matching the stripped basename are dropped;
/// in every case the raw path and its basename are denylisted so a
/// folder-sourced copy disappears too. Returns whether anything
/// changed.
#[instrument(skip(settings), fields(category = %key))]
pub fn remove_or_hide(settings: &dyn SettingsStore, key: &str, path: &str) -> Result<bool> {
    let mut map = read_categories(settings);
    let record = map
        .entry(key.to_string())
        .or_insert_with(|| CategoryRecord::named(key));

    let base = basename(path).to_string();
    let before = record.extra_files.len();
    record.extra_files.retain(|f| basename(f) != base);
    let removed_extras = record.extra_files.len() != before;

    let mut hid = false;
    for entry in [path.to_string(), base] {
        if !record.hidden_files.contains(&entry) {
            record.hidden_files.push(entry);
            hid = true;
        }
    }

    if removed_extras || hid {
        write_categories(settings, &map)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Replaces the whole category map, as submitted by the config form.
///
/// Slot keys must match `cat<N>` with `N` in 1..=[`MAX_CATEGORIES`].
pub fn save_all(settings: &dyn SettingsStore, map: &CategoriesMap) -> Result<()> {
    if map.len() > MAX_CATEGORIES {
        return Err(OrbError::Validation(format!(
            "at most {MAX_CATEGORIES} categories are supported"
        )));
    }
    for key in map.keys() {
        let valid = key
            .strip_prefix("cat")
            .and_then(|n| n.parse::<usize>().ok())
            .is_some_and(|n| (1..=MAX_CATEGORIES).contains(&n));
        if !valid {
            return Err(OrbError::Validation(format!("invalid category key '{key}'")));
        }
    }
    write_categories(settings, map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fixtures::MemorySettings;
    use crate::storage::models::default_categories;

    fn store_with_defaults() -> MemorySettings {
        let store = MemorySettings::new();
        write_categories(&store, &default_categories()).unwrap();
        store
    }

    #[test]
    fn add_then_hide_round_trip() {
        let store = store_with_defaults();

        assert!(add_file(&store, "cat1", "fx/orb.webm?v=1").unwrap());
        let rec = &read_categories(&store)["cat1"];
        assert_eq!(rec.extra_files, vec!["fx/orb.webm?v=1"]);

        // Same stripped basename from a different folder is a dup.
        assert!(!add_file(&store, "cat1", "other/orb.webm").unwrap());

        assert!(remove_or_hide(&store, "cat1", "fx/orb.webm?v=1").unwrap());
        let rec = &read_categories(&store)["cat1"];
        assert!(rec.extra_files.is_empty());
        assert!(is_hidden(rec, "fx/orb.webm?v=1"));
        // Basename entry hides folder-sourced copies too.
        assert!(is_hidden(rec, "anywhere/orb.webm?v=9"));
    }

    #[test]
    fn re_adding_clears_denylist() {
        let store = store_with_defaults();

        add_file(&store, "cat1", "fx/orb.webm").unwrap();
        remove_or_hide(&store, "cat1", "fx/orb.webm").unwrap();
        assert!(is_hidden(&read_categories(&store)["cat1"], "fx/orb.webm"));

        assert!(add_file(&store, "cat1", "fx/orb.webm").unwrap());
        let rec = &read_categories(&store)["cat1"];
        assert!(!is_hidden(rec, "fx/orb.webm"));
        assert_eq!(rec.extra_files, vec!["fx/orb.webm"]);
    }

    #[test]
    fn missing_category_is_created_on_add() {
        let store = MemorySettings::new();
        assert!(add_file(&store, "cat9", "fx/orb.webm").unwrap());
        let cats = read_categories(&store);
        let rec = &cats["cat9"];
        assert_eq!(rec.name, "cat9");
        assert_eq!(rec.extra_files, vec!["fx/orb.webm"]);
    }

    #[test]
    fn save_all_rejects_bad_keys_and_overflow() {
        let store = MemorySettings::new();

        let mut map = CategoriesMap::new();
        map.insert("catX".into(), CategoryRecord::named("Bad"));
        assert!(matches!(save_all(&store, &map), Err(OrbError::Validation(_))));

        let mut map = CategoriesMap::new();
        map.insert("cat31".into(), CategoryRecord::named("Too high"));
        assert!(save_all(&store, &map).is_err());

        let map: CategoriesMap = (1..=MAX_CATEGORIES + 1)
            .map(|i| (format!("cat{i}"), CategoryRecord::named(format!("C{i}"))))
            .collect();
        assert!(save_all(&store, &map).is_err());
    }

    #[test]
    fn hiding_is_idempotent() {
        let store = store_with_defaults();
        assert!(remove_or_hide(&store, "cat1", "maps/cave.png").unwrap());
        assert!(!remove_or_hide(&store, "cat1", "maps/cave.png").unwrap());
        let rec = &read_categories(&store)["cat1"];
        assert_eq!(rec.hidden_files.len(), 2); // raw path + basename
    }
}
