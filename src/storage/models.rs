//! Persisted data models.
//!
//! These structs are the JSON schema stored through the host settings
//! interface. Field names are camelCase on the wire so existing stored
//! data from older deployments keeps deserializing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Hard cap on the number of configurable categories.
pub const MAX_CATEGORIES: usize = 30;

/// Number of categories seeded on first run.
pub const DEFAULT_CATEGORY_COUNT: usize = 8;

/// One configured media category as persisted.
///
/// `extra_files` is the per-category allowlist of individually added
/// files; `hidden_files` is the denylist applied after folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub folder: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub extra_files: Vec<String>,
    #[serde(default)]
    pub hidden_files: Vec<String>,
}

fn default_source() -> String {
    "data".to_string()
}

impl CategoryRecord {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder: String::new(),
            source: default_source(),
            extra_files: Vec::new(),
            hidden_files: Vec::new(),
        }
    }
}

/// Categories keyed by slot id (`cat1`, `cat2`, ...).
pub type CategoriesMap = BTreeMap<String, CategoryRecord>;

/// A category resolved for display, carrying its slot key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub key: String,
    pub record: CategoryRecord,
}

/// One saved playlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetItem {
    pub path: String,
}

/// A saved playback snapshot inside a preset folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: String,
    pub name: String,
    /// Unix milliseconds at save time.
    pub created: i64,
    #[serde(default)]
    pub items: Vec<PresetItem>,
}

/// Preset folders: folder name to saved presets, in insertion order.
pub type PresetsMap = BTreeMap<String, Vec<Preset>>;

/// Named favorite lists: list name to raw media paths.
pub type FavoritesMap = BTreeMap<String, Vec<String>>;

/// Display aliases keyed by query-stripped path.
pub type AliasMap = BTreeMap<String, String>;

/// Persisted floating-orb anchor, CSS-style offsets in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbPosition {
    pub left: i32,
    pub top: i32,
}

impl Default for OrbPosition {
    fn default() -> Self {
        Self { left: 20, top: 120 }
    }
}

/// Per-user playback preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayOptions {
    /// Stop everything before starting a new effect.
    #[serde(default)]
    pub clear_before_play: bool,
    #[serde(default = "default_fade_in")]
    pub fade_in: u64,
    #[serde(default = "default_fade_out")]
    pub fade_out: u64,
}

fn default_fade_in() -> u64 {
    250
}

fn default_fade_out() -> u64 {
    400
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            clear_before_play: false,
            fade_in: default_fade_in(),
            fade_out: default_fade_out(),
        }
    }
}

/// Seed categories for a fresh installation.
#[must_use]
pub fn default_categories() -> CategoriesMap {
    (1..=DEFAULT_CATEGORY_COUNT)
        .map(|i| (format!("cat{i}"), CategoryRecord::named(format!("Category {i}"))))
        .collect()
}

/// Orders category slots numerically (`cat2` before `cat10`) and drops
/// keys beyond [`MAX_CATEGORIES`] or not matching the slot pattern.
#[must_use]
pub fn ordered_categories(map: &CategoriesMap) -> Vec<Category> {
    let mut slots: Vec<(usize, &String, &CategoryRecord)> = map
        .iter()
        .filter_map(|(key, record)| {
            let n: usize = key.strip_prefix("cat")?.parse().ok()?;
            (n >= 1 && n <= MAX_CATEGORIES).then_some((n, key, record))
        })
        .collect();
    slots.sort_by_key(|(n, _, _)| *n);
    slots
        .into_iter()
        .map(|(_, key, record)| Category {
            key: key.clone(),
            record: record.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_seed_eight_slots() {
        let map = default_categories();
        assert_eq!(map.len(), DEFAULT_CATEGORY_COUNT);
        let rec = &map["cat1"];
        assert_eq!(rec.name, "Category 1");
        assert_eq!(rec.source, "data");
        assert!(rec.folder.is_empty());
        assert!(rec.extra_files.is_empty());
        assert!(rec.hidden_files.is_empty());
    }

    #[test]
    fn ordering_is_numeric_not_lexicographic() {
        let mut map = CategoriesMap::new();
        map.insert("cat10".into(), CategoryRecord::named("Ten"));
        map.insert("cat2".into(), CategoryRecord::named("Two"));
        map.insert("cat1".into(), CategoryRecord::named("One"));
        map.insert("bogus".into(), CategoryRecord::named("Ignored"));
        map.insert("cat99".into(), CategoryRecord::named("Too high"));

        let ordered = ordered_categories(&map);
        let keys: Vec<&str> = ordered.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["cat1", "cat2", "cat10"]);
    }

    #[test]
    fn category_record_tolerates_sparse_json() {
        let rec: CategoryRecord = serde_json::from_str(r#"{"name":"Maps"}"#).unwrap();
        assert_eq!(rec.source, "data");
        assert!(rec.hidden_files.is_empty());

        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("extraFiles").is_some());
        assert!(json.get("hiddenFiles").is_some());
    }

    #[test]
    fn play_options_defaults() {
        let opts: PlayOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, PlayOptions::default());
        assert_eq!(opts.fade_in, 250);
        assert_eq!(opts.fade_out, 400);
        assert!(!opts.clear_before_play);
    }
}
