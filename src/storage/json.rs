//! JSON file-backed settings store.
//!
//! Hosts that embed the panel usually supply their own settings
//! persistence; this implementation backs the same interface with a
//! single JSON file for standalone shells and tests. Writes are
//! atomic: serialize to a sibling temp file, then rename over the
//! target, so a crash mid-write never truncates existing data.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::{OrbError, Result};
use crate::host::SettingsStore;

type NamespaceMap = HashMap<String, HashMap<String, Value>>;

/// Settings store persisting every namespace to one JSON file.
pub struct JsonSettingsStore {
    path: PathBuf,
    data: RefCell<NamespaceMap>,
}

impl JsonSettingsStore {
    /// Opens or creates a store at `path`.
    ///
    /// A missing file starts empty; a file that fails to parse is an
    /// error rather than silently discarded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                NamespaceMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            NamespaceMap::new()
        };

        tracing::debug!(path = %path.display(), namespaces = data.len(), "settings store opened");
        Ok(Self {
            path,
            data: RefCell::new(data),
        })
    }

    /// Target file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&*self.data.borrow())?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            OrbError::Storage(format!(
                "renaming {} over {}: {e}",
                tmp.display(),
                self.path.display()
            ))
        })
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, namespace: &str, key: &str) -> Option<Value> {
        self.data
            .borrow()
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned()
    }

    fn set(&self, namespace: &str, key: &str, value: Value) -> Result<()> {
        self.data
            .borrow_mut()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn roundtrips_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        {
            let store = JsonSettingsStore::open(&path).unwrap();
            store.set("media-orb", "showOrb", json!(false)).unwrap();
            store.set("core", "globalAmbientVolume", json!(0.5)).unwrap();
        }

        let store = JsonSettingsStore::open(&path).unwrap();
        assert_eq!(store.get("media-orb", "showOrb"), Some(json!(false)));
        assert_eq!(store.get("core", "globalAmbientVolume"), Some(json!(0.5)));
        assert_eq!(store.get("media-orb", "missing"), None);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/settings.json");
        let store = JsonSettingsStore::open(&path).unwrap();
        store.set("media-orb", "orderMode", json!("desc")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = JsonSettingsStore::open(&path).unwrap();
        store.set("media-orb", "hoverPreview", json!(true)).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|x| x == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn corrupted_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert!(JsonSettingsStore::open(&path).is_err());
    }
}
