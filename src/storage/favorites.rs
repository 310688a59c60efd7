//! Favorite list operations.
//!
//! Favorites are per-user named lists of raw media paths. Membership
//! is compared on the exact path string; the loose stripped-basename
//! matching is a category-overlay convention and does not apply here.

use crate::domain::{OrbError, Result};
use crate::host::SettingsStore;
use crate::storage::settings::{read_favorites, write_favorites};

/// Creates an empty favorite list. Fails on a name collision.
pub fn create(settings: &dyn SettingsStore, name: &str) -> Result<()> {
    let name = valid_name(name)?;
    let mut map = read_favorites(settings);
    if map.contains_key(&name) {
        return Err(OrbError::Validation(format!(
            "a favorite named '{name}' already exists"
        )));
    }
    map.insert(name, Vec::new());
    write_favorites(settings, &map)
}

/// Renames a favorite list, keeping its contents.
///
/// A rename onto an existing name fails without touching anything.
pub fn rename(settings: &dyn SettingsStore, old: &str, new: &str) -> Result<()> {
    let new = valid_name(new)?;
    let mut map = read_favorites(settings);
    if !map.contains_key(old) {
        return Err(OrbError::NotFound(format!("favorite '{old}'")));
    }
    if old == new {
        return Ok(());
    }
    if map.contains_key(&new) {
        return Err(OrbError::Validation(format!(
            "a favorite named '{new}' already exists"
        )));
    }
    if let Some(items) = map.remove(old) {
        map.insert(new, items);
    }
    write_favorites(settings, &map)
}

/// Deletes a favorite list.
pub fn delete(settings: &dyn SettingsStore, name: &str) -> Result<()> {
    let mut map = read_favorites(settings);
    if map.remove(name).is_none() {
        return Err(OrbError::NotFound(format!("favorite '{name}'")));
    }
    write_favorites(settings, &map)
}

/// Adds a path to a list. Returns `false` when the exact path is
/// already present.
pub fn add_path(settings: &dyn SettingsStore, name: &str, path: &str) -> Result<bool> {
    let mut map = read_favorites(settings);
    let items = map
        .get_mut(name)
        .ok_or_else(|| OrbError::NotFound(format!("favorite '{name}'")))?;

    if items.iter().any(|p| p == path) {
        return Ok(false);
    }
    items.push(path.to_string());
    write_favorites(settings, &map)?;
    Ok(true)
}

/// Removes a path (matched exactly) from a list.
pub fn remove_path(settings: &dyn SettingsStore, name: &str, path: &str) -> Result<bool> {
    let mut map = read_favorites(settings);
    let items = map
        .get_mut(name)
        .ok_or_else(|| OrbError::NotFound(format!("favorite '{name}'")))?;

    let before = items.len();
    items.retain(|p| p != path);
    let changed = items.len() != before;
    if changed {
        write_favorites(settings, &map)?;
    }
    Ok(changed)
}

fn valid_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(OrbError::Validation("favorite name cannot be empty".into()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fixtures::MemorySettings;

    #[test]
    fn create_rename_delete_lifecycle() {
        let store = MemorySettings::new();

        create(&store, " Battle Maps ").unwrap();
        assert!(read_favorites(&store).contains_key("Battle Maps"));

        // Collision on create and rename.
        assert!(create(&store, "Battle Maps").is_err());
        create(&store, "Ambience").unwrap();
        assert!(matches!(
            rename(&store, "Ambience", "Battle Maps"),
            Err(OrbError::Validation(_))
        ));
        // Failed rename left both lists intact.
        assert_eq!(read_favorites(&store).len(), 2);

        rename(&store, "Ambience", "Weather").unwrap();
        let map = read_favorites(&store);
        assert!(map.contains_key("Weather"));
        assert!(!map.contains_key("Ambience"));

        delete(&store, "Weather").unwrap();
        assert!(matches!(delete(&store, "Weather"), Err(OrbError::NotFound(_))));
    }

    #[test]
    fn membership_is_by_exact_path() {
        let store = MemorySettings::new();
        create(&store, "FX").unwrap();

        assert!(add_path(&store, "FX", "fx/orb.webm?v=1").unwrap());
        assert!(!add_path(&store, "FX", "fx/orb.webm?v=1").unwrap());
        // A different query string is a different favorite entry.
        assert!(add_path(&store, "FX", "fx/orb.webm?v=2").unwrap());
        assert_eq!(read_favorites(&store)["FX"].len(), 2);

        assert!(remove_path(&store, "FX", "fx/orb.webm?v=1").unwrap());
        assert!(!remove_path(&store, "FX", "fx/orb.webm?v=1").unwrap());
        assert_eq!(read_favorites(&store)["FX"], vec!["fx/orb.webm?v=2"]);
    }

    #[test]
    fn rename_to_same_name_is_a_noop() {
        let store = MemorySettings::new();
        create(&store, "FX").unwrap();
        add_path(&store, "FX", "fx/orb.webm").unwrap();
        rename(&store, "FX", "FX").unwrap();
        assert_eq!(read_favorites(&store)["FX"], vec!["fx/orb.webm"]);
    }
}
