//! Preset folder and preset operations.
//!
//! Presets are playback snapshots grouped into named folders. Folder
//! operations mirror the favorites store; preset entries carry an id,
//! a display name, a creation timestamp, and the ordered item list
//! replayed on activation.

use crate::domain::{OrbError, Result};
use crate::host::SettingsStore;
use crate::storage::models::{Preset, PresetItem};
use crate::storage::settings::{read_presets, write_presets};

/// Creates an empty preset folder. Fails on a name collision.
pub fn create_folder(settings: &dyn SettingsStore, name: &str) -> Result<()> {
    let name = valid_name(name)?;
    let mut map = read_presets(settings);
    if map.contains_key(&name) {
        return Err(OrbError::Validation(format!(
            "a preset folder named '{name}' already exists"
        )));
    }
    map.insert(name, Vec::new());
    write_presets(settings, &map)
}

/// Renames a preset folder; collisions fail without changes.
pub fn rename_folder(settings: &dyn SettingsStore, old: &str, new: &str) -> Result<()> {
    let new = valid_name(new)?;
    let mut map = read_presets(settings);
    if !map.contains_key(old) {
        return Err(OrbError::NotFound(format!("preset folder '{old}'")));
    }
    if old == new {
        return Ok(());
    }
    if map.contains_key(&new) {
        return Err(OrbError::Validation(format!(
            "a preset folder named '{new}' already exists"
        )));
    }
    if let Some(presets) = map.remove(old) {
        map.insert(new, presets);
    }
    write_presets(settings, &map)
}

/// Deletes a folder and every preset in it.
pub fn delete_folder(settings: &dyn SettingsStore, name: &str) -> Result<()> {
    let mut map = read_presets(settings);
    if map.remove(name).is_none() {
        return Err(OrbError::NotFound(format!("preset folder '{name}'")));
    }
    write_presets(settings, &map)
}

/// Appends a preset to a folder.
pub fn add_preset(
    settings: &dyn SettingsStore,
    folder: &str,
    id: String,
    name: &str,
    items: Vec<PresetItem>,
) -> Result<()> {
    let name = valid_name(name)?;
    if items.is_empty() {
        return Err(OrbError::Validation("preset has no items to save".into()));
    }
    let mut map = read_presets(settings);
    let presets = map
        .get_mut(folder)
        .ok_or_else(|| OrbError::NotFound(format!("preset folder '{folder}'")))?;
    presets.push(Preset {
        id,
        name,
        created: chrono::Utc::now().timestamp_millis(),
        items,
    });
    write_presets(settings, &map)
}

/// Renames one preset inside a folder.
pub fn rename_preset(
    settings: &dyn SettingsStore,
    folder: &str,
    id: &str,
    new_name: &str,
) -> Result<()> {
    let new_name = valid_name(new_name)?;
    let mut map = read_presets(settings);
    let presets = map
        .get_mut(folder)
        .ok_or_else(|| OrbError::NotFound(format!("preset folder '{folder}'")))?;
    let preset = presets
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| OrbError::NotFound(format!("preset '{id}' in '{folder}'")))?;
    preset.name = new_name;
    write_presets(settings, &map)
}

/// Deletes one preset from a folder.
pub fn delete_preset(settings: &dyn SettingsStore, folder: &str, id: &str) -> Result<()> {
    let mut map = read_presets(settings);
    let presets = map
        .get_mut(folder)
        .ok_or_else(|| OrbError::NotFound(format!("preset folder '{folder}'")))?;
    let before = presets.len();
    presets.retain(|p| p.id != id);
    if presets.len() == before {
        return Err(OrbError::NotFound(format!("preset '{id}' in '{folder}'")));
    }
    write_presets(settings, &map)
}

/// Looks up one preset by folder and id.
pub fn find_preset(settings: &dyn SettingsStore, folder: &str, id: &str) -> Result<Preset> {
    read_presets(settings)
        .get(folder)
        .and_then(|presets| presets.iter().find(|p| p.id == id).cloned())
        .ok_or_else(|| OrbError::NotFound(format!("preset '{id}' in '{folder}'")))
}

fn valid_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(OrbError::Validation("name cannot be empty".into()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fixtures::MemorySettings;

    fn items(paths: &[&str]) -> Vec<PresetItem> {
        paths
            .iter()
            .map(|p| PresetItem { path: (*p).to_string() })
            .collect()
    }

    #[test]
    fn folder_lifecycle_with_collisions() {
        let store = MemorySettings::new();
        create_folder(&store, "Combat").unwrap();
        create_folder(&store, "Travel").unwrap();
        assert!(create_folder(&store, "Combat").is_err());
        assert!(matches!(
            rename_folder(&store, "Travel", "Combat"),
            Err(OrbError::Validation(_))
        ));
        rename_folder(&store, "Travel", "Roads").unwrap();
        delete_folder(&store, "Roads").unwrap();
        assert_eq!(read_presets(&store).len(), 1);
    }

    #[test]
    fn preset_crud_within_folder() {
        let store = MemorySettings::new();
        create_folder(&store, "Combat").unwrap();

        add_preset(&store, "Combat", "p1".into(), "Opening", items(&["a.webm", "b.png"])).unwrap();
        add_preset(&store, "Combat", "p2".into(), "Climax", items(&["c.webm"])).unwrap();

        let found = find_preset(&store, "Combat", "p1").unwrap();
        assert_eq!(found.name, "Opening");
        assert_eq!(found.items.len(), 2);
        assert!(found.created > 0);

        rename_preset(&store, "Combat", "p1", "Ambush").unwrap();
        assert_eq!(find_preset(&store, "Combat", "p1").unwrap().name, "Ambush");

        delete_preset(&store, "Combat", "p1").unwrap();
        assert!(matches!(
            find_preset(&store, "Combat", "p1"),
            Err(OrbError::NotFound(_))
        ));
        assert_eq!(read_presets(&store)["Combat"].len(), 1);
    }

    #[test]
    fn empty_preset_is_rejected() {
        let store = MemorySettings::new();
        create_folder(&store, "Combat").unwrap();
        assert!(matches!(
            add_preset(&store, "Combat", "p1".into(), "Empty", vec![]),
            Err(OrbError::Validation(_))
        ));
    }
}
