//! Persistence layer.
//!
//! Everything here reads and writes through the host's
//! [`SettingsStore`](crate::host::SettingsStore) abstraction; the
//! stores themselves are stateless function modules over the persisted
//! models. [`json::JsonSettingsStore`] is a file-backed store for
//! standalone shells.

pub mod aliases;
pub mod categories;
pub mod favorites;
pub mod json;
pub mod models;
pub mod presets;
pub mod settings;

pub use json::JsonSettingsStore;
pub use models::{
    default_categories, ordered_categories, AliasMap, CategoriesMap, Category, CategoryRecord,
    FavoritesMap, OrbPosition, PlayOptions, Preset, PresetItem, PresetsMap, MAX_CATEGORIES,
};
