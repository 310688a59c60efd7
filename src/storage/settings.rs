//! Setting key registry and typed accessors.
//!
//! All panel state that must survive restarts lives under the
//! [`NAMESPACE`] in the host settings store. Reads are lenient: a
//! missing or malformed value decodes to its default so a corrupted
//! blob can never wedge the panel.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{OrbError, Result};
use crate::host::SettingsStore;
use crate::storage::models::{
    default_categories, AliasMap, CategoriesMap, FavoritesMap, OrbPosition, PlayOptions,
    PresetsMap,
};

/// Namespace every panel setting is stored under.
pub const NAMESPACE: &str = "media-orb";

/// Setting keys.
pub mod keys {
    pub const CATEGORIES: &str = "categories";
    pub const PRESETS: &str = "presets";
    pub const FAVORITES: &str = "favorites";
    pub const ALIASES: &str = "aliases";
    pub const ORB_POSITION: &str = "orbPosition";
    pub const PLAY_OPTIONS: &str = "playOptions";
    pub const ORDER_MODE: &str = "orderMode";
    pub const PREVIEW_MAX_ACTIVE: &str = "previewMaxActive";
    pub const HOVER_PREVIEW: &str = "hoverPreview";
    pub const SHOW_ORB: &str = "showOrb";
    pub const PREVIEW_BG: &str = "previewBg";
}

/// Whether a key is shared across all users or scoped per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingScope {
    /// One value for the whole installation (categories, presets,
    /// aliases).
    Shared,
    /// Per-user value (favorites, orb position, playback preferences).
    User,
}

/// Declaration of one registered setting, for hosts that need to
/// pre-register keys before first use.
#[derive(Debug, Clone)]
pub struct SettingSpec {
    pub key: &'static str,
    pub scope: SettingScope,
    pub default: Value,
}

/// Every setting the panel persists, with its scope and default.
#[must_use]
pub fn registry() -> Vec<SettingSpec> {
    use serde_json::json;
    vec![
        SettingSpec {
            key: keys::CATEGORIES,
            scope: SettingScope::Shared,
            default: serde_json::to_value(default_categories()).unwrap_or(Value::Null),
        },
        SettingSpec {
            key: keys::PRESETS,
            scope: SettingScope::Shared,
            default: json!({}),
        },
        SettingSpec {
            key: keys::FAVORITES,
            scope: SettingScope::User,
            default: json!({}),
        },
        SettingSpec {
            key: keys::ALIASES,
            scope: SettingScope::Shared,
            default: json!({}),
        },
        SettingSpec {
            key: keys::ORB_POSITION,
            scope: SettingScope::User,
            default: json!({"left": 20, "top": 120}),
        },
        SettingSpec {
            key: keys::PLAY_OPTIONS,
            scope: SettingScope::User,
            default: json!({"clearBeforePlay": false, "fadeIn": 250, "fadeOut": 400}),
        },
        SettingSpec {
            key: keys::ORDER_MODE,
            scope: SettingScope::User,
            default: json!("asc"),
        },
        SettingSpec {
            key: keys::PREVIEW_MAX_ACTIVE,
            scope: SettingScope::User,
            default: json!(24),
        },
        SettingSpec {
            key: keys::HOVER_PREVIEW,
            scope: SettingScope::User,
            default: json!(true),
        },
        SettingSpec {
            key: keys::SHOW_ORB,
            scope: SettingScope::User,
            default: json!(true),
        },
        SettingSpec {
            key: keys::PREVIEW_BG,
            scope: SettingScope::User,
            default: json!("pale-yellow"),
        },
    ]
}

/// Reads and decodes a value, falling back to `default` when the key
/// is absent or the stored JSON no longer matches the schema.
pub fn read_or<T: DeserializeOwned>(
    settings: &dyn SettingsStore,
    key: &str,
    default: impl FnOnce() -> T,
) -> T {
    match settings.get(NAMESPACE, key) {
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "stored setting failed to decode, using default");
            default()
        }),
        None => default(),
    }
}

/// Encodes and writes a value.
pub fn write<T: Serialize>(settings: &dyn SettingsStore, key: &str, value: &T) -> Result<()> {
    let encoded = serde_json::to_value(value)?;
    settings
        .set(NAMESPACE, key, encoded)
        .map_err(|e| OrbError::Storage(format!("writing '{key}': {e}")))
}

// Typed accessors. Collection stores (categories, favorites, presets,
// aliases) have richer operations in their own modules; these cover
// the scalar preferences.

pub fn play_options(settings: &dyn SettingsStore) -> PlayOptions {
    read_or(settings, keys::PLAY_OPTIONS, PlayOptions::default)
}

pub fn set_play_options(settings: &dyn SettingsStore, opts: &PlayOptions) -> Result<()> {
    write(settings, keys::PLAY_OPTIONS, opts)
}

pub fn orb_position(settings: &dyn SettingsStore) -> OrbPosition {
    read_or(settings, keys::ORB_POSITION, OrbPosition::default)
}

pub fn set_orb_position(settings: &dyn SettingsStore, pos: OrbPosition) -> Result<()> {
    write(settings, keys::ORB_POSITION, &pos)
}

/// Preview mount budget, clamped to the supported 8..=128 range.
pub fn preview_max_active(settings: &dyn SettingsStore) -> usize {
    let raw: u64 = read_or(settings, keys::PREVIEW_MAX_ACTIVE, || 24);
    usize::try_from(raw.clamp(8, 128)).unwrap_or(24)
}

pub fn hover_preview(settings: &dyn SettingsStore) -> bool {
    read_or(settings, keys::HOVER_PREVIEW, || true)
}

pub fn show_orb(settings: &dyn SettingsStore) -> bool {
    read_or(settings, keys::SHOW_ORB, || true)
}

pub fn set_show_orb(settings: &dyn SettingsStore, value: bool) -> Result<()> {
    write(settings, keys::SHOW_ORB, &value)
}

/// Named preview tile backgrounds with their CSS colors.
pub const PREVIEW_BACKGROUNDS: &[(&str, &str)] = &[
    ("pale-yellow", "#f5edc8"),
    ("slate", "#3b4252"),
    ("charcoal", "#1f1f23"),
    ("parchment", "#efe5c9"),
    ("forest", "#2e4632"),
];

/// CSS color for the configured preview background, with the first
/// palette entry as fallback for unknown names.
pub fn preview_background(settings: &dyn SettingsStore) -> &'static str {
    let name: String = read_or(settings, keys::PREVIEW_BG, || "pale-yellow".to_string());
    PREVIEW_BACKGROUNDS
        .iter()
        .find(|(n, _)| *n == name)
        .map_or(PREVIEW_BACKGROUNDS[0].1, |(_, hex)| *hex)
}

// Collection reads used by the store modules and view layer.

pub fn read_categories(settings: &dyn SettingsStore) -> CategoriesMap {
    let map = read_or(settings, keys::CATEGORIES, default_categories);
    if map.is_empty() {
        default_categories()
    } else {
        map
    }
}

pub fn write_categories(settings: &dyn SettingsStore, map: &CategoriesMap) -> Result<()> {
    write(settings, keys::CATEGORIES, map)
}

pub fn read_favorites(settings: &dyn SettingsStore) -> FavoritesMap {
    read_or(settings, keys::FAVORITES, FavoritesMap::new)
}

pub fn write_favorites(settings: &dyn SettingsStore, map: &FavoritesMap) -> Result<()> {
    write(settings, keys::FAVORITES, map)
}

pub fn read_presets(settings: &dyn SettingsStore) -> PresetsMap {
    read_or(settings, keys::PRESETS, PresetsMap::new)
}

pub fn write_presets(settings: &dyn SettingsStore, map: &PresetsMap) -> Result<()> {
    write(settings, keys::PRESETS, map)
}

pub fn read_aliases(settings: &dyn SettingsStore) -> AliasMap {
    read_or(settings, keys::ALIASES, AliasMap::new)
}

pub fn write_aliases(settings: &dyn SettingsStore, map: &AliasMap) -> Result<()> {
    write(settings, keys::ALIASES, map)
}

/// Ambient volume for fullscreen video, read from the host's core
/// audio settings. The first numeric value among the known key names
/// wins, clamped to 0.0..=1.0; hosts without any of them get full
/// volume.
pub fn ambient_volume(settings: &dyn SettingsStore) -> f64 {
    const CORE_KEYS: &[&str] = &[
        "globalAmbientVolume",
        "globalEnvironmentVolume",
        "globalEnvironment",
        "globalAmbient",
    ];
    for key in CORE_KEYS {
        if let Some(value) = settings.get("core", key) {
            if let Some(v) = value.as_f64() {
                return v.clamp(0.0, 1.0);
            }
        }
    }
    1.0
}
