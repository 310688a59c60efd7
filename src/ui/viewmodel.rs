//! View models handed to the embedding shell.
//!
//! Rendering is the shell's job; these structs are the complete,
//! precomputed description of what to draw. They are rebuilt from
//! scratch on every state change, never mutated in place.

use crate::domain::MediaKind;
use crate::playback::ActiveEffectRecord;
use crate::storage::OrbPosition;

/// One category tab in the toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTab {
    pub key: String,
    pub name: String,
    pub is_active: bool,
}

/// One media tile released into the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTile {
    /// Stable identity for preview lifecycle tracking, unique within
    /// the current grid.
    pub tile_id: String,
    pub path: String,
    pub display_name: String,
    pub kind: MediaKind,
    pub category_key: String,
    /// Full raw path shown on hover.
    pub tooltip: String,
    /// Start video playback on pointer hover: requires a mounted
    /// preview and the user preference.
    pub hover_play: bool,
}

/// One entry in the now-playing strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlayingTile {
    pub name: String,
    pub path: String,
    pub display_name: String,
    pub kind: MediaKind,
    pub z: i64,
    /// Marked as the pending replace target.
    pub is_selected: bool,
}

impl NowPlayingTile {
    #[must_use]
    pub fn from_record(record: &ActiveEffectRecord, display_name: String, selected: Option<&str>) -> Self {
        Self {
            name: record.name.clone(),
            path: record.path.clone(),
            display_name,
            kind: crate::domain::media_kind(&record.path),
            z: record.z,
            is_selected: selected == Some(record.name.as_str()),
        }
    }
}

/// One saved preset shown in preset mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetCard {
    pub id: String,
    pub name: String,
    pub item_count: usize,
    /// This preset is the one most recently activated.
    pub is_current: bool,
}

/// The floating desktop orb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbView {
    pub visible: bool,
    pub position: OrbPosition,
    /// True while a preset activation is in flight; the shell shows a
    /// busy cursor and ignores clicks.
    pub busy: bool,
}

/// Complete render description of the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub title: String,
    pub search_query: String,
    pub filter_label: &'static str,
    pub order_label: &'static str,
    pub tabs: Vec<CategoryTab>,
    /// Tiles released by the virtual grid so far.
    pub tiles: Vec<GridTile>,
    /// Entries matched by the filter but not yet released; nonzero
    /// means the shell keeps the scroll sentinel in place.
    pub pending_tiles: usize,
    pub now_playing: Vec<NowPlayingTile>,
    /// Favorite list names, for favorites mode and the chooser.
    pub favorite_lists: Vec<String>,
    /// Preset folder names, for presets mode and the save dialog.
    pub preset_folders: Vec<String>,
    /// Presets of the open folder, empty outside presets mode.
    pub presets: Vec<PresetCard>,
    /// CSS color behind preview tiles.
    pub preview_background: &'static str,
    /// Shown instead of the grid when nothing matches.
    pub empty_message: Option<String>,
    /// Total matches for the header count.
    pub match_count: usize,
}
