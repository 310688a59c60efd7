//! Preview mount lifecycle.
//!
//! Video previews hold real decoder resources in the host, so the
//! number of mounted previews is capped. Tiles report visibility
//! transitions from the shell; the manager decides which tiles may
//! hold a live preview and which fall back to a static placeholder.

use std::collections::HashSet;

/// Decision for a tile that just became visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountDecision {
    /// Mount a live preview for this tile.
    Mounted,
    /// Tile was already holding a preview.
    AlreadyMounted,
    /// Budget exhausted, show the placeholder instead.
    AtCapacity,
}

/// Tracks which tiles currently hold live previews.
#[derive(Debug)]
pub struct PreviewLifecycleManager {
    mounted: HashSet<String>,
    limit: usize,
}

impl PreviewLifecycleManager {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            mounted: HashSet::new(),
            limit: limit.max(1),
        }
    }

    /// Applies a new budget. Already mounted previews are kept even
    /// when they exceed the new limit; they unwind as tiles scroll
    /// away.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
    }

    #[must_use]
    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    #[must_use]
    pub fn is_mounted(&self, tile: &str) -> bool {
        self.mounted.contains(tile)
    }

    /// A tile scrolled into view.
    pub fn on_visible(&mut self, tile: &str) -> MountDecision {
        if self.mounted.contains(tile) {
            return MountDecision::AlreadyMounted;
        }
        if self.mounted.len() >= self.limit {
            return MountDecision::AtCapacity;
        }
        self.mounted.insert(tile.to_string());
        MountDecision::Mounted
    }

    /// A tile scrolled out of view; its preview is released.
    pub fn on_hidden(&mut self, tile: &str) {
        self.mounted.remove(tile);
    }

    /// The media failed to load; detach so the slot frees up.
    pub fn on_media_error(&mut self, tile: &str) {
        if self.mounted.remove(tile) {
            tracing::debug!(tile, "preview detached after media error");
        }
    }

    /// Everything unmounts, e.g. when the grid resets.
    pub fn clear(&mut self) {
        self.mounted.clear();
    }

    /// Whether hover playback should start for a tile: only mounted
    /// previews play, and only when the user preference allows it.
    #[must_use]
    pub fn should_hover_play(&self, tile: &str, hover_enabled: bool) -> bool {
        hover_enabled && self.is_mounted(tile)
    }
}
