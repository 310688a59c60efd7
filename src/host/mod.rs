//! Host capability traits.
//!
//! The panel never talks to the embedding application directly; every
//! outward dependency (settings persistence, file browsing, effect
//! playback, notifications, permissions) is expressed as a trait here
//! and injected through [`Host`]. Production code implements these
//! against the real host; tests use the in-memory fixtures in
//! [`fixtures`].
//!
//! All trait methods take `&self`. Implementations that need mutable
//! state (the JSON-backed settings store, the recording test fixtures)
//! use interior mutability, which keeps the orchestration layer free of
//! borrow gymnastics when several capabilities are used in one flow.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::Result;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

/// Namespaced key/value persistence provided by the host.
///
/// Values are JSON; scope (shared vs. per-user) is a property of the
/// key registration, not of this interface.
pub trait SettingsStore {
    /// Reads a value, `None` when the key has never been written.
    fn get(&self, namespace: &str, key: &str) -> Option<Value>;

    /// Writes a value, replacing any previous one.
    fn set(&self, namespace: &str, key: &str, value: Value) -> Result<()>;
}

/// One directory level as reported by the host file browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseResult {
    /// File paths (may carry query strings).
    pub files: Vec<String>,
    /// Subdirectory paths.
    pub dirs: Vec<String>,
}

/// Read-only access to the host's file storage backends.
pub trait FileBrowser {
    /// Lists one directory level under `path` on the given source
    /// backend (e.g. `"data"`, `"s3"`).
    fn browse(&self, source: &str, path: &str) -> Result<BrowseResult>;

    /// Available source backends, keyed by identifier with a human
    /// label. The default covers the common case of a single local
    /// data backend.
    fn sources(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("data".to_string(), "Data".to_string());
        map.insert("s3".to_string(), "S3".to_string());
        map
    }
}

/// Natural pixel dimensions of a media file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaSize {
    pub width: u32,
    pub height: u32,
}

impl MediaSize {
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Geometry of the currently active scene, used to center and scale
/// fullscreen effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneGeometry {
    /// Canvas-space point the effect is anchored at.
    pub center_x: f64,
    pub center_y: f64,
    /// Visible viewport dimensions in pixels.
    pub viewport_width: u32,
    pub viewport_height: u32,
}

/// A fully resolved request to start one screen-space effect.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRequest {
    /// Raw path, query string intact.
    pub path: String,
    /// Unique effect name used later to stop or replace it.
    pub name: String,
    /// Stacking order.
    pub z_index: i64,
    pub fade_in_ms: u64,
    pub fade_out_ms: u64,
    /// Output size after cover-fit scaling, when known.
    pub size: Option<MediaSize>,
    /// Anchor point within the media, 0.0..=1.0 per axis.
    pub anchor: (f32, f32),
    /// Canvas-space position.
    pub position: (f64, f64),
    /// Playback volume for video, 0.0..=1.0.
    pub volume: Option<f64>,
    /// Whether the effect loops and persists until stopped.
    pub looping: bool,
}

/// The host's screen-space effect engine.
pub trait EffectPlayback {
    /// Starts an effect. Errors are surfaced to the user by the caller.
    fn play(&self, request: &EffectRequest) -> Result<()>;

    /// Stops the effect with the given name. Stopping a name that is
    /// not playing is not an error.
    fn end_effect(&self, name: &str) -> Result<()>;

    /// Stops every effect this panel started.
    fn end_all(&self) -> Result<()>;

    /// Names of effects currently running, for post-stop verification.
    fn active_effect_names(&self) -> Vec<String>;

    /// Geometry of the active scene, `None` when no scene is active.
    fn scene(&self) -> Option<SceneGeometry>;

    /// Probes the natural dimensions of a media file. Implementations
    /// should bound this with a timeout and return an error on expiry;
    /// the caller degrades to unsized playback.
    fn probe_dimensions(&self, path: &str) -> Result<MediaSize>;
}

/// User-facing toast notifications.
pub trait Notifier {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Privilege check for mutating and playback-triggering operations.
pub trait PermissionGate {
    /// True when the current user may use the panel at all.
    fn is_privileged(&self) -> bool;
}

/// Aggregate of every host capability the panel needs.
pub struct Host {
    pub settings: Box<dyn SettingsStore>,
    pub browser: Box<dyn FileBrowser>,
    pub playback: Box<dyn EffectPlayback>,
    pub notifier: Box<dyn Notifier>,
    pub permissions: Box<dyn PermissionGate>,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
