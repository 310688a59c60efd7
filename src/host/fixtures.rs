//! In-memory host implementations for tests.
//!
//! Each fixture records the calls made against it so tests can assert
//! on side effects without a real host. Interior mutability keeps the
//! trait object surface identical to production implementations.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use super::{
    BrowseResult, EffectPlayback, EffectRequest, FileBrowser, Host, MediaSize, Notifier,
    PermissionGate, SceneGeometry, SettingsStore,
};
use crate::domain::{OrbError, Result};

/// Settings store backed by a nested map.
#[derive(Default)]
pub struct MemorySettings {
    values: RefCell<HashMap<String, HashMap<String, Value>>>,
}

impl MemorySettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, namespace: &str, key: &str) -> Option<Value> {
        self.values
            .borrow()
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned()
    }

    fn set(&self, namespace: &str, key: &str, value: Value) -> Result<()> {
        self.values
            .borrow_mut()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }
}

/// File browser over a fixed directory tree.
///
/// Keys are `source:path` pairs; a missing key is a browse error, which
/// mirrors how hosts reject unreadable folders.
#[derive(Default)]
pub struct StubBrowser {
    tree: HashMap<(String, String), BrowseResult>,
}

impl StubBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&mut self, source: &str, path: &str, files: &[&str], dirs: &[&str]) {
        self.tree.insert(
            (source.to_string(), path.to_string()),
            BrowseResult {
                files: files.iter().map(|s| (*s).to_string()).collect(),
                dirs: dirs.iter().map(|s| (*s).to_string()).collect(),
            },
        );
    }
}

impl FileBrowser for StubBrowser {
    fn browse(&self, source: &str, path: &str) -> Result<BrowseResult> {
        self.tree
            .get(&(source.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| OrbError::Browse(format!("{source}:{path}")))
    }
}

/// Playback engine that records requests instead of rendering.
pub struct RecordingPlayback {
    pub played: RefCell<Vec<EffectRequest>>,
    pub ended: RefCell<Vec<String>>,
    pub end_all_calls: RefCell<u32>,
    /// Names reported as still running by `active_effect_names`.
    pub lingering: RefCell<Vec<String>>,
    pub scene: Option<SceneGeometry>,
    /// Probe results by stripped path; missing entries probe-fail.
    pub sizes: HashMap<String, MediaSize>,
    /// When set, `play` fails with this message.
    pub fail_play: Option<String>,
}

impl Default for RecordingPlayback {
    fn default() -> Self {
        Self {
            played: RefCell::new(Vec::new()),
            ended: RefCell::new(Vec::new()),
            end_all_calls: RefCell::new(0),
            lingering: RefCell::new(Vec::new()),
            scene: Some(SceneGeometry {
                center_x: 960.0,
                center_y: 540.0,
                viewport_width: 1920,
                viewport_height: 1080,
            }),
            sizes: HashMap::new(),
            fail_play: None,
        }
    }
}

impl RecordingPlayback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EffectPlayback for RecordingPlayback {
    fn play(&self, request: &EffectRequest) -> Result<()> {
        if let Some(msg) = &self.fail_play {
            return Err(OrbError::Playback(msg.clone()));
        }
        self.played.borrow_mut().push(request.clone());
        Ok(())
    }

    fn end_effect(&self, name: &str) -> Result<()> {
        self.ended.borrow_mut().push(name.to_string());
        self.lingering.borrow_mut().retain(|n| n != name);
        Ok(())
    }

    fn end_all(&self) -> Result<()> {
        *self.end_all_calls.borrow_mut() += 1;
        self.lingering.borrow_mut().clear();
        Ok(())
    }

    fn active_effect_names(&self) -> Vec<String> {
        self.lingering.borrow().clone()
    }

    fn scene(&self) -> Option<SceneGeometry> {
        self.scene
    }

    fn probe_dimensions(&self, path: &str) -> Result<MediaSize> {
        self.sizes
            .get(crate::domain::strip_query(path))
            .copied()
            .ok_or_else(|| OrbError::Playback(format!("probe timed out: {path}")))
    }
}

/// Notifier that collects messages by severity.
#[derive(Default)]
pub struct CollectingNotifier {
    pub infos: RefCell<Vec<String>>,
    pub warns: RefCell<Vec<String>>,
    pub errors: RefCell<Vec<String>>,
}

impl CollectingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for CollectingNotifier {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warns.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

/// Fixed-answer permission gate.
pub struct FixedGate(pub bool);

impl PermissionGate for FixedGate {
    fn is_privileged(&self) -> bool {
        self.0
    }
}

// Rc forwarding so tests can keep a handle to a fixture after boxing
// it into a Host.

impl<T: SettingsStore> SettingsStore for Rc<T> {
    fn get(&self, namespace: &str, key: &str) -> Option<Value> {
        (**self).get(namespace, key)
    }

    fn set(&self, namespace: &str, key: &str, value: Value) -> Result<()> {
        (**self).set(namespace, key, value)
    }
}

impl<T: FileBrowser> FileBrowser for Rc<T> {
    fn browse(&self, source: &str, path: &str) -> Result<BrowseResult> {
        (**self).browse(source, path)
    }

    fn sources(&self) -> std::collections::BTreeMap<String, String> {
        (**self).sources()
    }
}

impl<T: EffectPlayback> EffectPlayback for Rc<T> {
    fn play(&self, request: &EffectRequest) -> Result<()> {
        (**self).play(request)
    }

    fn end_effect(&self, name: &str) -> Result<()> {
        (**self).end_effect(name)
    }

    fn end_all(&self) -> Result<()> {
        (**self).end_all()
    }

    fn active_effect_names(&self) -> Vec<String> {
        (**self).active_effect_names()
    }

    fn scene(&self) -> Option<SceneGeometry> {
        (**self).scene()
    }

    fn probe_dimensions(&self, path: &str) -> Result<MediaSize> {
        (**self).probe_dimensions(path)
    }
}

impl<T: Notifier> Notifier for Rc<T> {
    fn info(&self, message: &str) {
        (**self).info(message);
    }

    fn warn(&self, message: &str) {
        (**self).warn(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }
}

/// Shared handles into a fixture-backed [`Host`], so tests can drive
/// the host through the panel and still inspect recorded calls.
pub struct HostHandles {
    pub settings: Rc<MemorySettings>,
    pub playback: Rc<RecordingPlayback>,
    pub notifier: Rc<CollectingNotifier>,
}

/// Builds a privileged [`Host`] from fixtures, returning handles to
/// the recording pieces.
#[must_use]
pub fn recording_host(browser: StubBrowser, playback: RecordingPlayback) -> (Host, HostHandles) {
    let settings = Rc::new(MemorySettings::new());
    let playback = Rc::new(playback);
    let notifier = Rc::new(CollectingNotifier::new());
    let host = Host {
        settings: Box::new(Rc::clone(&settings)),
        browser: Box::new(browser),
        playback: Box::new(Rc::clone(&playback)),
        notifier: Box::new(Rc::clone(&notifier)),
        permissions: Box::new(FixedGate(true)),
    };
    (
        host,
        HostHandles {
            settings,
            playback,
            notifier,
        },
    )
}

/// Host with every fixture at its default, privileged.
#[must_use]
pub fn test_host() -> (Host, HostHandles) {
    recording_host(StubBrowser::new(), RecordingPlayback::new())
}
