//! Playback session orchestration.
//!
//! [`PlayerSession`] owns the host handle and every piece of runtime
//! state that is not view state: the now-playing registry, the folder
//! listing cache, probed media dimensions, the play log, and the
//! preset activation lock. The event handler in [`crate::app`] calls
//! into it; nothing here knows about view models.

use std::collections::HashMap;

use tracing::instrument;

use crate::domain::{media_kind, strip_query, OrbError, Result};
use crate::host::{Host, MediaSize};
use crate::index::MediaIndexCache;
use crate::playback::{
    build_request, order_mode, set_order_mode, ActiveEffectRecord, NowPlayingRegistry, OrderMode,
    PlayOverrides, EFFECT_TAG,
};
use crate::storage::models::PresetItem;
use crate::storage::{presets, settings};

/// One successfully started play, for preset snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayLogEntry {
    pub path: String,
    /// Unix milliseconds.
    pub at: i64,
}

/// Runtime playback state for one panel instance.
pub struct PlayerSession {
    pub host: Host,
    pub registry: NowPlayingRegistry,
    pub folder_cache: MediaIndexCache,
    media_sizes: HashMap<String, MediaSize>,
    play_log: Vec<PlayLogEntry>,
    last_clear_at: i64,
    current_preset: Option<String>,
    preset_busy: bool,
    id_counter: u64,
}

impl PlayerSession {
    #[must_use]
    pub fn new(host: Host) -> Self {
        Self {
            host,
            registry: NowPlayingRegistry::new(),
            folder_cache: MediaIndexCache::new(),
            media_sizes: HashMap::new(),
            play_log: Vec::new(),
            last_clear_at: 0,
            current_preset: None,
            preset_busy: false,
            id_counter: 0,
        }
    }

    /// Generates a short id unique within this session: base-36
    /// timestamp plus a counter suffix.
    pub fn next_id(&mut self) -> String {
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u128;
        let n = self.id_counter;
        self.id_counter += 1;
        format!("{}{}", to_base36(millis), to_base36(u128::from(n)))
    }

    #[must_use]
    pub fn current_preset(&self) -> Option<&str> {
        self.current_preset.as_deref()
    }

    #[must_use]
    pub fn is_preset_busy(&self) -> bool {
        self.preset_busy
    }

    #[must_use]
    pub fn play_log(&self) -> &[PlayLogEntry] {
        &self.play_log
    }

    /// Natural dimensions of a media file, probed once per stripped
    /// path. Probe failures cache a zero size so playback degrades to
    /// the engine's natural sizing instead of re-probing every play.
    pub fn media_size(&mut self, path: &str) -> MediaSize {
        let key = strip_query(path).to_string();
        if let Some(size) = self.media_sizes.get(&key) {
            return *size;
        }
        let size = match self.host.playback.probe_dimensions(path) {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!(path, error = %e, "dimension probe failed, playing unsized");
                MediaSize::default()
            }
        };
        self.media_sizes.insert(key, size);
        size
    }

    /// Starts one fullscreen effect.
    ///
    /// Honors the stored play options (fades, clear-before-play)
    /// unless `overrides` says otherwise. Returns the registered
    /// record, or `None` when there is no active scene or the engine
    /// refused the request; both cases have already been surfaced to
    /// the user.
    #[instrument(skip(self, overrides))]
    pub fn play_fullscreen(
        &mut self,
        path: &str,
        overrides: &PlayOverrides,
    ) -> Option<ActiveEffectRecord> {
        let options = settings::play_options(self.host.settings.as_ref());
        if options.clear_before_play && !overrides.skip_clear {
            self.clear_all();
        }

        let Some(scene) = self.host.playback.scene() else {
            self.host
                .notifier
                .error("Cannot play media: no scene is currently active.");
            return None;
        };

        let mode = order_mode(self.host.settings.as_ref());
        let z = overrides
            .explicit_z
            .unwrap_or_else(|| self.registry.next_z(mode));
        let id = overrides
            .explicit_id
            .clone()
            .unwrap_or_else(|| self.next_id());

        let natural = self.media_size(path);
        let volume = media_kind(path)
            .is_video()
            .then(|| settings::ambient_volume(self.host.settings.as_ref()));

        let request = build_request(path, &id, z, scene, natural, &options, overrides, volume);
        if let Err(e) = self.host.playback.play(&request) {
            tracing::error!(path, error = %e, "engine rejected play request");
            self.host
                .notifier
                .error(&format!("Could not play '{path}': {e}"));
            return None;
        }

        let record = ActiveEffectRecord {
            id,
            path: path.to_string(),
            tag: EFFECT_TAG.to_string(),
            name: request.name.clone(),
            z,
        };
        if !overrides.skip_register {
            self.registry.push(record.clone());
        }
        self.play_log.push(PlayLogEntry {
            path: path.to_string(),
            at: chrono::Utc::now().timestamp_millis(),
        });
        Some(record)
    }

    /// Stops one effect and drops its record.
    ///
    /// The engine occasionally misses a stop during scene churn, so
    /// the stop is verified against the engine's active list and
    /// retried once before giving up with a log entry.
    pub fn stop_effect(&mut self, name: &str) {
        if let Err(e) = self.host.playback.end_effect(name) {
            tracing::warn!(name, error = %e, "stop request failed");
        }
        if self.host.playback.active_effect_names().iter().any(|n| n == name) {
            tracing::debug!(name, "effect survived first stop, retrying");
            let _ = self.host.playback.end_effect(name);
            if self.host.playback.active_effect_names().iter().any(|n| n == name) {
                tracing::warn!(name, "effect still active after retry");
            }
        }
        self.registry.remove(name);
    }

    /// Replaces a running effect with new media in the same slot,
    /// keeping its z. Returns whether the swap happened.
    #[instrument(skip(self))]
    pub fn replace_effect(&mut self, name: &str, new_path: &str) -> bool {
        let Some(old) = self.registry.get(name).cloned() else {
            self.host
                .notifier
                .warn("The selected effect is no longer active.");
            self.registry.clear_selection();
            return false;
        };

        if let Err(e) = self.host.playback.end_effect(name) {
            tracing::warn!(name, error = %e, "stopping replaced effect failed");
        }

        let id = self.next_id();
        let overrides = PlayOverrides {
            skip_clear: true,
            explicit_z: Some(old.z),
            explicit_id: Some(id),
            skip_register: true,
            ..PlayOverrides::default()
        };
        match self.play_fullscreen(new_path, &overrides) {
            Some(record) => {
                self.registry.replace(name, record);
                true
            }
            None => {
                // The old effect is already gone; drop its record too.
                self.registry.remove(name);
                false
            }
        }
    }

    /// Applies a new registry order and replays everything so z
    /// values match registry positions.
    pub fn reorder_effects(&mut self, names: &[String]) {
        self.registry.reorder_by_names(names);
        self.replay_in_current_order();
    }

    /// Moves one now-playing entry (drag and drop) and replays.
    pub fn move_effect(&mut self, from: usize, to: usize) {
        self.registry.move_record(from, to);
        self.replay_in_current_order();
    }

    /// Flips the persisted stacking preference and resets the z
    /// counter. Records already playing keep their z; only subsequent
    /// plays pick up the new direction.
    pub fn toggle_order_mode(&mut self) -> Result<OrderMode> {
        let mode = order_mode(self.host.settings.as_ref()).toggled();
        set_order_mode(self.host.settings.as_ref(), mode)?;
        self.registry.reset_counter();
        self.host
            .notifier
            .info(&format!("Stacking order: {}", mode.label()));
        Ok(mode)
    }

    /// Stops every effect in registry order and restarts each with a
    /// position-derived z and no fades. Entries the engine refuses on
    /// restart are dropped from the registry.
    fn replay_in_current_order(&mut self) {
        let mode = order_mode(self.host.settings.as_ref());
        let snapshot: Vec<ActiveEffectRecord> = self.registry.records().to_vec();

        for record in &snapshot {
            if let Err(e) = self.host.playback.end_effect(&record.name) {
                tracing::warn!(name = %record.name, error = %e, "stop during replay failed");
            }
        }

        let mut failed: Vec<String> = Vec::new();
        for (i, record) in snapshot.iter().enumerate() {
            let overrides = PlayOverrides::replay(record.id.clone(), mode.z_for_position(i));
            if self.play_fullscreen(&record.path, &overrides).is_none() {
                failed.push(record.name.clone());
            }
        }
        for name in &failed {
            self.registry.remove(name);
        }
        self.registry.restamp_z(mode);
    }

    /// Stops everything the panel started and resets playback state:
    /// registry, z counter, preset marker, and the snapshot horizon of
    /// the play log.
    #[instrument(skip(self))]
    pub fn clear_all(&mut self) {
        if let Err(e) = self.host.playback.end_all() {
            tracing::warn!(error = %e, "clear-all stop failed");
        }
        let drained = self.registry.reset();
        tracing::debug!(stopped = drained.len(), "cleared all effects");
        self.last_clear_at = chrono::Utc::now().timestamp_millis();
        self.current_preset = None;
    }

    /// Items a preset saved right now would contain: the running
    /// effects in registry order, or, when nothing is running, every
    /// path played since the last clear. Either list is deduplicated
    /// on the stripped path, first occurrence wins.
    #[must_use]
    pub fn preset_snapshot(&self) -> Vec<PresetItem> {
        let paths: Vec<&str> = if self.registry.is_empty() {
            self.play_log
                .iter()
                .filter(|e| e.at >= self.last_clear_at)
                .map(|e| e.path.as_str())
                .collect()
        } else {
            self.registry.records().iter().map(|r| r.path.as_str()).collect()
        };

        let mut seen = std::collections::HashSet::new();
        paths
            .into_iter()
            .filter(|p| seen.insert(strip_query(p).to_string()))
            .map(|p| PresetItem { path: p.to_string() })
            .collect()
    }

    /// Saves the current snapshot as a preset in `folder`.
    pub fn save_preset(&mut self, folder: &str, name: &str) -> Result<()> {
        let items = self.preset_snapshot();
        if items.is_empty() {
            return Err(OrbError::Validation(
                "nothing is playing and nothing has been played since the last clear".into(),
            ));
        }
        let id = self.next_id();
        presets::add_preset(self.host.settings.as_ref(), folder, id, name, items)
    }

    /// Clears the stage and replays a preset's items in order.
    ///
    /// Re-entrant activations are rejected while one is in flight;
    /// items the engine refuses are skipped with a warning rather than
    /// aborting the rest.
    #[instrument(skip(self))]
    pub fn activate_preset(&mut self, folder: &str, id: &str) -> Result<()> {
        if self.preset_busy {
            self.host
                .notifier
                .warn("A preset is already being activated.");
            return Ok(());
        }
        self.preset_busy = true;
        let result = self.activate_preset_inner(folder, id);
        self.preset_busy = false;
        result
    }

    fn activate_preset_inner(&mut self, folder: &str, id: &str) -> Result<()> {
        let preset = presets::find_preset(self.host.settings.as_ref(), folder, id)?;
        self.clear_all();

        let mut started = 0usize;
        let overrides = PlayOverrides {
            skip_clear: true,
            ..PlayOverrides::default()
        };
        for item in &preset.items {
            if self.play_fullscreen(&item.path, &overrides).is_some() {
                started += 1;
            }
        }

        self.current_preset = Some(preset.id.clone());
        if started < preset.items.len() {
            self.host.notifier.warn(&format!(
                "Preset '{}': {} of {} items failed to start.",
                preset.name,
                preset.items.len() - started,
                preset.items.len()
            ));
        } else {
            self.host
                .notifier
                .info(&format!("Preset '{}' activated.", preset.name));
        }
        Ok(())
    }
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fixtures::{recording_host, RecordingPlayback, StubBrowser};
    use crate::host::SettingsStore;
    use crate::playback::{Z_BASE, Z_RANGE};
    use crate::storage::models::PlayOptions;
    use serde_json::json;

    fn session_with(playback: RecordingPlayback) -> (PlayerSession, crate::host::fixtures::HostHandles) {
        let (host, handles) = recording_host(StubBrowser::new(), playback);
        (PlayerSession::new(host), handles)
    }

    fn sized_playback() -> RecordingPlayback {
        let mut pb = RecordingPlayback::new();
        pb.sizes.insert(
            "fx/orb.webm".to_string(),
            MediaSize { width: 1920, height: 1080 },
        );
        pb
    }

    #[test]
    fn play_registers_and_stacks_ascending() {
        let (mut session, handles) = session_with(sized_playback());

        let first = session.play_fullscreen("fx/orb.webm?v=1", &PlayOverrides::default()).unwrap();
        let second = session.play_fullscreen("fx/orb.webm?v=2", &PlayOverrides::default()).unwrap();

        assert_eq!(first.z, Z_BASE);
        assert_eq!(second.z, Z_BASE + 1);
        assert_eq!(session.registry.records().len(), 2);
        assert_ne!(first.name, second.name);

        let played = handles.playback.played.borrow();
        assert_eq!(played.len(), 2);
        // Video gets ambient volume; no core settings means full.
        assert_eq!(played[0].volume, Some(1.0));
        assert_eq!(
            played[0].size,
            Some(MediaSize { width: 1920, height: 1080 })
        );
        assert_eq!(session.play_log().len(), 2);
    }

    #[test]
    fn missing_scene_blocks_playback() {
        let mut pb = RecordingPlayback::new();
        pb.scene = None;
        let (mut session, handles) = session_with(pb);

        assert!(session.play_fullscreen("fx/orb.webm", &PlayOverrides::default()).is_none());
        assert!(session.registry.is_empty());
        assert_eq!(handles.notifier.errors.borrow().len(), 1);
    }

    #[test]
    fn probe_failure_plays_unsized_and_caches() {
        let (mut session, handles) = session_with(RecordingPlayback::new());

        session.play_fullscreen("fx/unknown.webm", &PlayOverrides::default()).unwrap();
        session.play_fullscreen("fx/unknown.webm?busted", &PlayOverrides::default()).unwrap();

        let played = handles.playback.played.borrow();
        assert_eq!(played[0].size, None);
        // Second play hit the size cache (same stripped path).
        assert_eq!(session.media_sizes.len(), 1);
    }

    #[test]
    fn clear_before_play_preference_clears_first() {
        let (mut session, handles) = session_with(RecordingPlayback::new());
        settings::set_play_options(
            session.host.settings.as_ref(),
            &PlayOptions { clear_before_play: true, ..PlayOptions::default() },
        )
        .unwrap();

        session.play_fullscreen("a.webm", &PlayOverrides::default()).unwrap();
        session.play_fullscreen("b.webm", &PlayOverrides::default()).unwrap();

        assert_eq!(*handles.playback.end_all_calls.borrow(), 2);
        assert_eq!(session.registry.records().len(), 1);
        // Counter reset by each clear: both plays start at the band base.
        assert_eq!(session.registry.records()[0].z, Z_BASE);
    }

    #[test]
    fn replace_keeps_slot_and_z() {
        let (mut session, handles) = session_with(RecordingPlayback::new());
        let a = session.play_fullscreen("a.webm", &PlayOverrides::default()).unwrap();
        let _b = session.play_fullscreen("b.webm", &PlayOverrides::default()).unwrap();

        session.registry.toggle_selected(&a.name);
        assert!(session.replace_effect(&a.name, "c.webm"));

        let records = session.registry.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path, "c.webm");
        assert_eq!(records[0].z, Z_BASE); // slot z preserved
        assert_eq!(handles.playback.ended.borrow()[0], a.name);
        // A completed replace consumes the selection.
        assert_eq!(session.registry.selected(), None);
    }

    #[test]
    fn replace_of_vanished_effect_warns_and_clears_selection() {
        let (mut session, handles) = session_with(RecordingPlayback::new());
        assert!(!session.replace_effect("media-orb:ghost", "c.webm"));
        assert_eq!(handles.notifier.warns.borrow().len(), 1);
        assert_eq!(session.registry.selected(), None);
    }

    #[test]
    fn reorder_replays_with_positional_z_and_no_fades() {
        let (mut session, handles) = session_with(RecordingPlayback::new());
        let a = session.play_fullscreen("a.webm", &PlayOverrides::default()).unwrap();
        let b = session.play_fullscreen("b.webm", &PlayOverrides::default()).unwrap();

        session.reorder_effects(&[b.name.clone(), a.name.clone()]);

        let records = session.registry.records();
        assert_eq!(records[0].path, "b.webm");
        assert_eq!(records[0].z, Z_BASE);
        assert_eq!(records[1].z, Z_BASE + 1);

        let played = handles.playback.played.borrow();
        // Two initial plays plus two replays; replays have zero fades
        // and reuse the original effect names.
        assert_eq!(played.len(), 4);
        assert_eq!(played[2].fade_in_ms, 0);
        assert_eq!(played[2].name, b.name);
        assert_eq!(played[3].name, a.name);
    }

    #[test]
    fn toggled_order_mode_leaves_live_records_alone() {
        let (mut session, handles) = session_with(RecordingPlayback::new());
        session.play_fullscreen("a.webm", &PlayOverrides::default()).unwrap();
        session.play_fullscreen("b.webm", &PlayOverrides::default()).unwrap();

        let mode = session.toggle_order_mode().unwrap();
        assert_eq!(mode, OrderMode::Descending);

        // Running effects keep the z they were started with.
        let records = session.registry.records();
        assert_eq!(records[0].z, Z_BASE);
        assert_eq!(records[1].z, Z_BASE + 1);
        assert_eq!(handles.playback.played.borrow().len(), 2);

        // Fresh plays count down from the top of the band.
        let c = session.play_fullscreen("c.webm", &PlayOverrides::default()).unwrap();
        assert_eq!(c.z, Z_BASE + Z_RANGE);
    }

    #[test]
    fn preset_snapshot_prefers_running_effects() {
        let (mut session, _handles) = session_with(RecordingPlayback::new());
        session.play_fullscreen("a.webm?v=1", &PlayOverrides::default()).unwrap();
        session.play_fullscreen("a.webm?v=2", &PlayOverrides::default()).unwrap();
        session.play_fullscreen("b.webm", &PlayOverrides::default()).unwrap();

        let items = session.preset_snapshot();
        let paths: Vec<&str> = items.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["a.webm?v=1", "b.webm"]);
    }

    #[test]
    fn preset_snapshot_falls_back_to_log_since_clear() {
        let (mut session, _handles) = session_with(RecordingPlayback::new());
        session.play_fullscreen("old.webm", &PlayOverrides::default()).unwrap();
        session.clear_all();
        // A real clock can land the play and the clear in the same
        // millisecond; pin the pre-clear entry below the horizon.
        session.play_log[0].at = session.last_clear_at - 1;
        assert!(session.preset_snapshot().is_empty());

        let a = session.play_fullscreen("new.webm", &PlayOverrides::default()).unwrap();
        let b = session.play_fullscreen("later.webm", &PlayOverrides::default()).unwrap();
        session.stop_effect(&a.name);
        session.stop_effect(&b.name);
        assert!(session.registry.is_empty());

        // Stopping individually does not move the clear horizon, so
        // the log still yields a snapshot.
        let items = session.preset_snapshot();
        let paths: Vec<&str> = items.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["new.webm", "later.webm"]);
    }

    #[test]
    fn snapshot_horizon_includes_the_clear_tick() {
        let (mut session, _handles) = session_with(RecordingPlayback::new());
        session.play_log.push(PlayLogEntry { path: "before.webm".into(), at: 9 });
        session.play_log.push(PlayLogEntry { path: "boundary.webm".into(), at: 10 });
        session.last_clear_at = 10;

        let items = session.preset_snapshot();
        let paths: Vec<&str> = items.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["boundary.webm"]);
    }

    #[test]
    fn preset_activation_clears_then_plays_in_order() {
        let (mut session, handles) = session_with(RecordingPlayback::new());
        presets::create_folder(session.host.settings.as_ref(), "Combat").unwrap();
        session.save_preset_fixture("Combat", "Opening", &["x.webm", "y.png"]);

        session.play_fullscreen("before.webm", &PlayOverrides::default()).unwrap();
        let id = settings::read_presets(session.host.settings.as_ref())["Combat"][0]
            .id
            .clone();
        session.activate_preset("Combat", &id).unwrap();

        assert_eq!(session.registry.records().len(), 2);
        assert_eq!(session.registry.records()[0].path, "x.webm");
        assert_eq!(session.current_preset(), Some(id.as_str()));
        assert!(!session.is_preset_busy());
        assert_eq!(*handles.playback.end_all_calls.borrow(), 1);
        assert!(handles.notifier.infos.borrow().iter().any(|m| m.contains("Opening")));
    }

    #[test]
    fn activating_missing_preset_is_not_found() {
        let (mut session, _handles) = session_with(RecordingPlayback::new());
        assert!(matches!(
            session.activate_preset("Nowhere", "nope"),
            Err(OrbError::NotFound(_))
        ));
        assert!(!session.is_preset_busy());
    }

    #[test]
    fn activation_in_flight_rejects_a_second_request() {
        let (mut session, handles) = session_with(RecordingPlayback::new());
        session.preset_busy = true;
        session.activate_preset("Combat", "p1").unwrap();
        assert!(handles.playback.played.borrow().is_empty());
        assert!(handles
            .notifier
            .warns
            .borrow()
            .iter()
            .any(|m| m.contains("already being activated")));
    }

    #[test]
    fn save_preset_rejects_empty_snapshot() {
        let (mut session, _handles) = session_with(RecordingPlayback::new());
        presets::create_folder(session.host.settings.as_ref(), "Combat").unwrap();
        assert!(matches!(
            session.save_preset("Combat", "Empty"),
            Err(OrbError::Validation(_))
        ));
    }

    #[test]
    fn ambient_volume_flows_into_video_requests() {
        let (mut session, handles) = session_with(RecordingPlayback::new());
        handles
            .settings
            .set("core", "globalAmbientVolume", json!(0.25))
            .unwrap();

        session.play_fullscreen("clip.webm", &PlayOverrides::default()).unwrap();
        session.play_fullscreen("still.png", &PlayOverrides::default()).unwrap();

        let played = handles.playback.played.borrow();
        assert_eq!(played[0].volume, Some(0.25));
        assert_eq!(played[1].volume, None);
    }

    #[test]
    fn ids_are_unique_within_a_session() {
        let (mut session, _handles) = session_with(RecordingPlayback::new());
        let a = session.next_id();
        let b = session.next_id();
        assert_ne!(a, b);
    }

    impl PlayerSession {
        /// Test helper: store a preset directly.
        fn save_preset_fixture(&mut self, folder: &str, name: &str, paths: &[&str]) {
            let items = paths
                .iter()
                .map(|p| PresetItem { path: (*p).to_string() })
                .collect();
            let id = self.next_id();
            presets::add_preset(self.host.settings.as_ref(), folder, id, name, items).unwrap();
        }
    }
}
