//! Media Orb: an embeddable media-playback control panel.
//!
//! Media Orb turns a host application's file storage into a browsable,
//! searchable media board and drives the host's screen-space effect
//! engine from it:
//! - Configurable categories over host folders, with per-category
//!   allow/deny file overlays
//! - Chunked grid virtualization with a capped budget of live previews
//! - Fullscreen cover-fit playback in a reserved z band, with a
//!   now-playing strip supporting stop, replace, and drag reordering
//! - Favorites, display aliases, and activatable playback presets
//! - Persistence through the host's namespaced settings store
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Embedding Shell (host application)                 │  ← Renders views,
//! └─────────────────────────────────────────────────────┘    feeds events
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Event handling
//! │  - View state and modes                             │  ← Dialog round trips
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Session       │   │ Index Layer   │   │ UI Layer      │
//! │ (session.rs)  │   │ (index/)      │   │ (ui/)         │
//! │ - Playback    │   │ - Folder walk │   │ - Virtual grid│
//! │ - Registry    │   │ - Listing     │   │ - Preview caps│
//! │ - Presets     │   │   cache       │   │ - View models │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage (storage/) & Host Capabilities (host/)     │
//! │  - Categories, favorites, presets, aliases          │
//! │  - SettingsStore / FileBrowser / EffectPlayback     │
//! │  - Notifier / PermissionGate traits                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/) & Observability (observability/)  │
//! │  - Path/media vocabulary, error taxonomy            │
//! │  - Tracing with rotating log files                  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: View state, events, actions, and the event handler
//! - [`session`]: Playback orchestration and the now-playing registry
//! - [`index`]: Recursive media discovery and the listing cache
//! - [`playback`]: Stacking policy and effect request assembly
//! - [`storage`]: Persisted models and the stores over host settings
//! - [`host`]: Capability traits the embedding application implements
//! - [`ui`]: Grid virtualization, preview budgeting, view models
//! - [`domain`]: Errors and path/media-name vocabulary
//! - [`observability`]: Tracing setup
//!
//! # Integration Flow
//!
//! 1. The shell implements the [`host`] traits and builds a [`Host`].
//! 2. [`initialize`] produces a [`PlayerSession`] and [`PanelState`]
//!    with the category index built.
//! 3. Input and dialog answers become [`Event`]s fed through
//!    [`handle_event`]; returned [`Action`]s (dialogs, pickers, close)
//!    are executed by the shell, whose answers come back as further
//!    events.
//! 4. After any event that reports `should_render`, the shell calls
//!    [`PanelState::view`] and redraws.

pub mod app;
pub mod domain;
pub mod host;
pub mod index;
pub mod observability;
pub mod playback;
pub mod session;
pub mod storage;
pub mod ui;

pub use app::{handle_event, Action, Event, MediaFilter, PanelState, ViewerMode};
pub use domain::{MediaKind, OrbError, Result};
pub use host::Host;
pub use playback::{NowPlayingRegistry, OrderMode};
pub use session::PlayerSession;
pub use storage::JsonSettingsStore;
pub use ui::{OrbView, PanelView};

/// Creates a session and panel state for a host, building the initial
/// category index.
///
/// Index construction is best-effort: unreadable folders have already
/// warned the user and contribute nothing, so the panel always comes
/// up.
pub fn initialize(host: Host) -> (PanelState, PlayerSession) {
    tracing::debug!("initializing media orb panel");
    let mut session = PlayerSession::new(host);
    let mut state = PanelState::new(&session);
    state.refresh_index(&mut session, false);
    (state, session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fixtures::{recording_host, RecordingPlayback, StubBrowser};
    use crate::storage::models::{CategoriesMap, CategoryRecord};
    use crate::storage::settings;

    #[test]
    fn initialize_builds_the_index_up_front() {
        let mut browser = StubBrowser::new();
        browser.add_dir("data", "fx", &["fx/orb.webm"], &[]);
        let (host, _handles) = recording_host(browser, RecordingPlayback::new());

        let mut map = CategoriesMap::new();
        let mut fx = CategoryRecord::named("FX");
        fx.folder = "fx".into();
        map.insert("cat1".into(), fx);
        settings::write_categories(host.settings.as_ref(), &map).unwrap();

        let (state, session) = initialize(host);
        assert_eq!(state.index.len(), 1);
        assert_eq!(session.folder_cache.len(), 1);
    }

    #[test]
    fn initialize_survives_missing_folders() {
        let mut map = CategoriesMap::new();
        let mut broken = CategoryRecord::named("Broken");
        broken.folder = "nowhere".into();
        map.insert("cat1".into(), broken);

        let (host, handles) = recording_host(StubBrowser::new(), RecordingPlayback::new());
        settings::write_categories(host.settings.as_ref(), &map).unwrap();

        let (state, _session) = initialize(host);
        assert!(state.index.is_empty());
        assert_eq!(handles.notifier.warns.borrow().len(), 1);
    }
}
