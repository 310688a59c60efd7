//! Event handling.
//!
//! The shell translates raw input (clicks, drags, dialog answers,
//! intersection callbacks) into [`Event`]s; [`handle_event`] applies
//! them to the state and session and returns whether the panel should
//! re-render plus any [`Action`]s for the shell to execute.
//!
//! Expected user-level failures (name collisions, vanished targets)
//! are surfaced as warning toasts and swallowed; only infrastructure
//! failures propagate as errors.

use tracing::instrument;

use crate::app::actions::{Action, ConfirmRequest, PromptRequest};
use crate::app::modes::ViewerMode;
use crate::app::state::PanelState;
use crate::domain::{has_media_extension, OrbError, Result};
use crate::playback::PlayOverrides;
use crate::session::PlayerSession;
use crate::storage::aliases::{alias_for, set_alias};
use crate::storage::models::CategoriesMap;
use crate::storage::settings;
use crate::storage::{categories, favorites, presets};
use crate::ui::MountDecision;

/// Everything the shell can tell the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Navigation and filtering.
    ShowOverview,
    ShowCategory { key: String },
    ShowFavorites { list: Option<String> },
    ShowPresets { folder: Option<String> },
    SearchChanged(String),
    CycleMediaFilter,
    RefreshRequested,
    ClosePanelRequested,

    // Grid and preview lifecycle.
    SentinelVisible,
    TileVisible { tile: String },
    TileHidden { tile: String },
    TileMediaError { tile: String },

    // Playback.
    TileActivated { path: String },
    TileClearPlayed { path: String },
    StopEffect { name: String },
    ToggleEffectSelection { name: String },
    NowPlayingMoved { from: usize, to: usize },
    ToggleOrderMode,
    ClearAllRequested,

    // Category mutation.
    AddFileRequested,
    MediaPicked { category: String, path: Option<String> },
    HideFileRequested { category: String, path: String },
    CategoryConfigRequested,
    CategoriesSubmitted { categories: CategoriesMap },

    // Aliases and favorites.
    SetAliasRequested { path: String },
    AddToFavoriteRequested { path: String },
    FavoriteChosen { path: String, list: Option<String> },
    CreateFavoriteRequested,
    RenameFavoriteRequested { name: String },
    DeleteFavoriteRequested { name: String },
    RemoveFromFavorite { list: String, path: String },

    // Presets.
    CreatePresetFolderRequested,
    RenamePresetFolderRequested { name: String },
    DeletePresetFolderRequested { name: String },
    SavePresetRequested,
    SavePresetSubmitted { folder: String, name: String },
    ActivatePreset { folder: String, id: String },
    RenamePresetRequested { folder: String, id: String },
    DeletePresetRequested { folder: String, id: String },

    // Dialog results and the orb.
    PromptSubmitted { request: PromptRequest, value: Option<String> },
    Confirmed { request: ConfirmRequest, accepted: bool },
    OrbMoved { left: i32, top: i32 },
}

impl Event {
    /// Whether this event mutates stores or triggers playback and is
    /// therefore reserved for privileged users.
    fn requires_privilege(&self) -> bool {
        !matches!(
            self,
            Event::ShowOverview
                | Event::ShowCategory { .. }
                | Event::ShowFavorites { .. }
                | Event::ShowPresets { .. }
                | Event::SearchChanged(_)
                | Event::CycleMediaFilter
                | Event::RefreshRequested
                | Event::ClosePanelRequested
                | Event::SentinelVisible
                | Event::TileVisible { .. }
                | Event::TileHidden { .. }
                | Event::TileMediaError { .. }
                | Event::OrbMoved { .. }
        )
    }
}

/// Applies one event. Returns `(should_render, actions)`.
#[instrument(skip(state, session), fields(event = ?std::mem::discriminant(event)))]
pub fn handle_event(
    state: &mut PanelState,
    session: &mut PlayerSession,
    event: &Event,
) -> Result<(bool, Vec<Action>)> {
    if event.requires_privilege() && !session.host.permissions.is_privileged() {
        session
            .host
            .notifier
            .warn("Only a game master can do that.");
        return Ok((false, Vec::new()));
    }

    match event {
        Event::ShowOverview => {
            state.mode = ViewerMode::Overview;
            state.restart_grid(session);
            Ok((true, Vec::new()))
        }
        Event::ShowCategory { key } => {
            state.mode = ViewerMode::Category(key.clone());
            state.restart_grid(session);
            Ok((true, Vec::new()))
        }
        Event::ShowFavorites { list } => {
            state.mode = ViewerMode::Favorites(list.clone());
            state.restart_grid(session);
            Ok((true, Vec::new()))
        }
        Event::ShowPresets { folder } => {
            state.mode = ViewerMode::Presets(folder.clone());
            state.restart_grid(session);
            Ok((true, Vec::new()))
        }
        Event::SearchChanged(query) => {
            state.search = query.clone();
            state.restart_grid(session);
            Ok((true, Vec::new()))
        }
        Event::CycleMediaFilter => {
            state.filter = state.filter.cycled();
            state.restart_grid(session);
            Ok((true, Vec::new()))
        }
        Event::RefreshRequested => {
            state.refresh_index(session, true);
            Ok((true, Vec::new()))
        }
        Event::ClosePanelRequested => Ok((false, vec![Action::ClosePanel])),

        Event::SentinelVisible => Ok((state.grid.on_sentinel_visible().is_some(), Vec::new())),
        Event::TileVisible { tile } => {
            let mounted = state.previews.on_visible(tile) == MountDecision::Mounted;
            Ok((mounted, Vec::new()))
        }
        Event::TileHidden { tile } => {
            state.previews.on_hidden(tile);
            Ok((false, Vec::new()))
        }
        Event::TileMediaError { tile } => {
            state.previews.on_media_error(tile);
            Ok((true, Vec::new()))
        }

        Event::TileActivated { path } => {
            // A now-playing selection turns activation into a replace.
            if let Some(selected) = session.registry.selected().map(str::to_string) {
                session.replace_effect(&selected, path);
            } else {
                session.play_fullscreen(path, &PlayOverrides::default());
            }
            Ok((true, Vec::new()))
        }
        Event::TileClearPlayed { path } => {
            session.clear_all();
            let overrides = PlayOverrides {
                skip_clear: true,
                ..PlayOverrides::default()
            };
            session.play_fullscreen(path, &overrides);
            Ok((true, Vec::new()))
        }
        Event::StopEffect { name } => {
            session.stop_effect(name);
            Ok((true, Vec::new()))
        }
        Event::ToggleEffectSelection { name } => {
            session.registry.toggle_selected(name);
            Ok((true, Vec::new()))
        }
        Event::NowPlayingMoved { from, to } => {
            session.move_effect(*from, *to);
            Ok((true, Vec::new()))
        }
        Event::ToggleOrderMode => {
            session.toggle_order_mode()?;
            Ok((true, Vec::new()))
        }
        Event::ClearAllRequested => {
            session.clear_all();
            Ok((true, Vec::new()))
        }

        Event::AddFileRequested => {
            let Some(key) = state.mode.category_key().map(str::to_string) else {
                session
                    .host
                    .notifier
                    .warn("Open a category tab to add files to it.");
                return Ok((false, Vec::new()));
            };
            let map = settings::read_categories(session.host.settings.as_ref());
            let Some(record) = map.get(&key) else {
                session.host.notifier.warn("That category no longer exists.");
                return Ok((false, Vec::new()));
            };
            Ok((
                false,
                vec![Action::PickMedia {
                    category: key,
                    source: record.source.clone(),
                    start_dir: record.folder.clone(),
                }],
            ))
        }
        Event::MediaPicked { category, path } => {
            let Some(path) = path else {
                return Ok((false, Vec::new()));
            };
            if !has_media_extension(path) {
                session
                    .host
                    .notifier
                    .warn("Only image or video files are supported.");
                return Ok((false, Vec::new()));
            }
            match categories::add_file(session.host.settings.as_ref(), category, path) {
                Ok(true) => {
                    state.refresh_index(session, false);
                    Ok((true, Vec::new()))
                }
                Ok(false) => {
                    session
                        .host
                        .notifier
                        .info("That file is already in the category.");
                    Ok((false, Vec::new()))
                }
                Err(e) => absorb(session, e),
            }
        }
        Event::HideFileRequested { category, path } => {
            if category.is_empty() {
                session
                    .host
                    .notifier
                    .warn("Files can only be hidden from a category.");
                return Ok((false, Vec::new()));
            }
            Ok((
                false,
                vec![Action::Confirm {
                    request: ConfirmRequest::HideFile {
                        category: category.clone(),
                        path: path.clone(),
                    },
                    body: format!("Hide '{path}' from this category?"),
                }],
            ))
        }
        Event::CategoryConfigRequested => Ok((
            false,
            vec![Action::OpenCategoryConfig {
                categories: settings::read_categories(session.host.settings.as_ref()),
                sources: session.host.browser.sources(),
            }],
        )),
        Event::CategoriesSubmitted { categories: map } => {
            match categories::save_all(session.host.settings.as_ref(), map) {
                Ok(()) => {
                    session.folder_cache.invalidate_all();
                    state.refresh_index(session, false);
                    Ok((true, Vec::new()))
                }
                Err(e) => absorb(session, e),
            }
        }

        Event::SetAliasRequested { path } => {
            let aliases = settings::read_aliases(session.host.settings.as_ref());
            let initial = alias_for(&aliases, path).unwrap_or_default().to_string();
            Ok((
                false,
                vec![Action::PromptText {
                    request: PromptRequest::SetAlias { path: path.clone() },
                    title: "Rename display".to_string(),
                    initial,
                }],
            ))
        }
        Event::AddToFavoriteRequested { path } => {
            let existing: Vec<String> = settings::read_favorites(session.host.settings.as_ref())
                .keys()
                .cloned()
                .collect();
            Ok((
                false,
                vec![Action::ChooseFavorite {
                    path: path.clone(),
                    existing,
                }],
            ))
        }
        Event::FavoriteChosen { path, list } => {
            let Some(list) = list else {
                return Ok((false, Vec::new()));
            };
            let store = session.host.settings.as_ref();
            if !settings::read_favorites(store).contains_key(list) {
                if let Err(e) = favorites::create(store, list) {
                    return absorb(session, e);
                }
            }
            match favorites::add_path(session.host.settings.as_ref(), list, path) {
                Ok(true) => {
                    session
                        .host
                        .notifier
                        .info(&format!("Added to favorite '{list}'."));
                    Ok((true, Vec::new()))
                }
                Ok(false) => {
                    session
                        .host
                        .notifier
                        .info(&format!("Already in favorite '{list}'."));
                    Ok((false, Vec::new()))
                }
                Err(e) => absorb(session, e),
            }
        }
        Event::CreateFavoriteRequested => Ok((
            false,
            vec![Action::PromptText {
                request: PromptRequest::NewFavorite,
                title: "New favorite list".to_string(),
                initial: String::new(),
            }],
        )),
        Event::RenameFavoriteRequested { name } => Ok((
            false,
            vec![Action::PromptText {
                request: PromptRequest::RenameFavorite { old: name.clone() },
                title: "Rename favorite list".to_string(),
                initial: name.clone(),
            }],
        )),
        Event::DeleteFavoriteRequested { name } => Ok((
            false,
            vec![Action::Confirm {
                request: ConfirmRequest::DeleteFavorite { name: name.clone() },
                body: format!("Delete favorite list '{name}'?"),
            }],
        )),
        Event::RemoveFromFavorite { list, path } => {
            match favorites::remove_path(session.host.settings.as_ref(), list, path) {
                Ok(changed) => {
                    if changed {
                        state.restart_grid(session);
                    }
                    Ok((changed, Vec::new()))
                }
                Err(e) => absorb(session, e),
            }
        }

        Event::CreatePresetFolderRequested => Ok((
            false,
            vec![Action::PromptText {
                request: PromptRequest::NewPresetFolder,
                title: "New preset folder".to_string(),
                initial: String::new(),
            }],
        )),
        Event::RenamePresetFolderRequested { name } => Ok((
            false,
            vec![Action::PromptText {
                request: PromptRequest::RenamePresetFolder { old: name.clone() },
                title: "Rename preset folder".to_string(),
                initial: name.clone(),
            }],
        )),
        Event::DeletePresetFolderRequested { name } => Ok((
            false,
            vec![Action::Confirm {
                request: ConfirmRequest::DeletePresetFolder { name: name.clone() },
                body: format!("Delete preset folder '{name}' and all presets in it?"),
            }],
        )),
        Event::SavePresetRequested => {
            if session.preset_snapshot().is_empty() {
                session
                    .host
                    .notifier
                    .warn("Nothing to save: play something first.");
                return Ok((false, Vec::new()));
            }
            let folders: Vec<String> = settings::read_presets(session.host.settings.as_ref())
                .keys()
                .cloned()
                .collect();
            let default_name = format!(
                "Preset {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M")
            );
            Ok((
                false,
                vec![Action::SavePresetDialog {
                    folders,
                    default_name,
                }],
            ))
        }
        Event::SavePresetSubmitted { folder, name } => {
            let store = session.host.settings.as_ref();
            if !settings::read_presets(store).contains_key(folder) {
                if let Err(e) = presets::create_folder(store, folder) {
                    return absorb(session, e);
                }
            }
            match session.save_preset(folder, name) {
                Ok(()) => {
                    session
                        .host
                        .notifier
                        .info(&format!("Preset '{name}' saved to '{folder}'."));
                    Ok((true, Vec::new()))
                }
                Err(e) => absorb(session, e),
            }
        }
        Event::ActivatePreset { folder, id } => match session.activate_preset(folder, id) {
            Ok(()) => Ok((true, Vec::new())),
            Err(e) => absorb(session, e),
        },
        Event::RenamePresetRequested { folder, id } => Ok((
            false,
            vec![Action::PromptText {
                request: PromptRequest::RenamePreset {
                    folder: folder.clone(),
                    id: id.clone(),
                },
                title: "Rename preset".to_string(),
                initial: String::new(),
            }],
        )),
        Event::DeletePresetRequested { folder, id } => Ok((
            false,
            vec![Action::Confirm {
                request: ConfirmRequest::DeletePreset {
                    folder: folder.clone(),
                    id: id.clone(),
                },
                body: "Delete this preset?".to_string(),
            }],
        )),

        Event::PromptSubmitted { request, value } => {
            let Some(value) = value else {
                return Ok((false, Vec::new()));
            };
            apply_prompt(state, session, request, value)
        }
        Event::Confirmed { request, accepted } => {
            if !accepted {
                return Ok((false, Vec::new()));
            }
            apply_confirm(state, session, request)
        }
        Event::OrbMoved { left, top } => {
            // Keep the persisted position inside the viewport when the host
            // can tell us how big it is.
            let (max_left, max_top) = match session.host.playback.scene() {
                Some(geo) => (
                    i32::try_from(geo.viewport_width).unwrap_or(i32::MAX),
                    i32::try_from(geo.viewport_height).unwrap_or(i32::MAX),
                ),
                None => (i32::MAX, i32::MAX),
            };
            settings::set_orb_position(
                session.host.settings.as_ref(),
                crate::storage::OrbPosition {
                    left: (*left).clamp(0, max_left),
                    top: (*top).clamp(0, max_top),
                },
            )?;
            Ok((false, Vec::new()))
        }
    }
}

fn apply_prompt(
    state: &mut PanelState,
    session: &mut PlayerSession,
    request: &PromptRequest,
    value: &str,
) -> Result<(bool, Vec<Action>)> {
    let store = session.host.settings.as_ref();
    let result = match request {
        PromptRequest::NewFavorite => favorites::create(store, value),
        PromptRequest::RenameFavorite { old } => {
            let renamed = favorites::rename(store, old, value);
            if renamed.is_ok() {
                if let ViewerMode::Favorites(Some(current)) = &state.mode {
                    if current == old {
                        state.mode = ViewerMode::Favorites(Some(value.trim().to_string()));
                    }
                }
            }
            renamed
        }
        PromptRequest::NewPresetFolder => presets::create_folder(store, value),
        PromptRequest::RenamePresetFolder { old } => {
            let renamed = presets::rename_folder(store, old, value);
            if renamed.is_ok() {
                if let ViewerMode::Presets(Some(current)) = &state.mode {
                    if current == old {
                        state.mode = ViewerMode::Presets(Some(value.trim().to_string()));
                    }
                }
            }
            renamed
        }
        PromptRequest::RenamePreset { folder, id } => {
            presets::rename_preset(store, folder, id, value)
        }
        PromptRequest::SetAlias { path } => set_alias(store, path, value),
    };

    match result {
        Ok(()) => Ok((true, Vec::new())),
        Err(e) => absorb(session, e),
    }
}

fn apply_confirm(
    state: &mut PanelState,
    session: &mut PlayerSession,
    request: &ConfirmRequest,
) -> Result<(bool, Vec<Action>)> {
    let store = session.host.settings.as_ref();
    match request {
        ConfirmRequest::DeleteFavorite { name } => {
            let deleted = favorites::delete(store, name);
            if deleted.is_ok() && state.mode == ViewerMode::Favorites(Some(name.clone())) {
                state.mode = ViewerMode::Favorites(None);
            }
            finish(state, session, deleted, false)
        }
        ConfirmRequest::DeletePresetFolder { name } => {
            let deleted = presets::delete_folder(store, name);
            if deleted.is_ok() && state.mode == ViewerMode::Presets(Some(name.clone())) {
                state.mode = ViewerMode::Presets(None);
            }
            finish(state, session, deleted, false)
        }
        ConfirmRequest::DeletePreset { folder, id } => {
            let deleted = presets::delete_preset(store, folder, id);
            finish(state, session, deleted, false)
        }
        ConfirmRequest::HideFile { category, path } => {
            let hidden = categories::remove_or_hide(store, category, path).map(|_| ());
            finish(state, session, hidden, true)
        }
    }
}

fn finish(
    state: &mut PanelState,
    session: &mut PlayerSession,
    result: Result<()>,
    reindex: bool,
) -> Result<(bool, Vec<Action>)> {
    match result {
        Ok(()) => {
            if reindex {
                state.refresh_index(session, false);
            } else {
                state.restart_grid(session);
            }
            Ok((true, Vec::new()))
        }
        Err(e) => absorb(session, e),
    }
}

/// Turns expected user-level failures into warning toasts; anything
/// else is a real error.
fn absorb(session: &PlayerSession, e: OrbError) -> Result<(bool, Vec<Action>)> {
    match e {
        OrbError::Validation(_) | OrbError::NotFound(_) => {
            session.host.notifier.warn(&e.to_string());
            Ok((false, Vec::new()))
        }
        other => Err(other),
    }
}
