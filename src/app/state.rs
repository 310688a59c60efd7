//! Panel view state and view-model computation.

use crate::app::modes::{MediaFilter, ViewerMode};
use crate::domain::{display_name, media_kind, strip_query, MediaKind};
use crate::index::{build_index, IndexEntry};
use crate::session::PlayerSession;
use crate::storage::aliases::alias_for;
use crate::storage::models::{ordered_categories, AliasMap};
use crate::storage::settings;
use crate::ui::viewmodel::{
    CategoryTab, GridTile, NowPlayingTile, OrbView, PanelView, PresetCard,
};
use crate::ui::{PreviewLifecycleManager, VirtualGrid};

/// One entry surviving the current mode, filter, and search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredEntry {
    pub path: String,
    pub display_name: String,
    pub kind: MediaKind,
    /// Absent for favorites-mode entries, which belong to no category.
    pub category_key: Option<String>,
}

/// Everything the panel needs to describe itself to the shell.
///
/// Playback and persistence state live in [`PlayerSession`]; this is
/// the per-window view state that dies with the panel.
pub struct PanelState {
    pub mode: ViewerMode,
    pub filter: MediaFilter,
    pub search: String,
    pub index: Vec<IndexEntry>,
    pub grid: VirtualGrid,
    pub previews: PreviewLifecycleManager,
}

impl PanelState {
    /// Fresh state with the preview budget read from settings.
    #[must_use]
    pub fn new(session: &PlayerSession) -> Self {
        let limit = settings::preview_max_active(session.host.settings.as_ref());
        Self {
            mode: ViewerMode::Overview,
            filter: MediaFilter::All,
            search: String::new(),
            index: Vec::new(),
            grid: VirtualGrid::default(),
            previews: PreviewLifecycleManager::new(limit),
        }
    }

    /// Rebuilds the category index, optionally forcing fresh folder
    /// listings, and restarts the grid window.
    pub fn refresh_index(&mut self, session: &mut PlayerSession, force: bool) {
        if force {
            session.folder_cache.invalidate_all();
        }
        let categories = ordered_categories(&settings::read_categories(
            session.host.settings.as_ref(),
        ));
        self.index = build_index(
            &mut session.folder_cache,
            session.host.browser.as_ref(),
            session.host.notifier.as_ref(),
            &categories,
            force,
        );
        self.restart_grid(session);
    }

    /// Restarts chunked rendering after any change to what the grid
    /// shows. Mounted previews are released with it.
    pub fn restart_grid(&mut self, session: &PlayerSession) {
        let total = self.filtered_entries(session).len();
        self.grid.reset(total);
        self.previews.clear();
        self.previews
            .set_limit(settings::preview_max_active(session.host.settings.as_ref()));
    }

    /// Entries surviving the current mode, media filter, and search,
    /// sorted by display name (case-insensitive, path as tiebreak).
    #[must_use]
    pub fn filtered_entries(&self, session: &PlayerSession) -> Vec<FilteredEntry> {
        let aliases = settings::read_aliases(session.host.settings.as_ref());

        let candidates: Vec<FilteredEntry> = match &self.mode {
            ViewerMode::Overview => self.index.iter().map(|e| entry_of(e, &aliases)).collect(),
            ViewerMode::Category(key) => self
                .index
                .iter()
                .filter(|e| e.category_key == *key)
                .map(|e| entry_of(e, &aliases))
                .collect(),
            ViewerMode::Favorites(Some(name)) => {
                settings::read_favorites(session.host.settings.as_ref())
                    .get(name)
                    .map(|paths| {
                        paths
                            .iter()
                            .map(|p| FilteredEntry {
                                display_name: display_name(p, alias_for(&aliases, p)),
                                kind: media_kind(p),
                                category_key: None,
                                path: p.clone(),
                            })
                            .collect()
                    })
                    .unwrap_or_default()
            }
            // List pickers and preset folders render their own cards.
            ViewerMode::Favorites(None) | ViewerMode::Presets(_) => Vec::new(),
        };

        let needle = self.search.trim().to_lowercase();
        let mut matched: Vec<FilteredEntry> = candidates
            .into_iter()
            .filter(|e| self.filter.accepts(e.kind))
            .filter(|e| {
                needle.is_empty()
                    || e.display_name.to_lowercase().contains(&needle)
                    || strip_query(&e.path).to_lowercase().contains(&needle)
            })
            .collect();

        matched.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then_with(|| a.path.cmp(&b.path))
        });
        matched
    }

    /// Computes the full render description.
    #[must_use]
    pub fn view(&self, session: &PlayerSession) -> PanelView {
        let store = session.host.settings.as_ref();
        let aliases = settings::read_aliases(store);
        let entries = self.filtered_entries(session);

        let hover = settings::hover_preview(store);
        let released = self.grid.rendered().end.min(entries.len());
        let tiles: Vec<GridTile> = entries[..released]
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let tile_id = format!("{i}#{}", strip_query(&e.path));
                GridTile {
                    hover_play: e.kind.is_video()
                        && self.previews.should_hover_play(&tile_id, hover),
                    path: e.path.clone(),
                    display_name: e.display_name.clone(),
                    kind: e.kind,
                    category_key: e.category_key.clone().unwrap_or_default(),
                    tooltip: e.path.clone(),
                    tile_id,
                }
            })
            .collect();

        let categories = ordered_categories(&settings::read_categories(store));
        let tabs = categories
            .iter()
            .map(|c| CategoryTab {
                key: c.key.clone(),
                name: c.record.name.clone(),
                is_active: self.mode.category_key() == Some(c.key.as_str()),
            })
            .collect();

        let now_playing = session
            .registry
            .records()
            .iter()
            .map(|r| {
                let name = display_name(&r.path, alias_for(&aliases, &r.path));
                NowPlayingTile::from_record(r, name, session.registry.selected())
            })
            .collect();

        let favorite_lists: Vec<String> =
            settings::read_favorites(store).keys().cloned().collect();
        let preset_map = settings::read_presets(store);
        let preset_folders: Vec<String> = preset_map.keys().cloned().collect();
        let presets = match &self.mode {
            ViewerMode::Presets(Some(folder)) => preset_map
                .get(folder)
                .map(|list| {
                    list.iter()
                        .map(|p| PresetCard {
                            id: p.id.clone(),
                            name: p.name.clone(),
                            item_count: p.items.len(),
                            is_current: session.current_preset() == Some(p.id.as_str()),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        let empty_message = match &self.mode {
            ViewerMode::Presets(_) | ViewerMode::Favorites(None) => None,
            _ if entries.is_empty() => Some(if self.search.trim().is_empty() {
                "No media found. Configure category folders or add files.".to_string()
            } else {
                format!("Nothing matches '{}'.", self.search.trim())
            }),
            _ => None,
        };

        let match_count = entries.len();
        PanelView {
            title: self.title(),
            search_query: self.search.clone(),
            filter_label: self.filter.label(),
            order_label: crate::playback::order_mode(store).label(),
            tabs,
            pending_tiles: match_count.saturating_sub(tiles.len()),
            tiles,
            now_playing,
            favorite_lists,
            preset_folders,
            presets,
            preview_background: settings::preview_background(store),
            empty_message,
            match_count,
        }
    }

    /// The floating orb's render description.
    #[must_use]
    pub fn orb_view(session: &PlayerSession) -> OrbView {
        let store = session.host.settings.as_ref();
        OrbView {
            visible: settings::show_orb(store),
            position: settings::orb_position(store),
            busy: session.is_preset_busy(),
        }
    }

    fn title(&self) -> String {
        match &self.mode {
            ViewerMode::Overview => "Media Orb".to_string(),
            ViewerMode::Category(key) => format!("Media Orb — {key}"),
            ViewerMode::Favorites(Some(name)) => format!("Media Orb — Favorites: {name}"),
            ViewerMode::Favorites(None) => "Media Orb — Favorites".to_string(),
            ViewerMode::Presets(Some(folder)) => format!("Media Orb — Presets: {folder}"),
            ViewerMode::Presets(None) => "Media Orb — Presets".to_string(),
        }
    }
}

fn entry_of(entry: &IndexEntry, aliases: &AliasMap) -> FilteredEntry {
    FilteredEntry {
        display_name: display_name(&entry.path, alias_for(aliases, &entry.path)),
        kind: media_kind(&entry.path),
        category_key: Some(entry.category_key.clone()),
        path: entry.path.clone(),
    }
}
