//! Actions the shell executes on the handler's behalf.
//!
//! Dialogs are modeled as request/response pairs: the handler emits an
//! action carrying a request token, the shell shows the dialog and
//! feeds the answer back as the matching result event in
//! [`crate::app::Event`].

use std::collections::BTreeMap;

use crate::storage::models::CategoriesMap;

/// A pending text-input dialog, identifying what the answer is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptRequest {
    NewFavorite,
    RenameFavorite { old: String },
    NewPresetFolder,
    RenamePresetFolder { old: String },
    RenamePreset { folder: String, id: String },
    SetAlias { path: String },
}

/// A pending yes/no dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmRequest {
    DeleteFavorite { name: String },
    DeletePresetFolder { name: String },
    DeletePreset { folder: String, id: String },
    HideFile { category: String, path: String },
}

/// Side effects for the shell to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Close the panel window.
    ClosePanel,
    /// Open the category configuration form with the current map and
    /// the source backends available for the folder dropdowns.
    OpenCategoryConfig {
        categories: CategoriesMap,
        sources: BTreeMap<String, String>,
    },
    /// Show a one-line text input dialog.
    PromptText {
        request: PromptRequest,
        title: String,
        initial: String,
    },
    /// Show a confirmation dialog.
    Confirm { request: ConfirmRequest, body: String },
    /// Open the host file picker rooted near the category's folder;
    /// answered by [`crate::app::Event::MediaPicked`].
    PickMedia { category: String, source: String, start_dir: String },
    /// Show the favorite chooser (existing lists plus a new-name
    /// input); answered by [`crate::app::Event::FavoriteChosen`].
    ChooseFavorite { path: String, existing: Vec<String> },
    /// Show the save-preset dialog (folder choice plus preset name);
    /// answered by [`crate::app::Event::SavePresetSubmitted`].
    SavePresetDialog { folders: Vec<String>, default_name: String },
}
