//! Application layer: view state, events, actions, and the handler
//! that connects them to the playback session.

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::{Action, ConfirmRequest, PromptRequest};
pub use handler::{handle_event, Event};
pub use modes::{MediaFilter, ViewerMode};
pub use state::{FilteredEntry, PanelState};
