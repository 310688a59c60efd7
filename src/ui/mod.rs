//! Presentation layer: grid virtualization, preview budgeting, and the
//! view models the shell renders from.

pub mod grid;
pub mod preview;
pub mod viewmodel;

pub use grid::{VirtualGrid, DEFAULT_CHUNK_SIZE};
pub use preview::{MountDecision, PreviewLifecycleManager};
pub use viewmodel::{CategoryTab, GridTile, NowPlayingTile, OrbView, PanelView, PresetCard};
