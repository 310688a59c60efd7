//! Media index: folder walking, listing cache, and category index
//! construction.

pub mod builder;
pub mod cache;
pub mod walker;

pub use builder::{build_index, IndexEntry};
pub use cache::MediaIndexCache;
pub use walker::{list_all_media, list_all_media_cached};
