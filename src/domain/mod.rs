//! Core domain types shared across all layers.
//!
//! This module contains the error taxonomy and the path/media-name
//! vocabulary the rest of the crate is built on. Nothing in here talks
//! to the host application or touches persistence.

pub mod error;
pub mod media;

pub use error::{OrbError, Result};
pub use media::{
    basename, display_name, has_media_extension, media_kind, sanitize_display, strip_query,
    MediaKind,
};
