//! Error types for media-orb operations.

use thiserror::Error;

/// Errors that can occur during panel operations.
///
/// Each variant maps to a distinct failure domain so callers can decide
/// whether to surface the failure to the user, log it, or degrade
/// silently (e.g. folder listing falls back to an empty result).
#[derive(Error, Debug)]
pub enum OrbError {
    /// A required host capability is missing or not ready (no active
    /// scene, no file browser, playback engine not loaded).
    #[error("Host capability unavailable: {0}")]
    Unavailable(String),

    /// A named entity (favorite, preset, category, active effect) does
    /// not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User input or stored data failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Reading or writing a host setting failed.
    #[error("Settings storage error: {0}")]
    Storage(String),

    /// The host file browser rejected a listing request.
    #[error("File browse error: {0}")]
    Browse(String),

    /// The playback engine rejected a play, stop, or probe request.
    #[error("Playback error: {0}")]
    Playback(String),

    /// Serialization or deserialization of persisted data failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying I/O failure (log files, settings files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for media-orb operations.
pub type Result<T> = std::result::Result<T, OrbError>;
