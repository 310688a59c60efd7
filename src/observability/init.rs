//! Tracing subscriber setup.

use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::observability::file_writer::LogWriter;

/// Initializes the global tracing subscriber.
///
/// `level` follows `EnvFilter` directive syntax (`"info"`,
/// `"media_orb=debug"`); `None` defaults to `info`. When `log_path` is
/// given, output goes to a size-rotated file there, otherwise to
/// stderr. Safe to call more than once; later calls are ignored, which
/// matters when several panels share a process.
pub fn init_tracing(level: Option<&str>, log_path: Option<PathBuf>) {
    let filter = EnvFilter::try_new(level.unwrap_or("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match log_path {
        Some(path) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(LogWriter::new(path)),
            )
            .try_init(),
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!("tracing initialized");
    }
}
