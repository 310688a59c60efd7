//! Size-rotated log file writer for the tracing subscriber.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

/// Rotate once the active file exceeds this many bytes.
const MAX_LOG_SIZE: u64 = 8 * 1024 * 1024;

/// Rotated files kept alongside the active one.
const MAX_BACKUPS: usize = 2;

struct Inner {
    path: PathBuf,
    file: Option<File>,
    written: u64,
}

impl Inner {
    fn ensure_open(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            self.written = file.metadata().map(|m| m.len()).unwrap_or(0);
            self.file = Some(file);
        }
        Ok(self.file.as_mut().unwrap_or_else(|| unreachable!()))
    }

    fn rotate_if_needed(&mut self) -> io::Result<()> {
        if self.written < MAX_LOG_SIZE {
            return Ok(());
        }
        self.file = None;
        for i in (1..MAX_BACKUPS).rev() {
            let from = self.path.with_extension(format!("log.{i}"));
            if from.exists() {
                let _ = std::fs::rename(&from, self.path.with_extension(format!("log.{}", i + 1)));
            }
        }
        std::fs::rename(&self.path, self.path.with_extension("log.1"))?;
        self.written = 0;
        Ok(())
    }
}

/// Cloneable writer handle; every clone appends to the same file.
#[derive(Clone)]
pub struct LogWriter {
    inner: Arc<Mutex<Inner>>,
}

impl LogWriter {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                path,
                file: None,
                written: 0,
            })),
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?;
        inner.rotate_if_needed()?;
        let written = inner.ensure_open()?.write(buf)?;
        inner.written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?;
        match inner.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_across_clones() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("panel.log");
        let mut a = LogWriter::new(path.clone());
        let mut b = a.clone();

        a.write_all(b"first\n").unwrap();
        b.write_all(b"second\n").unwrap();
        a.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs/nested/panel.log");
        let mut writer = LogWriter::new(path.clone());
        writer.write_all(b"hello\n").unwrap();
        assert!(path.exists());
    }
}
