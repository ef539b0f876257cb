//! Append-only error log for failed poll cycles

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Display;
use std::fs::{create_dir_all, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `<ISO-8601> - Error: <message>` line
    pub fn append(&self, error: &dyn Display) -> io::Result<()> {
        self.append_at(Utc::now(), error)
    }

    pub fn append_at(&self, at: DateTime<Utc>, error: &dyn Display) -> io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_dir_all(dir)?;
        }

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Keep one entry per line even for multi-line error chains.
        let message = error.to_string().replace('\n', " ");
        let line = format!(
            "{} - Error: {}\n",
            at.to_rfc3339_opts(SecondsFormat::Millis, true),
            message
        );
        f.write_all(line.as_bytes())
    }
}
