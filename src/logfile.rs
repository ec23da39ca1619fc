use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};

/// Daily rolling log file. `debug.log` becomes `debug.<YYYY-MM-DD>.log`, keeping `retention_days` files.
pub fn rolling_file(path: &Path, retention_days: u32) -> Result<RollingFileAppender, InitError> {
    let (dir, stem, ext) = split_path(path);

    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(stem)
        .max_log_files(retention_days.max(1) as usize);

    if let Some(ext) = ext {
        builder = builder.filename_suffix(ext);
    }

    builder.build(dir)
}

fn split_path(path: &Path) -> (PathBuf, String, Option<String>) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "debug".to_string());
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());

    (dir, stem, ext)
}

/// Copies everything written to stderr and to a log file
pub struct Tee<W: Write> {
    file: W,
}

impl<W: Write> Tee<W> {
    pub fn new(file: W) -> Self {
        Self { file }
    }
}

impl<W: Write> Write for Tee<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // A broken stderr should not stop file logging
        let _ = io::stderr().write_all(buf);
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stderr().flush();
        self.file.flush()
    }
}
