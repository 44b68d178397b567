//! Rolling Logger
//!
//! File logging with a bounded ring of segments: `<app>.log` is the live
//! segment, `<app>.1.log` the most recent rotated one, and so on up to
//! `max_files`. `log` records are bridged into the same `tracing` sink.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::MakeWriter;

/// Rotation limits
#[derive(Debug, Clone, Copy)]
pub struct RollingConfig {
    /// Segment size that triggers a rotation
    pub max_bytes: u64,
    /// Total number of segments kept, live one included
    pub max_files: usize,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            max_bytes: 1024 * 1024,
            max_files: 5,
        }
    }
}

static INITIALIZED: OnceLock<PathBuf> = OnceLock::new();

/// Size-bounded log file that rotates into numbered segments
pub struct RollingFile {
    dir: PathBuf,
    app_name: String,
    config: RollingConfig,
    file: File,
    written: u64,
}

impl RollingFile {
    pub fn open(dir: impl AsRef<Path>, app_name: &str, config: RollingConfig) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let path = segment_path(&dir, app_name, 0);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            dir,
            app_name: app_name.to_string(),
            config,
            file,
            written,
        })
    }

    /// Path of the live segment
    pub fn path(&self) -> PathBuf {
        segment_path(&self.dir, &self.app_name, 0)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let keep = self.config.max_files.max(1);

        // Oldest segment falls off the end of the ring
        let oldest = segment_path(&self.dir, &self.app_name, keep - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (0..keep - 1).rev() {
            let from = segment_path(&self.dir, &self.app_name, n);
            if from.exists() {
                fs::rename(&from, segment_path(&self.dir, &self.app_name, n + 1))?;
            }
        }

        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.path())?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.config.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn segment_path(dir: &Path, app_name: &str, n: usize) -> PathBuf {
    if n == 0 {
        dir.join(format!("{}.log", app_name))
    } else {
        dir.join(format!("{}.{}.log", app_name, n))
    }
}

/// Shared handle handed to the fmt layer
#[derive(Clone)]
pub struct RollingWriter(Arc<Mutex<RollingFile>>);

impl RollingWriter {
    pub fn new(file: RollingFile) -> Self {
        Self(Arc::new(Mutex::new(file)))
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the global subscriber with default rotation limits
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, RollingConfig::default())
}

/// Install the global subscriber writing into `log_dir`
pub fn init_logger_with(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    config: RollingConfig,
) -> Result<(), String> {
    let mut file = RollingFile::open(log_dir, app_name, config)
        .map_err(|e| format!("Failed to open log file: {}", e))?;
    let path = file.path();

    writeln!(
        file,
        "=== {} started {} ===",
        app_name,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
    )
    .map_err(|e| format!("Failed to write log header: {}", e))?;

    tracing_subscriber::fmt()
        .with_writer(RollingWriter::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .map_err(|e| format!("Failed to install subscriber: {}", e))?;

    let _ = INITIALIZED.set(path);
    Ok(())
}

/// Live log file, once the logger is installed
pub fn log_file() -> Option<&'static Path> {
    INITIALIZED.get().map(PathBuf::as_path)
}

fn ensure_initialized() -> Result<(), String> {
    if INITIALIZED.get().is_some() {
        Ok(())
    } else {
        Err("Logger not initialized".to_string())
    }
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}
