//! Rolling Logger
//!
//! Size-rotated log file plus an in-memory ring buffer of the most recent
//! lines. [`init_logger`] installs a `tracing` subscriber that writes to the
//! file and to stderr; `log` records are bridged through `tracing-log`.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_MAX_FILES: usize = 5;
pub const DEFAULT_RECENT_LINES: usize = 200;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log io error: {0}")]
    Io(#[from] io::Error),
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("logger not initialized")]
    NotInitialized,
    #[error("subscriber install failed: {0}")]
    Subscriber(String),
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub dir: PathBuf,
    pub app_name: String,
    pub max_bytes: u64,
    pub max_files: usize,
    pub recent_lines: usize,
}

impl LoggerConfig {
    pub fn new(dir: impl Into<PathBuf>, app_name: &str) -> Self {
        Self {
            dir: dir.into(),
            app_name: app_name.to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
            max_files: DEFAULT_MAX_FILES,
            recent_lines: DEFAULT_RECENT_LINES,
        }
    }
}

// ========================
// Rolling file
// ========================

struct Inner {
    config: LoggerConfig,
    file: File,
    size: u64,
    recent: VecDeque<String>,
    partial: String,
}

impl Inner {
    fn path(&self, index: usize) -> PathBuf {
        rotated_path(&self.config.dir, &self.config.app_name, index)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let last = self.config.max_files.saturating_sub(1);
        if last == 0 {
            self.file = File::create(self.path(0))?;
            self.size = 0;
            return Ok(());
        }
        let oldest = self.path(last);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for i in (0..last).rev() {
            let from = self.path(i);
            if from.exists() {
                fs::rename(&from, self.path(i + 1))?;
            }
        }
        self.file = File::create(self.path(0))?;
        self.size = 0;
        Ok(())
    }

    fn remember(&mut self, buf: &[u8]) {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            if self.recent.len() == self.config.recent_lines {
                self.recent.pop_front();
            }
            self.recent.push_back(line.trim_end().to_string());
        }
    }
}

/// `app.log` for index 0, `app.<n>.log` for older files
fn rotated_path(dir: &Path, app_name: &str, index: usize) -> PathBuf {
    if index == 0 {
        dir.join(format!("{}.log", app_name))
    } else {
        dir.join(format!("{}.{}.log", app_name, index))
    }
}

/// Cheap to clone; every clone appends to the same file
#[derive(Clone)]
pub struct RollingFile {
    inner: Arc<Mutex<Inner>>,
}

impl RollingFile {
    pub fn open(config: LoggerConfig) -> Result<Self, LoggerError> {
        fs::create_dir_all(&config.dir)?;
        let path = rotated_path(&config.dir, &config.app_name, 0);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let size = file.metadata()?.len();
        let recent = VecDeque::with_capacity(config.recent_lines);
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner { config, file, size, recent, partial: String::new() })),
        })
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "rolling log lock poisoned"))
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.lock().ok().map(|inner| inner.path(0))
    }

    pub fn recent_lines(&self) -> Vec<String> {
        self.lock()
            .map(|inner| inner.recent.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.lock()?;
        if inner.size > 0 && inner.size + buf.len() as u64 > inner.config.max_bytes {
            inner.rotate()?;
        }
        inner.file.write_all(buf)?;
        inner.size += buf.len() as u64;
        inner.remember(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingFile {
    type Writer = RollingFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// ========================
// Global handle
// ========================

static LOGGER: OnceLock<RollingFile> = OnceLock::new();

pub fn init_logger(dir: impl Into<PathBuf>, app_name: &str) -> Result<(), LoggerError> {
    init_with_config(LoggerConfig::new(dir, app_name))
}

pub fn init_with_config(config: LoggerConfig) -> Result<(), LoggerError> {
    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    let file = RollingFile::open(config)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file.clone())
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()
        .map_err(|e| LoggerError::Subscriber(e.to_string()))?;
    LOGGER.set(file).map_err(|_| LoggerError::AlreadyInitialized)?;
    log::info!("logger started at {}", chrono::Local::now().to_rfc3339());
    Ok(())
}

pub fn info(message: &str) -> Result<(), LoggerError> {
    LOGGER.get().ok_or(LoggerError::NotInitialized)?;
    tracing::info!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), LoggerError> {
    LOGGER.get().ok_or(LoggerError::NotInitialized)?;
    tracing::error!("{}", message);
    Ok(())
}

/// Most recent lines written to the log file, oldest first
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(RollingFile::recent_lines).unwrap_or_default()
}

pub fn log_path() -> Option<PathBuf> {
    LOGGER.get().and_then(RollingFile::path)
}
