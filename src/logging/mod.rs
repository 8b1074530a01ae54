//! Logging collaborator and subscriber setup
//!
//! The generator reports progress through the [`Logger`] trait so callers can
//! route messages wherever they like. [`TracingLogger`] is what the binary
//! uses; [`MemoryLogger`] keeps messages around for inspection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to the global `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    #[inline]
    fn info(&self, message: &str) {
        info!(target: "ctxfy::generator", "{}", message);
    }

    #[inline]
    fn warning(&self, message: &str) {
        warn!(target: "ctxfy::generator", "{}", message);
    }

    #[inline]
    fn error(&self, message: &str) {
        error!(target: "ctxfy::generator", "{}", message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Records every message in order
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    #[inline]
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message)
            .collect()
    }

    fn record(&self, level: LogLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(LogEntry {
                level,
                message: message.to_string(),
            });
        }
    }
}

impl Logger for MemoryLogger {
    #[inline]
    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    #[inline]
    fn warning(&self, message: &str) {
        self.record(LogLevel::Warning, message);
    }

    #[inline]
    fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for LogFormat {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level. Output goes to stderr.
#[inline]
pub fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed when embedded or under test
    let _ = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
