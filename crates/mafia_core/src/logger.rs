//! Per-invocation trace log.
//!
//! The engine returns its trace as ordered text lines inside the result so a
//! host can persist or display it alongside the round. Every line is mirrored
//! to `tracing` for hosts that install a subscriber.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

impl LogLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineLogger {
    lines: Vec<String>,
}

impl EngineLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, level: LogLevel, message: impl AsRef<str>) {
        let message = message.as_ref();
        match level {
            LogLevel::Debug => tracing::debug!(target: "mafia_core", "{}", message),
            LogLevel::Info => tracing::info!(target: "mafia_core", "{}", message),
            LogLevel::Warn => tracing::warn!(target: "mafia_core", "{}", message),
            LogLevel::Error => tracing::error!(target: "mafia_core", "{}", message),
            LogLevel::Critical => {
                tracing::error!(target: "mafia_core", critical = true, "{}", message)
            }
        }
        self.lines.push(format!("[{}] {}", level.label(), message).trim().to_string());
    }

    pub fn debug(&mut self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    pub fn critical(&mut self, message: impl AsRef<str>) {
        self.log(LogLevel::Critical, message);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines recorded at `level`, in order.
    pub fn lines_at(&self, level: LogLevel) -> impl Iterator<Item = &String> {
        let prefix = format!("[{}]", level.label());
        self.lines.iter().filter(move |line| line.starts_with(&prefix))
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
