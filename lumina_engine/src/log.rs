//! Engine diagnostics.
//!
//! Every pipeline component logs through the `engine_*!` macros with a source
//! named after itself (`"lumina::LightingStage"`). Entries go to the logger
//! installed with `Engine::set_logger`; the default one prints colored lines
//! to the console. ERROR entries carry the file and line that raised them.

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Destination of engine diagnostics
///
/// ```no_run
/// use lumina_engine::lumina::log::{Logger, LogEntry};
///
/// struct FrameOverlay;
///
/// impl Logger for FrameOverlay {
///     fn log(&self, entry: &LogEntry) {
///         // Show pass timings on screen...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One diagnostic record
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Component that emitted the entry, e.g. `"lumina::ShadowStage"`
    pub source: String,
    pub message: String,
    /// Only set for ERROR entries
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

impl LogEntry {
    /// Entry stamped with the current time, without a source location.
    pub fn new(severity: LogSeverity, source: &str, message: String) -> Self {
        Self {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        }
    }

    pub fn with_location(mut self, file: &'static str, line: u32) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self
    }

    /// `file:line` when the entry carries one
    pub fn location(&self) -> Option<String> {
        match (self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        }
    }
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-draw detail
    Trace,
    /// Per-pass information
    Debug,
    /// Setup, resize and shadow re-renders
    Info,
    Warn,
    /// Failures, reported with file:line
    Error,
}

impl LogSeverity {
    /// Rank stored by the global severity filter
    pub(crate) fn rank(self) -> u8 {
        self as u8
    }

    /// Inverse of `rank`; out-of-range values saturate to `Error`.
    pub(crate) fn from_rank(rank: u8) -> Self {
        match rank {
            0 => LogSeverity::Trace,
            1 => LogSeverity::Debug,
            2 => LogSeverity::Info,
            3 => LogSeverity::Warn,
            _ => LogSeverity::Error,
        }
    }

    /// Fixed-width label used in console output
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }

    fn colorize(self) -> ColoredString {
        let label = self.label();
        match self {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        }
    }
}

/// `[timestamp] [SEVERITY] [source] message (file:line)` without colors
pub fn format_entry(entry: &LogEntry) -> String {
    format_with(entry, entry.severity.label().normal(), entry.source.normal())
}

fn format_with(entry: &LogEntry, severity: ColoredString, source: ColoredString) -> String {
    let datetime: DateTime<Local> = entry.timestamp.into();
    let mut text = format!("[{}] [{}] [{}] {}",
        datetime.format("%H:%M:%S%.3f"), severity, source, entry.message);
    if let Some(location) = entry.location() {
        text.push_str(&format!(" ({})", location));
    }
    text
}

/// Console logger: colored severity and source, errors on stderr
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let text = format_with(entry, entry.severity.colorize(), entry.source.bright_blue());
        if entry.severity == LogSeverity::Error {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    }
}

// ===== LOGGING MACROS =====

#[doc(hidden)]
#[macro_export]
macro_rules! __engine_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        $crate::lumina::Engine::log(
            $crate::lumina::log::LogSeverity::$severity,
            $source,
            format!($($arg)*)
        )
    };
}

/// TRACE: per-draw detail
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Trace, $source, $($arg)*) };
}

/// DEBUG: per-pass information
///
/// ```no_run
/// # use lumina_engine::engine_debug;
/// engine_debug!("lumina::GeometryStage", "Drew {} objects into the G-buffer", 3);
/// ```
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Debug, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Info, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Warn, $source, $($arg)*) };
}

/// ERROR with the caller's file:line
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::lumina::Engine::log_detailed(
            $crate::lumina::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR message and build a `BackendError` from it
///
/// # Example
///
/// ```no_run
/// # use lumina_engine::engine_err;
/// # fn lookup() -> lumina_engine::lumina::Result<()> {
/// let missing: Option<u32> = None;
/// let value = missing.ok_or_else(|| engine_err!("lumina::Example", "value missing"))?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::lumina::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return early with a `BackendError`
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// Log an already-built error at ERROR severity and yield it back
///
/// Used for the typed variants (`TargetCreation`, `ShaderCompile`, ...)
/// so every error leaves a trace before it is propagated.
#[macro_export]
macro_rules! engine_report {
    ($source:expr, $err:expr) => {{
        let error = $err;
        $crate::engine_error!($source, "{}", error);
        error
    }};
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
