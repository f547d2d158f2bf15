/// Lumina Engine - process-wide logging front-end
///
/// The pipeline itself keeps no global state: scenes, cameras and lights are
/// passed explicitly through `SceneContext`. The only process-wide service is
/// the logger, stored here behind a RwLock so it can be swapped at runtime.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Rank of the minimum severity forwarded to the logger (Info by default)
static MIN_SEVERITY: AtomicU8 = AtomicU8::new(LogSeverity::Info as u8);

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

// ===== PUBLIC API =====

/// Engine logging entry point
///
/// # Example
///
/// ```no_run
/// use lumina_engine::lumina::Engine;
/// use lumina_engine::lumina::log::LogSeverity;
///
/// Engine::set_min_severity(LogSeverity::Debug);
/// Engine::log(LogSeverity::Info, "app", "Starting".to_string());
/// ```
pub struct Engine;

impl Engine {
    /// Replace the active logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use lumina_engine::lumina::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Set the minimum severity forwarded to the logger
    pub fn set_min_severity(severity: LogSeverity) {
        MIN_SEVERITY.store(severity.rank(), Ordering::Relaxed);
    }

    /// Current minimum severity
    pub fn min_severity() -> LogSeverity {
        LogSeverity::from_rank(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Dispatch an entry without source location (`engine_info!` and friends).
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(LogEntry::new(severity, source, message));
    }

    /// Dispatch an entry carrying `file:line` (`engine_error!`).
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(LogEntry::new(severity, source, message).with_location(file, line));
    }

    fn dispatch(entry: LogEntry) {
        if entry.severity.rank() < MIN_SEVERITY.load(Ordering::Relaxed) {
            return;
        }
        if let Ok(lock) = logger().read() {
            lock.log(&entry);
        }
    }
}
