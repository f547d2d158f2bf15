use std::time::SystemTime;

use super::*;

fn entry(severity: LogSeverity, message: &str) -> LogEntry {
    LogEntry::new(severity, "lumina::FrameLoop", message.to_string())
}

#[test]
fn test_severity_order_and_rank() {
    let all = [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ];
    for pair in all.windows(2) {
        assert!(pair[0] < pair[1]);
        assert!(pair[0].rank() < pair[1].rank());
    }
    for severity in all {
        assert_eq!(LogSeverity::from_rank(severity.rank()), severity);
    }
    assert_eq!(LogSeverity::from_rank(200), LogSeverity::Error);
}

#[test]
fn test_labels_are_fixed_width() {
    for severity in [LogSeverity::Trace, LogSeverity::Info, LogSeverity::Error] {
        assert_eq!(severity.label().len(), 5);
    }
    assert_eq!(LogSeverity::Warn.label().trim_end(), "WARN");
}

#[test]
fn test_entry_without_location() {
    let before = SystemTime::now();
    let entry = entry(LogSeverity::Info, "Pipeline ready");

    assert_eq!(entry.source, "lumina::FrameLoop");
    assert!(entry.timestamp >= before);
    assert!(entry.location().is_none());
}

#[test]
fn test_entry_with_location() {
    let entry = entry(LogSeverity::Error, "Incomplete").with_location("target/offscreen_target.rs", 42);

    assert_eq!(entry.file, Some("target/offscreen_target.rs"));
    assert_eq!(entry.line, Some(42));
    assert_eq!(entry.location().as_deref(), Some("target/offscreen_target.rs:42"));
}

#[test]
fn test_format_entry() {
    let plain = format_entry(&entry(LogSeverity::Debug, "Frame 3 recorded 8 passes"));
    assert!(plain.contains("[DEBUG] [lumina::FrameLoop] Frame 3 recorded 8 passes"), "{}", plain);
    assert!(!plain.contains('('));

    let located = format_entry(&entry(LogSeverity::Error, "boom").with_location("frame_loop.rs", 7));
    assert!(located.ends_with("boom (frame_loop.rs:7)"), "{}", located);
}

#[test]
fn test_default_logger_accepts_every_severity() {
    let logger = DefaultLogger;
    for severity in [LogSeverity::Trace, LogSeverity::Debug, LogSeverity::Info, LogSeverity::Warn] {
        logger.log(&entry(severity, "message"));
    }
    logger.log(&entry(LogSeverity::Error, "with location").with_location("log_tests.rs", 1));
}
