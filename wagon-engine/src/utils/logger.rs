//! Logging Infrastructure

use std::path::Path;

/// Initialize the logger at `info`
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with an optional rolling log file
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    match log_dir.map(Path::new) {
        Some(path) if path.is_dir() => {
            let file_appender = tracing_appender::rolling::daily(path, "wagon");
            let _ = subscriber.with_writer(file_appender).try_init();
        }
        Some(path) => {
            let _ = subscriber.try_init();
            tracing::warn!(dir = %path.display(), "Log directory does not exist, logging to stdout");
        }
        None => {
            let _ = subscriber.try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        init_logger_with_file(Some("debug"), dir.path().to_str());
        init_logger_with_file(Some("not-a-level"), Some("/definitely/missing/dir"));
        init_logger();
    }
}
