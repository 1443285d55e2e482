//! File logging for hosts of the find bar.
//!
//! A TUI owns the terminal, so log records go to a file instead. Every crate
//! in the workspace logs through the [`log`] facade; this module installs
//! [`env_logger`] behind it.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use log::{Level, LevelFilter};

/// Errors raised by [`init_file_logger`].
#[derive(Debug, thiserror::Error)]
pub enum LogInitError {
    #[error("failed to open log file: {0}")]
    Open(#[from] std::io::Error),
    #[error("a logger is already installed")]
    AlreadyInstalled(#[from] log::SetLoggerError),
}

/// Append records at `level` and above to `path`.
pub fn init_file_logger(path: impl AsRef<Path>, level: LevelFilter) -> Result<(), LogInitError> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;

    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format(|buf, record| {
            let line = format_line(&Local::now(), record.level(), &record.args().to_string());
            writeln!(buf, "{line}")
        })
        .try_init()?;

    log::debug!("=== findbar session started ===");
    Ok(())
}

/// `[timestamp] [LEVEL] message`
fn format_line(at: &DateTime<Local>, level: Level, message: &str) -> String {
    format!("[{}] [{}] {}", at.format("%Y-%m-%dT%H:%M:%S%.3f"), level, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn line_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            format_line(&at, Level::Debug, "bar pressed"),
            "[2024-03-09T14:05:07.000] [DEBUG] bar pressed"
        );
    }

    #[test]
    fn unopenable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("findbar.log");
        let err = init_file_logger(&path, LevelFilter::Debug).unwrap_err();
        assert!(matches!(err, LogInitError::Open(_)));
    }
}
