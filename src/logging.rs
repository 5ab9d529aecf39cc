//! Logging setup
//!
//! Two sinks behind one `EnvFilter` (`RUST_LOG` wins, else `info`, or
//! `debug` with `--verbose`):
//! - `<log_dir>/cross-seed.log`, appended through a non-blocking writer
//! - stderr, warnings only unless verbose, muted while the picker is on screen

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "cross-seed.log";

static CONSOLE_MUTED: AtomicBool = AtomicBool::new(false);

/// Silence (or restore) the stderr sink
///
/// The alternate screen would be corrupted by stray log lines.
pub fn mute_console(muted: bool) {
    CONSOLE_MUTED.store(muted, Ordering::Relaxed);
}

pub fn console_muted() -> bool {
    CONSOLE_MUTED.load(Ordering::Relaxed)
}

/// Default directive when `RUST_LOG` is not set
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber
///
/// Keep the returned guard alive until exit so buffered lines get flushed.
pub fn init(verbose: bool, log_dir: &Path) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let (file_layer, guard, file_error) = match open_log_file(log_dir) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr.with_filter(|_: &tracing::Metadata<'_>| !console_muted()))
        .with_filter(console_level);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
    {
        eprintln!("Warning: logging already initialised: {}", e);
    }

    match file_error {
        Some(e) => tracing::warn!(
            dir = %log_dir.display(),
            error = %e,
            "File logging disabled"
        ),
        None => tracing::debug!(
            path = %log_dir.join(LOG_FILE_NAME).display(),
            "Logging to file"
        ),
    }

    guard
}

fn open_log_file(log_dir: &Path) -> std::io::Result<std::fs::File> {
    std::fs::create_dir_all(log_dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_mute_toggle() {
        mute_console(true);
        assert!(console_muted());
        mute_console(false);
        assert!(!console_muted());
    }

    #[test]
    fn test_open_log_file_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        open_log_file(&nested).unwrap();
        assert!(nested.join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn test_open_log_file_appends() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        writeln!(open_log_file(dir.path()).unwrap(), "first").unwrap();
        writeln!(open_log_file(dir.path()).unwrap(), "second").unwrap();

        let text = std::fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        assert_eq!(text, "first\nsecond\n");
    }
}
