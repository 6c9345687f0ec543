//! Log sink setup: colored console output plus a JSON log file per job

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::driver::{MigrateError, Result};

/// `{log_dir}/{job}.log`
pub fn log_file_path(log_dir: &Path, job: &str) -> PathBuf {
    log_dir.join(format!("{}.log", job))
}

/// Install the global subscriber for one job run
///
/// `level` takes `EnvFilter` syntax (`info`, `migrator=debug`, ...); an
/// unparsable value falls back to `info`. Returns the log file path. Calling
/// this twice keeps the first subscriber.
pub fn init_logging(job: &str, level: &str, log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir).map_err(|source| MigrateError::LogSink {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let path = log_file_path(log_dir, job);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| MigrateError::LogSink {
            path: path.clone(),
            source,
        })?;

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let console = fmt::layer().with_target(false);
    let json_file = fmt::layer()
        .json()
        .with_ansi(false)
        .with_current_span(false)
        .with_writer(Mutex::new(file));

    // Already initialized (tests, or a second job in-process): keep it.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(json_file)
        .try_init();

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn log_file_is_named_after_job() {
        assert_eq!(
            log_file_path(Path::new("logs"), "delete-catalog"),
            PathBuf::from("logs/delete-catalog.log")
        );
    }

    #[test]
    fn init_creates_directory_and_file() {
        let temp = tempdir().unwrap();
        let log_dir = temp.path().join("nested").join("logs");

        let path = init_logging("seed-catalog", "not a filter ===", &log_dir).unwrap();

        assert!(log_dir.is_dir());
        assert!(path.is_file());
        assert_eq!(path, log_dir.join("seed-catalog.log"));
    }

    #[test]
    fn unwritable_directory_is_a_log_sink_error() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, b"").unwrap();

        let err = init_logging("job", "info", &blocker.join("logs")).unwrap_err();
        assert!(matches!(err, MigrateError::LogSink { .. }));
        assert!(err.is_fatal());
    }
}
