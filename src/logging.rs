//! Tracing setup: stderr output plus an optional per-run log file.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// `<log_dir>/<command>_<YYYYmmdd_HHMMSS_mmm>.log`
pub fn log_file_path(log_dir: &Path, command: &str, now: chrono::NaiveDateTime) -> PathBuf {
    log_dir.join(format!("{}_{}.log", command, now.format("%Y%m%d_%H%M%S_%3f")))
}

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the default level (`info`, or `debug` when verbose).
/// Returns the log file path when file logging is enabled.
pub fn init(verbose: bool, log_file: Option<(&Path, &str)>) -> Result<Option<PathBuf>> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    let (file_layer, path) = match log_file {
        Some((log_dir, command)) => {
            fs::create_dir_all(log_dir)
                .with_context(|| format!("creating log directory {}", log_dir.display()))?;
            let path = log_file_path(log_dir, command, chrono::Local::now().naive_local());
            let file = fs::File::create(&path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_filter(filter());
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_log_file_path() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(7, 5, 1, 42)
            .unwrap();
        assert_eq!(
            log_file_path(Path::new("logs"), "skin_images", now),
            Path::new("logs/skin_images_20240309_070501_042.log")
        );
    }
}
