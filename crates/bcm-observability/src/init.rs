// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization
//!
//! Console output is always installed. With the `file-logging` feature and a
//! `log_dir`, a combined log file is written to a timestamped run folder and
//! older runs are pruned according to the retention policy.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingOptions};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging initialization result
///
/// Dropping the guard flushes any buffered file output.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving file logs, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Initialize the global tracing subscriber
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags raising individual crates to `debug`
/// * `options` - Default level, console format, and optional file output
///
/// # Errors
/// Fails on an unknown level, when the log folder cannot be created, or when a
/// global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<LoggingGuard> {
    options
        .level
        .parse::<tracing::Level>()
        .map_err(|_| anyhow!("Unknown log level: {}", options.level))?;

    let filter = debug_flags.to_filter_string(&options.level.to_lowercase());
    let make_filter = || {
        EnvFilter::try_new(&filter).with_context(|| format!("Invalid log filter: {}", filter))
    };

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console_layer = match options.format {
        LogFormat::Full => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(make_filter()?)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_filter(make_filter()?)
            .boxed(),
    };
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let mut file_guards = Vec::new();
    let mut run_folder = None;

    if let Some(base_log_dir) = &options.log_dir {
        #[cfg(feature = "file-logging")]
        {
            let folder = file_logging::create_run_folder(base_log_dir)?;
            file_logging::cleanup_old_logs(
                base_log_dir,
                options.retention_days,
                options.retention_runs,
            )?;

            let appender = tracing_appender::rolling::never(&folder, "bcm.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            file_guards.push(guard);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(make_filter()?)
                .boxed();
            layers.push(file_layer);
            run_folder = Some(folder);
        }

        #[cfg(not(feature = "file-logging"))]
        eprintln!(
            "Warning: file logging to {} requested but the 'file-logging' feature is disabled",
            base_log_dir.display()
        );
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir: run_folder,
    })
}

/// Initialize console logging at `info` with the given debug flags
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, &LoggingOptions::default())
}

#[cfg(feature = "file-logging")]
mod file_logging {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use chrono::{DateTime, NaiveDateTime, Utc};

    const RUN_PREFIX: &str = "run_";
    const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Create `run_YYYYMMDD_HHMMSS` under `base_log_dir`
    pub(super) fn create_run_folder(base_log_dir: &Path) -> Result<PathBuf> {
        let timestamp = Utc::now().format(RUN_TIMESTAMP_FORMAT);
        let run_folder = base_log_dir.join(format!("{}{}", RUN_PREFIX, timestamp));
        std::fs::create_dir_all(&run_folder)
            .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
        Ok(run_folder)
    }

    fn run_timestamp(path: &Path) -> Option<DateTime<Utc>> {
        let dir_name = path.file_name()?.to_str()?;
        let timestamp = dir_name.strip_prefix(RUN_PREFIX)?;
        NaiveDateTime::parse_from_str(timestamp, RUN_TIMESTAMP_FORMAT)
            .ok()
            .map(|dt| dt.and_utc())
    }

    /// Remove run folders older than `retention_days`, then keep at most
    /// `retention_runs` of the remaining ones
    pub(super) fn cleanup_old_logs(
        base_log_dir: &Path,
        retention_days: u64,
        retention_runs: usize,
    ) -> Result<()> {
        if !base_log_dir.exists() {
            return Ok(());
        }

        let cutoff_date = Utc::now() - chrono::Duration::days(retention_days as i64);

        let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
        for entry in std::fs::read_dir(base_log_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(dt) = run_timestamp(&path) {
                runs.push((path, dt));
            }
        }

        // Oldest first
        runs.sort_by_key(|(_, dt)| *dt);

        let (expired, kept): (Vec<_>, Vec<_>) =
            runs.into_iter().partition(|(_, dt)| *dt < cutoff_date);
        let excess = kept.len().saturating_sub(retention_runs);

        for (path, _) in expired.iter().chain(kept.iter().take(excess)) {
            if let Err(e) = std::fs::remove_dir_all(path) {
                eprintln!(
                    "Warning: Failed to remove old log directory {}: {}",
                    path.display(),
                    e
                );
            }
        }

        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tempfile::tempdir;

        #[test]
        fn test_cleanup_keeps_most_recent_runs() {
            let dir = tempdir().unwrap();
            let now = Utc::now();
            for hours_ago in 0..5 {
                let stamp = (now - chrono::Duration::hours(hours_ago)).format(RUN_TIMESTAMP_FORMAT);
                std::fs::create_dir_all(dir.path().join(format!("run_{}", stamp))).unwrap();
            }
            std::fs::create_dir_all(dir.path().join("unrelated")).unwrap();

            cleanup_old_logs(dir.path(), 30, 2).unwrap();

            let remaining: Vec<_> = std::fs::read_dir(dir.path())
                .unwrap()
                .map(|e| e.unwrap().file_name().into_string().unwrap())
                .collect();
            assert_eq!(remaining.iter().filter(|n| n.starts_with("run_")).count(), 2);
            assert!(remaining.contains(&"unrelated".to_string()));
        }

        #[test]
        fn test_cleanup_removes_expired_runs() {
            let dir = tempdir().unwrap();
            let old = (Utc::now() - chrono::Duration::days(45)).format(RUN_TIMESTAMP_FORMAT);
            let old_path = dir.path().join(format!("run_{}", old));
            std::fs::create_dir_all(&old_path).unwrap();
            let fresh = create_run_folder(dir.path()).unwrap();

            cleanup_old_logs(dir.path(), 30, 10).unwrap();

            assert!(!old_path.exists());
            assert!(fresh.exists());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_level() {
        let result = init_logging(
            &CrateDebugFlags::default(),
            &LoggingOptions::with_level("verbose"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_second_init_fails() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-bcm-plasticity".to_string()]);
        let guard = init_logging(&flags, &LoggingOptions::with_level("warn"))
            .expect("first initialization should succeed");
        assert!(guard.log_dir().is_none());

        let second = init_logging_default(&flags);
        assert!(second.is_err());
    }
}
