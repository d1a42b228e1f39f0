//! Logging setup for gcf with file output and optional stderr.
//!
//! Logs always go to a file at `warn` level (or higher if `GCF_LOG` is set).
//! Stderr logging is enabled when `GCF_LOG` or `RUST_LOG` is set. Stdout is left to
//! the command output.
//!
//! ## Environment Variables
//!
//! 1. **`GCF_LOG`** (highest priority) - gcf-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for gcf crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/gcf/logs/gcf-<pid>.log`
//! - macOS: `~/Library/Application Support/gcf/logs/gcf-12345.log`
//! - Linux: `~/.local/share/gcf/logs/gcf-12345.log`
//!
//! Override with `--log-file <path>` or `GCF_LOG_FILE`.

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Crates that get the `GCF_LOG` level when it is a bare level like `debug`.
const GCF_CRATES: &[&str] = &["gcf_fold", "gcf_bin", "gcf_log"];

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Default)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// Respects the priority described in the module docs:
/// `GCF_LOG` > `RUST_LOG` > default settings.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program --
/// dropping it flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard, BoxError> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_file_filter()?);

    let stderr_enabled = env::var("GCF_LOG").is_ok() || env::var("RUST_LOG").is_ok();
    let stderr_layer = if stderr_enabled {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(create_filter()?),
        )
    } else {
        None
    };

    Registry::default()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    let log_file = log_dir.join(filename);
    tracing::debug!(log_file = %log_file.display(), "logging initialized");

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file,
    })
}

/// Initialize logging for tests.
///
/// Stderr-only, no file output. Will not crash if called multiple times or if
/// logging is already initialized by another test.
#[allow(clippy::let_unit_value)]
pub fn test() {
    let _ = test_init();
}

fn test_init() -> Result<(), BoxError> {
    let filter = create_filter()?;
    fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()?;
    Ok(())
}

/// Split the log target into directory and file name.
///
/// A path with an extension names the file itself; anything else is a directory that
/// gets the default per-process file name.
fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("gcf-{}.log", std::process::id());

    let override_path =
        override_path.or_else(|| env::var_os("GCF_LOG_FILE").map(PathBuf::from));

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir.to_path_buf(), name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gcf")
        .join("logs");

    (dir, filename)
}

/// File filter: uses user-specified level if set, otherwise defaults to `warn`.
fn create_file_filter() -> Result<EnvFilter, BoxError> {
    if env::var("GCF_LOG").is_ok() || env::var("RUST_LOG").is_ok() {
        return create_filter();
    }
    Ok(EnvFilter::new("warn"))
}

/// Create the [`EnvFilter`] for the human-readable layer.
fn create_filter() -> Result<EnvFilter, BoxError> {
    if let Ok(gcf_log) = env::var("GCF_LOG") {
        return Ok(expand_gcf_log(&gcf_log));
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return Ok(EnvFilter::new(rust_log));
    }

    Ok(EnvFilter::new(crate_directives("info")))
}

/// Expand `GCF_LOG` values into full tracing filter strings.
///
/// - `GCF_LOG=debug` becomes `warn,gcf_fold=debug,gcf_bin=debug,...`
/// - `GCF_LOG=gcf_fold=trace` is used as-is (advanced syntax)
fn expand_gcf_log(gcf_log: &str) -> EnvFilter {
    if gcf_log.contains('=') || gcf_log.contains(':') || gcf_log.contains(',') {
        return EnvFilter::new(gcf_log);
    }

    EnvFilter::new(crate_directives(gcf_log))
}

fn crate_directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for name in GCF_CRATES {
        directives.push_str(&format!(",{name}={level}"));
    }
    directives
}
