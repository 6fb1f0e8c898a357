//! Logging Infrastructure
//!
//! Structured logging with an `EnvFilter` (`RUST_LOG` wins over `LOG_LEVEL`)
//! and an optional daily rolling file.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "orbit_server=info,tower_http=info";

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Build the filter: `RUST_LOG` if set, otherwise the crate defaults at `log_level`
pub fn build_filter(log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match log_level {
        Some(level) => EnvFilter::new(format!(
            "orbit_server={level},tower_http={level},security={level}"
        )),
        None => EnvFilter::new(DEFAULT_DIRECTIVES),
    })
}

/// Initialize the logger with optional file output
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(log_level))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    let file_dir = log_dir.map(Path::new).filter(|p| {
        if !p.exists()
            && let Err(e) = std::fs::create_dir_all(p)
        {
            eprintln!("Failed to create log dir {}: {e}", p.display());
            return false;
        }
        true
    });

    let result = match (file_dir, json.unwrap_or(false)) {
        (Some(dir), true) => builder
            .json()
            .with_writer(tracing_appender::rolling::daily(dir, "orbit-server"))
            .try_init(),
        (Some(dir), false) => builder
            .with_ansi(false)
            .with_writer(tracing_appender::rolling::daily(dir, "orbit-server"))
            .try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    // A global subscriber may already exist (tests, embedding)
    if let Err(e) = result {
        eprintln!("Logger already initialized: {e}");
    }
}
