//! Logging setup.
//!
//! Diagnostics go through `tracing` and are written to stderr, keeping stdout
//! for the `Running ...` progress lines. `RUST_LOG` always wins over the level
//! chosen on the command line.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Installs the global subscriber once.
///
/// With `level` set to `None` and no `RUST_LOG` in the environment no
/// subscriber is installed, which silences all diagnostics (`--quiet`).
///
/// ```bash
/// RUST_LOG=process=debug,maven=trace update-dependencies
/// ```
pub fn init_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Initializes logging for tests; only active when `RUST_LOG` is set.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
