//! Tracing setup for the terminal runner.
//!
//! The game owns the terminal, so log output only ever goes to a file.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "HEXLOOP_LOG";

/// Install a global subscriber writing plain-text events to `path`.
///
/// The filter comes from `HEXLOOP_LOG` and defaults to `info`.
pub fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("tracing already initialized: {}", e))
}
