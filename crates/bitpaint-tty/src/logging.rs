#![forbid(unsafe_code)]

//! JSON log output.
//!
//! The terminal owns stdout, so logs go to a file. Nothing is installed
//! unless a path is given (`--log=PATH` or `BITPAINT_LOG`).
//!
//! `BITPAINT_LOG_FILTER` takes `tracing` filter directives
//! (e.g. `bitpaint_core=trace`); the default level is `debug`.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::TtyError;

const DEFAULT_FILTER: &str = "debug";

/// Route `tracing` output to `path` as JSON lines.
pub fn init(path: &Path) -> Result<(), TtyError> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_env_filter(filter(std::env::var("BITPAINT_LOG_FILTER").ok()))
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| TtyError::Logging(err.to_string()))?;
    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}

fn filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
