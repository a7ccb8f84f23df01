//! Tracing setup.
//!
//! The terminal belongs to the UI, so log output only ever goes to a file named by
//! `TERMGUI_LOG`. `RUST_LOG` overrides the directive derived from `TERMGUI_DEBUG`.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;
use crate::error::Result;

/// Install a file-backed subscriber if the config names a log file.
///
/// Returns `Ok(true)` when a subscriber was installed by this call. A second call, or a
/// call made after another global subscriber was set, returns `Ok(false)`.
pub fn init(config: &EnvConfig) -> Result<bool> {
    let Some(path) = config.log_file.as_deref() else {
        return Ok(false);
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}
