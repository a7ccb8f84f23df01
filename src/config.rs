//! Environment configuration.

use std::env;

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// Raise the log level from `info` to `debug`.
    pub debug: bool,
    /// Destination file for tracing output. Logging is off when unset.
    pub log_file: Option<String>,
    /// Append every byte written to the terminal to this file.
    pub write_log: Option<String>,
    pub no_mouse: bool,
    pub no_alt_buffer: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            debug: env_flag("TERMGUI_DEBUG"),
            log_file: env_string_opt("TERMGUI_LOG"),
            write_log: env_string_opt("TERMGUI_WRITE_LOG"),
            no_mouse: env_flag("TERMGUI_NO_MOUSE"),
            no_alt_buffer: env_flag("TERMGUI_NO_ALT_BUFFER"),
        }
    }

    /// Default `EnvFilter` directive derived from the debug flag.
    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "termgui=debug"
        } else {
            "termgui=info"
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
