use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime settings for one server process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File receiving the JSON log; stdout carries protocol frames only
    pub log_path: PathBuf,
    /// `EnvFilter` directive used when RUST_LOG is not set
    pub log_level: String,
    /// Artificial latency added to every analyzer call
    pub analysis_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: log_path(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            analysis_delay: Duration::ZERO,
        }
    }
}

const APP_DIR: &str = "loom-lsp";
const LOG_FILE: &str = "loom-lsp.log";

/// Log file location for this user: `$XDG_DATA_HOME/loom-lsp/loom-lsp.log`,
/// then `~/.local/share/loom-lsp/loom-lsp.log`, then a path relative to the
/// working directory.
pub fn log_path() -> PathBuf {
    resolve_log_path(std::env::var_os("XDG_DATA_HOME"), dirs::home_dir())
}

fn resolve_log_path(xdg_data_home: Option<OsString>, home_dir: Option<PathBuf>) -> PathBuf {
    let base = match (xdg_data_home, home_dir) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg),
        (_, Some(home)) => home.join(".local").join("share"),
        _ => PathBuf::from("."),
    };
    base.join(APP_DIR).join(LOG_FILE)
}
