use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{self, Config, DEFAULT_LOG_LEVEL};

/// Language server for Loom, speaking LSP over stdin/stdout
#[derive(Debug, Parser)]
#[command(name = "loom-lsp", version, about)]
pub struct Cli {
    /// Log file path [default: $XDG_DATA_HOME/loom-lsp/loom-lsp.log]
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "FILTER", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Artificial delay added to each analysis request, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 0)]
    pub analysis_delay_ms: u64,

    /// Use stdio transport (the only transport; accepted for editor compatibility)
    #[arg(long)]
    pub stdio: bool,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            log_path: self.log_file.unwrap_or_else(config::log_path),
            log_level: self.log_level,
            analysis_delay: Duration::from_millis(self.analysis_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_default_config() {
        let cli = Cli::try_parse_from(["loom-lsp"]).unwrap();

        assert_eq!(cli.into_config(), Config::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "loom-lsp",
            "--stdio",
            "--log-file",
            "/tmp/loom.log",
            "--log-level",
            "debug",
            "--analysis-delay-ms",
            "2000",
        ])
        .unwrap();

        assert!(cli.stdio);
        let config = cli.into_config();
        assert_eq!(config.log_path, PathBuf::from("/tmp/loom.log"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.analysis_delay, Duration::from_secs(2));
    }

    #[test]
    fn rejects_non_numeric_delay() {
        assert!(Cli::try_parse_from(["loom-lsp", "--analysis-delay-ms", "soon"]).is_err());
    }
}
