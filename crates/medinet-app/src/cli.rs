//! CLI argument definitions for the Medinet console.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Medinet: chat with the hospital and doctor search assistant.
#[derive(Parser, Debug)]
#[command(name = "medinet", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Assistant webhook URL, overriding `[chat] webhook_url`.
    #[arg(long = "webhook-url")]
    pub webhook_url: Option<String>,

    /// Vector search endpoint, overriding `[search] endpoint`.
    #[arg(long = "search-url")]
    pub search_url: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > MEDINET_CONFIG env var > ~/.medinet/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("MEDINET_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level against the config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".medinet").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".medinet").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let args = CliArgs::parse_from([
            "medinet",
            "-c",
            "/tmp/medinet.toml",
            "-l",
            "debug",
            "--webhook-url",
            "http://localhost:9000/hook",
            "--search-url",
            "http://localhost:9000/search",
        ]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/medinet.toml"));
        assert_eq!(args.resolve_log_level("info"), "debug");
        assert_eq!(args.webhook_url.as_deref(), Some("http://localhost:9000/hook"));
        assert_eq!(args.search_url.as_deref(), Some("http://localhost:9000/search"));
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        let args = CliArgs::parse_from(["medinet"]);
        assert_eq!(args.resolve_log_level("warn"), "warn");
        assert!(args.webhook_url.is_none());
    }

    #[test]
    fn test_default_config_path_file_name() {
        assert!(default_config_path().ends_with("config.toml"));
    }
}
