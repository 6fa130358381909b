//! TOML configuration.
//!
//! ```toml
//! [api]
//! base_url = "https://example.execute-api.us-west-2.amazonaws.com/prod"
//!
//! [logging]
//! filter = "warn"
//! ```
//!
//! Both sections are optional. The API base URL is resolved in this order:
//! `--api-url`, then `CBA_API_URL`, then the file, then the built-in
//! deployment URL.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Deployment the client talks to when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://pjuuem2fn8.execute-api.us-west-2.amazonaws.com/prod";

/// Environment variable overriding the configured base URL.
pub const API_URL_ENV: &str = "CBA_API_URL";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Empty means unset; validation substitutes [`DEFAULT_API_URL`].
    #[serde(default)]
    pub base_url: String,
    #[serde(skip)]
    fallback: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            fallback: true,
        }
    }
}

impl ApiConfig {
    /// True when neither the flag, the environment, nor the file named a URL.
    pub fn uses_fallback_url(&self) -> bool {
        self.fallback
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `tracing` filter directive. `RUST_LOG` takes precedence.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Config {
    /// Configuration used when no file is present.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Apply the environment and command-line overrides, then re-validate.
    pub fn with_overrides(mut self, env_url: Option<String>, cli_url: Option<String>) -> Result<Self> {
        if let Some(url) = cli_url.or(env_url).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
            self.api.fallback = false;
        }
        validate(&mut self)?;
        Ok(self)
    }
}

fn validate(config: &mut Config) -> Result<()> {
    let url = config.api.base_url.trim().trim_end_matches('/').to_string();
    if url.is_empty() {
        config.api.base_url = DEFAULT_API_URL.to_string();
        config.api.fallback = true;
        return Ok(());
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        anyhow::bail!("api.base_url must start with http:// or https:// (got '{}')", url);
    }
    config.api.base_url = url;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&mut config)?;
    Ok(config)
}

/// Load `path`, or fall back to [`Config::minimal`] when the default path is absent.
///
/// A path the user passed explicitly must exist.
pub fn load_or_minimal(path: &Path, explicit: bool) -> Result<Config> {
    if !explicit && !path.exists() {
        return Ok(Config::minimal());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn empty_file_uses_defaults() {
        let f = write_tmp("");
        let cfg = load_config(f.path()).unwrap();
        assert_eq!(cfg.api.base_url, DEFAULT_API_URL);
        assert!(cfg.api.uses_fallback_url());
        assert_eq!(cfg.logging.filter, "warn");
    }

    #[test]
    fn configured_url_is_not_fallback() {
        let f = write_tmp("[api]\nbase_url = \"http://localhost:9000\"\n");
        let cfg = load_config(f.path()).unwrap();
        assert!(!cfg.api.uses_fallback_url());

        let cfg = Config::minimal()
            .with_overrides(Some("http://env".into()), None)
            .unwrap();
        assert!(!cfg.api.uses_fallback_url());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let f = write_tmp("[api]\nbase_url = \"http://localhost:9000/\"\n");
        let cfg = load_config(f.path()).unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:9000");
    }

    #[test]
    fn rejects_non_http_url() {
        let f = write_tmp("[api]\nbase_url = \"ftp://example.org\"\n");
        let err = load_config(f.path()).unwrap_err();
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let base = Config::minimal();
        let cfg = base
            .clone()
            .with_overrides(Some("http://env".into()), Some("http://cli/".into()))
            .unwrap();
        assert_eq!(cfg.api.base_url, "http://cli");

        let cfg = base
            .clone()
            .with_overrides(Some("http://env".into()), None)
            .unwrap();
        assert_eq!(cfg.api.base_url, "http://env");

        let cfg = base.with_overrides(None, None).unwrap();
        assert_eq!(cfg.api.base_url, DEFAULT_API_URL);
        assert!(cfg.api.uses_fallback_url());
    }

    #[test]
    fn missing_default_path_is_minimal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cba.toml");
        assert!(load_or_minimal(&path, false).is_ok());
        assert!(load_or_minimal(&path, true).is_err());
    }
}
