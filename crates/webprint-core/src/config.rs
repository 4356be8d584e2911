//! Generator configuration.
//!
//! A [`GeneratorConfig`] is built once at startup, either programmatically or
//! from a TOML file, and read-only afterwards. Every field has a default, so
//! an empty document is a valid configuration.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for a [`Generator`](crate::Generator).
///
/// ```toml
/// temp_dir = "/var/tmp/webprint"
/// timeout = 120
/// sandbox = "/usr/lib/chromium/chrome-sandbox"
/// worker_command = "webprint-worker"
/// http_user = "stable"
/// http_pass = "secret"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Directory for the transient HTML input and the PDF/PNG outputs.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
    /// Hard wall-clock bound for one worker run, in seconds (10–999).
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Path to a Chromium SUID sandbox helper. When set it is exported to
    /// the worker as `CHROME_DEVEL_SANDBOX`; when unset the worker is told
    /// to run with `--no-sandbox` instead.
    #[serde(default)]
    pub sandbox: Option<String>,
    /// Program used to launch the rendering worker.
    #[serde(default = "default_worker_command")]
    pub worker_command: String,
    /// HTTP basic-auth username passed through to the worker.
    #[serde(default)]
    pub http_user: Option<String>,
    /// HTTP basic-auth password passed through to the worker.
    #[serde(default)]
    pub http_pass: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            timeout: default_timeout(),
            sandbox: None,
            worker_command: default_worker_command(),
            http_user: None,
            http_pass: None,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("webprint")
}

fn default_timeout() -> u64 {
    120
}

fn default_worker_command() -> String {
    "webprint-worker".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_uses_defaults() {
        let config = GeneratorConfig::from_str("").unwrap();
        assert_eq!(config.timeout, 120);
        assert_eq!(config.worker_command, "webprint-worker");
        assert_eq!(config.sandbox, None);
        assert_eq!(config.http_user, None);
        assert_eq!(config.http_pass, None);
        assert_eq!(config.temp_dir, std::env::temp_dir().join("webprint"));
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            temp_dir = "/var/tmp/webprint"
            timeout = 30
            sandbox = "/usr/lib/chromium/chrome-sandbox"
            worker_command = "/opt/webprint/webprint-worker"
            http_user = "stable"
            http_pass = "secret"
        "#;

        let config = GeneratorConfig::from_str(toml).unwrap();
        assert_eq!(config.temp_dir, PathBuf::from("/var/tmp/webprint"));
        assert_eq!(config.timeout, 30);
        assert_eq!(
            config.sandbox.as_deref(),
            Some("/usr/lib/chromium/chrome-sandbox")
        );
        assert_eq!(config.worker_command, "/opt/webprint/webprint-worker");
        assert_eq!(config.http_user.as_deref(), Some("stable"));
        assert_eq!(config.http_pass.as_deref(), Some("secret"));
    }

    #[test]
    fn default_matches_empty_parse() {
        let parsed = GeneratorConfig::from_str("").unwrap();
        let built = GeneratorConfig::default();
        assert_eq!(parsed.timeout, built.timeout);
        assert_eq!(parsed.worker_command, built.worker_command);
        assert_eq!(parsed.temp_dir, built.temp_dir);
    }
}
