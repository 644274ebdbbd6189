//! Client configuration
//!
//! Where the backend lives, how often results are polled, and where the
//! session id is persisted between runs.

use std::path::PathBuf;
use std::time::Duration;

use glossa_client::DEFAULT_BASE_URL;

/// Default cadence of result polling
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL (e.g., "http://127.0.0.1:8000")
    pub api_base_url: String,

    /// How often an unfinished task's results are fetched
    pub poll_interval: Duration,

    /// JSON file holding persisted client state
    pub state_file: PathBuf,

    /// Session to use when none has been persisted yet
    pub session_id: Option<String>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(api_base_url: String) -> Self {
        Self {
            api_base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            state_file: default_state_file(),
            session_id: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognised variables:
    /// - GLOSSA_API_BASE_URL (optional, default: http://127.0.0.1:8000)
    /// - GLOSSA_POLL_INTERVAL_MS (optional, default: 5000)
    /// - GLOSSA_STATE_FILE (optional, default: $HOME/.glossa/state.json)
    /// - GLOSSA_SESSION_ID (optional)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_base_url =
            lookup("GLOSSA_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(api_base_url);

        if let Some(raw) = lookup("GLOSSA_POLL_INTERVAL_MS") {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("GLOSSA_POLL_INTERVAL_MS must be an integer, got '{}'", raw))?;
            config.poll_interval = Duration::from_millis(millis);
        }

        if let Some(path) = lookup("GLOSSA_STATE_FILE").filter(|p| !p.is_empty()) {
            config.state_file = PathBuf::from(path);
        }

        config.session_id = lookup("GLOSSA_SESSION_ID").filter(|s| !s.trim().is_empty());

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_base_url.is_empty() {
            anyhow::bail!("api_base_url cannot be empty");
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            anyhow::bail!("api_base_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL.to_string())
    }
}

/// `$HOME/.glossa/state.json`, or `.glossa/state.json` when HOME is unset
fn default_state_file() -> PathBuf {
    let base = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(".glossa").join("state.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert!(config.state_file.ends_with(".glossa/state.json"));
        assert!(config.session_id.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GLOSSA_API_BASE_URL", "https://gen.example.com"),
            ("GLOSSA_POLL_INTERVAL_MS", "250"),
            ("GLOSSA_STATE_FILE", "/tmp/glossa.json"),
            ("GLOSSA_SESSION_ID", "sess-9"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://gen.example.com");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.state_file, PathBuf::from("/tmp/glossa.json"));
        assert_eq!(config.session_id.as_deref(), Some("sess-9"));
    }

    #[test]
    fn test_from_lookup_rejects_bad_interval() {
        let result = Config::from_lookup(lookup_from(&[("GLOSSA_POLL_INTERVAL_MS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_session_is_ignored() {
        let config = Config::from_lookup(lookup_from(&[("GLOSSA_SESSION_ID", "  ")])).unwrap();
        assert!(config.session_id.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.api_base_url = String::new();
        assert!(config.validate().is_err());

        config.api_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.api_base_url = "http://localhost:8000".to_string();
        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
