use crate::error::ComciganError;
use crate::timetable::decode::DEFAULT_MAX_PERIODS;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_BASE_URL: &str = "http://comci.net:4082";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/106.0.0.0 Safari/537.36";

const DEFAULT_CONFIG_FILE: &str = r#"
# Where Comcigan lives
# No trailing slash
base_url="http://comci.net:4082"

# Comcigan refuses requests that don't look like a browser
user_agent="Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/106.0.0.0 Safari/537.36"

# Seconds before a request is given up
timeout_secs=10

# Every day is padded with empty periods up to this one
max_periods=8
"#;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_periods: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            max_periods: DEFAULT_MAX_PERIODS,
        }
    }
}

impl Config {
    /// Parse a toml config. Missing keys fall back to defaults.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content).context("Parsing config file")?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    /// Read config from `path`. If it doesn't exist, a default one is
    /// written there and the defaults are used.
    pub fn from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Config file {:?} not found, creating default one", path);
                if let Err(e) = std::fs::write(path, DEFAULT_CONFIG_FILE.trim()) {
                    warn!("Failed to write default config file: {}", e);
                }
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Reading config file {:?}", path)),
        }
    }

    pub fn validate(&self) -> Result<(), ComciganError> {
        if self.max_periods == 0 {
            return Err(ComciganError::InvalidArgument(
                "max_periods must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::parse("max_periods=10\nbase_url=\"http://localhost:4082/\"").unwrap();

        assert_eq!(config.max_periods, 10);
        assert_eq!(config.base_url, "http://localhost:4082");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn zero_max_periods_rejected() {
        assert!(Config::parse("max_periods=0").is_err());
    }

    #[test]
    fn default_file_matches_defaults() {
        let from_file = Config::parse(DEFAULT_CONFIG_FILE).unwrap();
        let default = Config::default();

        assert_eq!(from_file.base_url, default.base_url);
        assert_eq!(from_file.user_agent, default.user_agent);
        assert_eq!(from_file.max_periods, default.max_periods);
    }

    #[test]
    fn missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comcigan.toml");

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.max_periods, DEFAULT_MAX_PERIODS);
        assert!(path.exists());
        assert_eq!(Config::from_file(&path).unwrap().base_url, DEFAULT_BASE_URL);
    }
}
