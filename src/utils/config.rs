use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use crate::utils::error::{ProbeError, ProbeResult};

/// Request timeout used unless a configuration says otherwise
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP fetch configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl FetchConfig {
    /// Load a JSON configuration file; absent fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: FetchConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ProbeResult<()> {
        if self.timeout_secs == 0 {
            return Err(ProbeError::Configuration(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_timeout_is_ten_seconds() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "timeout_secs": 3 }}"#).unwrap();

        let config = FetchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let config = FetchConfig::from_file(file.path()).unwrap();
        assert_eq!(config, FetchConfig::default());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "timeout_secs": 0 }}"#).unwrap();

        match FetchConfig::from_file(file.path()) {
            Err(ProbeError::Configuration(msg)) => assert!(msg.contains("timeout_secs")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "timeout_secs = 3").unwrap();

        assert!(matches!(
            FetchConfig::from_file(file.path()),
            Err(ProbeError::ConfigFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_rejected() {
        assert!(matches!(
            FetchConfig::from_file("/nonexistent/probe-config.json"),
            Err(ProbeError::Io(_))
        ));
    }
}
