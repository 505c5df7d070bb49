use crate::core::{DataApiError, Result};
use log::warn;

pub const DEFAULT_API_VERSION: &str = "53.0";
pub const DEFAULT_MAX_BATCH_SIZE: usize = 500;
pub const DEFAULT_STRING_MAX_LENGTH: usize = 255;

pub const ENV_INSTANCE_URL: &str = "DATA_API_INSTANCE_URL";
pub const ENV_API_VERSION: &str = "DATA_API_VERSION";
pub const ENV_MAX_BATCH_SIZE: &str = "DATA_API_MAX_BATCH_SIZE";
pub const ENV_STRING_MAX_LENGTH: &str = "DATA_API_STRING_MAX_LENGTH";

/// Data API configuration
///
/// Kept apart from the unit-of-work lifecycle: a missing or broken setting
/// is reported when the configuration is loaded, never by a builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataApiConfig {
    /// Base URL of the org instance
    pub instance_url: String,

    /// API version, e.g. "53.0"
    pub api_version: String,

    /// Maximum number of operations in one unit of work
    pub max_batch_size: usize,

    /// String length limit for fields without an explicit limit
    pub default_string_max_length: usize,
}

impl Default for DataApiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DataApiConfig {
    pub fn new() -> Self {
        Self {
            instance_url: "http://localhost".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            default_string_max_length: DEFAULT_STRING_MAX_LENGTH,
        }
    }

    /// Set the instance URL
    pub fn instance_url(mut self, url: &str) -> Self {
        self.instance_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the API version
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = version.to_string();
        self
    }

    /// Set the maximum batch size
    pub fn max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = max;
        self
    }

    /// Set the default string length limit
    pub fn default_string_max_length(mut self, max: usize) -> Self {
        self.default_string_max_length = max;
        self
    }

    /// Parse from a Data API URL
    ///
    /// Format: "https://host/services/data/vNN.N"
    ///
    /// # Examples
    ///
    /// ```
    /// # use unitofwork::DataApiConfig;
    /// let config = DataApiConfig::from_url(
    ///     "https://example.my.salesforce.com/services/data/v53.0"
    /// ).unwrap();
    /// assert_eq!(config.api_version, "53.0");
    /// ```
    pub fn from_url(url: &str) -> Result<Self> {
        let (instance, version) = url
            .trim_end_matches('/')
            .split_once("/services/data/v")
            .ok_or_else(|| {
                DataApiError::Configuration(format!(
                    "URL '{}' must look like <instance>/services/data/v<version>",
                    url
                ))
            })?;

        if !instance.starts_with("http://") && !instance.starts_with("https://") {
            return Err(DataApiError::Configuration(format!(
                "Instance URL '{}' must start with http:// or https://",
                instance
            )));
        }

        let config = Self::new().instance_url(instance).api_version(version);
        config.validate()?;
        Ok(config)
    }

    /// Load from `DATA_API_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::new();

        if let Some(url) = lookup(ENV_INSTANCE_URL) {
            config = config.instance_url(&url);
        }
        if let Some(version) = lookup(ENV_API_VERSION) {
            config = config.api_version(&version);
        }
        if let Some(max) = parse_usize(&lookup, ENV_MAX_BATCH_SIZE) {
            config = config.max_batch_size(max);
        }
        if let Some(max) = parse_usize(&lookup, ENV_STRING_MAX_LENGTH) {
            config = config.default_string_max_length(max);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.instance_url.is_empty() {
            return Err(DataApiError::Configuration("instance URL is empty".into()));
        }
        let version_ok = self
            .api_version
            .split_once('.')
            .map(|(major, minor)| {
                major.parse::<u32>().is_ok() && minor.parse::<u32>().is_ok()
            })
            .unwrap_or(false);
        if !version_ok {
            return Err(DataApiError::Configuration(format!(
                "API version '{}' must look like NN.N",
                self.api_version
            )));
        }
        if self.max_batch_size == 0 {
            return Err(DataApiError::Configuration(
                "max batch size must be greater than zero".into(),
            ));
        }
        if self.default_string_max_length == 0 {
            return Err(DataApiError::Configuration(
                "default string max length must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Base URL of the Data API for this configuration
    pub fn base_url(&self) -> String {
        format!("{}/services/data/v{}", self.instance_url, self.api_version)
    }
}

fn parse_usize(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let raw = lookup(key)?;
    match raw.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {}={:?}: not a positive integer", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = DataApiConfig::new();
        assert_eq!(config.api_version, "53.0");
        assert_eq!(config.max_batch_size, 500);
        assert_eq!(config.default_string_max_length, 255);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = DataApiConfig::new()
            .instance_url("https://acme.example.com/")
            .api_version("55.0")
            .max_batch_size(10);

        assert_eq!(config.instance_url, "https://acme.example.com");
        assert_eq!(config.base_url(), "https://acme.example.com/services/data/v55.0");
        assert_eq!(config.max_batch_size, 10);
    }

    #[test]
    fn test_from_url() {
        let config =
            DataApiConfig::from_url("https://acme.example.com/services/data/v54.0/").unwrap();
        assert_eq!(config.instance_url, "https://acme.example.com");
        assert_eq!(config.api_version, "54.0");

        assert!(DataApiConfig::from_url("https://acme.example.com").is_err());
        assert!(DataApiConfig::from_url("ftp://acme/services/data/v54.0").is_err());
        assert!(DataApiConfig::from_url("https://acme/services/data/vlatest").is_err());
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = [
            (ENV_API_VERSION, "52.0"),
            (ENV_MAX_BATCH_SIZE, "25"),
            (ENV_STRING_MAX_LENGTH, "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = DataApiConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_version, "52.0");
        assert_eq!(config.max_batch_size, 25);
        // invalid values fall back to the default
        assert_eq!(config.default_string_max_length, DEFAULT_STRING_MAX_LENGTH);
    }

    #[test]
    fn test_zero_batch_size_invalid() {
        let config = DataApiConfig::new().max_batch_size(0);
        assert!(matches!(config.validate(), Err(DataApiError::Configuration(_))));
    }
}
