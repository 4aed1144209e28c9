//! Configuration types for appcask

use crate::error::{Error, Result};
use crate::types::{Country, DeviceFilter, IconSize};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

/// Where exports are written
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base directory (None = Desktop if present, else the working directory)
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Folder created under the base directory (default: "AppCask Downloads")
    #[serde(default = "default_folder_name")]
    pub folder_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: None,
            folder_name: default_folder_name(),
        }
    }
}

/// HTTP transport settings for the catalog search and asset fetches
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Catalog search endpoint
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Maximum number of search results requested (default: 20)
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,

    /// Search request timeout (default: 10 seconds)
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub search_timeout: Duration,

    /// Per-asset request timeout (default: 10 seconds)
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub asset_timeout: Duration,

    /// Verify TLS certificates on asset fetches (default: false)
    ///
    /// The catalog search always verifies certificates. Asset fetches from the
    /// catalog CDN skip verification unless this is set.
    #[serde(default)]
    pub verify_asset_tls: bool,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            result_limit: default_result_limit(),
            search_timeout: default_timeout(),
            asset_timeout: default_timeout(),
            verify_asset_tls: false,
            user_agent: default_user_agent(),
        }
    }
}

/// Answers used when a prompt is left empty
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Storefront code (default: "us")
    #[serde(default = "default_country")]
    pub country: String,

    /// Icon size selector (default: "2", 512x512)
    #[serde(default = "default_icon_size")]
    pub icon_size: String,

    /// Screenshot device filter (default: all)
    #[serde(default)]
    pub device: DeviceFilter,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            icon_size: default_icon_size(),
            device: DeviceFilter::default(),
        }
    }
}

/// Main configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Output location
    #[serde(default)]
    pub output: OutputConfig,

    /// HTTP transport
    #[serde(default)]
    pub http: HttpConfig,

    /// Prompt defaults
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Suppress per-asset messages (batch use)
    #[serde(default)]
    pub quiet: bool,
}

impl Config {
    /// Load a configuration file (JSON)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read {}: {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot reject on its own
    pub fn validate(&self) -> Result<()> {
        if self.http.search_timeout.is_zero() {
            return Err(invalid("http.search_timeout", "timeout must be at least 1 second"));
        }
        if self.http.asset_timeout.is_zero() {
            return Err(invalid("http.asset_timeout", "timeout must be at least 1 second"));
        }
        if self.http.result_limit == 0 {
            return Err(invalid("http.result_limit", "result limit must be positive"));
        }
        if url::Url::parse(&self.http.search_url).is_err() {
            return Err(invalid("http.search_url", "not a valid URL"));
        }
        if Country::lookup(&self.defaults.country).is_none() {
            return Err(invalid(
                "defaults.country",
                &format!("unknown storefront '{}'", self.defaults.country),
            ));
        }
        if IconSize::from_selector(&self.defaults.icon_size).is_none() {
            return Err(invalid(
                "defaults.icon_size",
                &format!("unknown icon size selector '{}'", self.defaults.icon_size),
            ));
        }
        if self.output.folder_name.trim().is_empty() {
            return Err(invalid("output.folder_name", "folder name must not be empty"));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> Error {
    Error::Config {
        message: message.to_string(),
        key: Some(key.to_string()),
    }
}

fn default_folder_name() -> String {
    "AppCask Downloads".to_string()
}

fn default_search_url() -> String {
    "https://itunes.apple.com/search".to_string()
}

fn default_result_limit() -> u32 {
    20
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    format!("appcask/{}", env!("CARGO_PKG_VERSION"))
}

fn default_country() -> String {
    Country::DEFAULT_CODE.to_string()
}

fn default_icon_size() -> String {
    IconSize::DEFAULT_SELECTOR.to_string()
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_catalog_conventions() {
        let config = Config::default();
        assert_eq!(config.http.search_timeout, Duration::from_secs(10));
        assert_eq!(config.http.asset_timeout, Duration::from_secs(10));
        assert!(!config.http.verify_asset_tls);
        assert_eq!(config.http.result_limit, 20);
        assert_eq!(config.defaults.country, "us");
        assert_eq!(config.defaults.icon_size, "2");
        assert_eq!(config.output.folder_name, "AppCask Downloads");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_deserializes_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.http.search_url, "https://itunes.apple.com/search");
        assert_eq!(config.defaults.device, DeviceFilter::All);
        assert!(!config.quiet);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let json = r#"{
            "http": { "asset_timeout": 30, "verify_asset_tls": true },
            "defaults": { "country": "jp", "device": "ipad" },
            "quiet": true
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.http.asset_timeout, Duration::from_secs(30));
        assert_eq!(config.http.search_timeout, Duration::from_secs(10));
        assert!(config.http.verify_asset_tls);
        assert_eq!(config.defaults.country, "jp");
        assert_eq!(config.defaults.device, DeviceFilter::IPad);
        assert_eq!(config.defaults.icon_size, "2");
        assert!(config.quiet);
    }

    #[test]
    fn validate_names_the_offending_key() {
        let mut config = Config::default();
        config.http.asset_timeout = Duration::ZERO;
        match config.validate() {
            Err(Error::Config { key, .. }) => {
                assert_eq!(key.as_deref(), Some("http.asset_timeout"))
            }
            other => panic!("expected config error, got {other:?}"),
        }

        let mut config = Config::default();
        config.defaults.country = "zz".into();
        assert!(matches!(
            config.validate(),
            Err(Error::Config { key: Some(k), .. }) if k == "defaults.country"
        ));

        let mut config = Config::default();
        config.defaults.icon_size = "9".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_and_validates_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appcask.json");
        std::fs::write(&path, r#"{ "output": { "root": "/tmp/exports" } }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.output.root, Some(PathBuf::from("/tmp/exports")));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(Error::Serialization(_))
        ));

        assert!(matches!(
            Config::load(&dir.path().join("missing.json")),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn config_serialization_round_trips_durations_as_seconds() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["http"]["asset_timeout"], 10);
    }
}
