//! Configuration for phonelog-rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PhoneError, Result};

/// Environment variable that overrides `lookup.api_key`
pub const API_KEY_ENV: &str = "CARRIER_LOOKUP_KEY";

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Device content-provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Path to the adb executable
    pub adb_path: String,
    pub calls_uri: String,
    /// Voicemail providers, tried in order until one returns rows
    pub voicemail_uris: Vec<String>,
    pub sms_inbox_uri: String,
    pub sms_sent_uri: String,
    pub contacts_uris: Vec<String>,
}

/// Carrier lookup service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LookupConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

/// Data file locations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub carrier_cache: String,
    pub contacts: String,
    pub worklist: String,
}

/// Report sizes
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_numbers: usize,
    pub top_area_codes: usize,
    /// Sample spam records kept per record type
    pub samples: usize,
    pub top_field_values: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            adb_path: "adb".to_string(),
            calls_uri: "content://call_log/calls".to_string(),
            voicemail_uris: vec![
                "content://voicemail/voicemail".to_string(),
                "content://com.android.voicemail/voicemail".to_string(),
                "content://com.android.providers.voicemail/voicemail".to_string(),
            ],
            sms_inbox_uri: "content://sms/inbox".to_string(),
            sms_sent_uri: "content://sms/sent".to_string(),
            contacts_uris: vec![
                "content://com.android.contacts/contacts".to_string(),
                "content://contacts/phones".to_string(),
            ],
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.carrierlookup.com/api/lookup".to_string(),
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            carrier_cache: "numbers.dat".to_string(),
            contacts: "contacts.json".to_string(),
            worklist: "new_numbers.txt".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_numbers: 10,
            top_area_codes: 5,
            samples: 3,
            top_field_values: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PhoneError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| PhoneError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.device.voicemail_uris.is_empty() {
            return Err(PhoneError::Config("No voicemail URIs configured".to_string()));
        }

        if self.report.samples == 0 {
            return Err(PhoneError::Config(
                "report.samples must be at least 1".to_string(),
            ));
        }

        url::Url::parse(&self.lookup.base_url).map_err(|e| {
            PhoneError::Config(format!(
                "Invalid lookup URL '{}': {}",
                self.lookup.base_url, e
            ))
        })?;

        Ok(())
    }

    /// API key from the environment, falling back to the config file
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.lookup.api_key.clone())
    }

    pub fn carrier_cache_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.carrier_cache)
    }

    pub fn contacts_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.contacts)
    }

    pub fn worklist_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.worklist)
    }

    pub fn data_path(&self, file_name: &str) -> PathBuf {
        self.storage.data_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.device.voicemail_uris.len(), 3);
        assert_eq!(config.carrier_cache_path(), PathBuf::from("./numbers.dat"));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[storage]
data_dir = "/var/lib/phonelog"

[report]
top_numbers = 20
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.report.top_numbers, 20);
        assert_eq!(config.report.samples, 3);
        assert_eq!(config.storage.worklist, "new_numbers.txt");
        assert_eq!(
            config.worklist_path(),
            PathBuf::from("/var/lib/phonelog/new_numbers.txt")
        );
        assert_eq!(config.device.adb_path, "adb");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.device.voicemail_uris.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.lookup.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.report.samples = 0;
        assert!(config.validate().is_err());
    }
}
