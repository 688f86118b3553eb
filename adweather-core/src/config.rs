use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::error::WeatherError;
use crate::provider::ProviderId;

/// Environment variable selecting the active provider ("tencent" or "amap").
pub const API_TYPE_VAR: &str = "API_TYPE";
/// Environment variable carrying the provider credential.
pub const API_KEY_VAR: &str = "API_KEY";

/// Immutable process-wide configuration, built once at startup and passed
/// explicitly into the service. Read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderId,
    pub api_key: String,
}

impl Config {
    /// Resolve configuration from the environment, falling back to the
    /// persisted store for values the environment does not set. Missing
    /// either value is a fatal startup error.
    pub fn load() -> Result<Self, WeatherError> {
        let stored = StoredConfig::load()?;

        Self::from_parts(
            env::var(API_TYPE_VAR).ok().or(stored.api_type),
            env::var(API_KEY_VAR).ok().or(stored.api_key),
        )
    }

    /// Build a config from already-merged values.
    pub fn from_parts(
        api_type: Option<String>,
        api_key: Option<String>,
    ) -> Result<Self, WeatherError> {
        let api_type = api_type.ok_or_else(|| {
            WeatherError::Configuration(format!(
                "{API_TYPE_VAR} is not set.\n\
                 Hint: export {API_TYPE_VAR}=tencent|amap or run `adweather configure <provider>`."
            ))
        })?;

        let api_key = api_key.ok_or_else(|| {
            WeatherError::Configuration(format!(
                "{API_KEY_VAR} is not set.\n\
                 Hint: export {API_KEY_VAR}=<key> or run `adweather configure <provider>`."
            ))
        })?;

        let provider = ProviderId::try_from(api_type.as_str())?;

        Ok(Self { provider, api_key })
    }
}

/// On-disk counterpart of [`Config`], written by `adweather configure`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoredConfig {
    /// Provider short name, e.g. "tencent" or "amap".
    pub api_type: Option<String>,
    pub api_key: Option<String>,
}

impl StoredConfig {
    /// Load the store from disk, or return an empty default on first run.
    pub fn load() -> Result<Self, WeatherError> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            WeatherError::Configuration(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            WeatherError::Configuration(format!(
                "failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save the store to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<(), WeatherError> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WeatherError::Configuration(format!(
                    "failed to create config directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| WeatherError::Configuration(format!("failed to serialize config: {e}")))?;

        fs::write(&path, toml).map_err(|e| {
            WeatherError::Configuration(format!(
                "failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf, WeatherError> {
        let dirs = ProjectDirs::from("dev", "adweather", "adweather").ok_or_else(|| {
            WeatherError::Configuration("could not determine platform config directory".into())
        })?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_type_is_fatal() {
        let err = Config::from_parts(None, Some("KEY".into())).unwrap_err();
        assert!(err.to_string().contains("API_TYPE is not set"));
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = Config::from_parts(Some("amap".into()), None).unwrap_err();
        assert!(err.to_string().contains("API_KEY is not set"));
    }

    #[test]
    fn unknown_provider_is_fatal() {
        let err = Config::from_parts(Some("openweather".into()), Some("KEY".into())).unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn valid_parts_build_config() {
        let cfg = Config::from_parts(Some("tencent".into()), Some("KEY".into())).unwrap();
        assert_eq!(cfg.provider, ProviderId::Tencent);
        assert_eq!(cfg.api_key, "KEY");
    }

    #[test]
    fn stored_config_round_trips_through_toml() {
        let stored = StoredConfig {
            api_type: Some("amap".into()),
            api_key: Some("KEY".into()),
        };

        let text = toml::to_string_pretty(&stored).unwrap();
        let back: StoredConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.api_type.as_deref(), Some("amap"));
        assert_eq!(back.api_key.as_deref(), Some("KEY"));
    }
}
