use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::utils::{ensure_dir, write_atomic, PathResolver};
use crate::currency::{ExchangeRate, FALLBACK_TWD_PER_JPY};
use crate::errors::{Result, TripError};

pub const DEFAULT_RATE_ENDPOINT: &str = "https://api.exchangerate-api.com/v4/latest/JPY";
pub const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

/// Where the weather lookup points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub endpoint: String,
}

impl Default for WeatherLocation {
    fn default() -> Self {
        Self {
            latitude: 34.6937,
            longitude: 135.5023,
            timezone: "Asia/Tokyo".into(),
            endpoint: DEFAULT_WEATHER_ENDPOINT.into(),
        }
    }
}

/// User preferences. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First day of a freshly created trip.
    pub trip_start: NaiveDate,
    pub initial_days: u32,
    /// Start an empty itinerary from the bundled sample plan.
    pub seed_sample: bool,
    pub fallback_rate: f64,
    pub network_enabled: bool,
    pub rate_endpoint: String,
    pub weather: WeatherLocation,
    pub export_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trip_start: NaiveDate::from_ymd_opt(2026, 2, 20).unwrap_or_default(),
            initial_days: 5,
            seed_sample: false,
            fallback_rate: FALLBACK_TWD_PER_JPY,
            network_enabled: true,
            rate_endpoint: DEFAULT_RATE_ENDPOINT.into(),
            weather: WeatherLocation::default(),
            export_prefix: "trip-backup".into(),
        }
    }
}

impl Config {
    /// Rate used until a fresh quote arrives. An unusable configured value falls
    /// back to the built-in default.
    pub fn fallback_exchange_rate(&self) -> ExchangeRate {
        ExchangeRate::new(self.fallback_rate).unwrap_or_else(|_| {
            tracing::warn!(rate = self.fallback_rate, "ignoring invalid fallback rate");
            ExchangeRate::default()
        })
    }

    /// Updates one field from its textual form, as typed in the shell.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |what: &str| TripError::Config(format!("`{value}` is not a valid {what}"));
        match key {
            "trip_start" => {
                self.trip_start = crate::domain::parse_date_key(value).ok_or_else(|| invalid("date"))?
            }
            "initial_days" => {
                let days: u32 = value.parse().map_err(|_| invalid("day count"))?;
                if days == 0 {
                    return Err(invalid("day count"));
                }
                self.initial_days = days;
            }
            "fallback_rate" => {
                let rate: f64 = value.parse().map_err(|_| invalid("rate"))?;
                ExchangeRate::new(rate)?;
                self.fallback_rate = rate;
            }
            "seed_sample" => self.seed_sample = value.parse().map_err(|_| invalid("boolean"))?,
            "network_enabled" => {
                self.network_enabled = value.parse().map_err(|_| invalid("boolean"))?
            }
            "rate_endpoint" => self.rate_endpoint = value.to_string(),
            "export_prefix" => {
                if value.trim().is_empty() {
                    return Err(invalid("prefix"));
                }
                self.export_prefix = value.trim().to_string();
            }
            "weather.latitude" => {
                self.weather.latitude = value.parse().map_err(|_| invalid("latitude"))?
            }
            "weather.longitude" => {
                self.weather.longitude = value.parse().map_err(|_| invalid("longitude"))?
            }
            "weather.timezone" => self.weather.timezone = value.to_string(),
            other => return Err(TripError::Config(format!("unknown setting `{other}`"))),
        }
        Ok(())
    }
}

/// Loads and saves [`Config`] as JSON inside the application directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            TripError::Config(format!("cannot read {}: {err}", self.path.display()))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fallback_rate, 0.215);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"initial_days": 3, "weather": {"timezone": "UTC"}}"#)
            .unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.initial_days, 3);
        assert_eq!(config.weather.timezone, "UTC");
        assert_eq!(config.weather.latitude, 34.6937);
        assert!(config.network_enabled);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "[]").unwrap();
        assert!(matches!(manager.load(), Err(TripError::Config(_))));
    }

    #[test]
    fn set_value_validates_input() {
        let mut config = Config::default();
        config.set_value("fallback_rate", "0.2").unwrap();
        assert_eq!(config.fallback_rate, 0.2);
        assert!(config.set_value("fallback_rate", "0").is_err());
        assert!(config.set_value("initial_days", "0").is_err());
        config.set_value("trip_start", "2026-12-30").unwrap();
        assert_eq!(config.trip_start.to_string(), "2026-12-30");
        config.set_value("seed_sample", "true").unwrap();
        assert!(config.seed_sample);
        assert!(config.set_value("seed_sample", "yes").is_err());
        assert!(config.set_value("colour", "blue").is_err());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.network_enabled = false;
        config.export_prefix = "osaka".into();
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }
}
