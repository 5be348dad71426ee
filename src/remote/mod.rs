//! Best-effort HTTP lookups for the exchange rate and current weather.
//!
//! Both run once at startup on their own threads. Results arrive over a
//! channel; failures are logged and otherwise ignored.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::{Config, WeatherLocation};
use crate::currency::{ExchangeRate, RateProvider};
use crate::errors::{Result, TripError};
use crate::weather::{WeatherProvider, WeatherReport};

/// A value delivered by a finished background lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteUpdate {
    Rate(ExchangeRate),
    Weather(WeatherReport),
}

#[derive(Debug, Deserialize)]
struct RateResponse {
    #[serde(default)]
    rates: Option<RateTable>,
}

#[derive(Debug, Deserialize)]
struct RateTable {
    #[serde(rename = "TWD")]
    twd: Option<f64>,
}

/// Reads `rates.TWD` from an exchangerate-api style endpoint quoting JPY.
pub struct HttpRateProvider {
    client: Client,
    endpoint: String,
}

impl HttpRateProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl RateProvider for HttpRateProvider {
    fn fetch_rate(&self) -> Result<ExchangeRate> {
        let response: RateResponse = self
            .client
            .get(&self.endpoint)
            .send()?
            .error_for_status()?
            .json()?;
        let twd = response
            .rates
            .and_then(|table| table.twd)
            .ok_or_else(|| TripError::Remote("response has no TWD rate".into()))?;
        ExchangeRate::new(twd)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    apparent_temperature: f64,
    weather_code: i64,
}

/// Current conditions from an open-meteo style forecast endpoint.
pub struct HttpWeatherProvider {
    client: Client,
    location: WeatherLocation,
}

impl HttpWeatherProvider {
    pub fn new(location: WeatherLocation) -> Self {
        Self {
            client: Client::new(),
            location,
        }
    }
}

impl WeatherProvider for HttpWeatherProvider {
    fn fetch_current(&self) -> Result<WeatherReport> {
        let query = [
            ("latitude", self.location.latitude.to_string()),
            ("longitude", self.location.longitude.to_string()),
            (
                "current",
                "temperature_2m,apparent_temperature,weather_code".to_string(),
            ),
            ("timezone", self.location.timezone.clone()),
        ];
        let response: ForecastResponse = self
            .client
            .get(&self.location.endpoint)
            .query(&query)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(WeatherReport {
            temperature_c: response.current.temperature_2m,
            feels_like_c: response.current.apparent_temperature,
            condition_code: response.current.weather_code,
        })
    }
}

/// Starts one background lookup per provider and returns the channel their
/// results arrive on. The channel closes once both threads finish.
pub fn spawn_startup_fetches(
    rates: Arc<dyn RateProvider>,
    weather: Arc<dyn WeatherProvider>,
) -> Receiver<RemoteUpdate> {
    let (tx, rx) = mpsc::channel();
    spawn_lookup(tx.clone(), "exchange rate", move || {
        rates.fetch_rate().map(RemoteUpdate::Rate)
    });
    spawn_lookup(tx, "weather", move || {
        weather.fetch_current().map(RemoteUpdate::Weather)
    });
    rx
}

/// Providers for the endpoints named in `config`.
pub fn providers_from_config(
    config: &Config,
) -> (Arc<dyn RateProvider>, Arc<dyn WeatherProvider>) {
    (
        Arc::new(HttpRateProvider::new(config.rate_endpoint.clone())),
        Arc::new(HttpWeatherProvider::new(config.weather.clone())),
    )
}

fn spawn_lookup<F>(tx: Sender<RemoteUpdate>, what: &'static str, lookup: F)
where
    F: FnOnce() -> Result<RemoteUpdate> + Send + 'static,
{
    let spawned = thread::Builder::new()
        .name(format!("fetch-{}", what.replace(' ', "-")))
        .spawn(move || match lookup() {
            Ok(update) => {
                tracing::info!(what, "remote lookup finished");
                let _ = tx.send(update);
            }
            Err(err) => tracing::warn!(what, error = %err, "remote lookup failed"),
        });
    if let Err(err) = spawned {
        tracing::warn!(what, error = %err, "could not start remote lookup");
    }
}
