//! Core library for the `adweather` tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the two upstream mapping/weather providers
//! - The canonical forecast model and per-provider normalization
//! - The `get_weather` orchestration service
//!
//! It is used by `adweather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod provider;
pub mod service;

pub use config::{Config, StoredConfig};
pub use error::WeatherError;
pub use model::{DayNightWeather, Forecast, WeatherInfo, WeatherModel};
pub use provider::{ProviderId, WeatherSource};
pub use service::WeatherService;
