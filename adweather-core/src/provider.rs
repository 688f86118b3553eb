use crate::{
    config::Config,
    error::WeatherError,
    model::WeatherModel,
    provider::{amap::AmapProvider, tencent::TencentProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod amap;
pub mod tencent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Tencent,
    Amap,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Tencent => "tencent",
            ProviderId::Amap => "amap",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Tencent, ProviderId::Amap]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "tencent" => Ok(ProviderId::Tencent),
            "amap" => Ok(ProviderId::Amap),
            _ => Err(WeatherError::Configuration(format!(
                "Unknown provider '{value}'. Supported providers: tencent, amap."
            ))),
        }
    }
}

/// One upstream mapping/weather service. Each implementation knows its own
/// endpoint URLs, query parameters and raw response shapes, and hands back
/// the canonical envelope.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Resolve a free-text place name into the provider's 6-digit area code.
    async fn lookup_adcode(&self, location_name: &str) -> Result<String, WeatherError>;

    /// Fetch the multi-day forecast for an already-resolved area code.
    async fn fetch_forecast(&self, adcode: &str) -> Result<WeatherModel, WeatherError>;
}

/// Construct the active provider once from config. All later calls dispatch
/// through the trait object, with no per-call provider comparisons.
pub fn source_from_config(config: &Config) -> Result<Box<dyn WeatherSource>, WeatherError> {
    let boxed: Box<dyn WeatherSource> = match config.provider {
        ProviderId::Tencent => Box::new(TencentProvider::new(config.api_key.clone())?),
        ProviderId::Amap => Box::new(AmapProvider::new(config.api_key.clone())?),
    };

    Ok(boxed)
}
