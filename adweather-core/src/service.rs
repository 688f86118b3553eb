use tracing::debug;

use crate::{
    config::Config,
    error::WeatherError,
    model::WeatherModel,
    provider::{WeatherSource, source_from_config},
};

/// How a caller-supplied query string is routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// A 6-digit administrative code, used directly.
    Adcode(String),
    /// A free-text place name, resolved through the provider first.
    Name(String),
}

/// Classify the raw query. All-digit strings must be exactly 6 digits; a
/// non-digit (or empty) string goes through name resolution.
pub fn classify_query(query: &str) -> Result<Query, WeatherError> {
    let all_digits = !query.is_empty() && query.chars().all(|c| c.is_ascii_digit());

    if !all_digits {
        Ok(Query::Name(query.to_string()))
    } else if query.len() != 6 {
        Err(WeatherError::InvalidInput)
    } else {
        Ok(Query::Adcode(query.to_string()))
    }
}

/// The tool entry point. Holds the provider selected once at startup;
/// every call is self-contained, with at most two sequential outbound
/// requests (resolution, then forecast) and no shared mutable state.
pub struct WeatherService {
    source: Box<dyn WeatherSource>,
}

impl WeatherService {
    pub fn new(config: &Config) -> Result<Self, WeatherError> {
        Ok(Self {
            source: source_from_config(config)?,
        })
    }

    /// Build a service around an explicit source, bypassing config-based
    /// provider selection.
    pub fn with_source(source: Box<dyn WeatherSource>) -> Self {
        Self { source }
    }

    /// Return the normalized multi-day forecast for an area code or a
    /// place name.
    pub async fn get_weather(&self, query: &str) -> Result<WeatherModel, WeatherError> {
        let adcode = match classify_query(query)? {
            Query::Adcode(code) => code,
            Query::Name(name) => self.source.lookup_adcode(&name).await?,
        };

        debug!(adcode, "fetching forecast");
        self.source.fetch_forecast(&adcode).await
    }
}
