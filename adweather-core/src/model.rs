use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Conditions for one half of a day (daytime or nighttime).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayNightWeather {
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub temperature: i32,
    #[serde(default)]
    pub wind_direction: String,
    #[serde(default)]
    pub wind_power: String,
    #[serde(default)]
    pub humidity: i32,
}

/// One calendar day's forecast: date, localized weekday name and both halves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherInfo {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub week: String,
    #[serde(default)]
    pub day: DayNightWeather,
    #[serde(default)]
    pub night: DayNightWeather,
}

/// Multi-day forecast for one administrative area.
///
/// `infos` preserves the provider's chronological day ordering. `adcode` is
/// the 6-digit administrative code as an integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub adcode: i64,
    #[serde(default)]
    pub update_time: String,
    #[serde(default)]
    pub infos: Vec<WeatherInfo>,
}

/// Canonical response envelope returned to callers regardless of provider.
///
/// `status` is 0 on success, nonzero for a provider-reported failure.
/// `result` has exactly one key populated: the tencent payload's own key
/// verbatim, or `"forecast"` for normalized amap output. The two providers
/// are shape-aligned, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherModel {
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub result: HashMap<String, Vec<Forecast>>,
}
