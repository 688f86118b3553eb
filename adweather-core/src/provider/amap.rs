use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::{
    error::WeatherError,
    http::ApiClient,
    model::{DayNightWeather, Forecast, WeatherInfo, WeatherModel},
};

use super::WeatherSource;

const DISTRICT_SEARCH_URL: &str = "https://restapi.amap.com/v3/config/district";
const FORECAST_URL: &str = "https://restapi.amap.com/v3/weather/weatherInfo";

/// Weekday names keyed by amap's `week` field, 0 reserved for "unknown".
const WEEKDAY_NAMES: [&str; 8] = [
    "未知",
    "星期一",
    "星期二",
    "星期三",
    "星期四",
    "星期五",
    "星期六",
    "星期日",
];

/// Amap service ("Provider B"). Its forecast shape is unrelated to the
/// canonical envelope, so every response goes through full normalization.
#[derive(Debug, Clone)]
pub struct AmapProvider {
    api_key: String,
    client: ApiClient,
}

impl AmapProvider {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Ok(Self {
            api_key,
            client: ApiClient::new()?,
        })
    }
}

/// Wrong-type `districts` payloads decode as empty so that shape errors take
/// the invalid-location path, not a decode failure.
#[derive(Debug, Deserialize)]
struct DistrictSearchResponse {
    #[serde(default, deserialize_with = "lenient_array")]
    districts: Vec<District>,
}

#[derive(Debug, Default, Deserialize)]
struct District {
    #[serde(default)]
    adcode: String,
}

/// Decode an array field tolerantly: a non-array value becomes empty and a
/// malformed element becomes its default.
fn lenient_array<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let Some(items) = value.as_array() else {
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
        .collect())
}

/// Take `districts[0].adcode`; missing or empty means the name did not
/// resolve to a district.
fn extract_adcode(response: DistrictSearchResponse) -> Result<String, WeatherError> {
    response
        .districts
        .into_iter()
        .next()
        .map(|district| district.adcode)
        .filter(|adcode| !adcode.is_empty())
        .ok_or(WeatherError::InvalidLocation)
}

/// Raw `weatherInfo?extensions=all` payload. Amap serializes every value as
/// a string; all fields are optional with empty-string defaults. The
/// top-level `status`/`infocode` fields are deliberately not modeled: the
/// canonical envelope always reports 0 for amap so that callers see the same
/// shape regardless of provider (compatibility quirk, kept on purpose).
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    forecasts: Vec<RawForecast>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    #[serde(default)]
    province: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    adcode: String,
    #[serde(default)]
    reporttime: String,
    #[serde(default)]
    casts: Vec<RawCast>,
}

#[derive(Debug, Deserialize)]
struct RawCast {
    #[serde(default)]
    date: String,
    #[serde(default)]
    week: String,
    #[serde(default)]
    dayweather: String,
    #[serde(default)]
    daytemp: String,
    #[serde(default)]
    daywind: String,
    #[serde(default)]
    daypower: String,
    dayhumidity: Option<String>,
    #[serde(default)]
    nightweather: String,
    #[serde(default)]
    nighttemp: String,
    #[serde(default)]
    nightwind: String,
    #[serde(default)]
    nightpower: String,
    nighthumidity: Option<String>,
}

/// Map amap's numeric `week` to a localized name. Non-numeric values,
/// negatives and indices past 7 all fall back to "unknown".
fn weekday_name(week: &str) -> &'static str {
    week.trim()
        .parse::<usize>()
        .ok()
        .and_then(|index| WEEKDAY_NAMES.get(index))
        .copied()
        .unwrap_or(WEEKDAY_NAMES[0])
}

fn parse_int_or_default(value: &str) -> i32 {
    value.trim().parse().unwrap_or(0)
}

fn half_day(weather: &str, temp: &str, wind: &str, power: &str, humidity: Option<&str>) -> DayNightWeather {
    DayNightWeather {
        weather: weather.to_string(),
        temperature: parse_int_or_default(temp),
        wind_direction: wind.to_string(),
        wind_power: power.to_string(),
        humidity: humidity.map(parse_int_or_default).unwrap_or(0),
    }
}

/// Normalize the raw amap payload into the canonical envelope under the
/// `"forecast"` key, day order preserved.
fn normalize(raw: ForecastResponse) -> WeatherModel {
    let forecasts = raw
        .forecasts
        .into_iter()
        .map(|block| {
            let infos = block
                .casts
                .into_iter()
                .map(|cast| WeatherInfo {
                    date: cast.date,
                    week: weekday_name(&cast.week).to_string(),
                    day: half_day(
                        &cast.dayweather,
                        &cast.daytemp,
                        &cast.daywind,
                        &cast.daypower,
                        cast.dayhumidity.as_deref(),
                    ),
                    night: half_day(
                        &cast.nightweather,
                        &cast.nighttemp,
                        &cast.nightwind,
                        &cast.nightpower,
                        cast.nighthumidity.as_deref(),
                    ),
                })
                .collect();

            Forecast {
                province: block.province,
                city: block.city,
                district: block.adcode.clone(),
                adcode: block.adcode.parse().unwrap_or(0),
                update_time: block.reporttime,
                infos,
            }
        })
        .collect();

    WeatherModel {
        status: 0,
        result: HashMap::from([("forecast".to_string(), forecasts)]),
    }
}

#[async_trait]
impl WeatherSource for AmapProvider {
    async fn lookup_adcode(&self, location_name: &str) -> Result<String, WeatherError> {
        let params = [
            ("key", self.api_key.as_str()),
            ("keywords", location_name),
            ("subdistrict", "0"),
        ];

        let response: DistrictSearchResponse =
            self.client.request(DISTRICT_SEARCH_URL, &params).await?;

        let adcode = extract_adcode(response)?;
        debug!(location_name, adcode, "resolved location via amap");

        Ok(adcode)
    }

    async fn fetch_forecast(&self, adcode: &str) -> Result<WeatherModel, WeatherError> {
        let params = [
            ("key", self.api_key.as_str()),
            ("city", adcode),
            ("extensions", "all"),
        ];

        let raw: ForecastResponse = self.client.request(FORECAST_URL, &params).await?;

        Ok(normalize(raw))
    }
}
