use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::{
    error::WeatherError,
    http::ApiClient,
    model::{Forecast, WeatherModel},
};

use super::WeatherSource;

const DISTRICT_SEARCH_URL: &str = "https://apis.map.qq.com/ws/district/v1/search";
const FORECAST_URL: &str = "https://apis.map.qq.com/ws/weather/v1/";

/// Tencent map service ("Provider A"). Its forecast response already matches
/// the canonical envelope, so parsing is a pass-through with serde defaults
/// filling absent fields.
#[derive(Debug, Clone)]
pub struct TencentProvider {
    api_key: String,
    client: ApiClient,
}

impl TencentProvider {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Ok(Self {
            api_key,
            client: ApiClient::new()?,
        })
    }
}

/// District search payload: `result` is an array of district groups, each an
/// array of matches. Wrong-type payloads decode as empty so that shape
/// errors take the invalid-location path, not a decode failure.
#[derive(Debug, Deserialize)]
struct DistrictSearchResponse {
    #[serde(default, deserialize_with = "lenient_array")]
    result: Vec<Vec<District>>,
}

#[derive(Debug, Default, Deserialize)]
struct District {
    #[serde(default)]
    id: String,
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

/// Take `result[0][0].id`; any missing or empty level means the name did not
/// resolve to a district.
fn extract_adcode(response: DistrictSearchResponse) -> Result<String, WeatherError> {
    response
        .result
        .into_iter()
        .next()
        .and_then(|group| group.into_iter().next())
        .map(|district| district.id)
        .filter(|id| !id.is_empty())
        .ok_or(WeatherError::InvalidLocation)
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    result: HashMap<String, Vec<Forecast>>,
}

fn parse_forecast(raw: ForecastResponse) -> WeatherModel {
    WeatherModel {
        status: raw.status,
        result: raw.result,
    }
}

#[async_trait]
impl WeatherSource for TencentProvider {
    async fn lookup_adcode(&self, location_name: &str) -> Result<String, WeatherError> {
        let params = [("key", self.api_key.as_str()), ("keyword", location_name)];

        let response: DistrictSearchResponse =
            self.client.request(DISTRICT_SEARCH_URL, &params).await?;

        let adcode = extract_adcode(response)?;
        debug!(location_name, adcode, "resolved location via tencent");

        Ok(adcode)
    }

    async fn fetch_forecast(&self, adcode: &str) -> Result<WeatherModel, WeatherError> {
        let params = [
            ("key", self.api_key.as_str()),
            ("adcode", adcode),
            ("type", "future"),
            ("get_md", "0"),
        ];

        let raw: ForecastResponse = self.client.request(FORECAST_URL, &params).await?;

        Ok(parse_forecast(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search_response(value: serde_json::Value) -> DistrictSearchResponse {
        serde_json::from_value(value).expect("district search payload should deserialize")
    }

    #[test]
    fn extract_adcode_takes_first_match() {
        let response = search_response(json!({
            "status": 0,
            "result": [
                [{"id": "330100", "fullname": "杭州市"}, {"id": "330200"}],
                [{"id": "999999"}]
            ]
        }));

        assert_eq!(extract_adcode(response).unwrap(), "330100");
    }

    #[test]
    fn empty_result_is_invalid_location() {
        let response = search_response(json!({"status": 0, "result": []}));
        assert!(matches!(
            extract_adcode(response),
            Err(WeatherError::InvalidLocation)
        ));
    }

    #[test]
    fn missing_result_is_invalid_location() {
        let response = search_response(json!({"status": 0}));
        assert!(matches!(
            extract_adcode(response),
            Err(WeatherError::InvalidLocation)
        ));
    }

    #[test]
    fn wrong_type_result_is_invalid_location() {
        let response = search_response(json!({"result": {"message": "bad key"}}));
        assert!(matches!(
            extract_adcode(response),
            Err(WeatherError::InvalidLocation)
        ));
    }

    #[test]
    fn string_result_is_invalid_location() {
        let response = search_response(json!({"result": "330100"}));
        assert!(matches!(
            extract_adcode(response),
            Err(WeatherError::InvalidLocation)
        ));
    }

    #[test]
    fn non_array_first_group_is_invalid_location() {
        let response = search_response(json!({"result": [{"id": "330100"}]}));
        assert!(matches!(
            extract_adcode(response),
            Err(WeatherError::InvalidLocation)
        ));
    }

    #[test]
    fn empty_first_group_is_invalid_location() {
        let response = search_response(json!({"result": [[]]}));
        assert!(matches!(
            extract_adcode(response),
            Err(WeatherError::InvalidLocation)
        ));
    }

    #[test]
    fn empty_id_is_invalid_location() {
        let response = search_response(json!({"result": [[{"id": ""}]]}));
        assert!(matches!(
            extract_adcode(response),
            Err(WeatherError::InvalidLocation)
        ));
    }

    #[test]
    fn forecast_passes_envelope_through() {
        let payload = json!({
            "status": 0,
            "result": {
                "forecast": [{
                    "province": "浙江省",
                    "city": "杭州市",
                    "district": "",
                    "adcode": 330100,
                    "update_time": "2024-01-01 08:00:00",
                    "infos": [{
                        "date": "2024-01-01",
                        "week": "星期一",
                        "day": {
                            "weather": "晴",
                            "temperature": 10,
                            "wind_direction": "北风",
                            "wind_power": "3",
                            "humidity": 50
                        },
                        "night": {
                            "weather": "多云",
                            "temperature": 2,
                            "wind_direction": "北风",
                            "wind_power": "2",
                            "humidity": 60
                        }
                    }]
                }]
            }
        });

        let raw: ForecastResponse = serde_json::from_value(payload).unwrap();
        let model = parse_forecast(raw);

        assert_eq!(model.status, 0);
        let blocks = &model.result["forecast"];
        assert_eq!(blocks[0].adcode, 330100);
        assert_eq!(blocks[0].infos[0].week, "星期一");
        assert_eq!(blocks[0].infos[0].day.temperature, 10);
        assert_eq!(blocks[0].infos[0].night.humidity, 60);
    }

    #[test]
    fn forecast_parse_is_deterministic() {
        let payload = json!({
            "status": 0,
            "result": {"forecast": [{"city": "杭州市", "adcode": 330100}]}
        });

        let first = parse_forecast(serde_json::from_value(payload.clone()).unwrap());
        let second = parse_forecast(serde_json::from_value(payload).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn forecast_fills_defaults_for_sparse_payload() {
        let raw: ForecastResponse = serde_json::from_value(json!({})).unwrap();
        let model = parse_forecast(raw);

        assert_eq!(model.status, 0);
        assert!(model.result.is_empty());
    }

    #[test]
    fn provider_status_is_preserved() {
        let raw: ForecastResponse =
            serde_json::from_value(json!({"status": 110, "result": {}})).unwrap();
        assert_eq!(parse_forecast(raw).status, 110);
    }
}
