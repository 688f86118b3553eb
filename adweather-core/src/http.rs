use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::WeatherError;

/// Per-call timeout covering connect, send and read.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Thin wrapper over [`reqwest::Client`] issuing a single GET attempt and
/// mapping transport failures into [`WeatherError::Transport`] with a
/// category cause string. No retries, no partial results.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
}

impl ApiClient {
    pub fn new() -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WeatherError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }

    /// GET `url` with `params` as the query string and decode the JSON body
    /// into `T`.
    pub async fn request<T, Q>(&self, url: &str, params: &Q) -> Result<T, WeatherError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!(url, "issuing provider request");

        let res = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = res.status();
        let body = res.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            return Err(WeatherError::Transport(format!(
                "server returned error {}: {}",
                status.as_u16(),
                body
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::Transport(format!("unexpected error: {e}")))
    }
}

/// Collapse reqwest failures into the transport categories. Only a connect
/// timeout counts as an unreachable server; plain connect failures (refused,
/// DNS) are lower-level network errors.
fn classify_transport_error(err: reqwest::Error) -> WeatherError {
    let cause = if err.is_connect() && err.is_timeout() {
        format!("cannot reach server: {err}")
    } else if err.is_timeout() {
        format!("request timed out, try again: {err}")
    } else if err.is_connect() || err.is_request() || err.is_body() || err.is_decode() {
        format!("network error: {err}")
    } else {
        format!("unexpected error: {err}")
    };

    WeatherError::Transport(cause)
}
