use thiserror::Error;

/// Error taxonomy for the core crate.
///
/// Every failure surfaces to the caller of `get_weather`; nothing is retried
/// and nothing is swallowed. Transport failures are collapsed into a single
/// variant carrying a human-readable cause string.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The single outbound request attempt failed (connect, timeout, network,
    /// non-2xx status or undecodable body).
    #[error("request failed: {0}")]
    Transport(String),

    /// The district search found no usable area code for the given name.
    #[error("please enter a valid city or district name")]
    InvalidLocation,

    /// An all-digit query whose length is not 6.
    #[error("please enter a valid area code")]
    InvalidInput,

    /// Missing or malformed startup configuration. Raised once at process
    /// start, never per request.
    #[error("configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_keeps_cause() {
        let err = WeatherError::Transport("network error: connection reset".into());
        assert_eq!(
            err.to_string(),
            "request failed: network error: connection reset"
        );
    }

    #[test]
    fn validation_messages() {
        assert_eq!(
            WeatherError::InvalidInput.to_string(),
            "please enter a valid area code"
        );
        assert_eq!(
            WeatherError::InvalidLocation.to_string(),
            "please enter a valid city or district name"
        );
    }
}
