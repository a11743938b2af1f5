use thiserror::Error;

/// Message shown when the provider answers with a non-success HTTP status.
pub const CITY_NOT_FOUND: &str = "City not found";

/// Used when the provider flags an error without an `info` text.
pub const GENERIC_API_ERROR: &str = "API error occurred";

/// Used when a decoding failure carries no message of its own.
pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch weather data";

/// Why a single fetch attempt failed.
///
/// `Display` yields the message shown to the user; no variant is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure or non-success HTTP status.
    #[error("{0}")]
    Network(String),

    /// The provider answered but flagged the request as failed.
    #[error("{0}")]
    Api(String),

    /// The body was malformed or lacked a required section.
    #[error("{0}")]
    Transform(String),
}

impl FetchError {
    pub fn city_not_found() -> Self {
        FetchError::Network(CITY_NOT_FOUND.to_string())
    }

    pub fn api(info: Option<String>) -> Self {
        match info {
            Some(info) if !info.is_empty() => FetchError::Api(info),
            _ => FetchError::Api(GENERIC_API_ERROR.to_string()),
        }
    }

    pub fn transform(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            FetchError::Transform(GENERIC_FETCH_ERROR.to_string())
        } else {
            FetchError::Transform(message)
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Api(_) => "api",
            FetchError::Transform(_) => "transform",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_not_found_message() {
        assert_eq!(FetchError::city_not_found().to_string(), "City not found");
    }

    #[test]
    fn api_error_prefers_provider_info() {
        let err = FetchError::api(Some("Invalid access key".into()));
        assert_eq!(err, FetchError::Api("Invalid access key".into()));
    }

    #[test]
    fn api_error_falls_back_when_info_missing_or_empty() {
        assert_eq!(FetchError::api(None).to_string(), GENERIC_API_ERROR);
        assert_eq!(FetchError::api(Some(String::new())).to_string(), GENERIC_API_ERROR);
    }

    #[test]
    fn transform_error_falls_back_on_empty_message() {
        assert_eq!(FetchError::transform("").to_string(), GENERIC_FETCH_ERROR);
        assert_eq!(FetchError::transform("bad json").to_string(), "bad json");
        assert_eq!(FetchError::transform("x").kind(), "transform");
    }
}
