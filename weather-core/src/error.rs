use thiserror::Error;

/// Why a single lookup failed. Every variant is terminal for that attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("city not found")]
    NotFound,

    #[error("upstream request failed with status {status}: {message}")]
    UpstreamHttpError { status: u16, message: String },

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),
}

impl LookupError {
    /// Short message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            LookupError::InvalidInput(_) => "Please enter a city name.".to_string(),
            LookupError::NotFound => {
                "City not found. Please check the name and try again.".to_string()
            }
            LookupError::UpstreamHttpError { status, .. } => {
                format!("HTTP error occurred (status {status}).")
            }
            LookupError::NetworkError(_) => "Network error occurred.".to_string(),
            LookupError::MalformedResponse(_) => {
                "The weather service returned an unexpected response.".to_string()
            }
            LookupError::ConfigurationMissing(_) => {
                "The weather service is not configured.".to_string()
            }
        }
    }

    /// HTTP status a front end should answer with for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            LookupError::InvalidInput(_) => 400,
            LookupError::NotFound => 404,
            LookupError::UpstreamHttpError { .. } | LookupError::MalformedResponse(_) => 502,
            LookupError::NetworkError(_) | LookupError::ConfigurationMissing(_) => 500,
        }
    }
}
