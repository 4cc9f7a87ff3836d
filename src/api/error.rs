//! Error handling for the API module

use crate::logging::LogLevel;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to decode a JSON payload from the server
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// An error occurred while processing the request.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            // Failed endpoints usually answer {"error": "..."}; fall back to
            // the raw body when they don't.
            Ok(body) => serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body),
            Err(_) => "Failed to read response text".to_string(),
        };

        ApiError::Http { status, message }
    }

    /// Severity used when reporting this error on the event channel.
    pub fn log_level(&self) -> LogLevel {
        match self {
            // Non-critical: temporary server issues
            ApiError::Http { status, .. } if *status == 429 => LogLevel::Debug,
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Critical: auth, malformed responses
            ApiError::Http { status, .. } if *status == 401 => LogLevel::Error,
            ApiError::Http { status, .. } if *status == 403 => LogLevel::Error,
            ApiError::Decode(_) => LogLevel::Error,

            // Network issues - usually temporary
            _ => LogLevel::Warn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_http_statuses() {
        let rate_limited = ApiError::Http {
            status: 429,
            message: String::new(),
        };
        assert_eq!(rate_limited.log_level(), LogLevel::Debug);

        let server_error = ApiError::Http {
            status: 503,
            message: String::new(),
        };
        assert_eq!(server_error.log_level(), LogLevel::Warn);

        let unauthorized = ApiError::Http {
            status: 401,
            message: String::new(),
        };
        assert_eq!(unauthorized.log_level(), LogLevel::Error);
    }

    #[test]
    fn http_error_displays_status_and_message() {
        let err = ApiError::Http {
            status: 500,
            message: "Query failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error with status 500: Query failed"
        );
    }
}
