//! Error handling for the player service API

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to decode a JSON payload from the server
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// The push stream broke while reading.
    #[error("Stream error: {0}")]
    Stream(#[from] std::io::Error),

    /// The request was rejected locally before being sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http { status, message }
    }

    /// Whether the server refused the session rather than the request.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Http { status: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_statuses() {
        let unauthorized = ApiError::Http {
            status: 401,
            message: String::new(),
        };
        let server_error = ApiError::Http {
            status: 500,
            message: String::new(),
        };
        assert!(unauthorized.is_unauthenticated());
        assert!(!server_error.is_unauthenticated());
        assert!(!ApiError::InvalidInput("x".into()).is_unauthenticated());
    }

    #[test]
    fn test_display_includes_status() {
        let err = ApiError::Http {
            status: 404,
            message: "No tracks found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error with status 404: No tracks found");
    }
}
