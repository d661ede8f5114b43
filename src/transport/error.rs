//! Transport error types

use thiserror::Error;

/// Errors that can occur while talking to the log server
#[derive(Error, Debug)]
pub enum TransportError {
    /// Server could not be reached
    #[error("Log server unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body could not be decoded as event data
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::MalformedPayload(err.to_string())
    }
}

impl TransportError {
    /// Classify a reqwest failure
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Unavailable
        } else if err.is_decode() {
            TransportError::MalformedPayload(err.to_string())
        } else {
            TransportError::Request(err)
        }
    }
}

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransportError::Status {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Server error 502: bad gateway");
        assert_eq!(TransportError::Timeout.to_string(), "Request timeout");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TransportError = json_err.into();
        assert!(matches!(err, TransportError::MalformedPayload(_)));
    }
}
