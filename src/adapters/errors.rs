//! Venue adapter error types
//!
//! All venue-related errors are wrapped in ExchangeError enum
//! which implements thiserror for consistent error handling.

use thiserror::Error;

/// Venue-specific error types for adapter operations
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Transport-level failure (DNS, connect, TLS, non-2xx status)
    #[error("Network error: {0}")]
    Network(String),

    /// Venue call did not complete within the configured budget
    #[error("Network timeout after {0}ms")]
    NetworkTimeout(u64),

    /// Credentials refused by the venue
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid or unexpected response from venue
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Venue refused the order
    #[error("Order rejected: {0}")]
    OrderRejected(String),
}

impl ExchangeError {
    /// True for failures that are expected to clear on the next tick
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ExchangeError::Network(_) | ExchangeError::NetworkTimeout(_)
        )
    }

    /// Classify a transport error; `timeout_ms` is the budget the client ran with
    pub fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            ExchangeError::NetworkTimeout(timeout_ms)
        } else if err.is_decode() {
            ExchangeError::InvalidResponse(err.to_string())
        } else {
            ExchangeError::Network(err.to_string())
        }
    }
}

/// Result type alias for venue operations
pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_display() {
        let err = ExchangeError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_network_timeout_display() {
        let err = ExchangeError::NetworkTimeout(5000);
        assert_eq!(err.to_string(), "Network timeout after 5000ms");
    }

    #[test]
    fn test_invalid_response_display() {
        let err = ExchangeError::InvalidResponse("malformed JSON".to_string());
        assert_eq!(err.to_string(), "Invalid response: malformed JSON");
    }

    #[test]
    fn test_order_rejected_display() {
        let err = ExchangeError::OrderRejected("insufficient margin".to_string());
        assert_eq!(err.to_string(), "Order rejected: insufficient margin");
    }

    #[test]
    fn test_transient_classification() {
        assert!(ExchangeError::NetworkTimeout(10).is_transient());
        assert!(ExchangeError::Network("reset".into()).is_transient());
        assert!(!ExchangeError::AuthenticationFailed("bad key".into()).is_transient());
        assert!(!ExchangeError::OrderRejected("size".into()).is_transient());
    }
}
