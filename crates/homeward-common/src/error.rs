//! Error types for Homeward
//!
//! One shared enum covers the whole pipeline. The transient/permanent split
//! drives the retry layer: transient failures are worth another attempt,
//! permanent ones are not.

use thiserror::Error;

/// Result type alias for Homeward operations
pub type Result<T> = std::result::Result<T, HomewardError>;

/// Main error type for Homeward
#[derive(Error, Debug)]
pub enum HomewardError {
    /// Connection-level failure: refused, reset, DNS, or request timeout.
    /// Always transient.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status code.
    /// Transient for 5xx and 429, permanent for every other 4xx.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// A record failed validation during transformation. Never fatal to the
    /// run; the record is dropped and counted.
    #[error("Validation failed for field '{field}'{}: {reason}", fmt_animal_id(.animal_id))]
    Validation {
        field: &'static str,
        animal_id: Option<u64>,
        reason: String,
    },

    /// A retryable operation ran out of attempts. Carries the last observed
    /// error.
    #[error("Retries exhausted after {attempts} attempt(s): {last}")]
    ExhaustedRetries {
        attempts: u32,
        last: Box<HomewardError>,
    },

    /// A page fetch exhausted its retries, so the record set is incomplete
    /// and the whole extraction is aborted.
    #[error("Extraction failed after {pages_fetched} page(s): {source}")]
    ExtractionFailed {
        pages_fetched: u32,
        source: Box<HomewardError>,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Unexpected response body from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn fmt_animal_id(id: &Option<u64>) -> String {
    match id {
        Some(id) => format!(" (animal {id})"),
        None => String::new(),
    }
}

impl HomewardError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(
        field: &'static str,
        animal_id: Option<u64>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field,
            animal_id,
            reason: reason.into(),
        }
    }

    /// Create a decode error
    pub fn decode(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether another attempt at the same operation could succeed.
    ///
    /// Transport failures and server-side statuses (5xx) are transient, as is
    /// 429 (the server asks us to back off). Everything else, including other
    /// 4xx statuses, is permanent: the request itself is wrong and retrying
    /// will not help.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// The HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::ExhaustedRetries { last, .. } => last.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn status(code: u16) -> HomewardError {
        HomewardError::HttpStatus {
            status: code,
            url: "http://localhost/animals/v1/animals".to_string(),
        }
    }

    #[test]
    fn test_transport_is_transient() {
        assert!(HomewardError::transport("connection reset").is_transient());
    }

    #[test]
    fn test_server_errors_are_transient() {
        assert!(status(500).is_transient());
        assert!(status(502).is_transient());
        assert!(status(503).is_transient());
        assert!(status(504).is_transient());
    }

    #[test]
    fn test_throttling_is_transient() {
        assert!(status(429).is_transient());
    }

    #[test]
    fn test_client_errors_are_permanent() {
        assert!(!status(400).is_transient());
        assert!(!status(404).is_transient());
        assert!(!status(422).is_transient());
    }

    #[test]
    fn test_validation_is_permanent() {
        let err = HomewardError::validation("name", Some(7), "must not be empty");
        assert!(!err.is_transient());
        assert!(err.to_string().contains("animal 7"));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_exhausted_retries_preserves_status() {
        let err = HomewardError::ExhaustedRetries {
            attempts: 4,
            last: Box::new(status(503)),
        };
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_transient());
    }
}
