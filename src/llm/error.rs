//! Error types for the hosted LLM adapters.
//!
//! Each variant carries a stable error code that is included in the Display
//! output (`[CODE] message`) and accessible via [`LlmError::code()`].

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// Invalid or missing configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// Authentication failed (invalid or missing API key).
    pub const AUTH_FAILED: &str = "AUTH_FAILED";

    /// Request to the provider failed or was rate limited.
    pub const REQUEST_FAILED: &str = "REQUEST_FAILED";

    /// Request timed out.
    pub const TIMEOUT_ERROR: &str = "TIMEOUT_ERROR";

    /// Provider returned an error status or an unreadable body.
    pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";

    /// Provider answered without any text.
    pub const EMPTY_COMPLETION: &str = "EMPTY_COMPLETION";
}

/// Errors produced by the LLM adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    /// Invalid or missing configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Config(String),

    /// Authentication failed.
    #[error("[{}] {}", error_codes::AUTH_FAILED, .0)]
    Auth(String),

    /// Transport failure or rate limit.
    #[error("[{}] {}", error_codes::REQUEST_FAILED, .0)]
    Request(String),

    /// Request timed out.
    #[error("[{}] {}", error_codes::TIMEOUT_ERROR, .0)]
    Timeout(String),

    /// Provider-specific failure.
    #[error("[{}] {}", error_codes::PROVIDER_ERROR, .0)]
    Provider(String),

    /// The completion contained no text.
    #[error("[{}] {}", error_codes::EMPTY_COMPLETION, .0)]
    EmptyCompletion(String),
}

impl LlmError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => error_codes::CONFIG_INVALID,
            Self::Auth(_) => error_codes::AUTH_FAILED,
            Self::Request(_) => error_codes::REQUEST_FAILED,
            Self::Timeout(_) => error_codes::TIMEOUT_ERROR,
            Self::Provider(_) => error_codes::PROVIDER_ERROR,
            Self::EmptyCompletion(_) => error_codes::EMPTY_COMPLETION,
        }
    }

    /// Returns the inner message without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Config(m)
            | Self::Auth(m)
            | Self::Request(m)
            | Self::Timeout(m)
            | Self::Provider(m)
            | Self::EmptyCompletion(m) => m,
        }
    }

    /// Whether a retry against the same provider could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Auth(_) => false,
            Self::Request(_) | Self::Timeout(_) | Self::Provider(_) => true,
            Self::EmptyCompletion(_) => false,
        }
    }

    /// Map a transport error, keeping timeouts distinguishable.
    pub(crate) fn from_reqwest(provider: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{provider} request timed out: {err}"))
        } else {
            Self::Request(format!("{provider} request failed: {err}"))
        }
    }
}

/// Convenience alias for LLM results.
pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code() {
        let err = LlmError::Request("rate limited".into());
        assert_eq!(err.to_string(), "[REQUEST_FAILED] rate limited");
        assert_eq!(err.message(), "rate limited");
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(LlmError::Config("x".into()).code(), "CONFIG_INVALID");
        assert_eq!(LlmError::Auth("x".into()).code(), "AUTH_FAILED");
        assert_eq!(LlmError::Timeout("x".into()).code(), "TIMEOUT_ERROR");
        assert_eq!(LlmError::Provider("x".into()).code(), "PROVIDER_ERROR");
        assert_eq!(LlmError::EmptyCompletion("x".into()).code(), "EMPTY_COMPLETION");
    }

    #[test]
    fn retryability() {
        assert!(!LlmError::Auth("401".into()).is_retryable());
        assert!(!LlmError::Config("no key".into()).is_retryable());
        assert!(LlmError::Timeout("slow".into()).is_retryable());
        assert!(LlmError::Provider("HTTP 503".into()).is_retryable());
    }
}
