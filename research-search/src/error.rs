//! Error types for the research-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys appear in error messages.

/// Errors that can occur while querying a search provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The provider needs a credential that is not configured.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// A search request timed out.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// An HTTP request to a provider failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Map a transport error, keeping timeouts distinguishable.
    pub(crate) fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{context}: {err}"))
        } else {
            Self::Http(format!("{context}: {err}"))
        }
    }
}

/// Convenience type alias for research-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_credential() {
        let err = SearchError::MissingCredential("TAVILY_API_KEY".into());
        assert_eq!(err.to_string(), "missing credential: TAVILY_API_KEY");
    }

    #[test]
    fn display_timeout() {
        let err = SearchError::Timeout("exceeded 10s limit".into());
        assert_eq!(err.to_string(), "search timed out: exceeded 10s limit");
    }

    #[test]
    fn display_http() {
        let err = SearchError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn display_parse() {
        let err = SearchError::Parse("unexpected payload".into());
        assert_eq!(err.to_string(), "parse error: unexpected payload");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("max_results must be > 0".into());
        assert_eq!(err.to_string(), "config error: max_results must be > 0");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
