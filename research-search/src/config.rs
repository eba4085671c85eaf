//! Search configuration and provider credentials.
//!
//! [`SearchConfig`] controls result caps, timeouts and request behaviour.
//! [`ProviderCredentials`] decides which keyed providers are enabled; an
//! absent credential disables its provider and never aborts the process.

use std::fmt;

use crate::error::SearchError;
use crate::types::SearchProvider;

/// API credentials for the keyed search providers.
#[derive(Clone, Default)]
pub struct ProviderCredentials {
    /// Google Custom Search API key.
    pub google_api_key: Option<String>,
    /// Google Programmable Search Engine id (`cx`).
    pub google_engine_id: Option<String>,
    /// Serper.dev API key.
    pub serper_api_key: Option<String>,
    /// Tavily API key.
    pub tavily_api_key: Option<String>,
    /// Brave Search subscription token.
    pub brave_api_key: Option<String>,
}

impl ProviderCredentials {
    /// Read credentials from the process environment.
    ///
    /// Empty values are treated as absent.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            google_api_key: get("GOOGLE_SEARCH_API_KEY"),
            google_engine_id: get("GOOGLE_SEARCH_ENGINE_ID"),
            serper_api_key: get("SERPER_API_KEY"),
            tavily_api_key: get("TAVILY_API_KEY"),
            brave_api_key: get("BRAVE_API_KEY"),
        }
    }

    /// Whether `provider` can be queried with the configured credentials.
    ///
    /// Keyless providers always return `true`.
    pub fn has_credentials(&self, provider: SearchProvider) -> bool {
        match provider {
            SearchProvider::Google => {
                self.google_api_key.is_some() && self.google_engine_id.is_some()
            }
            SearchProvider::Serper => self.serper_api_key.is_some(),
            SearchProvider::Tavily => self.tavily_api_key.is_some(),
            SearchProvider::Brave => self.brave_api_key.is_some(),
            SearchProvider::DuckDuckGo | SearchProvider::Arxiv | SearchProvider::Wikipedia => true,
        }
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("ProviderCredentials")
            .field("google_api_key", &mask(&self.google_api_key))
            .field("google_engine_id", &mask(&self.google_engine_id))
            .field("serper_api_key", &mask(&self.serper_api_key))
            .field("tavily_api_key", &mask(&self.tavily_api_key))
            .field("brave_api_key", &mask(&self.brave_api_key))
            .finish()
    }
}

/// Configuration for search requests.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of results to return.
    pub max_results: usize,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether to request safe search filtering where supported.
    pub safe_search: bool,
    /// Custom User-Agent string. If `None`, rotates through a built-in list.
    pub user_agent: Option<String>,
    /// Credentials for keyed providers.
    pub credentials: ProviderCredentials,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            timeout_seconds: 10,
            safe_search: true,
            user_agent: None,
            credentials: ProviderCredentials::default(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
