//! Credential lookup for LLM and search providers.
//!
//! Credentials come from the process environment, optionally overlaid by a
//! JSON file mapping variable names to values (`--api-keys`). Values are
//! never logged and `Debug` output masks them.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use research_search::ProviderCredentials;

use crate::error::{ResearchError, Result};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// Environment variables plus file overrides.
#[derive(Clone, Default)]
pub struct CredentialSource {
    overrides: HashMap<String, String>,
    use_env: bool,
}

impl CredentialSource {
    /// Process environment only.
    pub fn from_env() -> Self {
        Self {
            overrides: HashMap::new(),
            use_env: true,
        }
    }

    /// Explicit values only; the environment is ignored.
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            overrides: values,
            use_env: false,
        }
    }

    /// Overlay the values from a JSON object file onto this source.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a flat string map.
    pub fn with_json_file(mut self, path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let values: HashMap<String, String> = serde_json::from_str(&raw).map_err(|e| {
            ResearchError::Credentials(format!(
                "{} is not a JSON object of string keys: {e}",
                path.display()
            ))
        })?;
        tracing::debug!(count = values.len(), "loaded credential overrides");
        self.overrides.extend(values);
        Ok(self)
    }

    /// Look up a variable. Blank values count as absent.
    pub fn get(&self, name: &str) -> Option<String> {
        let value = self.overrides.get(name).cloned().or_else(|| {
            if self.use_env {
                std::env::var(name).ok()
            } else {
                None
            }
        });
        value.filter(|v| !v.trim().is_empty())
    }

    /// Keys for the three hosted LLM providers.
    pub fn llm_keys(&self) -> LlmKeys {
        LlmKeys {
            openai: self.get(OPENAI_API_KEY),
            anthropic: self.get(ANTHROPIC_API_KEY),
            google: self.get(GOOGLE_API_KEY),
        }
    }

    /// Keys for the keyed search providers.
    pub fn search_credentials(&self) -> ProviderCredentials {
        ProviderCredentials::from_lookup(|name| self.get(name))
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.overrides.keys().collect();
        names.sort();
        f.debug_struct("CredentialSource")
            .field("override_names", &names)
            .field("use_env", &self.use_env)
            .finish()
    }
}

/// API keys for the hosted LLM providers.
#[derive(Clone, Default)]
pub struct LlmKeys {
    pub openai: Option<String>,
    pub anthropic: Option<String>,
    pub google: Option<String>,
}

impl LlmKeys {
    /// Whether at least one provider key is present.
    pub fn any(&self) -> bool {
        self.openai.is_some() || self.anthropic.is_some() || self.google.is_some()
    }

    /// All three keys, or an error naming the first missing one.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Credentials`] when any key is absent.
    pub fn require_all(self) -> Result<RequiredLlmKeys> {
        let missing = |name: &str| {
            ResearchError::Credentials(format!("{name} environment variable not set"))
        };
        Ok(RequiredLlmKeys {
            openai: self.openai.ok_or_else(|| missing(OPENAI_API_KEY))?,
            anthropic: self.anthropic.ok_or_else(|| missing(ANTHROPIC_API_KEY))?,
            google: self.google.ok_or_else(|| missing(GOOGLE_API_KEY))?,
        })
    }
}

impl fmt::Debug for LlmKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("LlmKeys")
            .field("openai", &mask(&self.openai))
            .field("anthropic", &mask(&self.anthropic))
            .field("google", &mask(&self.google))
            .finish()
    }
}

/// The three keys the summarization service needs at startup.
#[derive(Clone)]
pub struct RequiredLlmKeys {
    pub openai: String,
    pub anthropic: String,
    pub google: String,
}

impl fmt::Debug for RequiredLlmKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequiredLlmKeys { .. }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> CredentialSource {
        CredentialSource::from_map(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        )
    }

    #[test]
    fn blank_values_are_absent() {
        let creds = source(&[(OPENAI_API_KEY, "  "), (GOOGLE_API_KEY, "g")]);
        let keys = creds.llm_keys();
        assert!(keys.openai.is_none());
        assert_eq!(keys.google.as_deref(), Some("g"));
        assert!(keys.any());
    }

    #[test]
    fn require_all_names_missing_key() {
        let keys = source(&[(OPENAI_API_KEY, "o"), (GOOGLE_API_KEY, "g")]).llm_keys();
        let err = keys.require_all().unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn require_all_succeeds_with_every_key() {
        let keys = source(&[
            (OPENAI_API_KEY, "o"),
            (ANTHROPIC_API_KEY, "a"),
            (GOOGLE_API_KEY, "g"),
        ])
        .llm_keys();
        let required = keys.require_all().expect("all keys");
        assert_eq!(required.anthropic, "a");
    }

    #[test]
    fn search_credentials_pass_through() {
        let creds = source(&[("SERPER_API_KEY", "s")]).search_credentials();
        assert_eq!(creds.serper_api_key.as_deref(), Some("s"));
        assert!(creds.tavily_api_key.is_none());
    }

    #[test]
    fn json_file_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("keys.json");
        std::fs::write(&path, r#"{"TAVILY_API_KEY": "tv", "OPENAI_API_KEY": "new"}"#)
            .expect("write");

        let creds = source(&[(OPENAI_API_KEY, "old")])
            .with_json_file(&path)
            .expect("load");
        assert_eq!(creds.get(OPENAI_API_KEY).as_deref(), Some("new"));
        assert_eq!(creds.get("TAVILY_API_KEY").as_deref(), Some("tv"));
    }

    #[test]
    fn malformed_json_file_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("keys.json");
        std::fs::write(&path, r#"["not", "a", "map"]"#).expect("write");
        let err = CredentialSource::default().with_json_file(&path).unwrap_err();
        assert!(matches!(err, ResearchError::Credentials(_)));
    }

    #[test]
    fn debug_hides_values() {
        let keys = source(&[(OPENAI_API_KEY, "sk-secret")]).llm_keys();
        let printed = format!("{keys:?}");
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<set>"));
        let src = format!("{:?}", source(&[(OPENAI_API_KEY, "sk-secret")]));
        assert!(!src.contains("sk-secret"));
    }
}
