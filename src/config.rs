//! Configuration types for the research pipeline and summarization service.
//!
//! Loaded from an optional TOML file; every section and field has a default.
//! Credentials are never stored here (see [`crate::credentials`]).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use research_search::{ProviderCredentials, SearchConfig, SearchProvider};

use crate::error::{ResearchError, Result};
use crate::llm::AiProvider;
use crate::research::report::OutputFormat;
use crate::research::tasks::{Audience, ResearchDepth};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Research run defaults.
    pub research: ResearchSection,
    /// Hosted LLM settings.
    pub llm: LlmSection,
    /// Web search settings.
    pub search: SearchSection,
    /// Summarization server settings.
    pub server: ServerSection,
}

/// Defaults for a research run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSection {
    pub depth: ResearchDepth,
    pub audience: Audience,
    pub output_format: OutputFormat,
    /// Directory reports are written to.
    pub output_dir: PathBuf,
    /// Whether reports are written at all.
    pub save_output: bool,
    /// Web results gathered per research task.
    pub max_sources: usize,
    /// Academic results gathered per research task.
    pub max_academic_sources: usize,
    /// How many top result pages are downloaded for full text.
    pub fetch_pages: usize,
    /// Character budget per downloaded page.
    pub page_chars: usize,
}

impl Default for ResearchSection {
    fn default() -> Self {
        Self {
            depth: ResearchDepth::default(),
            audience: Audience::default(),
            output_format: OutputFormat::default(),
            output_dir: PathBuf::from("research_outputs"),
            save_output: true,
            max_sources: 10,
            max_academic_sources: 5,
            fetch_pages: 2,
            page_chars: research_search::content::DEFAULT_MAX_CHARS,
        }
    }
}

/// Hosted LLM settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// Provider used by the research pipeline.
    pub provider: AiProvider,
    pub openai_model: String,
    pub anthropic_model: String,
    pub google_model: String,
    /// Sampling temperature for research tasks.
    pub temperature: f32,
    /// Completion budget for research tasks.
    pub max_tokens: u32,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: AiProvider::OpenAi,
            openai_model: "gpt-4".to_owned(),
            anthropic_model: "claude-3-sonnet-20240229".to_owned(),
            google_model: "gemini-pro".to_owned(),
            temperature: 0.7,
            max_tokens: 4000,
            timeout_seconds: 120,
        }
    }
}

impl LlmSection {
    /// Configured model id for `provider`.
    pub fn model_for(&self, provider: AiProvider) -> &str {
        match provider {
            AiProvider::OpenAi => &self.openai_model,
            AiProvider::Anthropic => &self.anthropic_model,
            AiProvider::Google => &self.google_model,
        }
    }
}

/// Web search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Preferred web provider name, or `auto`.
    pub provider: String,
    pub max_results: usize,
    pub timeout_seconds: u64,
    pub safe_search: bool,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            provider: "auto".to_owned(),
            max_results: 5,
            timeout_seconds: 10,
            safe_search: true,
        }
    }
}

impl SearchSection {
    /// Parsed provider preference; `auto` and unknown names mean none.
    pub fn preference(&self) -> Option<SearchProvider> {
        research_search::orchestrator::parse_preference(Some(self.provider.as_str()))
    }

    /// Search-crate configuration with the given credentials.
    pub fn to_search_config(&self, credentials: ProviderCredentials) -> SearchConfig {
        SearchConfig {
            max_results: self.max_results,
            timeout_seconds: self.timeout_seconds,
            safe_search: self.safe_search,
            user_agent: None,
            credentials,
        }
    }
}

/// Summarization server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    /// Port to bind; `0` picks a free port.
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8000,
        }
    }
}

impl ResearchConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ResearchError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ResearchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `PREFERRED_AI_PROVIDER` and `*_MODEL` overrides.
    ///
    /// An unknown provider name is logged and ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get("PREFERRED_AI_PROVIDER") {
            match raw.parse::<AiProvider>() {
                Ok(provider) => self.llm.provider = provider,
                Err(e) => tracing::warn!(error = %e, "ignoring PREFERRED_AI_PROVIDER"),
            }
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.llm.openai_model = model;
        }
        if let Some(model) = get("ANTHROPIC_MODEL") {
            self.llm.anthropic_model = model;
        }
        if let Some(model) = get("GOOGLE_MODEL") {
            self.llm.google_model = model;
        }
    }

    /// Reject settings that cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ResearchError::Config(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(ResearchError::Config("llm.max_tokens must be greater than 0".into()));
        }
        if self.llm.timeout_seconds == 0 {
            return Err(ResearchError::Config(
                "llm.timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.research.max_sources == 0 {
            return Err(ResearchError::Config(
                "research.max_sources must be greater than 0".into(),
            ));
        }
        self.search
            .to_search_config(ProviderCredentials::default())
            .validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_documented_values() {
        let config = ResearchConfig::default();
        assert_eq!(config.research.depth, ResearchDepth::Comprehensive);
        assert_eq!(config.research.output_dir, PathBuf::from("research_outputs"));
        assert_eq!(config.llm.provider, AiProvider::OpenAi);
        assert_eq!(config.llm.model_for(AiProvider::Anthropic), "claude-3-sonnet-20240229");
        assert_eq!(config.search.preference(), None);
        assert_eq!(config.server.port, 8000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ResearchConfig = toml::from_str(
            r#"
            [research]
            depth = "expert"

            [search]
            provider = "brave"
            "#,
        )
        .expect("parse");
        assert_eq!(config.research.depth, ResearchDepth::Expert);
        assert_eq!(config.research.audience, Audience::General);
        assert_eq!(config.search.preference(), Some(SearchProvider::Brave));
        assert_eq!(config.search.max_results, 5);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("research.toml");

        let mut config = ResearchConfig::default();
        config.llm.provider = AiProvider::Google;
        config.server.port = 9100;
        config.save_to_file(&path).expect("save");

        let loaded = ResearchConfig::from_file(&path).expect("load");
        assert_eq!(loaded.llm.provider, AiProvider::Google);
        assert_eq!(loaded.server.port, 9100);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[research\ndepth = ").expect("write");
        let err = ResearchConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ResearchError::Config(_)));
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("PREFERRED_AI_PROVIDER", "Anthropic"),
            ("ANTHROPIC_MODEL", "claude-3-haiku-20240307"),
            ("OPENAI_MODEL", ""),
        ]
        .into_iter()
        .collect();

        let mut config = ResearchConfig::default();
        config.apply_env_overrides(|name| vars.get(name).map(|v| (*v).to_owned()));
        assert_eq!(config.llm.provider, AiProvider::Anthropic);
        assert_eq!(config.llm.anthropic_model, "claude-3-haiku-20240307");
        assert_eq!(config.llm.openai_model, "gpt-4", "blank override ignored");
    }

    #[test]
    fn unknown_provider_override_ignored() {
        let mut config = ResearchConfig::default();
        config.apply_env_overrides(|name| {
            (name == "PREFERRED_AI_PROVIDER").then(|| "mistral".to_owned())
        });
        assert_eq!(config.llm.provider, AiProvider::OpenAi);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = ResearchConfig::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = ResearchConfig::default();
        config.search.max_results = 0;
        assert!(matches!(config.validate(), Err(ResearchError::Search(_))));
    }

    #[test]
    fn zero_llm_timeout_is_rejected() {
        let mut config = ResearchConfig::default();
        config.llm.timeout_seconds = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ResearchError::Config(_)));
        assert!(err.to_string().contains("llm.timeout_seconds"));

        let config: ResearchConfig = toml::from_str("[llm]\ntimeout_seconds = 0\n").unwrap();
        assert!(config.validate().is_err());
    }
}
