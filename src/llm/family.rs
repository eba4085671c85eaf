//! Model families accepted by the summarization endpoint.

use std::fmt;
use std::str::FromStr;

use super::provider::AiProvider;

/// A requested model family, expanded into concrete model ids at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    Gpt4o,
    Claude,
    Gemini,
}

impl ModelFamily {
    /// The identifier clients send in the `model` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
        }
    }

    /// Vendor serving this family.
    pub fn provider(&self) -> AiProvider {
        match self {
            Self::Gpt4o => AiProvider::OpenAi,
            Self::Claude => AiProvider::Anthropic,
            Self::Gemini => AiProvider::Google,
        }
    }

    /// Concrete model ids, in the order they are tried.
    pub fn variants(&self) -> &'static [&'static str] {
        match self {
            Self::Gpt4o => &["gpt-4o"],
            Self::Claude => &[
                "claude-3-sonnet-20240229",
                "claude-3-haiku-20240307",
                "claude-3-opus-20240229",
                "claude-2.1",
                "claude-instant-1.2",
            ],
            Self::Gemini => &[
                "gemini-1.5-pro",
                "gemini-1.5-flash",
                "gemini-pro",
                "gemini-1.0-pro",
            ],
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gpt-4o" => Ok(Self::Gpt4o),
            "claude" => Ok(Self::Claude),
            "gemini" => Ok(Self::Gemini),
            other => Err(format!("unknown model family: {other}")),
        }
    }
}
