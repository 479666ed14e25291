use serde::Deserialize;

use crate::domain::{AgentError, Result};

/// The generator's credential. Checked once at startup, before any
/// pipeline step runs.
pub const GENERATOR_KEY: &str = "GROQ_API_KEY";

/// The embedding service's credential. Only demos that index or
/// retrieve need it; checked when the embedder is constructed.
pub const EMBEDDING_KEY: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub rag: RagConfig,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Model answering user questions.
    pub model: String,
    /// Stronger model used as exam-writer and judge.
    pub strong_model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RagConfig {
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub max_turns: usize,
    pub wikipedia_lang: String,
    pub wikipedia_max_chars: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                model: "llama-3.1-8b-instant".to_string(),
                strong_model: "llama-3.3-70b-versatile".to_string(),
                timeout_seconds: 60,
            },
            embedding: EmbeddingConfig {
                model: "text-embedding-3-small".to_string(),
                dimension: 1536,
                timeout_seconds: 30,
            },
            rag: RagConfig { top_k: 4 },
            agent: AgentConfig {
                max_turns: 8,
                wikipedia_lang: "es".to_string(),
                wikipedia_max_chars: 1000,
            },
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with environment overrides. Fails with a
    /// configuration error if the generator credential is absent.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.llm.model = model;
        }
        if let Ok(model) = std::env::var("LLM_STRONG_MODEL") {
            config.llm.strong_model = model;
        }
        if let Ok(seconds) = std::env::var("LLM_TIMEOUT_SECONDS") {
            config.llm.timeout_seconds = parse_env("LLM_TIMEOUT_SECONDS", &seconds)?;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Ok(top_k) = std::env::var("RAG_TOP_K") {
            config.rag.top_k = parse_env("RAG_TOP_K", &top_k)?;
        }
        if let Ok(max_turns) = std::env::var("AGENT_MAX_TURNS") {
            config.agent.max_turns = parse_env("AGENT_MAX_TURNS", &max_turns)?;
        }
        if let Ok(lang) = std::env::var("WIKIPEDIA_LANG") {
            config.agent.wikipedia_lang = lang;
        }

        require_key(GENERATOR_KEY)?;
        Ok(config)
    }
}

/// Errors unless the named environment variable holds a non-empty value.
pub fn require_key(name: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(AgentError::configuration(format!("{name} is not set"))),
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| AgentError::configuration(format!("{name}: cannot parse '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_the_small_model_for_answers() {
        let config = AppConfig::default();
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert_eq!(config.llm.strong_model, "llama-3.3-70b-versatile");
        assert!(config.rag.top_k > 0);
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = require_key("AGENTIC_RAG_TEST_UNSET_KEY").unwrap_err();
        assert!(matches!(err, AgentError::Configuration(_)));
    }
}
