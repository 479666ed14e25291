use std::time::Duration;

use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::groq;

use crate::domain::{ports::Generator, AgentError};
use crate::infrastructure::config::LlmConfig;

/// Text completion over the Groq inference API. Every call is bounded
/// by a deadline; a hung upstream surfaces as a timeout error instead
/// of hanging the pipeline.
pub struct GroqGenerator {
    model: String,
    timeout: Duration,
}

impl GroqGenerator {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(&config.model).with_timeout(Duration::from_secs(config.timeout_seconds))
    }

    /// Same transport, but the stronger exam-writer/judge model.
    pub fn strong_from_config(config: &LlmConfig) -> Self {
        Self::new(&config.strong_model).with_timeout(Duration::from_secs(config.timeout_seconds))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Generator for GroqGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
        let client = groq::Client::from_env();
        let agent = client.agent(&self.model).build();

        tokio::time::timeout(self.timeout, agent.prompt(prompt))
            .await
            .map_err(|_| AgentError::timeout("generation timed out"))?
            .map_err(|e| AgentError::generation(e.to_string()))
    }

    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, AgentError> {
        let client = groq::Client::from_env();
        let agent = client.agent(&self.model).preamble(system).build();

        tokio::time::timeout(self.timeout, agent.prompt(prompt))
            .await
            .map_err(|_| AgentError::timeout("generation timed out"))?
            .map_err(|e| AgentError::generation(e.to_string()))
    }
}
