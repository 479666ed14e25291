use crate::domain::errors::AgentError;
use async_trait::async_trait;

/// Non-streaming text completion against an LLM inference service.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AgentError>;
    async fn complete_with_system(&self, system: &str, prompt: &str)
        -> Result<String, AgentError>;
}
