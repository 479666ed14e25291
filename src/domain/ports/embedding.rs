use crate::domain::{errors::AgentError, Embedding};
use async_trait::async_trait;

#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, AgentError>;
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, AgentError>;
    fn dimension(&self) -> usize;
}
