use crate::domain::{errors::AgentError, Document, Embedding, SearchResult};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Stores or replaces the embedding held for a document. A document
    /// id maps to exactly one embedding; re-upserting replaces it.
    async fn upsert(&self, document: &Document, embedding: &Embedding)
        -> Result<(), AgentError>;

    /// Returns the `top_k` most similar documents, ordered by
    /// non-increasing score with deterministic tie order for a fixed
    /// store state.
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, AgentError>;

    async fn count(&self) -> Result<usize, AgentError>;

    async fn delete(&self, document_id: Uuid) -> Result<(), AgentError>;
}
