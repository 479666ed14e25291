use async_trait::async_trait;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::{ports::VectorStore, AgentError, Document, Embedding, SearchResult};

/// Cosine scan over an in-process document list. Good for the demos
/// and for tests; the store is populated once and read-only afterwards.
pub struct InMemoryVectorStore {
    documents: RwLock<Vec<(Document, Embedding)>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(
        &self,
        document: &Document,
        embedding: &Embedding,
    ) -> Result<(), AgentError> {
        let mut store = self
            .documents
            .write()
            .map_err(|e| AgentError::internal(e.to_string()))?;

        // One embedding per document id; re-upserting replaces.
        store.retain(|(d, _)| d.id != document.id);
        store.push((document.clone(), embedding.clone()));
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, AgentError> {
        let store = self
            .documents
            .read()
            .map_err(|e| AgentError::internal(e.to_string()))?;

        let mut results: Vec<SearchResult> = store
            .iter()
            .map(|(document, embedding)| SearchResult {
                document: document.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        // Stable sort: ties keep insertion order, so a fixed store
        // state always yields the same ranking.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results.truncate(top_k);
        Ok(results)
    }

    async fn count(&self) -> Result<usize, AgentError> {
        let store = self
            .documents
            .read()
            .map_err(|e| AgentError::internal(e.to_string()))?;
        Ok(store.len())
    }

    async fn delete(&self, document_id: Uuid) -> Result<(), AgentError> {
        let mut store = self
            .documents
            .write()
            .map_err(|e| AgentError::internal(e.to_string()))?;

        store.retain(|(document, _)| document.id != document_id);
        Ok(())
    }
}
