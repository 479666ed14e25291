use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    AgentError, Document, SearchResult,
};

/// Embeds queries and asks the vector store for the nearest documents.
pub struct Retriever {
    embedding: Arc<dyn EmbeddingService>,
    store: Arc<dyn VectorStore>,
    default_top_k: usize,
}

impl Retriever {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        store: Arc<dyn VectorStore>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedding,
            store,
            default_top_k,
        }
    }

    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>, AgentError> {
        self.retrieve_top_k(query, self.default_top_k).await
    }

    #[instrument(skip(self))]
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, AgentError> {
        if self.store.count().await? == 0 {
            return Err(AgentError::EmptyStore);
        }

        let embedding = self.embedding.embed(query).await?;
        self.store.search(&embedding, top_k).await
    }

    #[instrument(skip(self, document), fields(document_id = %document.id))]
    pub async fn index_document(&self, document: &Document) -> Result<(), AgentError> {
        let embedding = self.embedding.embed(&document.text).await?;
        self.store.upsert(document, &embedding).await
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn index_documents(&self, documents: &[Document]) -> Result<(), AgentError> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        let embeddings = self.embedding.embed_batch(&texts).await?;

        for (document, embedding) in documents.iter().zip(embeddings.iter()) {
            self.store.upsert(document, embedding).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Embedding;
    use crate::infrastructure::InMemoryVectorStore;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Deterministic embedder: fixed vector per known phrase. Queries
    /// about cost point near the cost document, age queries near the
    /// age document.
    struct StaticEmbedder {
        vectors: HashMap<&'static str, Vec<f32>>,
    }

    impl StaticEmbedder {
        fn for_pricing_corpus() -> Self {
            let mut vectors = HashMap::new();
            vectors.insert("cost is zero", vec![1.0, 0.1, 0.0]);
            vectors.insert("must be 13+", vec![0.0, 0.1, 1.0]);
            vectors.insert("¿cuánto cuesta?", vec![0.9, 0.2, 0.1]);
            Self { vectors }
        }
    }

    #[async_trait]
    impl EmbeddingService for StaticEmbedder {
        async fn embed(&self, text: &str) -> Result<Embedding, AgentError> {
            self.vectors
                .get(text)
                .cloned()
                .map(Embedding::new)
                .ok_or_else(|| AgentError::embedding(format!("no vector for '{text}'")))
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, AgentError> {
            let mut embeddings = Vec::with_capacity(texts.len());
            for text in texts {
                embeddings.push(self.embed(text).await?);
            }
            Ok(embeddings)
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    fn pricing_retriever() -> (Retriever, Vec<Document>) {
        let documents = vec![Document::new("cost is zero"), Document::new("must be 13+")];
        let retriever = Retriever::new(
            Arc::new(StaticEmbedder::for_pricing_corpus()),
            Arc::new(InMemoryVectorStore::new()),
            2,
        );
        (retriever, documents)
    }

    #[tokio::test]
    async fn empty_store_is_rejected() {
        let (retriever, _) = pricing_retriever();
        let err = retriever.retrieve("¿cuánto cuesta?").await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyStore));
    }

    #[tokio::test]
    async fn cost_question_retrieves_cost_fragment_first() {
        let (retriever, documents) = pricing_retriever();
        retriever.index_documents(&documents).await.unwrap();

        let results = retriever.retrieve("¿cuánto cuesta?").await.unwrap();
        assert_eq!(results[0].document.text, "cost is zero");
    }

    #[tokio::test]
    async fn results_are_bounded_and_ordered() {
        let (retriever, documents) = pricing_retriever();
        retriever.index_documents(&documents).await.unwrap();

        let results = retriever.retrieve_top_k("¿cuánto cuesta?", 1).await.unwrap();
        assert_eq!(results.len(), 1);

        let results = retriever.retrieve_top_k("¿cuánto cuesta?", 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn reindexing_preserves_ordering() {
        let (retriever, documents) = pricing_retriever();

        retriever.index_documents(&documents).await.unwrap();
        let first: Vec<_> = retriever
            .retrieve("¿cuánto cuesta?")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.document.id)
            .collect();

        retriever.index_documents(&documents).await.unwrap();
        let second: Vec<_> = retriever
            .retrieve("¿cuánto cuesta?")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.document.id)
            .collect();

        assert_eq!(first, second);
    }
}
