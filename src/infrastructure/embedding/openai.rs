use std::time::Duration;

use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::EmbeddingsBuilder;
use rig::providers::openai;

use crate::domain::{ports::EmbeddingService, AgentError, Embedding};
use crate::infrastructure::config::{require_key, EmbeddingConfig, EMBEDDING_KEY};

/// Embeddings over the OpenAI API, timeout-bounded like every other
/// external call.
pub struct TextEmbedding {
    model: String,
    dimension: usize,
    timeout: Duration,
}

impl TextEmbedding {
    /// Fails with a configuration error if the embedding credential is
    /// absent, so the operator hears about it before any indexing runs.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, AgentError> {
        require_key(EMBEDDING_KEY)?;
        Ok(Self {
            model: config.model.clone(),
            dimension: config.dimension,
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }
}

#[async_trait]
impl EmbeddingService for TextEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, AgentError> {
        let mut embeddings = self.embed_batch(&[text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| AgentError::embedding("no embedding returned"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, AgentError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let client = openai::Client::from_env();
        let model = client.embedding_model(&self.model);

        let mut builder = EmbeddingsBuilder::new(model);
        for text in texts {
            builder = builder
                .document(*text)
                .map_err(|e| AgentError::embedding(e.to_string()))?;
        }

        let embeddings = tokio::time::timeout(self.timeout, builder.build())
            .await
            .map_err(|_| AgentError::timeout("embedding timed out"))?
            .map_err(|e| AgentError::embedding(e.to_string()))?;

        Ok(embeddings
            .into_iter()
            .map(|(_doc, emb)| {
                let vec_f32: Vec<f32> = emb.first().vec.into_iter().map(|x| x as f32).collect();
                Embedding::new(vec_f32)
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
