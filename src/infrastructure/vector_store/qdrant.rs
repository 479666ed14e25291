use async_trait::async_trait;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use uuid::Uuid;

use crate::domain::{ports::VectorStore, AgentError, Document, Embedding, SearchResult};

/// Qdrant-backed knowledge store. The collection is created on first
/// use with cosine distance, matching the retrieval contract.
pub struct QdrantVectorStore {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl QdrantVectorStore {
    pub async fn new(url: &str, collection: &str, dimension: usize) -> Result<Self, AgentError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| AgentError::vector_store(e.to_string()))?;

        let store = Self {
            client,
            collection: collection.to_string(),
            dimension,
        };

        store.ensure_collection().await?;

        Ok(store)
    }

    async fn ensure_collection(&self) -> Result<(), AgentError> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| AgentError::vector_store(e.to_string()))?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| AgentError::vector_store(e.to_string()))?;
        }

        Ok(())
    }

    fn uuid_to_point_id(id: Uuid) -> u64 {
        let bytes = id.as_bytes();
        u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ])
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn upsert(
        &self,
        document: &Document,
        embedding: &Embedding,
    ) -> Result<(), AgentError> {
        // Metadata travels as a serialized JSON string inside the payload.
        let payload: Payload = serde_json::json!({
            "document_id": document.id.to_string(),
            "text": document.text,
            "metadata": document.metadata.to_string(),
        })
        .try_into()
        .map_err(|_| AgentError::internal("failed to create payload"))?;

        let point = PointStruct::new(
            Self::uuid_to_point_id(document.id),
            embedding.as_slice().to_vec(),
            payload,
        );

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]))
            .await
            .map_err(|e| AgentError::vector_store(e.to_string()))?;

        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, AgentError> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query.as_slice().to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| AgentError::vector_store(e.to_string()))?;

        let search_results: Vec<SearchResult> = results
            .result
            .into_iter()
            .filter_map(|point| {
                let payload = point.payload;

                let document_id: Uuid = payload.get("document_id")?.as_str()?.parse().ok()?;
                let text = payload.get("text")?.as_str()?.to_string();
                let metadata = payload
                    .get("metadata")
                    .and_then(|v| v.as_str())
                    .and_then(|s| serde_json::from_str(s).ok())
                    .unwrap_or_else(|| serde_json::json!({}));

                Some(SearchResult {
                    document: Document {
                        id: document_id,
                        text,
                        metadata,
                    },
                    score: point.score,
                })
            })
            .collect();

        Ok(search_results)
    }

    async fn count(&self) -> Result<usize, AgentError> {
        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .map_err(|e| AgentError::vector_store(e.to_string()))?;

        Ok(info
            .result
            .and_then(|r| r.points_count)
            .unwrap_or_default() as usize)
    }

    async fn delete(&self, document_id: Uuid) -> Result<(), AgentError> {
        let filter = Filter::must([Condition::matches(
            "document_id",
            document_id.to_string(),
        )]);

        self.client
            .delete_points(DeletePointsBuilder::new(&self.collection).points(filter))
            .await
            .map_err(|e| AgentError::vector_store(e.to_string()))?;

        Ok(())
    }
}
