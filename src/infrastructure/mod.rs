pub mod config;
pub mod embedding;
pub mod llm;
pub mod tools;
pub mod vector_store;

pub use config::{AgentConfig, AppConfig, EmbeddingConfig, LlmConfig, RagConfig};
pub use embedding::TextEmbedding;
pub use llm::GroqGenerator;
pub use tools::{SummarizeTool, TodayTool, WikipediaTool};
pub use vector_store::{InMemoryVectorStore, QdrantVectorStore};
