mod embedding;
mod generator;
mod tool;
mod vector_store;

pub use embedding::EmbeddingService;
pub use generator::Generator;
pub use tool::{Tool, ToolRegistry};
pub use vector_store::VectorStore;
