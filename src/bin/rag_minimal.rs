use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agentic_rag::application::{AnswerPipeline, Retriever};
use agentic_rag::domain::Document;
use agentic_rag::infrastructure::{AppConfig, GroqGenerator, InMemoryVectorStore, TextEmbedding};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_minimal=info,agentic_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let documents = vec![
        Document::new("Laptop Gamer X1. NVIDIA RTX 4060. Ideal para jugar AAA.")
            .with_metadata(serde_json::json!({ "id": 1 })),
        Document::new("Cafetera Smart Brew. WiFi. Para amantes del café.")
            .with_metadata(serde_json::json!({ "id": 2 })),
    ];

    let embedding = Arc::new(TextEmbedding::from_config(&config.embedding)?);
    let store = Arc::new(InMemoryVectorStore::new());
    let retriever = Arc::new(Retriever::new(embedding, store, config.rag.top_k));
    retriever.index_documents(&documents).await?;

    let generator = Arc::new(GroqGenerator::strong_from_config(&config.llm));
    let pipeline = AnswerPipeline::new(retriever, generator);

    let result = pipeline.answer("quiero viciar").await?;
    println!("RESPUESTA: {}", result.text);

    Ok(())
}
