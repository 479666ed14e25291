use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agentic_rag::application::{AnswerPipeline, Retriever};
use agentic_rag::domain::Document;
use agentic_rag::infrastructure::{AppConfig, GroqGenerator, InMemoryVectorStore, TextEmbedding};

const SELLER_TEMPLATE: &str = "Eres un vendedor experto. Responde usando el contexto.\n\nCONTEXTO RECUPERADO:\n{context}\n\nPREGUNTA: {question}";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "semantic_search=info,agentic_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    println!("--- PASO 1: CREANDO DATOS ---");
    let documents = vec![
        Document::new(
            "Producto: Laptop Gamer X1. Precio: $1500. Specs: NVIDIA RTX 4060, 16GB RAM. \
             Ideal para jugar AAA.",
        )
        .with_metadata(serde_json::json!({ "id": 1 })),
        Document::new(
            "Producto: Cafetera Smart Brew. Precio: $200. Specs: WiFi, App control. \
             Para amantes del café.",
        )
        .with_metadata(serde_json::json!({ "id": 2 })),
        Document::new(
            "Producto: Silla Ergonómica Pro. Precio: $350. Specs: Soporte lumbar. Para oficina.",
        )
        .with_metadata(serde_json::json!({ "id": 3 })),
    ];
    println!("{} documentos creados.", documents.len());

    println!("--- PASO 2: EMBEDDINGS E INDEXADO ---");
    let embedding = Arc::new(TextEmbedding::from_config(&config.embedding)?);
    let store = Arc::new(InMemoryVectorStore::new());
    // k=1: la prueba es que la semántica alcance con un solo documento.
    let retriever = Arc::new(Retriever::new(embedding, store, 1));
    retriever.index_documents(&documents).await?;

    println!("--- PASO 3: CADENA RAG ---");
    let generator = Arc::new(GroqGenerator::strong_from_config(&config.llm));
    let pipeline = AnswerPipeline::new(retriever, generator).with_template(SELLER_TEMPLATE);

    println!("--- PASO 4: EJECUCIÓN (PRUEBA SEMÁNTICA) ---");
    let query = "che, necesito viciar mucho, tendras alguna cafetera o algo parecido \
                 para mantenerme despierto?";
    println!("PREGUNTA: '{query}'");

    let response = pipeline.answer(query).await?;

    println!("\nDOC RECUPERADO (¿Entendió la semántica?):");
    for document in &response.source_documents {
        println!("   -> {}", document.text);
    }

    println!("\nRESPUESTA:");
    println!("{}", response.text);

    Ok(())
}
