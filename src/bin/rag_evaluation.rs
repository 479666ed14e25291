use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agentic_rag::application::{AnswerPipeline, EvaluationHarness, Retriever};
use agentic_rag::domain::Document;
use agentic_rag::infrastructure::{AppConfig, GroqGenerator, InMemoryVectorStore, TextEmbedding};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_evaluation=info,agentic_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    println!("--- 1. Montando el RAG ---");
    let documents = vec![
        Document::new(
            "La tarjeta Ualá tiene costo de mantenimiento cero. Es gratis de por vida.",
        ),
        Document::new("Para pedir la tarjeta tenés que ser mayor de 13 años y tener DNI argentino."),
        Document::new("Las inversiones en el fondo común se rescatan en el acto, 24/7."),
    ];

    let embedding = Arc::new(TextEmbedding::from_config(&config.embedding)?);
    let store = Arc::new(InMemoryVectorStore::new());
    let retriever = Arc::new(Retriever::new(embedding, store, config.rag.top_k));
    retriever.index_documents(&documents).await?;

    // El alumno rinde con el modelo chico; el profesor y el juez usan
    // el modelo grande.
    let student = Arc::new(GroqGenerator::from_config(&config.llm));
    let pipeline = Arc::new(AnswerPipeline::new(retriever, student));

    let examiner = Arc::new(GroqGenerator::strong_from_config(&config.llm));
    let judge = Arc::new(GroqGenerator::strong_from_config(&config.llm));
    let harness = EvaluationHarness::new(examiner, judge, pipeline);

    println!("--- 2. Generando preguntas de prueba (Test Set) ---");
    let examples = harness.generate_examples(&documents, 1).await?;
    println!("Se generaron {} ejemplos de prueba.", examples.len());

    println!("\n--- 3. El RAG está respondiendo las preguntas... ---");
    let predictions = harness.run_predictions(&examples).await?;

    println!("\n--- 4. Evaluación (LLM-as-a-Judge) ---");
    let graded = harness.grade(&examples, &predictions).await?;

    println!("\nRESULTADOS FINALES:");
    println!("{}", "=".repeat(60));
    for grade in &graded {
        println!("Pregunta: {}", grade.example.query);
        println!("Realidad (Ground Truth): {}", grade.example.answer);
        println!("Predicción (Tu Bot):     {}", grade.predicted);
        println!("JUEZ DICE: {}", grade.verdict.as_str());
        println!("{}", "-".repeat(60));
    }

    let correct = graded
        .iter()
        .filter(|g| g.verdict == agentic_rag::domain::Verdict::Correct)
        .count();
    println!("{correct}/{} correctas", graded.len());

    Ok(())
}
