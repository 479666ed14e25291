use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agentic_rag::application::AgentLoop;
use agentic_rag::domain::ports::ToolRegistry;
use agentic_rag::infrastructure::{
    AppConfig, GroqGenerator, SummarizeTool, TodayTool, WikipediaTool,
};

async fn run_demo(agent: &AgentLoop, query: &str) -> anyhow::Result<()> {
    println!("\n>>> EJECUTANDO: {query}");

    let run = agent.run(query).await?;

    for message in &run.conversation.messages {
        println!("\n[{}]:", message.role.as_str().to_uppercase());
        println!("{}", message.content);
    }

    println!("\n>> Respuesta Final:\n{}", run.answer);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent=info,agentic_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    // El resumidor usa su propio modelo para que el agente no se enrede.
    let summarizer = Arc::new(GroqGenerator::from_config(&config.llm));

    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(SummarizeTool::new(summarizer)));
    tools.register(Arc::new(WikipediaTool::new(
        &config.agent.wikipedia_lang,
        config.agent.wikipedia_max_chars,
    )?));
    tools.register(Arc::new(TodayTool));

    let generator = Arc::new(GroqGenerator::from_config(&config.llm));
    let agent = AgentLoop::new(generator, tools).with_max_turns(config.agent.max_turns);

    println!("--- CASO 1: Resumen ---");
    let texto = "ReAct combina razonamiento y acción para resolver tareas complejas en LLMs.";
    run_demo(&agent, &format!("Resumime esto: {texto}")).await?;

    println!("\n--- CASO 2: Wikipedia ---");
    run_demo(&agent, "¿Cuándo nació Lionel Messi?").await?;

    println!("\n--- CASO 3: Custom Tool ---");
    run_demo(&agent, "¿Cuál es la fecha de hoy?").await?;

    Ok(())
}
