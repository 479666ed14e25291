use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info, instrument};

use crate::domain::{
    ports::{Generator, ToolRegistry},
    AgentError, Conversation, MessageRole,
};

const DEFAULT_MAX_TURNS: usize = 8;

/// Preamble ahead of the tool listing. The few-shot block teaches the
/// textual action syntax the loop parses.
const DEFAULT_PREAMBLE: &str = r#"Sos un agente experto que responde preguntas usando razonamiento y herramientas.
Seguí este proceso:
1. Razoná sobre qué necesitás.
2. Usá herramientas si hace falta.
3. Respondé en Español.

Para usar una herramienta respondé con una única línea con este formato exacto:
Call: nombre_herramienta("entrada")

Cuando tengas la respuesta final, respondé directamente sin ninguna línea Call.
No expliques errores de formato ni menciones pasos internos."#;

const FEW_SHOT_EXAMPLES: &str = r#"Ejemplo 1:
User: ¿Cuál es la altura del Monte Everest?
Assistant: Call: wiki_search("Monte Everest")
Result: El Monte Everest tiene una altitud de 8848 metros.
Assistant: La altura del Monte Everest es de 8848 metros.

Ejemplo 2:
User: Resumime este texto: "La IA..."
Assistant: Call: summarize_text("La IA...")
Result: - Resumen punto 1...
Assistant: Aquí tenés el resumen: ..."#;

/// `Call: tool_name("input")` action lines emitted by the generator.
static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Call:\s*(\w+)\(\s*"(?s:(.*?))"\s*\)"#).expect("action pattern compiles")
});

/// Loop state. One query moves Thinking -> ToolCall -> Thinking until a
/// reply with no action line ends it in Done; the turn bound is the
/// only other way out.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AgentState {
    Thinking,
    ToolCall { name: String, input: String },
    Done(String),
}

/// Outcome of a finished run.
#[derive(Debug)]
pub struct AgentRun {
    pub answer: String,
    pub conversation: Conversation,
    pub turns: usize,
}

/// ReAct-style decide/act/observe loop over a generator and a tool
/// registry. Tool execution is synchronous from the loop's perspective;
/// each call fully completes before the generator is consulted again.
pub struct AgentLoop {
    generator: Arc<dyn Generator>,
    tools: ToolRegistry,
    preamble: String,
    max_turns: usize,
}

impl AgentLoop {
    pub fn new(generator: Arc<dyn Generator>, tools: ToolRegistry) -> Self {
        Self {
            generator,
            tools,
            preamble: DEFAULT_PREAMBLE.to_string(),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    #[instrument(skip(self))]
    pub async fn run(&self, query: &str) -> Result<AgentRun, AgentError> {
        let system = self.render_system_prompt();
        let mut conversation = Conversation::new();
        conversation.push(MessageRole::User, query);

        let mut state = AgentState::Thinking;
        let mut turns = 0;

        loop {
            state = match state {
                AgentState::Thinking => {
                    if turns == self.max_turns {
                        return Err(AgentError::MaxTurnsExceeded(self.max_turns));
                    }
                    turns += 1;

                    let reply = self
                        .generator
                        .complete_with_system(&system, &conversation.transcript())
                        .await?;
                    conversation.push(MessageRole::Assistant, &reply);
                    Self::next_state(&reply)
                }
                AgentState::ToolCall { name, input } => {
                    let tool = self
                        .tools
                        .get(&name)
                        .ok_or_else(|| AgentError::UnknownTool(name.clone()))?;

                    info!(tool = %name, turn = turns, "tool call");
                    let result = tool.call(&input).await?;
                    debug!(tool = %name, result_len = result.len(), "tool result");

                    // Appended before the next generator call: turn N+1
                    // always observes the tool output of turn N.
                    conversation.push(MessageRole::Tool, &result);
                    AgentState::Thinking
                }
                AgentState::Done(answer) => {
                    info!(turns, "final answer");
                    return Ok(AgentRun {
                        answer,
                        conversation,
                        turns,
                    });
                }
            };
        }
    }

    /// Classifies a generator reply: an action line means a tool call,
    /// anything else is the final answer.
    fn next_state(reply: &str) -> AgentState {
        match ACTION_RE.captures(reply) {
            Some(captures) => AgentState::ToolCall {
                name: captures[1].to_string(),
                input: captures[2].to_string(),
            },
            None => AgentState::Done(reply.trim().to_string()),
        }
    }

    /// System prompt: preamble, the registered tools' names and
    /// descriptions verbatim, and the few-shot examples.
    fn render_system_prompt(&self) -> String {
        let tool_lines = self
            .tools
            .sorted()
            .iter()
            .map(|t| format!("- {}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\nHerramientas disponibles:\n{}\n\nAquí tenés ejemplos de cómo actuar:\n{}",
            self.preamble, tool_lines, FEW_SHOT_EXAMPLES
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Tool;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a scripted sequence of replies and records every prompt
    /// it was shown.
    struct ScriptedGenerator {
        replies: Mutex<VecDeque<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompt(&self, index: usize) -> String {
            self.prompts.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
            self.complete_with_system("", prompt).await
        }

        async fn complete_with_system(
            &self,
            _system: &str,
            prompt: &str,
        ) -> Result<String, AgentError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AgentError::generation("script exhausted"))
        }
    }

    struct CountingDateTool {
        calls: AtomicUsize,
    }

    impl CountingDateTool {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Tool for CountingDateTool {
        fn name(&self) -> &str {
            "get_today_date"
        }

        fn description(&self) -> &str {
            "Retorna la fecha actual."
        }

        async fn call(&self, _input: &str) -> Result<String, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(chrono::Local::now().date_naive().to_string())
        }
    }

    fn registry_with(tool: Arc<dyn Tool>) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(tool);
        registry
    }

    #[test]
    fn action_lines_are_parsed() {
        assert_eq!(
            AgentLoop::next_state("Call: wiki_search(\"Lionel Messi\")"),
            AgentState::ToolCall {
                name: "wiki_search".to_string(),
                input: "Lionel Messi".to_string(),
            }
        );

        assert_eq!(
            AgentLoop::next_state("La respuesta es 8848 metros.\n"),
            AgentState::Done("La respuesta es 8848 metros.".to_string())
        );
    }

    #[tokio::test]
    async fn date_question_calls_tool_once_and_finishes() {
        let tool = Arc::new(CountingDateTool::new());
        let today = chrono::Local::now().date_naive().to_string();
        let generator = Arc::new(ScriptedGenerator::new(&[
            "Call: get_today_date(\"\")",
            "Hoy es la fecha que indica el resultado.",
        ]));

        let agent = AgentLoop::new(generator.clone(), registry_with(tool.clone()));
        let run = agent.run("¿Cuál es la fecha de hoy?").await.unwrap();

        assert_eq!(tool.calls.load(Ordering::SeqCst), 1);
        assert_eq!(run.turns, 2);
        assert_eq!(run.answer, "Hoy es la fecha que indica el resultado.");
        // The second generator call observes the first turn's tool output.
        assert!(generator.prompt(1).contains(&today));
        // One final answer only: the transcript ends with it.
        assert_eq!(run.conversation.messages.last().unwrap().content, run.answer);
    }

    #[tokio::test]
    async fn unregistered_tool_is_fatal() {
        let generator = Arc::new(ScriptedGenerator::new(&["Call: calculator(\"2+2\")"]));
        let agent = AgentLoop::new(
            generator,
            registry_with(Arc::new(CountingDateTool::new())),
        );

        let err = agent.run("¿2+2?").await.unwrap_err();
        match err {
            AgentError::UnknownTool(name) => assert_eq!(name, "calculator"),
            other => panic!("expected UnknownTool, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_terminating_tool_chatter_hits_turn_bound() {
        let generator = Arc::new(ScriptedGenerator::new(&[
            "Call: get_today_date(\"\")",
            "Call: get_today_date(\"\")",
            "Call: get_today_date(\"\")",
        ]));
        let agent = AgentLoop::new(
            generator,
            registry_with(Arc::new(CountingDateTool::new())),
        )
        .with_max_turns(3);

        let err = agent.run("¿fecha?").await.unwrap_err();
        assert!(matches!(err, AgentError::MaxTurnsExceeded(3)));
    }

    #[tokio::test]
    async fn system_prompt_lists_tool_descriptions_verbatim() {
        let generator = Arc::new(ScriptedGenerator::new(&["listo"]));
        let agent = AgentLoop::new(
            generator,
            registry_with(Arc::new(CountingDateTool::new())),
        );

        let prompt = agent.render_system_prompt();
        assert!(prompt.contains("- get_today_date: Retorna la fecha actual."));

        agent.run("hola").await.unwrap();
    }
}
