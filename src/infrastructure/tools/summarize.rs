use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    ports::{Generator, Tool},
    AgentError,
};

const NAME: &str = "summarize_text";

/// Summarizer backed by its own generator handle, so the agent's model
/// never has to summarize inline.
pub struct SummarizeTool {
    generator: Arc<dyn Generator>,
}

impl SummarizeTool {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Tool for SummarizeTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Resume el texto provisto por el usuario en español, de forma clara y breve."
    }

    async fn call(&self, input: &str) -> Result<String, AgentError> {
        let prompt = format!(
            "Resumí el siguiente texto en español, claro y breve. \
             Usá 5-8 bullets como máximo y cerrá con 1 frase de conclusión.\n\nTEXTO:\n{input}"
        );

        self.generator
            .complete(&prompt)
            .await
            .map_err(|e| AgentError::tool(NAME, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UpperGenerator;

    #[async_trait]
    impl Generator for UpperGenerator {
        async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
            Ok(prompt.to_uppercase())
        }

        async fn complete_with_system(
            &self,
            _system: &str,
            prompt: &str,
        ) -> Result<String, AgentError> {
            self.complete(prompt).await
        }
    }

    #[tokio::test]
    async fn wraps_the_input_in_the_summary_prompt() {
        let tool = SummarizeTool::new(Arc::new(UpperGenerator));
        let output = tool.call("la IA combina razonamiento").await.unwrap();
        assert!(output.contains("LA IA COMBINA RAZONAMIENTO"));
    }
}
