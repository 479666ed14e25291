use std::sync::Arc;
use tracing::instrument;

use crate::application::services::Retriever;
use crate::domain::{ports::Generator, AgentError, Document};

/// Default answering template. `{context}` receives the retrieved
/// fragments, `{question}` (or `{input}`) the user question.
const DEFAULT_TEMPLATE: &str = "Responde solo con el contexto provisto.\n\nCONTEXTO:\n{context}\n\nPREGUNTA: {question}";

/// Generated answer plus the documents used as evidence.
#[derive(Debug, Clone)]
pub struct AnswerResult {
    pub text: String,
    pub source_documents: Vec<Document>,
}

/// Retrieve-then-generate pipeline: top-k context rendered into a
/// prompt template, one non-streaming generator call.
pub struct AnswerPipeline {
    retriever: Arc<Retriever>,
    generator: Arc<dyn Generator>,
    template: String,
}

impl AnswerPipeline {
    pub fn new(retriever: Arc<Retriever>, generator: Arc<dyn Generator>) -> Self {
        Self {
            retriever,
            generator,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    #[instrument(skip(self))]
    pub async fn answer(&self, question: &str) -> Result<AnswerResult, AgentError> {
        let results = self.retriever.retrieve(question).await?;

        let context = results
            .iter()
            .map(|r| r.document.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = self
            .template
            .replace("{context}", &context)
            .replace("{question}", question)
            .replace("{input}", question);

        let text = self.generator.complete(&prompt).await?;

        Ok(AnswerResult {
            text,
            source_documents: results.into_iter().map(|r| r.document).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::EmbeddingService;
    use crate::domain::Embedding;
    use crate::infrastructure::InMemoryVectorStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct UnitEmbedder;

    #[async_trait]
    impl EmbeddingService for UnitEmbedder {
        async fn embed(&self, _text: &str) -> Result<Embedding, AgentError> {
            Ok(Embedding::new(vec![1.0, 0.0]))
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, AgentError> {
            Ok(texts.iter().map(|_| Embedding::new(vec![1.0, 0.0])).collect())
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    /// Records the prompt it receives and replies with a fixed string.
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
        reply: String,
    }

    impl RecordingGenerator {
        fn new(reply: &str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                reply: reply.to_string(),
            }
        }
    }

    #[async_trait]
    impl Generator for RecordingGenerator {
        async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }

        async fn complete_with_system(
            &self,
            _system: &str,
            prompt: &str,
        ) -> Result<String, AgentError> {
            self.complete(prompt).await
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn complete(&self, _prompt: &str) -> Result<String, AgentError> {
            Err(AgentError::generation("service unreachable"))
        }

        async fn complete_with_system(
            &self,
            _system: &str,
            prompt: &str,
        ) -> Result<String, AgentError> {
            self.complete(prompt).await
        }
    }

    async fn indexed_retriever() -> Arc<Retriever> {
        let retriever = Arc::new(Retriever::new(
            Arc::new(UnitEmbedder),
            Arc::new(InMemoryVectorStore::new()),
            2,
        ));
        retriever
            .index_document(&Document::new("La cafetera cuesta $200."))
            .await
            .unwrap();
        retriever
    }

    #[tokio::test]
    async fn template_receives_context_and_question() {
        let generator = Arc::new(RecordingGenerator::new("ok"));
        let pipeline = AnswerPipeline::new(indexed_retriever().await, generator.clone())
            .with_template("C={context} Q={question}");

        let result = pipeline.answer("¿precio?").await.unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], "C=La cafetera cuesta $200. Q=¿precio?");
        assert_eq!(result.text, "ok");
        assert_eq!(result.source_documents.len(), 1);
    }

    #[tokio::test]
    async fn input_placeholder_is_supported_too() {
        let generator = Arc::new(RecordingGenerator::new("ok"));
        let pipeline = AnswerPipeline::new(indexed_retriever().await, generator.clone())
            .with_template("Pregunta: {input}");

        pipeline.answer("¿precio?").await.unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts[0], "Pregunta: ¿precio?");
    }

    #[tokio::test]
    async fn generator_failure_is_surfaced() {
        let pipeline = AnswerPipeline::new(indexed_retriever().await, Arc::new(FailingGenerator));
        let err = pipeline.answer("¿precio?").await.unwrap_err();
        assert!(matches!(err, AgentError::Generation(_)));
    }
}
