use std::sync::Arc;
use tracing::{info, instrument};

use crate::application::services::{AnswerPipeline, AnswerResult};
use crate::domain::{
    ports::Generator, AgentError, Document, GeneratedExample, GradedPrediction, QAExample,
    Verdict,
};

/// Exam-writer prompt. The reply must be a single JSON object; some
/// models wrap it in `{"qa_pairs": ...}`, which decoding normalizes.
const QA_GENERATE_TEMPLATE: &str = r#"Sos un profesor preparando un examen sobre un documento.
Escribí UNA pregunta que se pueda responder solo con el documento, y su respuesta.
Respondé únicamente con JSON con esta forma exacta:
{"query": "la pregunta", "answer": "la respuesta"}

DOCUMENTO:
{document}"#;

/// Judge prompt: semantic comparison, not exact string match.
const GRADE_TEMPLATE: &str = r#"Sos un corrector de exámenes. Compará la respuesta predicha con la respuesta esperada.
Marcá CORRECT si ambas dicen lo mismo aunque estén redactadas distinto; INCORRECT si difieren en contenido.

PREGUNTA: {query}
RESPUESTA ESPERADA: {answer}
RESPUESTA PREDICHA: {prediction}

Respondé con una sola palabra: CORRECT o INCORRECT."#;

/// Drives the answer pipeline through a synthesized exam: an examiner
/// model writes QA pairs from the documents, the pipeline answers them,
/// and a judge model grades each prediction against the ground truth.
pub struct EvaluationHarness {
    examiner: Arc<dyn Generator>,
    judge: Arc<dyn Generator>,
    pipeline: Arc<AnswerPipeline>,
}

impl EvaluationHarness {
    pub fn new(
        examiner: Arc<dyn Generator>,
        judge: Arc<dyn Generator>,
        pipeline: Arc<AnswerPipeline>,
    ) -> Self {
        Self {
            examiner,
            judge,
            pipeline,
        }
    }

    #[instrument(skip(self, documents), fields(documents = documents.len()))]
    pub async fn generate_examples(
        &self,
        documents: &[Document],
        per_document: usize,
    ) -> Result<Vec<QAExample>, AgentError> {
        let mut examples = Vec::with_capacity(documents.len() * per_document);

        for document in documents {
            for _ in 0..per_document {
                let prompt = QA_GENERATE_TEMPLATE.replace("{document}", &document.text);
                let reply = self.examiner.complete(&prompt).await?;

                let json = extract_json(&reply).ok_or_else(|| {
                    AgentError::invalid_response(format!("no JSON object in: {reply}"))
                })?;
                let generated: GeneratedExample = serde_json::from_str(json)
                    .map_err(|e| AgentError::invalid_response(e.to_string()))?;

                examples.push(generated.into_example());
            }
        }

        info!(examples = examples.len(), "exam generated");
        Ok(examples)
    }

    /// Answers every example with the pipeline under test, one at a
    /// time; nothing here runs in parallel.
    #[instrument(skip(self, examples), fields(examples = examples.len()))]
    pub async fn run_predictions(
        &self,
        examples: &[QAExample],
    ) -> Result<Vec<AnswerResult>, AgentError> {
        let mut predictions = Vec::with_capacity(examples.len());
        for example in examples {
            predictions.push(self.pipeline.answer(&example.query).await?);
        }
        Ok(predictions)
    }

    #[instrument(skip(self, examples, predictions))]
    pub async fn grade(
        &self,
        examples: &[QAExample],
        predictions: &[AnswerResult],
    ) -> Result<Vec<GradedPrediction>, AgentError> {
        if examples.len() != predictions.len() {
            return Err(AgentError::invalid_response(format!(
                "{} examples but {} predictions",
                examples.len(),
                predictions.len()
            )));
        }

        let mut graded = Vec::with_capacity(examples.len());
        for (example, prediction) in examples.iter().zip(predictions) {
            let prompt = GRADE_TEMPLATE
                .replace("{query}", &example.query)
                .replace("{answer}", &example.answer)
                .replace("{prediction}", &prediction.text);

            let judgement = self.judge.complete(&prompt).await?;
            let verdict = Verdict::parse(&judgement);

            graded.push(GradedPrediction {
                example: example.clone(),
                predicted: prediction.text.clone(),
                verdict,
                judgement,
            });
        }

        Ok(graded)
    }

    /// Full exam: generate, predict, grade.
    pub async fn evaluate(
        &self,
        documents: &[Document],
        per_document: usize,
    ) -> Result<Vec<GradedPrediction>, AgentError> {
        let examples = self.generate_examples(documents, per_document).await?;
        let predictions = self.run_predictions(&examples).await?;
        self.grade(&examples, &predictions).await
    }
}

/// Trims a model reply down to its outermost JSON object, tolerating
/// markdown fences and chatter around it.
fn extract_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}
