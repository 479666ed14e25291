mod agent;
mod answer;
mod evaluation;
mod retriever;

pub use agent::{AgentLoop, AgentRun};
pub use answer::{AnswerPipeline, AnswerResult};
pub use evaluation::EvaluationHarness;
pub use retriever::Retriever;
