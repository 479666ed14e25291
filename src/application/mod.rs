//! Application layer - use cases and orchestration.
//!
//! Services here depend on domain ports (traits) rather than concrete
//! providers, so every external surface (embedder, generator, store,
//! tools) can be replaced with a test double.

pub mod services;

pub use services::{
    AgentLoop, AgentRun, AnswerPipeline, AnswerResult, EvaluationHarness, Retriever,
};
