//! Retrieval-augmented generation and tool-using agent demos.
//!
//! The crate wires an LLM provider, an embedding service and a vector
//! store behind domain ports, and exposes four orchestration services:
//! a [`Retriever`](application::Retriever), an
//! [`AnswerPipeline`](application::AnswerPipeline), a ReAct-style
//! [`AgentLoop`](application::AgentLoop) and an
//! [`EvaluationHarness`](application::EvaluationHarness). The demo
//! binaries under `src/bin/` assemble these from configuration and run
//! top to bottom.

pub mod application;
pub mod domain;
pub mod infrastructure;
