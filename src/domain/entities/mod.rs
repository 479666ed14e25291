mod conversation;
mod document;
mod embedding;
mod qa;

pub use conversation::{Conversation, Message, MessageRole};
pub use document::{Document, SearchResult};
pub use embedding::Embedding;
pub use qa::{GeneratedExample, GradedPrediction, QAExample, Verdict};
