mod openai;

pub use openai::TextEmbedding;
