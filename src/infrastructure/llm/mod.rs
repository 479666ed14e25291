mod groq;

pub use groq::GroqGenerator;
