use serde::{Deserialize, Serialize};

/// A question and its reference answer, either authored by hand or
/// synthesized by the exam-writer model from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QAExample {
    pub query: String,
    pub answer: String,
}

/// Decoded exam-writer output. Some model replies wrap the pair in a
/// `qa_pairs` object instead of returning it flat; both shapes decode
/// here and normalize through [`GeneratedExample::into_example`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GeneratedExample {
    Wrapped { qa_pairs: QAExample },
    Flat(QAExample),
}

impl GeneratedExample {
    pub fn into_example(self) -> QAExample {
        match self {
            Self::Wrapped { qa_pairs } => qa_pairs,
            Self::Flat(example) => example,
        }
    }
}

/// Judge verdict over one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// The judge's reply named neither category.
    Ungraded,
}

impl Verdict {
    /// Extracts a verdict from free-form judge output. `INCORRECT` is
    /// checked first since `CORRECT` is a substring of it.
    pub fn parse(raw: &str) -> Self {
        let upper = raw.to_uppercase();
        if upper.contains("INCORRECT") {
            Self::Incorrect
        } else if upper.contains("CORRECT") {
            Self::Correct
        } else {
            Self::Ungraded
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "CORRECT",
            Self::Incorrect => "INCORRECT",
            Self::Ungraded => "UNGRADED",
        }
    }
}

/// One graded exam row: the example, what the pipeline answered, and
/// the judge's verdict with its raw reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedPrediction {
    pub example: QAExample,
    pub predicted: String,
    pub verdict: Verdict,
    pub judgement: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_flat_example() {
        let decoded: GeneratedExample =
            serde_json::from_str(r#"{"query": "¿Cuánto cuesta?", "answer": "Nada"}"#).unwrap();
        let example = decoded.into_example();
        assert_eq!(example.query, "¿Cuánto cuesta?");
        assert_eq!(example.answer, "Nada");
    }

    #[test]
    fn unwraps_qa_pairs_envelope() {
        let decoded: GeneratedExample = serde_json::from_str(
            r#"{"qa_pairs": {"query": "¿Edad mínima?", "answer": "13 años"}}"#,
        )
        .unwrap();
        let example = decoded.into_example();
        assert_eq!(example.query, "¿Edad mínima?");
    }

    #[test]
    fn verdict_parsing_prefers_incorrect() {
        assert_eq!(Verdict::parse("GRADE: INCORRECT"), Verdict::Incorrect);
        assert_eq!(Verdict::parse("correct"), Verdict::Correct);
        assert_eq!(Verdict::parse("no lo sé"), Verdict::Ungraded);
    }
}
