//! Domain types shared by the vectorizer, the index and the resolver.

use serde::{Deserialize, Serialize};

/// One known question and the answer returned for it.
///
/// The position of an entry inside the loaded corpus is its identity: row `i`
/// of the vector matrix and position `i` in the index both refer to entry `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub question: String,
    pub answer: String,
}

impl CorpusEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into() }
    }
}

/// A single index hit. `distance` is squared Euclidean, lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

/// How much trust the caller should put in a resolved answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    /// Nearest neighbour of a query with at least one known term.
    Match,
    /// The query shares no term with the vocabulary; the answer is a best-effort pick.
    NoRecognizedTerms,
    /// The nearest neighbour lies further than the configured maximum distance.
    BeyondThreshold,
}

/// The outcome of resolving one query against the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub position: usize,
    pub question: String,
    pub answer: String,
    pub distance: f32,
    pub confidence: Confidence,
}

impl Resolution {
    pub fn is_confident(&self) -> bool {
        self.confidence == Confidence::Match
    }
}

/// Generated text together with the retrieval it was grounded on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub resolution: Resolution,
}
