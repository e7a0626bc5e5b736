use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corpus is empty: no vocabulary can be built")]
    EmptyCorpus,

    #[error("Vocabulary is empty: no corpus question produced a usable term")]
    EmptyVocabulary,

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Cannot build an index from zero vectors")]
    EmptyIndex,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read corpus {}: {source}", path.display())]
    CorpusIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed corpus {}: {source}", path.display())]
    CorpusFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

impl Error {
    /// Construction-time failures that must keep the service from starting.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::InvalidArgument(_) | Error::GenerationFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
