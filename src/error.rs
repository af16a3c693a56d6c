//! Error handling for the resume matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File format not supported: {0}. Paste the document text manually instead.")]
    UnsupportedFormat(String),

    #[error("Text extraction failed: {0}. Paste the document text manually instead.")]
    ExtractionFailure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding dimensions don't match: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MatcherError>;

impl MatcherError {
    /// True for failures the user can work around by supplying the text directly.
    pub fn is_extraction_error(&self) -> bool {
        matches!(
            self,
            MatcherError::UnsupportedFormat(_) | MatcherError::ExtractionFailure(_)
        )
    }
}
