//! Embedding provider seam.
//!
//! Vectors come from an external model service. This crate only defines the
//! interface, a provider that always declines, and loading of vectors that
//! were computed ahead of time and saved as JSON.

use crate::error::{MatcherError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Which side of the comparison a text is embedded for. Asymmetric models
/// prefix queries and passages differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingRole {
    /// Job postings.
    Query,
    /// Résumés.
    Passage,
}

impl fmt::Display for EmbeddingRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingRole::Query => write!(f, "query"),
            EmbeddingRole::Passage => write!(f, "passage"),
        }
    }
}

pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, e.g. `"multilingual-e5-large"`.
    fn model_name(&self) -> &str;

    fn embed(&self, text: &str, role: EmbeddingRole) -> Result<Vec<f32>>;
}

/// Used when no embedding service is configured; every request fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledProvider;

impl EmbeddingProvider for DisabledProvider {
    fn model_name(&self) -> &str {
        "disabled"
    }

    fn embed(&self, _text: &str, _role: EmbeddingRole) -> Result<Vec<f32>> {
        Err(MatcherError::Embedding(
            "No embedding provider configured".to_string(),
        ))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EmbeddingFile {
    Bare(Vec<f32>),
    Wrapped { embedding: Vec<f32> },
}

/// Parse a vector saved as `[0.1, ...]` or `{"embedding": [0.1, ...]}`.
pub fn parse_embedding(json: &str) -> Result<Vec<f32>> {
    let vector = match serde_json::from_str::<EmbeddingFile>(json) {
        Ok(EmbeddingFile::Bare(v)) | Ok(EmbeddingFile::Wrapped { embedding: v }) => v,
        Err(e) => {
            return Err(MatcherError::InvalidInput(format!(
                "Expected a JSON array of numbers or an object with an \"embedding\" array: {}",
                e
            )))
        }
    };

    if vector.is_empty() {
        return Err(MatcherError::InvalidInput("Embedding vector is empty".to_string()));
    }
    if vector.iter().any(|x| !x.is_finite()) {
        return Err(MatcherError::InvalidInput(
            "Embedding vector contains non-finite values".to_string(),
        ));
    }

    Ok(vector)
}

pub async fn load_embedding_file(path: &Path) -> Result<Vec<f32>> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_embedding(&content)
}

/// The text actually sent to a provider: at most `max_chars` characters.
pub fn embedding_input(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_bare_and_wrapped() {
        assert_eq!(parse_embedding("[0.5, -1, 2.25]").unwrap(), vec![0.5, -1.0, 2.25]);
        assert_eq!(
            parse_embedding(r#"{"embedding": [1.0, 0.0], "model": "e5"}"#).unwrap(),
            vec![1.0, 0.0]
        );
    }

    #[test]
    fn test_parse_rejects_bad_vectors() {
        assert!(matches!(parse_embedding("[]"), Err(MatcherError::InvalidInput(_))));
        assert!(matches!(parse_embedding(r#"{"vector": [1]}"#), Err(MatcherError::InvalidInput(_))));
        assert!(matches!(parse_embedding(r#"["a", "b"]"#), Err(MatcherError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_load_embedding_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[0.25, 0.75]").unwrap();

        let vector = load_embedding_file(file.path()).await.unwrap();
        assert_eq!(vector, vec![0.25, 0.75]);
    }

    #[test]
    fn test_disabled_provider_fails() {
        let provider = DisabledProvider;
        assert_eq!(provider.model_name(), "disabled");
        assert!(matches!(
            provider.embed("text", EmbeddingRole::Query),
            Err(MatcherError::Embedding(_))
        ));
    }

    #[test]
    fn test_embedding_input_truncates_by_characters() {
        assert_eq!(embedding_input("héllo wörld", 5), "héllo");
        assert_eq!(embedding_input("short", 100), "short");
        assert_eq!(EmbeddingRole::Passage.to_string(), "passage");
    }
}
