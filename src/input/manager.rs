//! Input manager for reading documents from disk

use crate::error::{MatcherError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor;
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(path) {
                debug!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(MatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path);
        if file_type == FileType::Unknown {
            return Err(MatcherError::UnsupportedFormat(format!(
                "{} is not a PDF, DOCX, TXT or Markdown file",
                path.display()
            )));
        }

        info!("Extracting {:?} text from: {}", file_type, path.display());
        let bytes = fs::read(path).await?;
        let text = text_extractor::extract_text(&bytes, file_type)?;

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// File name component of `path`, used as a candidate label.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_extract_and_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Jane Doe\nRust").unwrap();

        let mut manager = InputManager::new();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Jane Doe\nRust");
        assert_eq!(manager.cache_size(), 1);

        std::fs::write(&path, "changed").unwrap();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Jane Doe\nRust");

        manager.clear_cache();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "changed");
    }

    #[tokio::test]
    async fn test_cache_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.md");
        std::fs::write(&path, "# Data Engineer").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Data Engineer");
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_missing_and_unsupported_files() {
        let dir = TempDir::new().unwrap();
        let mut manager = InputManager::new();

        let missing = dir.path().join("nope.pdf");
        assert!(matches!(
            manager.extract_text(&missing).await,
            Err(MatcherError::InvalidInput(_))
        ));

        let legacy = dir.path().join("resume.doc");
        std::fs::write(&legacy, b"\xD0\xCF\x11\xE0").unwrap();
        let err = manager.extract_text(&legacy).await.unwrap_err();
        assert!(matches!(err, MatcherError::UnsupportedFormat(_)));
        assert!(err.is_extraction_error());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/tmp/cv/Jane Doe.pdf")), "Jane Doe.pdf");
    }
}
