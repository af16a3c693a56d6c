//! Configuration management for the resume matcher

use crate::error::{MatcherError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SKILL_WEIGHT: f64 = 0.4;
pub const DEFAULT_EXPERIENCE_WEIGHT: f64 = 0.3;
pub const DEFAULT_EDUCATION_WEIGHT: f64 = 0.15;
pub const DEFAULT_KEYWORD_WEIGHT: f64 = 0.15;

pub const DEFAULT_KEYWORD_LIMIT: usize = 40;
pub const DEFAULT_DESCRIPTION_PREVIEW_CHARS: usize = 500;
pub const DEFAULT_COMPANY: &str = "Company Name";
pub const DEFAULT_MAX_EMBEDDING_CHARS: usize = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub semantic: SemanticConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub thresholds: ImprovementThresholds,
    pub max_missing_skills: usize,
    /// Years credited per experience entry when nothing better is found.
    pub years_per_entry: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub skill: f64,
    pub experience: f64,
    pub education: f64,
    pub keyword: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImprovementThresholds {
    pub skill: u8,
    pub experience: u8,
    pub education: u8,
    pub keyword: u8,
    pub strength: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub keyword_limit: usize,
    pub description_preview_chars: usize,
    pub default_company: String,
    pub max_embedding_chars: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    pub enabled: bool,
    pub policy: OverallPolicy,
}

/// How a semantic score is folded into the heuristic overall score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum OverallPolicy {
    #[default]
    Replace,
    Blend { semantic_weight: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            thresholds: ImprovementThresholds::default(),
            max_missing_skills: 5,
            years_per_entry: 1.5,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            skill: DEFAULT_SKILL_WEIGHT,
            experience: DEFAULT_EXPERIENCE_WEIGHT,
            education: DEFAULT_EDUCATION_WEIGHT,
            keyword: DEFAULT_KEYWORD_WEIGHT,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.skill + self.experience + self.education + self.keyword
    }
}

impl Default for ImprovementThresholds {
    fn default() -> Self {
        Self {
            skill: 80,
            experience: 80,
            education: 80,
            keyword: 70,
            strength: 80,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            description_preview_chars: DEFAULT_DESCRIPTION_PREVIEW_CHARS,
            default_company: DEFAULT_COMPANY.to_string(),
            max_embedding_chars: DEFAULT_MAX_EMBEDDING_CHARS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| MatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-matcher")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.scoring.weights;
        if [w.skill, w.experience, w.education, w.keyword].iter().any(|v| *v < 0.0 || !v.is_finite()) {
            return Err(MatcherError::Configuration(
                "Score weights must be finite and non-negative".to_string(),
            ));
        }
        if (w.total() - 1.0).abs() > 0.001 {
            return Err(MatcherError::Configuration(format!(
                "Score weights must sum to 1.0 (got {:.3})",
                w.total()
            )));
        }

        let t = &self.scoring.thresholds;
        if [t.skill, t.experience, t.education, t.keyword, t.strength].iter().any(|v| *v > 100) {
            return Err(MatcherError::Configuration(
                "Thresholds are percentages and cannot exceed 100".to_string(),
            ));
        }

        if self.scoring.max_missing_skills == 0 {
            return Err(MatcherError::Configuration(
                "max_missing_skills must be at least 1".to_string(),
            ));
        }

        let per_entry = self.scoring.years_per_entry;
        if !per_entry.is_finite() || per_entry < 0.0 {
            return Err(MatcherError::Configuration(
                "years_per_entry must be finite and non-negative".to_string(),
            ));
        }

        if self.extraction.keyword_limit == 0 {
            return Err(MatcherError::Configuration(
                "keyword_limit must be at least 1".to_string(),
            ));
        }

        if let OverallPolicy::Blend { semantic_weight } = self.semantic.policy {
            if !(0.0..=1.0).contains(&semantic_weight) {
                return Err(MatcherError::Configuration(
                    "Blend semantic_weight must be between 0.0 and 1.0".to_string(),
                ));
            }
        }

        Ok(())
    }
}
