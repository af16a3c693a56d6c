//! Structured profiles produced by the extractors and consumed by scoring.
//!
//! Every list field deserializes leniently: a non-array value becomes an
//! empty list and entries of the wrong shape are skipped, so profiles coming
//! back from storage never make scoring fail.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const UNKNOWN_NAME: &str = "Unknown";
pub const DEFAULT_JOB_TITLE: &str = "Position";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default = "unknown_name", deserialize_with = "lenient_string_or_unknown")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    /// Not extracted; always empty from the parser.
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub personal_info: PersonalInfo,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub certifications: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub raw_text: String,
    /// Attached by an embedding provider after extraction.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_embedding")]
    pub embedding: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub skills: Vec<String>,
    /// Required years; 0 when the posting states none.
    #[serde(default, deserialize_with = "lenient_years")]
    pub experience: u32,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub education: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProfile {
    #[serde(default = "default_job_title", deserialize_with = "lenient_string_or_title")]
    pub title: String,
    #[serde(default = "default_company", deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub requirements: JobRequirements,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_embedding")]
    pub embedding: Option<Vec<f32>>,
}

/// Per-dimension percentages plus the composite, each 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub overall: u8,
    pub skill_match: u8,
    pub experience_match: u8,
    pub education_match: u8,
    pub keyword_match: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub score: ScoreBreakdown,
    pub improvements: Vec<String>,
    pub strengths: Vec<String>,
}

/// Review state a recruiter assigns to a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    #[default]
    New,
    Shortlisted,
    Hold,
    Rejected,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
        }
    }
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            certifications: Vec::new(),
            raw_text: String::new(),
            embedding: None,
        }
    }
}

impl Default for JobProfile {
    fn default() -> Self {
        Self {
            title: DEFAULT_JOB_TITLE.to_string(),
            company: default_company(),
            description: String::new(),
            requirements: JobRequirements::default(),
            keywords: Vec::new(),
            raw_text: String::new(),
            embedding: None,
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateStatus::New => write!(f, "new"),
            CandidateStatus::Shortlisted => write!(f, "shortlisted"),
            CandidateStatus::Hold => write!(f, "hold"),
            CandidateStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for CandidateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(CandidateStatus::New),
            "shortlisted" => Ok(CandidateStatus::Shortlisted),
            "hold" => Ok(CandidateStatus::Hold),
            "rejected" => Ok(CandidateStatus::Rejected),
            other => Err(format!(
                "Invalid status: {}. Supported: new, shortlisted, hold, rejected",
                other
            )),
        }
    }
}

fn unknown_name() -> String {
    UNKNOWN_NAME.to_string()
}

fn default_job_title() -> String {
    DEFAULT_JOB_TITLE.to_string()
}

fn default_company() -> String {
    crate::config::DEFAULT_COMPANY.to_string()
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_string_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = lenient_string(deserializer)?;
    Ok(if s.trim().is_empty() { unknown_name() } else { s })
}

fn lenient_string_or_title<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = lenient_string(deserializer)?;
    Ok(if s.trim().is_empty() { default_job_title() } else { s })
}

fn lenient_years<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_f64()
        .filter(|years| years.is_finite() && *years > 0.0)
        .map(|years| years.min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}

fn lenient_embedding<'de, D>(deserializer: D) -> Result<Option<Vec<f32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_f64().map(|x| x as f32))
            .collect::<Option<Vec<f32>>>(),
        _ => None,
    })
}
