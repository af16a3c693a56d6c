//! Job posting text to [`JobProfile`].

use crate::config::ExtractionConfig;
use crate::processing::profile::{JobProfile, JobRequirements, DEFAULT_JOB_TITLE};
use crate::processing::taxonomy::{find_skills, ROLE_NOUNS};
use crate::processing::text::{extract_keywords, normalize, preview};
use log::{debug, info};
use regex::Regex;
use std::sync::LazyLock;

static REQUIRED_YEARS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)[+\-]?\s*years?\s*(of)?\s*experience").expect("Invalid required years regex")
});

/// Degree tiers a posting may ask for, each tested on its own.
static DEGREE_TIERS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bph\.?d|doctorate\b", "PhD"),
        (r"\bmaster'?s?\b|\bmba\b|\bm\.?s\.?\b|\bm\.?tech\b", "Master's"),
        (r"\bbachelor'?s?\b|\bb\.?s\.?\b|\bb\.?a\.?\b|\bb\.?tech\b|\bb\.?e\.?\b", "Bachelor's"),
        (r"\bassociate'?s?\b|\bdiploma\b", "Associate's"),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(pattern).expect("Invalid degree tier regex"), label))
    .collect()
});

const MIN_TITLE_LEN: usize = 5;

pub struct JobParser {
    keyword_limit: usize,
    preview_chars: usize,
    default_company: String,
}

impl Default for JobParser {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl JobParser {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            keyword_limit: config.keyword_limit,
            preview_chars: config.description_preview_chars,
            default_company: config.default_company.clone(),
        }
    }

    /// Build a requirements profile from posting text. Never fails.
    pub fn parse(&self, text: &str) -> JobProfile {
        self.parse_with_company(text, None)
    }

    /// Like [`JobParser::parse`], with the company name supplied by the caller.
    pub fn parse_with_company(&self, text: &str, company: Option<&str>) -> JobProfile {
        let company = company
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.default_company)
            .to_string();

        if text.trim().is_empty() {
            debug!("Empty job description, returning default profile");
            return JobProfile {
                company,
                ..JobProfile::default()
            };
        }

        let text = normalize(text);

        let profile = JobProfile {
            title: extract_title(&text),
            company,
            description: preview(&text, self.preview_chars),
            requirements: JobRequirements {
                skills: find_skills(&text),
                experience: extract_required_years(&text),
                education: extract_education_requirements(&text),
                certifications: Vec::new(),
            },
            keywords: extract_keywords(&text, self.keyword_limit),
            raw_text: text,
            embedding: None,
        };

        info!(
            "Parsed job '{}': {} required skills, {} years, {} keywords",
            profile.title,
            profile.requirements.skills.len(),
            profile.requirements.experience,
            profile.keywords.len()
        );

        profile
    }
}

/// First line long enough to be a title that names a role.
pub fn extract_title(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .find(|line| {
            line.chars().count() > MIN_TITLE_LEN && ROLE_NOUNS.iter().any(|noun| line.contains(noun))
        })
        .unwrap_or(DEFAULT_JOB_TITLE)
        .to_string()
}

/// Years from the first "N years of experience" phrase, or 0.
pub fn extract_required_years(text: &str) -> u32 {
    REQUIRED_YEARS_RE
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

pub fn extract_education_requirements(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    DEGREE_TIERS
        .iter()
        .filter(|(re, _)| re.is_match(&lowered))
        .map(|(_, label)| label.to_string())
        .collect()
}

pub fn parse_job_description(text: &str) -> JobProfile {
    JobParser::default().parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTING: &str = "About us
Senior Backend Engineer
We need 5+ years of experience with Rust and PostgreSQL on Kubernetes.
A Bachelor's degree in computer science is required; an MBA is a plus.";

    #[test]
    fn test_parse_posting() {
        let job = parse_job_description(POSTING);

        assert_eq!(job.title, "Senior Backend Engineer");
        assert_eq!(job.company, "Company Name");
        assert_eq!(job.requirements.experience, 5);
        assert_eq!(job.requirements.education, vec!["Master's", "Bachelor's"]);
        assert!(job.requirements.certifications.is_empty());
        for skill in ["Rust", "PostgreSQL", "Kubernetes"] {
            assert!(job.requirements.skills.contains(&skill.to_string()), "missing {}", skill);
        }
        assert!(job.keywords.contains(&"backend".to_string()));
        assert!(!job.keywords.contains(&"experience".to_string()));
        assert_eq!(job.description, POSTING);
        assert_eq!(job.raw_text, POSTING);
    }

    #[test]
    fn test_title_defaults_to_position() {
        assert_eq!(extract_title("We are hiring\nGreat team"), "Position");
        // Role nouns are matched case-sensitively.
        assert_eq!(extract_title("senior engineer wanted"), "Position");
        // Too short to be a title.
        assert_eq!(extract_title("Lead\nData Analyst II"), "Data Analyst II");
    }

    #[test]
    fn test_required_years() {
        assert_eq!(extract_required_years("3-year experience preferred"), 3);
        assert_eq!(extract_required_years("10 years experience"), 10);
        assert_eq!(extract_required_years("experience matters"), 0);
    }

    #[test]
    fn test_education_tiers_are_independent() {
        let tiers = extract_education_requirements("PhD or Master's welcome; Diploma holders too");
        assert_eq!(tiers, vec!["PhD", "Master's", "Associate's"]);
        assert!(extract_education_requirements("no degree needed").is_empty());
    }

    #[test]
    fn test_description_is_truncated_preview() {
        let config = ExtractionConfig {
            description_preview_chars: 10,
            ..ExtractionConfig::default()
        };
        let job = JobParser::new(&config).parse("Platform Engineer with Go");
        assert_eq!(job.description, "Platform E");
        assert_eq!(job.raw_text, "Platform Engineer with Go");
    }

    #[test]
    fn test_company_override() {
        let parser = JobParser::default();
        assert_eq!(parser.parse_with_company("Data Engineer", Some("Globex")).company, "Globex");
        assert_eq!(parser.parse_with_company("Data Engineer", Some("  ")).company, "Company Name");
        assert_eq!(parser.parse_with_company("", Some("Globex")).company, "Globex");
    }

    #[test]
    fn test_empty_posting() {
        let job = parse_job_description("");
        assert_eq!(job, JobProfile::default());
        assert_eq!(job.title, "Position");
        assert_eq!(job.requirements.experience, 0);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = JobParser::default();
        assert_eq!(parser.parse(POSTING), parser.parse(POSTING));
    }
}
