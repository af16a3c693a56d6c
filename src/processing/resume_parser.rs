//! Résumé text to [`CandidateProfile`].

use crate::processing::name::{NameContext, NameExtractor};
use crate::processing::profile::{CandidateProfile, EducationEntry, ExperienceEntry, PersonalInfo};
use crate::processing::sections::{self, SectionRules};
use crate::processing::taxonomy::find_skills;
use crate::processing::text::{find_email, find_phone, normalize};
use log::{debug, info};
use regex::Regex;
use std::sync::LazyLock;

static EXPERIENCE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(experience|employment|work\s*history|professional\s*experience)")
        .expect("Invalid experience header regex")
});
static EXPERIENCE_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(education|skills|certifications|projects|awards|references|summary|objective)")
        .expect("Invalid experience terminator regex")
});
static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(20\d{2}|19\d{2})\s*[-–—to]+\s*(20\d{2}|19\d{2}|present|current|now)\b")
        .expect("Invalid date range regex")
});

static EDUCATION_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(education|academic|qualification|degree)").expect("Invalid education header regex")
});
static EDUCATION_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(experience|skills|certifications|projects|awards|references|work)")
        .expect("Invalid education terminator regex")
});
static DEGREE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(bachelor|master|phd|doctorate|associate|diploma|b\.?s\.?|m\.?s\.?|b\.?a\.?|m\.?a\.?|b\.?tech|m\.?tech|mba|b\.?e\.?)\b",
    )
    .expect("Invalid degree regex")
});
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20\d{2}|19\d{2})\b").expect("Invalid year regex"));

static CERTIFICATION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(AWS[ \t]+Certified[ \t]+[\w \t-]+)",
        r"(?i)\b(Azure[ \t]+(?:Administrator|Developer|Solutions[ \t]+Architect)[\w \t-]*)",
        r"(?i)\b(Google[ \t]+Cloud[ \t]+(?:Professional|Associate)[\w \t-]*)",
        r"(?i)\b(PMP|CISSP|CCNA|CCNP|CKAD|CKA|CompTIA[ \t]+\w+)\b",
        r"(?i)\b(Scrum[ \t]+Master|Product[ \t]+Owner)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid certification regex"))
    .collect()
});

const MIN_COMPANY_LEN: usize = 3;
const MAX_COMPANY_LEN: usize = 80;

struct ExperienceRules;

impl SectionRules for ExperienceRules {
    type Entry = ExperienceEntry;

    fn section_header(&self) -> &Regex {
        &EXPERIENCE_HEADER_RE
    }

    fn other_header(&self) -> &Regex {
        &EXPERIENCE_END_RE
    }

    fn entry_start(&self, line: &str) -> Option<ExperienceEntry> {
        let range = DATE_RANGE_RE.find(line)?;
        let title = format!("{}{}", &line[..range.start()], &line[range.end()..]);

        Some(ExperienceEntry {
            title: title.trim().to_string(),
            company: String::new(),
            duration: range.as_str().to_string(),
            description: String::new(),
        })
    }

    /// The first short line after the dated line names the company; the rest
    /// is description.
    fn extend(&self, entry: &mut ExperienceEntry, line: &str) {
        let len = line.chars().count();
        if entry.company.is_empty() && (MIN_COMPANY_LEN..MAX_COMPANY_LEN).contains(&len) {
            entry.company = line.to_string();
        } else if entry.description.is_empty() {
            entry.description = line.to_string();
        } else {
            entry.description.push(' ');
            entry.description.push_str(line);
        }
    }
}

struct EducationRules;

impl SectionRules for EducationRules {
    type Entry = EducationEntry;

    fn section_header(&self) -> &Regex {
        &EDUCATION_HEADER_RE
    }

    fn other_header(&self) -> &Regex {
        &EDUCATION_END_RE
    }

    fn entry_start(&self, line: &str) -> Option<EducationEntry> {
        if !DEGREE_RE.is_match(line) {
            return None;
        }

        Some(EducationEntry {
            degree: line.to_string(),
            institution: String::new(),
            year: YEAR_RE
                .find(line)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    fn extend(&self, _entry: &mut EducationEntry, _line: &str) {}
}

pub fn extract_experience(text: &str) -> Vec<ExperienceEntry> {
    sections::scan(&ExperienceRules, text)
}

pub fn extract_education(text: &str) -> Vec<EducationEntry> {
    sections::scan(&EducationRules, text)
}

/// Certification names in pattern order, deduplicated on first sighting.
pub fn extract_certifications(text: &str) -> Vec<String> {
    let mut certifications: Vec<String> = Vec::new();

    for re in CERTIFICATION_RES.iter() {
        for caps in re.captures_iter(text) {
            let cert = caps[1].trim().to_string();
            if !cert.is_empty() && !certifications.contains(&cert) {
                certifications.push(cert);
            }
        }
    }

    certifications
}

pub struct ResumeParser {
    names: NameExtractor,
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResumeParser {
    pub fn new() -> Self {
        Self {
            names: NameExtractor::default(),
        }
    }

    pub fn with_name_extractor(names: NameExtractor) -> Self {
        Self { names }
    }

    /// Build a profile from plain résumé text. `file_name` only feeds the
    /// name fallbacks. Never fails: blank input gives the empty profile.
    pub fn parse(&self, text: &str, file_name: Option<&str>) -> CandidateProfile {
        if text.trim().is_empty() {
            debug!("Empty resume text, returning default profile");
            return CandidateProfile::default();
        }

        let text = normalize(text);
        let email = find_email(&text);
        let phone = find_phone(&text);
        let name = self.names.extract(&NameContext::new(&text, &email, file_name));

        let profile = CandidateProfile {
            personal_info: PersonalInfo {
                name,
                email,
                phone,
                location: String::new(),
            },
            experience: extract_experience(&text),
            education: extract_education(&text),
            skills: find_skills(&text),
            certifications: extract_certifications(&text),
            embedding: None,
            raw_text: text,
        };

        info!(
            "Parsed resume for '{}': {} skills, {} experience entries, {} education entries",
            profile.personal_info.name,
            profile.skills.len(),
            profile.experience.len(),
            profile.education.len()
        );

        profile
    }
}

pub fn parse_resume(text: &str, file_name: Option<&str>) -> CandidateProfile {
    ResumeParser::new().parse(text, file_name)
}
