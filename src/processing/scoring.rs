//! Heuristic candidate/job fit scoring.
//!
//! Four independent percentages (skills, experience, education, keywords)
//! are combined with configurable weights into the overall score. Every
//! function here is total: missing inputs map to the documented neutral
//! value for that dimension instead of an error.

use crate::config::{ImprovementThresholds, ScoreWeights, ScoringConfig};
use crate::processing::profile::{CandidateProfile, JobProfile, ScoreBreakdown, ScoringResult};
use chrono::Datelike;
use log::debug;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static STATED_YEARS_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(\d+)\+?\s*years?\s*(?:of\s+)?(?:experience|exp)",
        r"(?i)experience\s*(?:of\s+)?(\d+)\+?\s*years?",
        r"(?i)(\d+)\+?\s*years?\s*(?:in|working|professional)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid stated years regex"))
    .collect()
});
static YEAR_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)20\d{2}\s*[-–—to]+\s*(20\d{2}|present|current)").expect("Invalid year span regex")
});
static SPAN_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20\d{2}").expect("Invalid span year regex"));
static OPEN_ENDED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)present|current").expect("Invalid open-ended regex"));

/// Synonyms per degree tier, checked as lowercase substrings.
const DEGREE_SYNONYMS: &[&[&str]] = &[
    &["ph.d", "phd", "doctorate", "doctor of philosophy"],
    &["master", "msc", "m.s.", "mba", "m.b.a", "mtech", "m.tech", "ma ", "m.a."],
    &["bachelor", "bsc", "b.s.", "btech", "b.tech", "ba ", "b.a.", "be ", "b.e.", "undergraduate"],
    &["associate", "diploma"],
];

pub const SKILL_GAP_ADVICE: &str = "Missing key skills";
pub const EXPERIENCE_ADVICE: &str = "Consider highlighting more relevant experience for this role";
pub const EDUCATION_ADVICE: &str = "Education requirements may not be fully met";
pub const KEYWORD_ADVICE: &str = "Resume could benefit from more role-specific keywords";

pub const SKILL_STRENGTH: &str = "Strong skill match with job requirements";
pub const EXPERIENCE_STRENGTH: &str = "Relevant experience level for the position";
pub const KEYWORD_STRENGTH: &str = "Good keyword optimization";
pub const EDUCATION_STRENGTH: &str = "Education requirements met";

fn percent(numerator: f64, denominator: f64) -> u8 {
    if denominator <= 0.0 {
        return 0;
    }
    (100.0 * numerator / denominator).round().clamp(0.0, 100.0) as u8
}

fn normalized_skills(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn skill_matches(required: &str, candidate: &[String]) -> bool {
    let required = required.trim().to_lowercase();
    if required.is_empty() {
        return false;
    }
    candidate
        .iter()
        .any(|cs| *cs == required || cs.contains(&required) || required.contains(cs.as_str()))
}

/// Share of required skills present, by equality or containment either way.
pub fn skill_match(candidate_skills: &[String], required_skills: &[String]) -> u8 {
    let candidate = normalized_skills(candidate_skills);
    if required_skills.is_empty() || candidate.is_empty() {
        return 0;
    }

    let matched = required_skills
        .iter()
        .filter(|req| skill_matches(req, &candidate))
        .count();

    percent(matched as f64, required_skills.len() as f64)
}

/// Required skills the candidate lacks, in job order.
pub fn missing_skills(candidate_skills: &[String], required_skills: &[String]) -> Vec<String> {
    let candidate = normalized_skills(candidate_skills);
    required_skills
        .iter()
        .filter(|req| !req.trim().is_empty())
        .filter(|req| !skill_matches(req, &candidate))
        .cloned()
        .collect()
}

/// Largest year count stated anywhere in the text, e.g. "7+ years of experience".
fn stated_years(text: &str) -> Option<u32> {
    STATED_YEARS_RES
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max()
}

/// Sum of the spans of "2018 - 2022" / "2021 - present" ranges.
fn summed_year_spans(text: &str, current_year: i32) -> u32 {
    YEAR_SPAN_RE
        .find_iter(text)
        .map(|m| {
            let range = m.as_str();
            let years: Vec<i32> = SPAN_YEAR_RE
                .find_iter(range)
                .filter_map(|y| y.as_str().parse().ok())
                .collect();

            let span = match years.as_slice() {
                [start, end, ..] => end - start,
                [start] if OPEN_ENDED_RE.is_match(range) => current_year - start,
                _ => 0,
            };
            span.max(0) as u32
        })
        .sum()
}

pub struct ScoringEngine {
    weights: ScoreWeights,
    thresholds: ImprovementThresholds,
    max_missing_skills: usize,
    years_per_entry: f64,
    current_year: Option<i32>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl ScoringEngine {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            weights: config.weights,
            thresholds: config.thresholds,
            max_missing_skills: config.max_missing_skills,
            years_per_entry: config.years_per_entry,
            current_year: None,
        }
    }

    /// Pin the year that open-ended ranges ("2021 - present") resolve to.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    fn current_year(&self) -> i32 {
        self.current_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// Estimated years of experience: stated years first, then date ranges,
    /// then a per-entry allowance.
    pub fn estimate_years(&self, candidate: &CandidateProfile) -> u32 {
        let text = &candidate.raw_text;
        if text.is_empty() {
            return 0;
        }

        if let Some(years) = stated_years(text) {
            return years;
        }

        let spans = summed_year_spans(text, self.current_year());
        if spans > 0 {
            return spans;
        }

        (candidate.experience.len() as f64 * self.years_per_entry).round() as u32
    }

    pub fn experience_match(&self, candidate: &CandidateProfile, required_years: u32) -> u8 {
        if required_years == 0 {
            return 100;
        }

        let estimate = self.estimate_years(candidate);
        debug!("Estimated {} years against {} required", estimate, required_years);

        if estimate >= required_years {
            100
        } else {
            percent(estimate as f64, required_years as f64)
        }
    }

    pub fn education_match(&self, raw_text: &str, required: &[String]) -> u8 {
        if required.is_empty() {
            return 100;
        }

        let text = raw_text.to_lowercase();
        let matched = required
            .iter()
            .filter(|req| {
                let req = req.to_lowercase();
                text.contains(&req)
                    || DEGREE_SYNONYMS.iter().any(|synonyms| {
                        synonyms.iter().any(|s| req.contains(s)) && synonyms.iter().any(|s| text.contains(s))
                    })
            })
            .count();

        percent(matched as f64, required.len() as f64)
    }

    pub fn keyword_match(&self, raw_text: &str, keywords: &[String]) -> u8 {
        if keywords.is_empty() || raw_text.is_empty() {
            return 0;
        }

        let text = raw_text.to_lowercase();
        let matched: HashSet<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty() && text.contains(k.as_str()))
            .collect();

        percent(matched.len() as f64, keywords.len() as f64)
    }

    /// Weighted composite of the four dimensions.
    pub fn overall(&self, breakdown: &ScoreBreakdown) -> u8 {
        let w = &self.weights;
        let total = breakdown.skill_match as f64 * w.skill
            + breakdown.experience_match as f64 * w.experience
            + breakdown.education_match as f64 * w.education
            + breakdown.keyword_match as f64 * w.keyword;
        total.round().clamp(0.0, 100.0) as u8
    }

    pub fn calculate_score(&self, candidate: &CandidateProfile, job: &JobProfile) -> ScoringResult {
        let requirements = &job.requirements;

        let mut score = ScoreBreakdown {
            overall: 0,
            skill_match: skill_match(&candidate.skills, &requirements.skills),
            experience_match: self.experience_match(candidate, requirements.experience),
            education_match: self.education_match(&candidate.raw_text, &requirements.education),
            keyword_match: self.keyword_match(&candidate.raw_text, &job.keywords),
        };
        score.overall = self.overall(&score);

        debug!(
            "Scored '{}' against '{}': overall {}",
            candidate.personal_info.name, job.title, score.overall
        );

        ScoringResult {
            improvements: self.improvements(&score, candidate, job),
            strengths: self.strengths(&score),
            score,
        }
    }

    fn improvements(&self, score: &ScoreBreakdown, candidate: &CandidateProfile, job: &JobProfile) -> Vec<String> {
        let t = &self.thresholds;
        let required_skills = &job.requirements.skills;
        let mut improvements = Vec::new();

        if score.skill_match < t.skill && !required_skills.is_empty() {
            let missing = missing_skills(&candidate.skills, required_skills);
            if !missing.is_empty() {
                let shown: Vec<&str> = missing
                    .iter()
                    .take(self.max_missing_skills)
                    .map(String::as_str)
                    .collect();
                if !shown.is_empty() {
                    improvements.push(format!("{}: {}", SKILL_GAP_ADVICE, shown.join(", ")));
                }
            }
        }

        if score.experience_match < t.experience {
            improvements.push(EXPERIENCE_ADVICE.to_string());
        }

        if score.education_match < t.education && !job.requirements.education.is_empty() {
            improvements.push(EDUCATION_ADVICE.to_string());
        }

        if score.keyword_match < t.keyword {
            improvements.push(KEYWORD_ADVICE.to_string());
        }

        improvements
    }

    fn strengths(&self, score: &ScoreBreakdown) -> Vec<String> {
        let bar = self.thresholds.strength;
        [
            (score.skill_match, SKILL_STRENGTH),
            (score.experience_match, EXPERIENCE_STRENGTH),
            (score.keyword_match, KEYWORD_STRENGTH),
            (score.education_match, EDUCATION_STRENGTH),
        ]
        .into_iter()
        .filter(|(value, _)| *value >= bar)
        .map(|(_, message)| message.to_string())
        .collect()
    }
}

pub fn calculate_score(candidate: &CandidateProfile, job: &JobProfile) -> ScoringResult {
    ScoringEngine::default().calculate_score(candidate, job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::profile::{ExperienceEntry, JobRequirements};

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn candidate(text: &str, candidate_skills: &[&str]) -> CandidateProfile {
        CandidateProfile {
            skills: skills(candidate_skills),
            raw_text: text.to_string(),
            ..CandidateProfile::default()
        }
    }

    fn job(required: &[&str], years: u32, education: &[&str], keywords: &[&str]) -> JobProfile {
        JobProfile {
            requirements: JobRequirements {
                skills: skills(required),
                experience: years,
                education: skills(education),
                certifications: Vec::new(),
            },
            keywords: skills(keywords),
            ..JobProfile::default()
        }
    }

    #[test]
    fn test_skill_match_containment_both_ways() {
        let have = skills(&["React Native", "sql"]);
        assert_eq!(skill_match(&have, &skills(&["React", "PostgreSQL", "Kafka"])), 67);
        assert_eq!(skill_match(&have, &skills(&["react native"])), 100);
    }

    #[test]
    fn test_skill_match_empty_sides_score_zero() {
        assert_eq!(skill_match(&skills(&["Rust"]), &[]), 0);
        assert_eq!(skill_match(&[], &skills(&["Rust"])), 0);
        assert_eq!(skill_match(&skills(&["  "]), &skills(&["Rust"])), 0);
    }

    #[test]
    fn test_blank_required_skill_counts_but_never_matches() {
        assert_eq!(skill_match(&skills(&["Rust"]), &skills(&["Rust", " "])), 50);
        assert!(missing_skills(&skills(&["Rust"]), &skills(&["Rust", " "])).is_empty());
    }

    #[test]
    fn test_experience_from_stated_years() {
        let engine = ScoringEngine::default();
        let c = candidate("I have 3 years of experience and 6 years in consulting", &[]);
        assert_eq!(engine.estimate_years(&c), 6);
        assert_eq!(engine.experience_match(&c, 5), 100);
        assert_eq!(engine.experience_match(&c, 12), 50);
        assert_eq!(engine.experience_match(&c, 0), 100);
    }

    #[test]
    fn test_experience_from_date_ranges() {
        let engine = ScoringEngine::default().with_current_year(2024);
        let c = candidate("Acme 2018 - 2022\nGlobex 2022 - present", &[]);
        assert_eq!(engine.estimate_years(&c), 6);
        assert_eq!(engine.experience_match(&c, 5), 100);
    }

    #[test]
    fn test_reversed_range_does_not_subtract() {
        let engine = ScoringEngine::default().with_current_year(2024);
        let c = candidate("2022 - 2018\n2020 - 2023", &[]);
        assert_eq!(engine.estimate_years(&c), 3);
    }

    #[test]
    fn test_experience_from_entry_count() {
        let engine = ScoringEngine::default();
        let mut c = candidate("Worked at several places", &[]);
        c.experience = vec![ExperienceEntry::default(); 3];
        assert_eq!(engine.estimate_years(&c), 5);
        assert_eq!(engine.experience_match(&c, 10), 50);

        c.raw_text.clear();
        assert_eq!(engine.experience_match(&c, 10), 0);
    }

    #[test]
    fn test_education_match() {
        let engine = ScoringEngine::default();
        let required = skills(&["Master's", "Bachelor's"]);

        assert_eq!(engine.education_match("MBA, 2015", &required), 50);
        assert_eq!(engine.education_match("B.S. and M.S. degrees", &required), 100);
        assert_eq!(engine.education_match("no degree", &required), 0);
        assert_eq!(engine.education_match("anything", &[]), 100);
        assert_eq!(engine.education_match("PhD in CS", &skills(&["PhD"])), 100);
    }

    #[test]
    fn test_keyword_match_distinct() {
        let engine = ScoringEngine::default();
        let keywords = skills(&["rust", "RUST", "tokio", "grpc"]);
        assert_eq!(engine.keyword_match("Rust and Tokio", &keywords), 50);
        assert_eq!(engine.keyword_match("Rust", &[]), 0);
        assert_eq!(engine.keyword_match("", &keywords), 0);
    }

    #[test]
    fn test_overall_uses_weights() {
        let c = candidate("Python developer with 5 years experience", &["Python"]);
        let j = job(&["Python", "Kafka"], 5, &["PhD"], &["python", "developer"]);
        let result = calculate_score(&c, &j);
        let s = result.score;

        assert_eq!(s.skill_match, 50);
        assert_eq!(s.experience_match, 100);
        assert_eq!(s.education_match, 0);
        assert_eq!(s.keyword_match, 100);
        let expected = (0.4 * 50.0 + 0.3 * 100.0 + 0.15 * 0.0 + 0.15 * 100.0_f64).round() as u8;
        assert_eq!(s.overall, expected);
    }

    #[test]
    fn test_improvements_and_strengths() {
        let c = candidate("Python developer with 5 years experience", &["Python"]);
        let j = job(&["Python", "Kafka", "Go"], 5, &["PhD"], &["python", "developer"]);
        let result = calculate_score(&c, &j);

        assert_eq!(
            result.improvements,
            vec![
                "Missing key skills: Kafka, Go".to_string(),
                EDUCATION_ADVICE.to_string(),
            ]
        );
        assert_eq!(
            result.strengths,
            vec![EXPERIENCE_STRENGTH.to_string(), KEYWORD_STRENGTH.to_string()]
        );
    }

    #[test]
    fn test_missing_skills_capped() {
        let c = candidate("12345", &[]);
        let j = job(&["A1", "B2", "C3", "D4", "E5", "F6"], 0, &[], &[]);
        let result = calculate_score(&c, &j);
        assert_eq!(result.improvements[0], "Missing key skills: A1, B2, C3, D4, E5");
        assert_eq!(result.improvements[1], KEYWORD_ADVICE);
        assert_eq!(result.strengths, vec![EXPERIENCE_STRENGTH.to_string(), EDUCATION_STRENGTH.to_string()]);
    }

    #[test]
    fn test_zero_missing_skill_cap_adds_no_empty_note() {
        let config = ScoringConfig {
            max_missing_skills: 0,
            ..ScoringConfig::default()
        };
        let result = ScoringEngine::new(&config)
            .calculate_score(&candidate("12345", &[]), &job(&["Kubernetes"], 0, &[], &[]));
        assert_eq!(result.score.skill_match, 0);
        assert!(result.improvements.iter().all(|i| !i.starts_with(SKILL_GAP_ADVICE)));
        assert_eq!(result.improvements, vec![KEYWORD_ADVICE.to_string()]);
    }

    #[test]
    fn test_all_scores_within_range() {
        let engine = ScoringEngine::default();
        let c = candidate("99 years of experience 2001 - present", &["Rust"]);
        for years in [0, 1, 50, 500] {
            let result = engine.calculate_score(&c, &job(&["Rust"], years, &["PhD"], &["rust"]));
            for v in [
                result.score.overall,
                result.score.skill_match,
                result.score.experience_match,
                result.score.education_match,
                result.score.keyword_match,
            ] {
                assert!(v <= 100);
            }
        }
    }
}
