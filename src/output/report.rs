//! Report structures built from match results

use crate::processing::analyzer::{BatchFailure, BatchOutcome, CandidateMatch};
use crate::processing::profile::{CandidateStatus, JobProfile, ScoreBreakdown};
use crate::processing::scoring::missing_skills;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One candidate against one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub candidate: CandidateSummary,
    pub job: JobSummary,
    pub score: ScoreBreakdown,
    /// Weighted heuristic score before any semantic substitution.
    pub heuristic_overall: u8,
    pub semantic_score: Option<u8>,
    pub verdict: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub source: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub experience_entries: usize,
    pub degrees: Vec<String>,
    pub status: CandidateStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub title: String,
    pub company: String,
    pub required_skills: Vec<String>,
    pub required_years: u32,
    pub required_education: Vec<String>,
}

/// Many candidates ranked against one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub job: JobSummary,
    pub rows: Vec<BatchRow>,
    pub failures: Vec<BatchFailure>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRow {
    pub rank: usize,
    pub source: String,
    pub name: String,
    pub email: String,
    pub score: ScoreBreakdown,
    pub semantic_score: Option<u8>,
    pub verdict: String,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub semantic_enabled: bool,
}

impl ReportMetadata {
    pub fn new(semantic_enabled: bool) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            semantic_enabled,
        }
    }
}

/// Short qualitative reading of an overall score.
pub fn verdict(score: u8) -> &'static str {
    match score {
        80..=100 => "Strong match",
        60..=79 => "Good match",
        40..=59 => "Partial match",
        _ => "Weak match",
    }
}

impl JobSummary {
    pub fn from_job(job: &JobProfile) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            required_skills: job.requirements.skills.clone(),
            required_years: job.requirements.experience,
            required_education: job.requirements.education.clone(),
        }
    }
}

impl MatchReport {
    pub fn from_match(matched: &CandidateMatch, job: &JobProfile, semantic_enabled: bool) -> Self {
        let profile = &matched.profile;
        let required = &job.requirements.skills;
        let missing = missing_skills(&profile.skills, required);
        let matched_skills = required
            .iter()
            .filter(|s| !s.trim().is_empty() && !missing.contains(s))
            .cloned()
            .collect();

        Self {
            candidate: CandidateSummary {
                source: matched.source.clone(),
                name: profile.personal_info.name.clone(),
                email: profile.personal_info.email.clone(),
                phone: profile.personal_info.phone.clone(),
                skills: profile.skills.clone(),
                certifications: profile.certifications.clone(),
                experience_entries: profile.experience.len(),
                degrees: profile.education.iter().map(|e| e.degree.clone()).collect(),
                status: matched.status,
            },
            job: JobSummary::from_job(job),
            score: matched.result.score,
            heuristic_overall: matched.heuristic_overall,
            semantic_score: matched.semantic_score,
            verdict: verdict(matched.overall()).to_string(),
            strengths: matched.result.strengths.clone(),
            improvements: matched.result.improvements.clone(),
            matched_skills,
            missing_skills: missing,
            metadata: ReportMetadata::new(semantic_enabled),
        }
    }
}

impl BatchReport {
    pub fn from_outcome(outcome: &BatchOutcome, job: &JobProfile, semantic_enabled: bool) -> Self {
        let rows = outcome
            .ranked
            .iter()
            .enumerate()
            .map(|(i, matched)| BatchRow {
                rank: i + 1,
                source: matched.source.clone(),
                name: matched.profile.personal_info.name.clone(),
                email: matched.profile.personal_info.email.clone(),
                score: matched.result.score,
                semantic_score: matched.semantic_score,
                verdict: verdict(matched.overall()).to_string(),
                missing_skills: missing_skills(&matched.profile.skills, &job.requirements.skills),
            })
            .collect();

        Self {
            job: JobSummary::from_job(job),
            rows,
            failures: outcome.failures.clone(),
            metadata: ReportMetadata::new(semantic_enabled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::analyzer::MatchEngine;
    use crate::processing::profile::JobRequirements;

    fn job() -> JobProfile {
        JobProfile {
            title: "Backend Engineer".to_string(),
            requirements: JobRequirements {
                skills: vec!["Rust".to_string(), "Kafka".to_string()],
                ..JobRequirements::default()
            },
            ..JobProfile::default()
        }
    }

    #[test]
    fn test_match_report_splits_skills() {
        let engine = MatchEngine::default();
        let job = job();
        let matched = engine.analyze("jane.txt", "Jane Doe\nRust services", &job);
        let report = MatchReport::from_match(&matched, &job, false);

        assert_eq!(report.candidate.name, "Jane Doe");
        assert_eq!(report.candidate.source, "jane.txt");
        assert_eq!(report.matched_skills, vec!["Rust"]);
        assert_eq!(report.missing_skills, vec!["Kafka"]);
        assert_eq!(report.job.title, "Backend Engineer");
        assert_eq!(report.verdict, verdict(report.score.overall));
        assert!(!report.metadata.semantic_enabled);
    }

    #[test]
    fn test_verdict_bands() {
        assert_eq!(verdict(100), "Strong match");
        assert_eq!(verdict(80), "Strong match");
        assert_eq!(verdict(65), "Good match");
        assert_eq!(verdict(40), "Partial match");
        assert_eq!(verdict(0), "Weak match");
    }

    #[test]
    fn test_batch_report_ranks_from_one() {
        let engine = MatchEngine::default();
        let job = job();
        let outcome = BatchOutcome {
            ranked: vec![
                engine.analyze("a.txt", "Rust and Kafka", &job),
                engine.analyze("b.txt", "Nothing", &job),
            ],
            failures: vec![BatchFailure {
                source: "c.pdf".to_string(),
                error: "unreadable".to_string(),
            }],
        };

        let report = BatchReport::from_outcome(&outcome, &job, false);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].rank, 1);
        assert_eq!(report.rows[1].rank, 2);
        assert!(report.rows[0].missing_skills.is_empty());
        assert_eq!(report.failures.len(), 1);
    }
}
