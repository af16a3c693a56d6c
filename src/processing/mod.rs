//! Field extraction, scoring and matching

pub mod analyzer;
pub mod embeddings;
pub mod job_parser;
pub mod name;
pub mod profile;
pub mod resume_parser;
pub mod scoring;
pub mod sections;
pub mod semantic;
pub mod taxonomy;
pub mod text;

pub use analyzer::{BatchDocument, BatchFailure, BatchOutcome, CandidateMatch, MatchEngine};
pub use job_parser::{parse_job_description, JobParser};
pub use profile::{
    CandidateProfile, CandidateStatus, EducationEntry, ExperienceEntry, JobProfile, JobRequirements,
    PersonalInfo, ScoreBreakdown, ScoringResult,
};
pub use resume_parser::{parse_resume, ResumeParser};
pub use scoring::{calculate_score, ScoringEngine};
