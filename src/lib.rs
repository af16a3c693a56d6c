//! Resume matcher library
//!
//! Turns résumé and job posting text into structured profiles and scores how
//! well a candidate fits a job.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{MatcherError, Result};
pub use processing::{
    calculate_score, parse_job_description, parse_resume, CandidateProfile, JobProfile, MatchEngine,
    ScoringResult,
};
