//! CLI interface for the resume matcher

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md", "markdown"];

#[derive(Parser)]
#[command(name = "resume-matcher")]
#[command(version)]
#[command(about = "Extract resume and job posting fields and score candidate fit")]
#[command(long_about = "Parse resumes and job descriptions (PDF, DOCX, TXT, Markdown) into structured profiles, \
score candidates on skills, experience, education and keywords, and rank batches of resumes against a posting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a resume into a JSON candidate profile
    ParseResume {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        file: PathBuf,

        /// Save the profile to a file instead of printing it
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Parse a job description into a JSON job profile
    ParseJob {
        /// Path to job description file (PDF, DOCX, TXT, MD)
        file: PathBuf,

        /// Company name to record on the profile
        #[arg(long)]
        company: Option<String>,

        /// Save the profile to a file instead of printing it
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Score one resume against one job description
    Score {
        /// Path to resume file
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file
        #[arg(short, long)]
        job: PathBuf,

        /// Company name for the job
        #[arg(long)]
        company: Option<String>,

        /// Precomputed resume embedding (JSON array or {"embedding": [...]})
        #[arg(long, requires = "job_embedding")]
        resume_embedding: Option<PathBuf>,

        /// Precomputed job embedding (JSON array or {"embedding": [...]})
        #[arg(long, requires = "resume_embedding")]
        job_embedding: Option<PathBuf>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Rank many resumes against one job description
    Batch {
        /// Path to job description file
        #[arg(short, long)]
        job: PathBuf,

        /// Resume files to rank
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        /// Company name for the job
        #[arg(long)]
        company: Option<String>,

        /// Output detailed rows
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}. Paste the document text into a .txt file instead.",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
