//! Match engine: extraction, scoring and the optional semantic substitution

use crate::config::{Config, SemanticConfig};
use crate::error::{MatcherError, Result};
use crate::processing::embeddings::{embedding_input, EmbeddingProvider, EmbeddingRole};
use crate::processing::job_parser::JobParser;
use crate::processing::profile::{CandidateProfile, CandidateStatus, JobProfile, ScoringResult};
use crate::processing::resume_parser::ResumeParser;
use crate::processing::scoring::ScoringEngine;
use crate::processing::semantic::semantic_score;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::{self, JoinSet};

/// One candidate scored against one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMatch {
    /// File name or other label the résumé came from.
    pub source: String,
    pub profile: CandidateProfile,
    /// `result.score.overall` reflects the semantic policy when it applied.
    pub result: ScoringResult,
    pub heuristic_overall: u8,
    pub semantic_score: Option<u8>,
    #[serde(default)]
    pub status: CandidateStatus,
}

impl CandidateMatch {
    pub fn overall(&self) -> u8 {
        self.result.score.overall
    }
}

/// A résumé handed to [`MatchEngine::rank_batch`]. `text` carries the
/// extraction outcome so a failed document still gets reported.
#[derive(Debug)]
pub struct BatchDocument {
    pub source: String,
    pub text: Result<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub source: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Best overall first; equal scores keep input order.
    pub ranked: Vec<CandidateMatch>,
    pub failures: Vec<BatchFailure>,
}

pub struct MatchEngine {
    resume_parser: ResumeParser,
    job_parser: JobParser,
    scoring: ScoringEngine,
    semantic: SemanticConfig,
    max_embedding_chars: usize,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl MatchEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            resume_parser: ResumeParser::new(),
            job_parser: JobParser::new(&config.extraction),
            scoring: ScoringEngine::new(&config.scoring),
            semantic: config.semantic.clone(),
            max_embedding_chars: config.extraction.max_embedding_chars,
        }
    }

    pub fn with_scoring_engine(mut self, scoring: ScoringEngine) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn parse_resume(&self, text: &str, file_name: Option<&str>) -> CandidateProfile {
        self.resume_parser.parse(text, file_name)
    }

    pub fn parse_job(&self, text: &str, company: Option<&str>) -> JobProfile {
        self.job_parser.parse_with_company(text, company)
    }

    /// Ask `provider` for both vectors. A failure leaves that side without an
    /// embedding, which later means heuristic scoring only.
    pub fn attach_embeddings(
        &self,
        provider: &dyn EmbeddingProvider,
        candidate: &mut CandidateProfile,
        job: &mut JobProfile,
    ) {
        candidate.embedding = self.embed(provider, &candidate.raw_text, EmbeddingRole::Passage);
        job.embedding = self.embed(provider, &job.raw_text, EmbeddingRole::Query);
    }

    fn embed(&self, provider: &dyn EmbeddingProvider, text: &str, role: EmbeddingRole) -> Option<Vec<f32>> {
        if text.trim().is_empty() {
            return None;
        }

        match provider.embed(embedding_input(text, self.max_embedding_chars), role) {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(
                    "Embedding {} with {} failed, falling back to heuristic score: {}",
                    role,
                    provider.model_name(),
                    e
                );
                None
            }
        }
    }

    /// Semantic score when enabled and both embeddings are present.
    fn semantic_for(&self, candidate: &CandidateProfile, job: &JobProfile) -> Option<u8> {
        if !self.semantic.enabled {
            return None;
        }
        let (Some(c), Some(j)) = (&candidate.embedding, &job.embedding) else {
            return None;
        };

        match semantic_score(c, j) {
            Ok(score) => Some(score),
            Err(e @ MatcherError::DimensionMismatch { .. }) => {
                warn!("{}; keeping heuristic overall score", e);
                None
            }
            Err(e) => {
                warn!("Semantic scoring failed: {}", e);
                None
            }
        }
    }

    /// Score a parsed candidate against a parsed job.
    pub fn score(&self, source: &str, candidate: CandidateProfile, job: &JobProfile) -> CandidateMatch {
        let mut result = self.scoring.calculate_score(&candidate, job);
        let heuristic_overall = result.score.overall;

        let semantic_score = self.semantic_for(&candidate, job);
        if let Some(semantic) = semantic_score {
            result.score.overall = self.semantic.policy.apply(heuristic_overall, semantic);
        }

        CandidateMatch {
            source: source.to_string(),
            profile: candidate,
            result,
            heuristic_overall,
            semantic_score,
            status: CandidateStatus::New,
        }
    }

    /// Parse and score one résumé text.
    pub fn analyze(&self, source: &str, resume_text: &str, job: &JobProfile) -> CandidateMatch {
        let candidate = self.parse_resume(resume_text, Some(source));
        self.score(source, candidate, job)
    }

    /// Score many résumés against one job on the blocking pool.
    ///
    /// `on_complete` runs once per document as it finishes, in completion
    /// order.
    pub async fn rank_batch<F>(
        self: Arc<Self>,
        job: JobProfile,
        documents: Vec<BatchDocument>,
        on_complete: F,
    ) -> BatchOutcome
    where
        F: FnMut(&str),
    {
        self.rank_batch_with(job, documents, on_complete, |engine, source, text, job| {
            engine.analyze(source, text, job)
        })
        .await
    }

    async fn rank_batch_with<F, S>(
        self: Arc<Self>,
        job: JobProfile,
        documents: Vec<BatchDocument>,
        mut on_complete: F,
        scorer: S,
    ) -> BatchOutcome
    where
        F: FnMut(&str),
        S: Fn(&MatchEngine, &str, &str, &JobProfile) -> CandidateMatch + Send + Sync + 'static,
    {
        let job = Arc::new(job);
        let scorer = Arc::new(scorer);
        let total = documents.len();
        let mut outcome = BatchOutcome::default();
        let mut scored: Vec<(usize, CandidateMatch)> = Vec::with_capacity(total);
        let mut tasks = JoinSet::new();
        let mut task_sources: HashMap<task::Id, String> = HashMap::with_capacity(total);
        let mut sources = Vec::with_capacity(total);

        for (index, document) in documents.into_iter().enumerate() {
            sources.push(document.source.clone());
            match document.text {
                Ok(text) => {
                    let engine = Arc::clone(&self);
                    let job = Arc::clone(&job);
                    let scorer = Arc::clone(&scorer);
                    let source = document.source.clone();
                    let handle = tasks.spawn_blocking(move || {
                        (index, scorer(&engine, &source, &text, &job))
                    });
                    task_sources.insert(handle.id(), document.source);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", document.source, e);
                    on_complete(&document.source);
                    outcome.failures.push(BatchFailure {
                        source: document.source,
                        error: e.to_string(),
                    });
                }
            }
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, (index, candidate))) => {
                    on_complete(&candidate.source);
                    scored.push((index, candidate));
                }
                Err(e) => {
                    let source = task_sources
                        .remove(&e.id())
                        .unwrap_or_else(|| "unknown".to_string());
                    warn!("Scoring {} failed: {}", source, e);
                    on_complete(&source);
                    outcome.failures.push(BatchFailure {
                        error: format!("Scoring task failed: {}", e),
                        source,
                    });
                }
            }
        }

        scored.sort_by(|(ia, a), (ib, b)| b.overall().cmp(&a.overall()).then(ia.cmp(ib)));
        outcome.ranked = scored.into_iter().map(|(_, c)| c).collect();
        outcome.failures.sort_by_key(|f| {
            sources.iter().position(|s| *s == f.source).unwrap_or(usize::MAX)
        });

        info!(
            "Ranked {} of {} resumes against '{}' ({} failed)",
            outcome.ranked.len(),
            total,
            job.title,
            outcome.failures.len()
        );

        outcome
    }
}
