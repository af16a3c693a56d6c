//! Resume matcher: resume and job posting parsing with candidate fit scoring

use anyhow::{bail, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_matcher::cli::{self, Cli, Commands, ConfigAction, DOCUMENT_EXTENSIONS};
use resume_matcher::config::{Config, OutputFormat};
use resume_matcher::input::manager::display_name;
use resume_matcher::input::InputManager;
use resume_matcher::output::formatter::{save_report_to_file, suggest_filename};
use resume_matcher::output::{BatchReport, MatchReport, ReportGenerator};
use resume_matcher::processing::embeddings::load_embedding_file;
use resume_matcher::processing::{BatchDocument, MatchEngine};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Reading configuration from {}", path.display())),
        None => Config::load().context("Reading default configuration"),
    }
}

async fn read_document(manager: &mut InputManager, path: &Path) -> anyhow::Result<String> {
    cli::validate_file_extension(path, DOCUMENT_EXTENSIONS).map_err(anyhow::Error::msg)?;
    manager
        .extract_text(path)
        .await
        .with_context(|| format!("Extracting text from {}", path.display()))
}

fn output_format(requested: Option<&str>, config: &Config) -> anyhow::Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(anyhow::Error::msg),
        None => Ok(config.output.format),
    }
}

fn emit(content: &str, save: Option<&Path>) -> anyhow::Result<()> {
    match save {
        Some(path) => {
            save_report_to_file(content, path)
                .with_context(|| format!("Writing {}", path.display()))?;
            info!("Saved output to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

async fn run_command(command: Commands, mut config: Config, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut input_manager = InputManager::new();

    match command {
        Commands::ParseResume { file, save } => {
            let text = read_document(&mut input_manager, &file).await?;
            let engine = MatchEngine::new(&config);
            let profile = engine.parse_resume(&text, Some(&display_name(&file)));
            emit(&serde_json::to_string_pretty(&profile)?, save.as_deref())?;
        }

        Commands::ParseJob { file, company, save } => {
            let text = read_document(&mut input_manager, &file).await?;
            let engine = MatchEngine::new(&config);
            let job = engine.parse_job(&text, company.as_deref());
            emit(&serde_json::to_string_pretty(&job)?, save.as_deref())?;
        }

        Commands::Score {
            resume,
            job,
            company,
            resume_embedding,
            job_embedding,
            detailed,
            output,
            save,
        } => {
            let format = output_format(output.as_deref(), &config)?;
            config.output.detailed |= detailed;

            let resume_text = read_document(&mut input_manager, &resume).await?;
            let job_text = read_document(&mut input_manager, &job).await?;

            if resume_embedding.is_some() {
                config.semantic.enabled = true;
            }
            let engine = MatchEngine::new(&config);
            let source = display_name(&resume);
            let mut candidate = engine.parse_resume(&resume_text, Some(&source));
            let mut job_profile = engine.parse_job(&job_text, company.as_deref());

            if let (Some(resume_vec), Some(job_vec)) = (&resume_embedding, &job_embedding) {
                candidate.embedding = Some(
                    load_embedding_file(resume_vec)
                        .await
                        .with_context(|| format!("Loading embedding {}", resume_vec.display()))?,
                );
                job_profile.embedding = Some(
                    load_embedding_file(job_vec)
                        .await
                        .with_context(|| format!("Loading embedding {}", job_vec.display()))?,
                );
            }

            let matched = engine.score(&source, candidate, &job_profile);
            let report = MatchReport::from_match(&matched, &job_profile, config.semantic.enabled);
            let content = ReportGenerator::from_config(&config.output).match_report(&report, format)?;

            // A directory target gets a generated file name.
            let save = save.map(|path| {
                if path.is_dir() {
                    path.join(suggest_filename(format, &source, false))
                } else {
                    path
                }
            });
            emit(&content, save.as_deref())?;
        }

        Commands::Batch {
            job,
            resumes,
            company,
            detailed,
            output,
            save,
        } => {
            let format = output_format(output.as_deref(), &config)?;
            config.output.detailed |= detailed;

            let job_text = read_document(&mut input_manager, &job).await?;
            let engine = Arc::new(MatchEngine::new(&config));
            let job_profile = engine.parse_job(&job_text, company.as_deref());

            let mut documents = Vec::with_capacity(resumes.len());
            for path in &resumes {
                let text = match cli::validate_file_extension(path, DOCUMENT_EXTENSIONS) {
                    Ok(()) => input_manager.extract_text(path).await,
                    Err(e) => Err(resume_matcher::MatcherError::UnsupportedFormat(e)),
                };
                documents.push(BatchDocument {
                    source: display_name(path),
                    text,
                });
            }

            let progress = ProgressBar::new(documents.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .context("Building progress bar style")?
                    .progress_chars("#>-"),
            );

            let outcome = Arc::clone(&engine)
                .rank_batch(job_profile.clone(), documents, |source| {
                    progress.set_message(source.to_string());
                    progress.inc(1);
                })
                .await;
            progress.finish_and_clear();

            let report = BatchReport::from_outcome(&outcome, &job_profile, config.semantic.enabled);
            let content = ReportGenerator::from_config(&config.output).batch_report(&report, format)?;
            emit(&content, save.as_deref())?;

            if outcome.ranked.is_empty() {
                bail!("None of the {} resumes could be read", resumes.len());
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("{}", toml::to_string_pretty(&config).context("Serializing configuration")?);
                }

                Some(ConfigAction::Reset) => {
                    Config::default()
                        .save_to(&path)
                        .with_context(|| format!("Writing {}", path.display()))?;
                    println!("Configuration reset to defaults at {}", path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}
