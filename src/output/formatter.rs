//! Output formatting for match and batch reports

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::output::report::{BatchReport, MatchReport};
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_match(&self, report: &MatchReport) -> Result<String>;
    fn format_batch(&self, report: &BatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn score_color(score: u8) -> Color {
        match score {
            80..=100 => Color::Green,
            60..=79 => Color::Yellow,
            40..=59 => Color::BrightYellow,
            _ => Color::Red,
        }
    }

    fn format_score(&self, score: u8) -> String {
        self.colorize(&format!("{:>3}%", score), Self::score_color(score))
    }

    fn format_bar(&self, score: u8) -> String {
        let filled = (score as usize) / 5;
        let bar = format!("{}{}", "■".repeat(filled), "·".repeat(20 - filled.min(20)));
        self.colorize(&bar, Self::score_color(score))
    }

    fn format_list(&self, output: &mut String, items: &[String], bullet: &str, color: Color) {
        for item in items {
            output.push_str(&format!("  {} {}\n", self.colorize(bullet, color), item));
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_match(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();
        let candidate = &report.candidate;

        output.push_str(&self.format_header("CANDIDATE MATCH", 1));
        output.push_str(&format!(
            "Candidate: {} ({})\n",
            self.colorize(&candidate.name, Color::Cyan),
            candidate.source
        ));
        if !candidate.email.is_empty() || !candidate.phone.is_empty() {
            output.push_str(&format!("Contact:   {} {}\n", candidate.email, candidate.phone));
        }
        output.push_str(&format!("Position:  {} at {}\n", report.job.title, report.job.company));
        output.push_str(&format!(
            "Overall:   {} {}\n",
            self.format_score(report.score.overall),
            self.colorize(&format!("[{}]", report.verdict), Color::Cyan)
        ));
        if let Some(semantic) = report.semantic_score {
            output.push_str(&format!(
                "Semantic:  {} (heuristic {}%)\n",
                self.format_score(semantic),
                report.heuristic_overall
            ));
        }

        output.push_str(&self.format_header("Score Breakdown", 2));
        for (label, score) in [
            ("Skills", report.score.skill_match),
            ("Experience", report.score.experience_match),
            ("Education", report.score.education_match),
            ("Keywords", report.score.keyword_match),
        ] {
            output.push_str(&format!(
                "  {:<11} {} {}\n",
                label,
                self.format_bar(score),
                self.format_score(score)
            ));
        }

        if !report.strengths.is_empty() {
            output.push_str(&self.format_header("Strengths", 3));
            self.format_list(&mut output, &report.strengths, "+", Color::Green);
        }

        if !report.improvements.is_empty() {
            output.push_str(&self.format_header("Improvements", 3));
            self.format_list(&mut output, &report.improvements, "!", Color::Yellow);
        }

        if self.detailed {
            output.push_str(&self.format_header("Skills", 3));
            output.push_str(&format!("  Matched: {}\n", join_or_none(&report.matched_skills)));
            output.push_str(&format!("  Missing: {}\n", join_or_none(&report.missing_skills)));
            output.push_str(&format!("  Resume:  {}\n", join_or_none(&candidate.skills)));

            output.push_str(&self.format_header("Profile", 3));
            output.push_str(&format!("  Experience entries: {}\n", candidate.experience_entries));
            output.push_str(&format!("  Degrees: {}\n", join_or_none(&candidate.degrees)));
            output.push_str(&format!("  Certifications: {}\n", join_or_none(&candidate.certifications)));
            output.push_str(&format!(
                "  Job requires: {} years, education {}\n",
                report.job.required_years,
                join_or_none(&report.job.required_education)
            ));
        }

        Ok(output)
    }

    fn format_batch(&self, report: &BatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("CANDIDATE RANKING", 1));
        output.push_str(&format!("Position: {} at {}\n", report.job.title, report.job.company));
        output.push_str(&format!(
            "Ranked {} candidates ({} failed)\n\n",
            report.rows.len(),
            report.failures.len()
        ));

        output.push_str(&format!(
            "  {:>3}  {:<28} {:>7} {:>6} {:>6} {:>6} {:>6}\n",
            "#", "Candidate", "Overall", "Skill", "Exp", "Edu", "Kw"
        ));
        for row in &report.rows {
            let name: String = row.name.chars().take(28).collect();
            output.push_str(&format!(
                "  {:>3}  {:<28} {:>7} {:>5}% {:>5}% {:>5}% {:>5}%\n",
                row.rank,
                name,
                self.format_score(row.score.overall),
                row.score.skill_match,
                row.score.experience_match,
                row.score.education_match,
                row.score.keyword_match
            ));
            if self.detailed {
                output.push_str(&format!("       {} | {}\n", row.source, row.verdict));
                if !row.missing_skills.is_empty() {
                    output.push_str(&format!("       missing: {}\n", row.missing_skills.join(", ")));
                }
            }
        }

        if !report.failures.is_empty() {
            output.push_str(&self.format_header("Failed Documents", 3));
            for failure in &report.failures {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    self.colorize("x", Color::Red),
                    failure.source,
                    failure.error
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_match(&self, report: &MatchReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_batch(&self, report: &BatchReport) -> Result<String> {
        self.to_json(report)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn metadata_line(&self, generated_at: &chrono::DateTime<chrono::Utc>, version: &str) -> String {
        if self.include_metadata {
            format!(
                "**Generated:** {} | **Version:** {}\n\n",
                generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                version
            )
        } else {
            String::new()
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_match(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();
        let candidate = &report.candidate;

        output.push_str(&format!("# Candidate Match: {}\n\n", candidate.name));
        output.push_str(&self.metadata_line(&report.metadata.generated_at, &report.metadata.tool_version));
        output.push_str(&format!(
            "**Position:** {} at {} | **Source:** `{}`\n\n",
            report.job.title, report.job.company, candidate.source
        ));
        output.push_str(&format!(
            "**Overall Score:** {}% ({})\n\n",
            report.score.overall, report.verdict
        ));
        if let Some(semantic) = report.semantic_score {
            output.push_str(&format!(
                "**Semantic Score:** {}% (heuristic {}%)\n\n",
                semantic, report.heuristic_overall
            ));
        }

        output.push_str("## Score Breakdown\n\n");
        output.push_str("| Dimension | Score |\n");
        output.push_str("|-----------|-------|\n");
        output.push_str(&format!("| Skills | {}% |\n", report.score.skill_match));
        output.push_str(&format!("| Experience | {}% |\n", report.score.experience_match));
        output.push_str(&format!("| Education | {}% |\n", report.score.education_match));
        output.push_str(&format!("| Keywords | {}% |\n\n", report.score.keyword_match));

        if !report.strengths.is_empty() {
            output.push_str("## Strengths\n\n");
            for strength in &report.strengths {
                output.push_str(&format!("- {}\n", strength));
            }
            output.push('\n');
        }

        if !report.improvements.is_empty() {
            output.push_str("## Improvements\n\n");
            for improvement in &report.improvements {
                output.push_str(&format!("- {}\n", improvement));
            }
            output.push('\n');
        }

        output.push_str("## Skills\n\n");
        output.push_str(&format!("- **Matched:** {}\n", join_or_none(&report.matched_skills)));
        output.push_str(&format!("- **Missing:** {}\n", join_or_none(&report.missing_skills)));

        Ok(output)
    }

    fn format_batch(&self, report: &BatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("# Candidate Ranking: {}\n\n", report.job.title));
        output.push_str(&self.metadata_line(&report.metadata.generated_at, &report.metadata.tool_version));
        output.push_str(&format!("**Company:** {}\n\n", report.job.company));

        output.push_str("| Rank | Candidate | Source | Overall | Skills | Experience | Education | Keywords |\n");
        output.push_str("|------|-----------|--------|---------|--------|------------|-----------|----------|\n");
        for row in &report.rows {
            output.push_str(&format!(
                "| {} | {} | `{}` | {}% | {}% | {}% | {}% | {}% |\n",
                row.rank,
                row.name,
                row.source,
                row.score.overall,
                row.score.skill_match,
                row.score.experience_match,
                row.score.education_match,
                row.score.keyword_match
            ));
        }

        if !report.failures.is_empty() {
            output.push_str("\n## Failed Documents\n\n");
            for failure in &report.failures {
                output.push_str(&format!("- `{}`: {}\n", failure.source, failure.error));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::with_options(config.color_output, config.detailed, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn match_report(&self, report: &MatchReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_match(report)
    }

    pub fn batch_report(&self, report: &BatchReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_batch(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, base: &str, timestamp: bool) -> String {
    let base_name = Path::new(base)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_match{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::{BatchReport, MatchReport};
    use crate::processing::analyzer::{BatchOutcome, MatchEngine};
    use crate::processing::profile::{JobProfile, JobRequirements};
    use tempfile::TempDir;

    fn job() -> JobProfile {
        JobProfile {
            title: "Data Engineer".to_string(),
            company: "Globex".to_string(),
            requirements: JobRequirements {
                skills: vec!["Python".to_string(), "Spark".to_string()],
                ..JobRequirements::default()
            },
            ..JobProfile::default()
        }
    }

    fn report() -> MatchReport {
        let job = job();
        let matched = MatchEngine::default().analyze("sam.txt", "Sam Lee\nPython pipelines", &job);
        MatchReport::from_match(&matched, &job, false)
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true).format_match(&report()).unwrap();
        assert!(output.contains("Candidate: Sam Lee (sam.txt)"));
        assert!(output.contains("Position:  Data Engineer at Globex"));
        assert!(output.contains("Missing: Spark"));
        assert!(output.contains("Missing key skills: Spark"));
        assert!(!output.contains("\u{1b}["));
    }

    #[test]
    fn test_json_is_parseable() {
        let output = JsonFormatter::new(true).format_match(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["candidate"]["name"], "Sam Lee");
        assert_eq!(value["missing_skills"][0], "Spark");
        assert!(value["score"]["skillMatch"].is_number());
    }

    #[test]
    fn test_markdown_match() {
        let output = MarkdownFormatter::new(false).format_match(&report()).unwrap();
        assert!(output.starts_with("# Candidate Match: Sam Lee"));
        assert!(output.contains("| Skills | 50% |"));
        assert!(!output.contains("**Generated:**"));
    }

    #[test]
    fn test_batch_formats() {
        let job = job();
        let engine = MatchEngine::default();
        let outcome = BatchOutcome {
            ranked: vec![engine.analyze("sam.txt", "Sam Lee\nPython and Spark", &job)],
            failures: Vec::new(),
        };
        let report = BatchReport::from_outcome(&outcome, &job, false);
        let generator = ReportGenerator::with_options(false, false, false, false);

        let console = generator.batch_report(&report, OutputFormat::Console).unwrap();
        assert!(console.contains("Ranked 1 candidates (0 failed)"));
        assert!(console.contains("Sam Lee"));

        let markdown = generator.batch_report(&report, OutputFormat::Markdown).unwrap();
        assert!(markdown.contains("| 1 | Sam Lee | `sam.txt` |"));

        let json = generator.batch_report(&report, OutputFormat::Json).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_save_and_suggest_filename() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.md");
        save_report_to_file("# hi", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hi");

        assert_eq!(suggest_filename(OutputFormat::Json, "cv/jane.pdf", false), "jane_match.json");
        assert_eq!(suggest_filename(OutputFormat::Markdown, "jane", false), "jane_match.md");
    }
}
