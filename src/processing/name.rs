//! Candidate name extraction as an ordered chain of strategies.
//!
//! Résumés have no fixed layout, so each strategy targets one common layout
//! and the chain runs from the most precise to the most permissive. The first
//! strategy that yields a name wins.

use crate::processing::profile::UNKNOWN_NAME;
use crate::processing::taxonomy::{job_title_hits, tech_term_hits};
use crate::processing::text::{capitalize, title_case};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static SECTION_CONTENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s+\S").expect("Invalid section content regex"));
static HEADER_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[|·•\t]").expect("Invalid header separator regex"));
static EMBEDDED_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s().-]{8,}").expect("Invalid embedded phone regex"));
static EMBEDDED_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@\S+").expect("Invalid embedded email regex"));
static STATE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*[A-Z]{2}\b.*$").expect("Invalid state suffix regex"));
static COMMA_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",.*$").expect("Invalid comma suffix regex"));
static ZIP_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{5,}\b.*$").expect("Invalid zip suffix regex"));
static NAME_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z'-]+$").expect("Invalid name word regex"));
static ALL_UPPER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z\s'-]+$").expect("Invalid upper-case regex"));
static PHONE_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+\d().\-\s]{7,}$").expect("Invalid phone line regex"));
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[:,;|•·/\\]").expect("Invalid separator regex"));
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(summary|objective|experience|education|skills|certifications|projects|references|profile|contact|about|work|employment|professional|technical|personal|curriculum|resume|cv|languages|framework|tools|soft\s*skills|data|cloud|visualization|internship)\b",
    )
    .expect("Invalid heading regex")
});
static MIXED_CASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3}$").expect("Invalid mixed-case name regex")
});
static ALL_CAPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Z'-]+(?:\s+[A-Z][A-Z'-]+){1,3}$").expect("Invalid all-caps name regex")
});
static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[^.]+$").expect("Invalid extension regex"));
static UPLOAD_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^resume_\d+_").expect("Invalid upload prefix regex"));
static COUNTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d+\)\s*").expect("Invalid counter regex"));

const HEADER_LINES: usize = 5;
const EARLY_LINES: usize = 15;
const MAX_CAPS_NAME_LEN: usize = 40;

/// Inputs every strategy may look at.
#[derive(Debug, Clone)]
pub struct NameContext<'a> {
    /// All lines of the document, trimmed, blank lines included.
    pub lines: Vec<&'a str>,
    pub email: &'a str,
    pub file_name: Option<&'a str>,
}

impl<'a> NameContext<'a> {
    pub fn new(text: &'a str, email: &'a str, file_name: Option<&'a str>) -> Self {
        Self {
            lines: text.split('\n').map(str::trim).collect(),
            email,
            file_name,
        }
    }
}

pub trait NameStrategy: Send + Sync {
    fn label(&self) -> &'static str;

    fn extract(&self, ctx: &NameContext<'_>) -> Option<String>;
}

/// Runs strategies in order; falls back to `"Unknown"`.
pub struct NameExtractor {
    strategies: Vec<Box<dyn NameStrategy>>,
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new(vec![
            Box::new(HeaderLine),
            Box::new(MixedCaseLine),
            Box::new(AllCapsLine),
            Box::new(EarlyLine),
            Box::new(FileName { relaxed: false }),
            Box::new(EmailLocalPart),
            Box::new(FileName { relaxed: true }),
        ])
    }
}

impl NameExtractor {
    pub fn new(strategies: Vec<Box<dyn NameStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn extract(&self, ctx: &NameContext<'_>) -> String {
        for strategy in &self.strategies {
            if let Some(name) = strategy.extract(ctx) {
                debug!("Name '{}' found by {} strategy", name, strategy.label());
                return name;
            }
        }
        UNKNOWN_NAME.to_string()
    }
}

fn is_name_like(s: &str) -> bool {
    let words: Vec<&str> = s.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words
            .iter()
            .all(|w| NAME_WORD_RE.is_match(w) && w.chars().count() >= 2)
}

fn is_not_job_title(s: &str) -> bool {
    job_title_hits(s) == 0
}

/// Lines that can never be a name: headings, contact lines, skill lists.
fn is_non_name_line(line: &str) -> bool {
    let len = line.chars().count();
    if !(3..=50).contains(&len) {
        return true;
    }
    if line.contains('@') || line.contains("://") || line.starts_with("www.") {
        return true;
    }
    if PHONE_ONLY_RE.is_match(line) || SEPARATOR_RE.is_match(line) {
        return true;
    }
    if line.starts_with(|c: char| c.is_ascii_digit()) {
        return true;
    }
    if HEADING_RE.is_match(line) {
        return true;
    }
    tech_term_hits(line) >= 2 || !is_not_job_title(line)
}

/// First segment of a header line such as `Jane Doe | +1 555 123 4567 | jane@x.io`.
struct HeaderLine;

impl HeaderLine {
    fn candidate(line: &str) -> Option<String> {
        if SECTION_CONTENT_RE.is_match(line) && !line.contains('|') {
            return None;
        }

        let first = HEADER_SPLIT_RE
            .split(line)
            .map(str::trim)
            .find(|s| !s.is_empty())?;

        let cleaned = EMBEDDED_PHONE_RE.replace(first, "");
        let cleaned = EMBEDDED_EMAIL_RE.replace(&cleaned, "");
        let cleaned = STATE_SUFFIX_RE.replace(&cleaned, "");
        let cleaned = COMMA_SUFFIX_RE.replace(&cleaned, "");
        let cleaned = ZIP_SUFFIX_RE.replace(&cleaned, "");

        let words: Vec<&str> = cleaned
            .split_whitespace()
            .filter(|w| NAME_WORD_RE.is_match(w) && (2..=12).contains(&w.chars().count()))
            .collect();

        if !(2..=4).contains(&words.len()) {
            return None;
        }

        let name = words.join(" ");
        if !is_not_job_title(&name) {
            return None;
        }
        if ALL_UPPER_RE.is_match(&name) {
            return Some(title_case(&name));
        }
        is_name_like(&name).then_some(name)
    }
}

impl NameStrategy for HeaderLine {
    fn label(&self) -> &'static str {
        "header-line"
    }

    fn extract(&self, ctx: &NameContext<'_>) -> Option<String> {
        ctx.lines
            .iter()
            .filter(|l| !l.is_empty())
            .take(HEADER_LINES)
            .find_map(|line| Self::candidate(line))
    }
}

/// A clean "Firstname Lastname" line anywhere, e.g. in a sidebar.
struct MixedCaseLine;

impl NameStrategy for MixedCaseLine {
    fn label(&self) -> &'static str {
        "mixed-case-line"
    }

    fn extract(&self, ctx: &NameContext<'_>) -> Option<String> {
        ctx.lines
            .iter()
            .filter(|l| !is_non_name_line(l))
            .find(|l| MIXED_CASE_RE.is_match(l))
            .map(|l| l.to_string())
    }
}

/// An all-caps banner such as "ANSHU LAL GUPTA".
struct AllCapsLine;

impl NameStrategy for AllCapsLine {
    fn label(&self) -> &'static str {
        "all-caps-line"
    }

    fn extract(&self, ctx: &NameContext<'_>) -> Option<String> {
        ctx.lines
            .iter()
            .filter(|l| !is_non_name_line(l))
            .find(|l| ALL_CAPS_RE.is_match(l) && l.chars().count() <= MAX_CAPS_NAME_LEN)
            .map(|l| title_case(l))
    }
}

struct EarlyLine;

impl NameStrategy for EarlyLine {
    fn label(&self) -> &'static str {
        "early-line"
    }

    fn extract(&self, ctx: &NameContext<'_>) -> Option<String> {
        ctx.lines
            .iter()
            .take(EARLY_LINES)
            .filter(|l| !is_non_name_line(l))
            .find(|l| is_name_like(l))
            .map(|l| l.to_string())
    }
}

/// Name from an upload file name such as `resume_1712_Jane Doe_Final (1).pdf`.
struct FileName {
    relaxed: bool,
}

impl FileName {
    fn words(file_name: &str) -> Vec<String> {
        let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
        let base = EXTENSION_RE.replace(base, "");
        let base = UPLOAD_PREFIX_RE.replace(&base, "");
        let segment = base.split('_').next().unwrap_or_default();
        let segment = COUNTER_RE.replace_all(segment, " ");

        segment
            .split_whitespace()
            .filter(|w| NAME_WORD_RE.is_match(w) && w.chars().count() >= 2)
            .map(|w| {
                let mixed = w.chars().any(|c| c.is_lowercase()) && w.chars().any(|c| c.is_uppercase());
                if mixed {
                    w.to_string()
                } else {
                    capitalize(w)
                }
            })
            .collect()
    }
}

impl NameStrategy for FileName {
    fn label(&self) -> &'static str {
        if self.relaxed {
            "relaxed-file-name"
        } else {
            "file-name"
        }
    }

    fn extract(&self, ctx: &NameContext<'_>) -> Option<String> {
        let words = Self::words(ctx.file_name?);
        let min_words = if self.relaxed { 1 } else { 2 };
        if !(min_words..=4).contains(&words.len()) {
            return None;
        }

        let name = words.join(" ");
        if !self.relaxed && !is_not_job_title(&name) {
            return None;
        }
        Some(name)
    }
}

/// `john.doe@example.com` -> "John Doe"
struct EmailLocalPart;

impl NameStrategy for EmailLocalPart {
    fn label(&self) -> &'static str {
        "email"
    }

    fn extract(&self, ctx: &NameContext<'_>) -> Option<String> {
        let local = ctx.email.split('@').next().filter(|l| !l.is_empty())?;
        let parts: Vec<String> = local
            .split(['.', '_', '-'])
            .filter(|p| p.len() > 1 && p.chars().all(|c| c.is_ascii_alphabetic()))
            .map(capitalize)
            .collect();

        (parts.len() >= 2).then(|| parts.join(" "))
    }
}

/// Convenience wrapper running the default chain.
pub fn extract_name(text: &str, email: &str, file_name: Option<&str>) -> String {
    NameExtractor::default().extract(&NameContext::new(text, email, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_caps_header_is_title_cased() {
        let text = "JOHN SMITH\njohn.smith@mail.com\n5 years experience in Python and React";
        assert_eq!(extract_name(text, "john.smith@mail.com", None), "John Smith");
    }

    #[test]
    fn test_header_line_with_separators() {
        let text = "Calvin McGuire | +1(804) 296-5691 | calvin@example.com\nSummary";
        assert_eq!(extract_name(text, "calvin@example.com", None), "Calvin McGuire");
    }

    #[test]
    fn test_header_line_strips_location() {
        let text = "Maria Lopez, Austin, TX 78701\nmaria@example.com";
        assert_eq!(extract_name(text, "", None), "Maria Lopez");
    }

    #[test]
    fn test_job_title_header_is_skipped() {
        let text = "Senior Software Engineer\nPriya Raman\npriya@example.com";
        assert_eq!(extract_name(text, "priya@example.com", None), "Priya Raman");
    }

    #[test]
    fn test_sidebar_name_found_by_mixed_case_scan() {
        let text = [
            "Contact: 555-0100",
            "Skills: Python, SQL",
            "Tools: Git",
            "Languages: English",
            "Summary: builds things",
            "Python Docker AWS",
            "Anshu Lal Gupta",
        ]
        .join("\n");
        assert_eq!(extract_name(&text, "", None), "Anshu Lal Gupta");
    }

    #[test]
    fn test_all_caps_banner_after_header_block() {
        let text = [
            "Contact: 555-0100",
            "Skills: Python, SQL",
            "Tools: Git",
            "Languages: English",
            "Summary: builds things",
            "ANSHU LAL GUPTA",
        ]
        .join("\n");
        assert_eq!(extract_name(&text, "", None), "Anshu Lal Gupta");
    }

    #[test]
    fn test_file_name_fallback() {
        let text = "Objective: find a role\nSkills: everything";
        let name = extract_name(text, "", Some("resume_1712345_Comolyn Weeks_State of GA (1).docx"));
        assert_eq!(name, "Comolyn Weeks");

        let name = extract_name(text, "", Some("uploads/jane DOE (2).pdf"));
        assert_eq!(name, "Jane Doe");
    }

    #[test]
    fn test_file_name_with_job_title_falls_through_to_email() {
        let text = "Objective: find a role";
        let name = extract_name(text, "mary.ann-smith@example.com", Some("Project Manager.pdf"));
        assert_eq!(name, "Mary Ann Smith");
    }

    #[test]
    fn test_relaxed_file_name_single_word() {
        let text = "Objective: find a role";
        assert_eq!(extract_name(text, "x1@example.com", Some("Anshu (1).pdf")), "Anshu");
    }

    #[test]
    fn test_unknown_when_nothing_matches() {
        assert_eq!(extract_name("Objective: anything", "", None), "Unknown");
        assert_eq!(extract_name("", "", None), "Unknown");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "Summary: x\nLEE MIN HO\nlee@example.com";
        let first = extract_name(text, "lee@example.com", Some("cv.pdf"));
        let second = extract_name(text, "lee@example.com", Some("cv.pdf"));
        assert_eq!(first, second);
        assert_eq!(first, "Lee Min Ho");
    }

    #[test]
    fn test_custom_chain() {
        let extractor = NameExtractor::new(vec![Box::new(EmailLocalPart)]);
        let ctx = NameContext::new("JOHN SMITH", "ada.lovelace@example.com", None);
        assert_eq!(extractor.extract(&ctx), "Ada Lovelace");
    }
}
