//! Static reference tables shared by every extractor: skill vocabulary,
//! stop words, and the vocabularies used to recognise titles and headings.

use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Canonical skill labels. Matching is case-insensitive containment; the
/// label is always reported with the casing below.
pub const SKILL_KEYWORDS: &[&str] = &[
    // Programming languages
    "JavaScript", "TypeScript", "Python", "Java", "C++", "C#", "Ruby", "Go",
    "Swift", "Kotlin", "Rust", "PHP", "Scala", "R", "Perl", "Dart",
    "Objective-C", "MATLAB", "Lua", "Haskell", "Elixir", "Clojure",
    // Frontend
    "React", "Angular", "Vue", "Svelte", "Next.js", "Nuxt.js", "jQuery",
    "HTML", "CSS", "SASS", "LESS", "Tailwind", "Bootstrap", "Material UI",
    "Redux", "Webpack", "Vite",
    // Backend
    "Node.js", "Express", "Django", "Flask", "Spring", "Spring Boot",
    "FastAPI", "NestJS", "Rails", "Laravel", "ASP.NET",
    // Databases
    "MongoDB", "PostgreSQL", "MySQL", "Redis", "SQLite", "Oracle",
    "Cassandra", "DynamoDB", "Elasticsearch", "SQL Server", "Firebase",
    // Cloud & DevOps
    "Docker", "Kubernetes", "AWS", "Azure", "GCP", "Terraform", "Ansible",
    "Jenkins", "GitHub Actions", "GitLab CI", "CircleCI", "Nginx", "Apache",
    // Tools & practices
    "Git", "Linux", "Agile", "Scrum", "REST", "GraphQL", "CI/CD",
    "Microservices", "Serverless", "TDD", "BDD",
    // Data & AI
    "Machine Learning", "Deep Learning", "AI", "NLP", "Computer Vision",
    "TensorFlow", "PyTorch", "Pandas", "NumPy", "Spark", "Hadoop",
    "Data Science", "Data Engineering", "ETL", "Power BI", "Tableau",
    // Mobile
    "React Native", "Flutter", "iOS", "Android", "SwiftUI",
    // Other
    "Blockchain", "IoT", "Cybersecurity", "DevSecOps", "OAuth", "JWT",
    "WebSocket", "RabbitMQ", "Kafka", "gRPC", "Figma", "Jira",
];

/// Filler words dropped from job-posting keywords.
pub const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "along", "among", "apply",
    "based", "before", "being", "below", "between", "bonus", "bring", "build",
    "candidate", "candidates", "click", "close", "company", "could",
    "description", "desired", "does", "doing", "during",
    "each", "equal", "every", "experience", "employer",
    "first", "follow", "from", "further",
    "great", "growth",
    "have", "having", "here", "hiring",
    "ideal", "including", "information", "into",
    "join", "just",
    "know",
    "learn", "least", "level", "location", "looking",
    "major", "make", "many", "minimum", "more", "most", "much", "must",
    "need", "needs",
    "offer", "only", "open", "opportunity", "other", "over",
    "part", "please", "plus", "position", "preferred", "provide",
    "range", "related", "required", "requirements", "responsibilities",
    "responsibility", "right", "role",
    "same", "should", "skills", "some", "strong", "such",
    "take", "team", "than", "that", "their", "them", "then", "there",
    "these", "they", "this", "those", "through", "title", "together",
    "under", "understanding", "upon", "using",
    "very",
    "want", "well", "were", "what", "when", "where", "which", "while",
    "will", "with", "within", "work", "working", "would",
    "year", "years", "your",
];

/// Role nouns that mark a job-posting line as the position title (case-sensitive).
pub const ROLE_NOUNS: &[&str] = &[
    "Engineer", "Developer", "Manager", "Analyst", "Designer", "Architect",
    "Specialist", "Lead", "Director", "Consultant",
];

/// Words that disqualify a candidate string from being a person's name.
pub const JOB_TITLE_WORDS: &[&str] = &[
    "manager", "engineer", "developer", "analyst", "director", "specialist",
    "technician", "coordinator", "consultant", "administrator", "professional", "certified",
    "architect", "designer", "lead", "senior", "junior", "intern", "associate", "officer",
    "project", "management", "network", "field", "pmp", "safe", "scrum", "agile",
];

/// Technology terms; a line carrying two or more of them is a skills line, not a name.
pub const TECH_TERMS: &[&str] = &[
    "python", "java", "sql", "react", "node", "docker", "aws", "azure", "git", "linux",
    "html", "css", "api", "ml", "ai", "etl", "ci/cd",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

static SKILL_MATCHER: LazyLock<AhoCorasick> = LazyLock::new(|| {
    let patterns: Vec<String> = SKILL_KEYWORDS.iter().map(|s| s.to_lowercase()).collect();
    AhoCorasick::builder()
        .match_kind(MatchKind::Standard)
        .build(&patterns)
        .expect("Invalid skill taxonomy patterns")
});

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word)
}

/// Every canonical skill whose lowercase label occurs anywhere in `text`,
/// in taxonomy order, without duplicates.
pub fn find_skills(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let found: BTreeSet<usize> = SKILL_MATCHER
        .find_overlapping_iter(&lowered)
        .map(|m| m.pattern().as_usize())
        .collect();

    found
        .into_iter()
        .map(|idx| SKILL_KEYWORDS[idx].to_string())
        .collect()
}

/// Number of job-title words contained in `text` (case-insensitive).
pub fn job_title_hits(text: &str) -> usize {
    let lowered = text.to_lowercase();
    JOB_TITLE_WORDS.iter().filter(|w| lowered.contains(*w)).count()
}

pub fn tech_term_hits(text: &str) -> usize {
    let lowered = text.to_lowercase();
    TECH_TERMS.iter().filter(|t| lowered.contains(*t)).count()
}
