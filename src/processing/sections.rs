//! Line-by-line section scanning.
//!
//! A scan looks for the heading that opens a section, collects entries until
//! a heading of any other known section appears, and then stops. Each line is
//! classified first and the classification alone drives the state machine:
//!
//! ```text
//! Outside  --SectionHeader-->  InSection
//! InSection --EntryStart-->    Building(entry)
//! Building --EntryStart-->     Building(next)       (previous entry emitted)
//! Building --Plain-->          Building(extended)
//! any      --OtherHeader-->    Done                 (open entry emitted)
//! ```

use log::debug;
use regex::Regex;

/// Describes one kind of section: how it starts, what ends it, and how its
/// lines turn into entries.
pub trait SectionRules {
    type Entry;

    fn section_header(&self) -> &Regex;

    fn other_header(&self) -> &Regex;

    /// Returns a fresh entry when `line` opens one.
    fn entry_start(&self, line: &str) -> Option<Self::Entry>;

    /// Folds a non-opening line into the entry being built.
    fn extend(&self, entry: &mut Self::Entry, line: &str);
}

#[derive(Debug)]
pub enum LineKind<E> {
    SectionHeader,
    OtherHeader,
    EntryStart(E),
    Plain,
}

#[derive(Debug)]
enum ScanState<E> {
    Outside,
    InSection,
    Building(E),
    Done,
}

fn classify<R: SectionRules>(rules: &R, line: &str, in_section: bool) -> LineKind<R::Entry> {
    if rules.section_header().is_match(line) {
        return LineKind::SectionHeader;
    }
    if !in_section {
        return LineKind::Plain;
    }
    if rules.other_header().is_match(line) {
        return LineKind::OtherHeader;
    }
    match rules.entry_start(line) {
        Some(entry) => LineKind::EntryStart(entry),
        None => LineKind::Plain,
    }
}

/// Run the section scan over `text` and return entries in document order.
pub fn scan<R: SectionRules>(rules: &R, text: &str) -> Vec<R::Entry> {
    let mut entries = Vec::new();
    let mut state = ScanState::Outside;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let in_section = !matches!(state, ScanState::Outside);

        state = match (state, classify(rules, line, in_section)) {
            (ScanState::Outside, LineKind::SectionHeader) => ScanState::InSection,
            (ScanState::Outside, _) => ScanState::Outside,
            (ScanState::InSection, LineKind::SectionHeader) => ScanState::InSection,
            (ScanState::Building(entry), LineKind::SectionHeader) => ScanState::Building(entry),
            (ScanState::InSection, LineKind::OtherHeader) => ScanState::Done,
            (ScanState::Building(entry), LineKind::OtherHeader) => {
                entries.push(entry);
                ScanState::Done
            }
            (ScanState::InSection, LineKind::EntryStart(next)) => ScanState::Building(next),
            (ScanState::Building(entry), LineKind::EntryStart(next)) => {
                entries.push(entry);
                ScanState::Building(next)
            }
            (ScanState::InSection, LineKind::Plain) => ScanState::InSection,
            (ScanState::Building(mut entry), LineKind::Plain) => {
                rules.extend(&mut entry, line);
                ScanState::Building(entry)
            }
            (ScanState::Done, _) => ScanState::Done,
        };

        if matches!(state, ScanState::Done) {
            break;
        }
    }

    if let ScanState::Building(entry) = state {
        entries.push(entry);
    }

    debug!("Section scan produced {} entries", entries.len());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BulletRules {
        header: Regex,
        other: Regex,
    }

    impl SectionRules for BulletRules {
        type Entry = Vec<String>;

        fn section_header(&self) -> &Regex {
            &self.header
        }

        fn other_header(&self) -> &Regex {
            &self.other
        }

        fn entry_start(&self, line: &str) -> Option<Self::Entry> {
            line.strip_prefix("* ").map(|rest| vec![rest.to_string()])
        }

        fn extend(&self, entry: &mut Self::Entry, line: &str) {
            entry.push(line.to_string());
        }
    }

    fn rules() -> BulletRules {
        BulletRules {
            header: Regex::new(r"(?i)^projects").unwrap(),
            other: Regex::new(r"(?i)^(skills|education)").unwrap(),
        }
    }

    #[test]
    fn test_scan_groups_lines_under_entries() {
        let text = "Intro line\nProjects\norphan line\n* First\n  detail a\n* Second\ndetail b\n\nSkills\n* Ignored";
        let entries = scan(&rules(), text);

        assert_eq!(
            entries,
            vec![
                vec!["First".to_string(), "detail a".to_string()],
                vec!["Second".to_string(), "detail b".to_string()],
            ]
        );
    }

    #[test]
    fn test_scan_without_header_yields_nothing() {
        assert!(scan(&rules(), "* First\n* Second").is_empty());
    }

    #[test]
    fn test_repeated_header_keeps_open_entry() {
        let entries = scan(&rules(), "Projects\n* One\nProjects (continued)\nmore");
        assert_eq!(entries, vec![vec!["One".to_string(), "more".to_string()]]);
    }

    #[test]
    fn test_other_header_before_any_entry_stops_scan() {
        assert!(scan(&rules(), "Projects\nEducation\n* Late").is_empty());
    }
}
