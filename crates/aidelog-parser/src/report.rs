//! Report parsing: structural validation, line classification, and the
//! section state machine
//!
//! The AIDE report is strictly ordered (headers never recur out of order,
//! sections never nest), so a single forward pass with an explicit state
//! variable is sufficient. Every line is classified into exactly one
//! [`LineClass`]; the state transition is a total function over the
//! classification, which keeps each transition testable in isolation.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use aidelog_core::config::DEFAULT_MAX_ENTRY_LENGTH;

use crate::record::ParsedRecord;

/// Smallest usable truncation limit: one path character plus the marker.
/// Limits below this cannot hold the fixed-total-length contract, so
/// [`truncate_entry`] clamps to it.
pub const MIN_ENTRY_LENGTH: usize = 4;

/// Marker that must open the report.
const START_MARKER: &str = "Start timestamp:";

/// Marker that must close the report.
const END_MARKER: &str = "End timestamp:";

/// Banner printed when the checker found differences.
const DIFFERENCES_BANNER: &str = "AIDE found differences between database and filesystem!!";

/// Banner printed by report variants that lead with the checker version.
const VERSION_BANNER: &str = "AIDE, version";

/// Errors from structural validation of a report
///
/// Content issues inside a structurally valid report (unparseable entry
/// lines, unknown labels) are skipped, never fatal; only these checks fail
/// a parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("report is empty")]
    EmptyReport,

    #[error("missing '{START_MARKER}' marker at report start")]
    MissingStartMarker,

    #[error("missing '{END_MARKER}' marker at report end")]
    MissingEndMarker,

    #[error("second line carries neither a differences banner nor a version banner")]
    UnrecognizedBanner,
}

/// Result type alias for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Section state of the parser.
///
/// `Initial` means no section header has been seen yet; entry lines read in
/// that state are not part of the schema and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Initial,
    Added,
    Removed,
    Changed,
}

impl Section {
    /// Section named by a header line, if the trimmed line is exactly a
    /// section header. Summary lines such as `Added entries: 2` carry the
    /// same label but extra text, and deliberately do not match.
    pub fn for_header(trimmed: &str) -> Option<Section> {
        match trimmed {
            "Added entries:" => Some(Section::Added),
            "Removed entries:" => Some(Section::Removed),
            "Changed entries:" => Some(Section::Changed),
            _ => None,
        }
    }

    /// Total transition function: a section header moves the machine to
    /// that section, every other line class leaves the state unchanged.
    pub fn transition(self, class: &LineClass) -> Section {
        match class {
            LineClass::SectionHeader(next) => *next,
            _ => self,
        }
    }
}

/// Summary counters recognized in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    Total,
    Added,
    Removed,
    Changed,
}

/// Classification of a single report line.
///
/// Variants are tried in declaration order; the first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Line containing the start marker; stamps the capture timestamp.
    StartMarker,
    /// Summary counter line, e.g. `Added entries:  2`.
    Summary(SummaryField, u64),
    /// Exact section header, e.g. `Added entries:`.
    SectionHeader(Section),
    /// Change entry line; carries the untruncated path.
    Entry(String),
    /// Anything else; ignored.
    Other,
}

/// Summary label patterns, checked in order. `Total number of entries`
/// comes first so its line is never misread as a per-section counter.
static SUMMARY_PATTERNS: Lazy<Vec<(SummaryField, Regex)>> = Lazy::new(|| {
    [
        (SummaryField::Total, "Total number of entries"),
        (SummaryField::Added, "Added entries"),
        (SummaryField::Removed, "Removed entries"),
        (SummaryField::Changed, "Changed entries"),
    ]
    .into_iter()
    .map(|(field, label)| {
        let pattern = Regex::new(&format!(r"{label}:\s+(\d+)")).expect("static summary pattern");
        (field, pattern)
    })
    .collect()
});

/// Entry line shape: a one-character type tag (`f` file, `d` directory),
/// then whitespace-and-attributes or a short flags token, a colon, and a
/// path starting with `/`. Anchored so a stray tag character elsewhere in
/// the line cannot produce a false positive.
static ENTRY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[fd](\s+.*|\s*[+\-.]+):\s*/").expect("static entry pattern"));

impl LineClass {
    /// Classify one raw report line.
    pub fn classify(line: &str) -> LineClass {
        if line.contains(START_MARKER) {
            return LineClass::StartMarker;
        }

        let trimmed = line.trim();

        for (field, pattern) in SUMMARY_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(trimmed) {
                if let Ok(value) = caps[1].parse::<u64>() {
                    return LineClass::Summary(*field, value);
                }
            }
        }

        if let Some(section) = Section::for_header(trimmed) {
            return LineClass::SectionHeader(section);
        }

        if ENTRY_PATTERN.is_match(trimmed) {
            // Path is everything after the first ": " delimiter. A matching
            // line without the delimiter is malformed content, not a
            // structural failure, so it falls through to Other.
            if let Some((_, path)) = trimmed.split_once(": ") {
                return LineClass::Entry(path.to_string());
            }
        }

        LineClass::Other
    }
}

/// Shorten `value` to at most `max_length` characters, replacing the tail
/// of longer strings with `...` so the total length is exactly
/// `max_length`. Strings at or under the limit pass through unchanged.
/// Limits below [`MIN_ENTRY_LENGTH`] are clamped to it.
pub fn truncate_entry(value: &str, max_length: usize) -> String {
    let max_length = max_length.max(MIN_ENTRY_LENGTH);
    if value.chars().count() <= max_length {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max_length.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

/// Current UTC time as `YYYY-MM-DD HH:MM:SS.mmm`, the format the downstream
/// ingestor requires.
pub fn capture_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Single-pass parser for AIDE reports.
#[derive(Debug, Clone)]
pub struct ReportParser {
    max_entry_length: usize,
}

impl ReportParser {
    /// Parser with the default truncation limit.
    pub fn new() -> Self {
        Self {
            max_entry_length: DEFAULT_MAX_ENTRY_LENGTH,
        }
    }

    /// Parser with a custom truncation limit.
    pub fn with_max_entry_length(max_entry_length: usize) -> Self {
        Self { max_entry_length }
    }

    /// Parse the full text of a report into a [`ParsedRecord`].
    ///
    /// Structural validation runs first; a report that fails it produces a
    /// [`ParseError`], never a partial record. A structurally valid report
    /// with zero change entries is a successful empty result.
    pub fn parse(&self, report: &str) -> ParseResult<ParsedRecord> {
        let lines: Vec<&str> = report.lines().collect();
        self.validate_structure(&lines)?;

        let mut record = ParsedRecord::new();
        let mut section = Section::Initial;

        for line in &lines {
            let class = LineClass::classify(line);
            match &class {
                LineClass::StartMarker => {
                    // Capture time of the parse, not the report's own clock.
                    record.timestamp = capture_timestamp();
                }
                LineClass::Summary(field, value) => match field {
                    SummaryField::Total => record.total_entries = Some(*value),
                    SummaryField::Added => record.added_summary = Some(*value),
                    SummaryField::Removed => record.removed_summary = Some(*value),
                    SummaryField::Changed => record.changed_summary = Some(*value),
                },
                LineClass::SectionHeader(_) => {}
                LineClass::Entry(path) => {
                    let truncated = truncate_entry(path, self.max_entry_length);
                    match section {
                        Section::Added => record.added_entries.push(truncated),
                        Section::Removed => record.removed_entries.push(truncated),
                        Section::Changed => record.changed_entries.push(truncated),
                        // Entries outside any section are not part of the
                        // schema.
                        Section::Initial => {}
                    }
                }
                LineClass::Other => {}
            }
            section = section.transition(&class);
        }

        debug!(
            added = record.added_entries.len(),
            removed = record.removed_entries.len(),
            changed = record.changed_entries.len(),
            "report parsed"
        );

        Ok(record)
    }

    fn validate_structure(&self, lines: &[&str]) -> ParseResult<()> {
        let first = match lines.first() {
            Some(first) => first,
            None => return Err(ParseError::EmptyReport),
        };
        if !first.starts_with(START_MARKER) {
            return Err(ParseError::MissingStartMarker);
        }

        // lines is non-empty here, so last() always yields a line.
        if !lines.last().is_some_and(|l| l.starts_with(END_MARKER)) {
            return Err(ParseError::MissingEndMarker);
        }

        match lines.get(1) {
            Some(second)
                if second.contains(DIFFERENCES_BANNER) || second.contains(VERSION_BANNER) =>
            {
                Ok(())
            }
            _ => Err(ParseError::UnrecognizedBanner),
        }
    }
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new()
    }
}
