//! Structured record schema for a parsed AIDE report
//!
//! Field names and constants follow the downstream log ingestor's contract;
//! optional summary counters are omitted from the JSON entirely (not null)
//! when their line was absent from the report.

use serde::{Deserialize, Serialize};

/// Severity tag expected by the ingestor.
pub const SEVERITY: &str = "LOG";

/// Application name tag expected by the ingestor.
pub const APPLICATION_NAME: &str = "AIDE";

/// Backend type tag expected by the ingestor.
pub const BACKEND_TYPE: &str = "log_analyzer";

/// Fixed message line carried by every record.
pub const MESSAGE: &str = "AIDE Log Analysis";

/// One fully parsed AIDE report.
///
/// Built fresh per parse, populated in a single pass, then handed off
/// immutably to the publishing step. `timestamp` is the capture time of the
/// parse, not a value read from the report; it is always set by the time a
/// record is returned, because structural validation guarantees the start
/// marker is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// Capture time of the parse, UTC, `YYYY-MM-DD HH:MM:SS.mmm`.
    pub timestamp: String,

    pub error_severity: String,
    pub application_name: String,
    pub backend_type: String,

    /// Paths added since the baseline, in report order, truncated.
    pub added_entries: Vec<String>,

    /// Paths removed since the baseline, in report order, truncated.
    pub removed_entries: Vec<String>,

    /// Paths changed since the baseline, in report order, truncated.
    pub changed_entries: Vec<String>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_entries: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub added_summary: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub removed_summary: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub changed_summary: Option<u64>,
}

impl ParsedRecord {
    /// Create an empty record carrying the fixed ingestor metadata.
    pub fn new() -> Self {
        Self {
            timestamp: String::new(),
            error_severity: SEVERITY.to_string(),
            application_name: APPLICATION_NAME.to_string(),
            backend_type: BACKEND_TYPE.to_string(),
            added_entries: Vec::new(),
            removed_entries: Vec::new(),
            changed_entries: Vec::new(),
            message: MESSAGE.to_string(),
            total_entries: None,
            added_summary: None,
            removed_summary: None,
            changed_summary: None,
        }
    }

    /// Serialize to the published wire form: compact single-line JSON,
    /// newline-terminated.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Total number of entry paths across all three sections.
    pub fn entry_count(&self) -> usize {
        self.added_entries.len() + self.removed_entries.len() + self.changed_entries.len()
    }
}

impl Default for ParsedRecord {
    fn default() -> Self {
        Self::new()
    }
}
