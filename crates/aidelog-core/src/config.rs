//! Pipeline configuration
//!
//! All file paths and tunables used by the workflow live here as an
//! explicit structure handed to both the parser and the orchestrator.
//! Defaults match a stock AIDE installation on Linux.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default location of the freshly generated baseline database.
pub const DEFAULT_DB_NEW: &str = "/var/lib/aide/aide.db.new.gz";

/// Default location of the active baseline database.
pub const DEFAULT_DB_CURRENT: &str = "/var/lib/aide/aide.db.gz";

/// Default location of the text report written by `aide --check`.
pub const DEFAULT_REPORT_SOURCE: &str = "/var/log/aide/aide.log";

/// Default staging path for the JSON record before publication.
pub const DEFAULT_REPORT_TEMP: &str = "/var/log/aide/aide_temp.json";

/// Default final destination of the JSON record.
pub const DEFAULT_REPORT_DEST: &str = "/var/log/aide/aide.json";

/// Default truncation limit for entry paths, in characters.
///
/// The downstream log ingestor has bounded field widths; paths longer than
/// this are shortened with a trailing `...` marker.
pub const DEFAULT_MAX_ENTRY_LENGTH: usize = 100;

/// Name of the external AIDE executable.
pub const DEFAULT_AIDE_PROGRAM: &str = "aide";

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Baseline database produced by `aide --update`.
    pub db_new: PathBuf,

    /// Active baseline database consumed by `aide --check`.
    pub db_current: PathBuf,

    /// Text report written by `aide --check`.
    pub report_source: PathBuf,

    /// Staging path the JSON record is written to before the rename.
    pub report_temp: PathBuf,

    /// Final destination of the JSON record.
    pub report_dest: PathBuf,

    /// External AIDE executable (name or absolute path).
    pub aide_program: String,

    /// Maximum entry path length in the published record, in characters.
    pub max_entry_length: usize,

    /// Bounded wait for the external check/update commands.
    ///
    /// `None` means wait indefinitely, matching historical behavior.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub command_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_new: PathBuf::from(DEFAULT_DB_NEW),
            db_current: PathBuf::from(DEFAULT_DB_CURRENT),
            report_source: PathBuf::from(DEFAULT_REPORT_SOURCE),
            report_temp: PathBuf::from(DEFAULT_REPORT_TEMP),
            report_dest: PathBuf::from(DEFAULT_REPORT_DEST),
            aide_program: DEFAULT_AIDE_PROGRAM.to_string(),
            max_entry_length: DEFAULT_MAX_ENTRY_LENGTH,
            command_timeout: None,
        }
    }
}
