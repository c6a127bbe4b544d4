//! Unified error handling for the aidelog workflow
//!
//! Every failure of a pipeline run maps to exactly one variant here, each
//! carrying enough context (path, exit code, or reason) to diagnose the run
//! without re-executing it. All conditions are terminal: the workflow never
//! retries a failed step.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for a pipeline run
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required file was absent before the run started
    #[error("required file missing before run: {path}")]
    ConfigurationMissing { path: PathBuf },

    /// The external integrity check failed or produced no report
    #[error("integrity check failed: {reason}")]
    CheckFailed { reason: String },

    /// The report failed structural validation during parsing
    #[error("malformed report: {reason}")]
    MalformedReport { reason: String },

    /// The staged JSON record vanished before publication
    #[error("publish failed: staged record missing at {path}")]
    PublishFailed { path: PathBuf },

    /// The external database update failed or produced no new baseline
    #[error("baseline update failed: {reason}")]
    UpdateFailed { reason: String },
}

/// Result type using the unified WorkflowError
pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;

impl WorkflowError {
    /// Create a `CheckFailed` error
    pub fn check_failed(reason: impl Into<String>) -> Self {
        WorkflowError::CheckFailed {
            reason: reason.into(),
        }
    }

    /// Create a `MalformedReport` error
    pub fn malformed_report(reason: impl Into<String>) -> Self {
        WorkflowError::MalformedReport {
            reason: reason.into(),
        }
    }

    /// Create an `UpdateFailed` error
    pub fn update_failed(reason: impl Into<String>) -> Self {
        WorkflowError::UpdateFailed {
            reason: reason.into(),
        }
    }

    /// Process exit code for this condition, for scriptability.
    ///
    /// Success is 0; each failure condition gets a distinct code so cron
    /// wrappers and monitoring can tell them apart.
    pub fn exit_code(&self) -> i32 {
        match self {
            WorkflowError::Io(_) => 1,
            WorkflowError::ConfigurationMissing { .. } => 2,
            WorkflowError::CheckFailed { .. } => 3,
            WorkflowError::MalformedReport { .. } => 4,
            WorkflowError::PublishFailed { .. } => 5,
            WorkflowError::UpdateFailed { .. } => 6,
        }
    }

    /// Check if this error left a published record behind (step 6 failures)
    pub fn is_resumable(&self) -> bool {
        matches!(self, WorkflowError::UpdateFailed { .. })
    }
}
