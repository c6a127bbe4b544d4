//! The six-step pipeline
//!
//! Every step is gated on the previous one succeeding; any failure is
//! terminal for the run (no retries). Aborts before the publish step leave
//! no record and an untouched baseline. An abort during the baseline update
//! leaves a freshly published record next to the old baseline; re-running
//! the workflow re-checks and re-attempts the update.

use std::io;

use tracing::{info, warn};

use aidelog_core::{Config, WorkflowError, WorkflowResult};
use aidelog_parser::{ParsedRecord, ReportParser};

use crate::fs::{Filesystem, SystemFs};
use crate::process::{ProcessRunner, SystemRunner};

/// Highest `aide --check` exit code still counted as success.
///
/// AIDE encodes which change classes were found in exit-code bits 0-2
/// (1 new, 2 removed, 4 changed), so 0..=7 covers everything from a clean
/// run to all three classes at once. Codes above that are real errors.
const CHECK_EXIT_MAX: i32 = 7;

/// The check/parse/publish/update workflow over pluggable collaborators.
pub struct Workflow<R, F> {
    config: Config,
    runner: R,
    fs: F,
}

impl Workflow<SystemRunner, SystemFs> {
    /// Workflow wired to the real system, honoring the configured command
    /// timeout.
    pub fn system(config: Config) -> Self {
        let runner = match config.command_timeout {
            Some(timeout) => SystemRunner::with_timeout(timeout),
            None => SystemRunner::new(),
        };
        Self::new(config, runner, SystemFs)
    }
}

impl<R: ProcessRunner, F: Filesystem> Workflow<R, F> {
    pub fn new(config: Config, runner: R, fs: F) -> Self {
        Self { config, runner, fs }
    }

    /// Run the full pipeline and return the published record.
    pub fn run(&self) -> WorkflowResult<ParsedRecord> {
        self.verify_preconditions()?;
        self.run_check()?;
        let record = self.parse_report()?;
        self.publish(&record)?;
        self.update_baseline()?;

        info!(
            entries = record.entry_count(),
            dest = %self.config.report_dest.display(),
            "workflow completed"
        );
        Ok(record)
    }

    /// Step 1: the active baseline and the report path must already exist.
    fn verify_preconditions(&self) -> WorkflowResult<()> {
        for path in [&self.config.db_current, &self.config.report_source] {
            if !self.fs.exists(path) {
                return Err(WorkflowError::ConfigurationMissing { path: path.clone() });
            }
        }
        Ok(())
    }

    /// Steps 2-3: run `aide --check` and require the report afterwards.
    fn run_check(&self) -> WorkflowResult<()> {
        let program = &self.config.aide_program;
        let output = self
            .runner
            .run(program, &["--check"])
            .map_err(|e| WorkflowError::check_failed(format!("failed to execute {program}: {e}")))?;

        if !output.code_within(CHECK_EXIT_MAX) {
            return Err(WorkflowError::check_failed(format!(
                "{program} --check exited with {:?}: {}",
                output.exit_code,
                output.stderr.trim()
            )));
        }
        info!(exit_code = ?output.exit_code, "integrity check finished");

        if !self.fs.exists(&self.config.report_source) {
            return Err(WorkflowError::check_failed(format!(
                "report {} not found after check",
                self.config.report_source.display()
            )));
        }
        Ok(())
    }

    /// Step 4: parse the report into a structured record.
    fn parse_report(&self) -> WorkflowResult<ParsedRecord> {
        let text = self.fs.read_to_string(&self.config.report_source)?;
        ReportParser::with_max_entry_length(self.config.max_entry_length)
            .parse(&text)
            .map_err(|e| WorkflowError::malformed_report(e.to_string()))
    }

    /// Step 5: stage the JSON record, then rename it into place.
    fn publish(&self, record: &ParsedRecord) -> WorkflowResult<()> {
        let line = record
            .to_json_line()
            .map_err(|e| WorkflowError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        self.fs.write(&self.config.report_temp, &line)?;
        if !self.fs.exists(&self.config.report_temp) {
            return Err(WorkflowError::PublishFailed {
                path: self.config.report_temp.clone(),
            });
        }
        self.fs.rename(&self.config.report_temp, &self.config.report_dest)?;

        info!(dest = %self.config.report_dest.display(), "record published");
        Ok(())
    }

    /// Step 6: run `aide --update` and rotate the new baseline into place.
    ///
    /// The update exit code is deliberately not classified: like the check,
    /// it encodes detected change classes, and the only postcondition that
    /// matters is the presence of the new database.
    fn update_baseline(&self) -> WorkflowResult<()> {
        let program = &self.config.aide_program;
        if let Err(e) = self.runner.run(program, &["--update"]) {
            return Err(WorkflowError::update_failed(format!(
                "failed to execute {program}: {e}"
            )));
        }

        if !self.fs.exists(&self.config.db_new) {
            warn!(
                "published record will be out of step with the baseline until a re-run succeeds"
            );
            return Err(WorkflowError::update_failed(format!(
                "new baseline {} not found after update",
                self.config.db_new.display()
            )));
        }

        self.fs.rename(&self.config.db_new, &self.config.db_current)?;
        info!(db = %self.config.db_current.display(), "baseline updated");
        Ok(())
    }
}
