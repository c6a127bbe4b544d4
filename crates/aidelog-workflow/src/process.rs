//! Synchronous process execution
//!
//! The pipeline shells out to the external `aide` executable twice. The
//! [`ProcessRunner`] trait is the seam; [`SystemRunner`] is the real
//! implementation, with an optional bounded wait so a wedged checker cannot
//! hang an unattended run forever.

use std::io;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

/// Outcome of one external command.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Process exit code; `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    /// Whether the exit code falls inside `0..=max_code`.
    pub fn code_within(&self, max_code: i32) -> bool {
        matches!(self.exit_code, Some(code) if (0..=max_code).contains(&code))
    }
}

/// Narrow contract for running external commands synchronously.
pub trait ProcessRunner {
    /// Run `program` with `args`, blocking until exit, and return the exit
    /// code plus captured output. `Err` means the command could not be
    /// executed or was cut off (spawn failure, timeout); a non-zero exit
    /// code is an `Ok` result for the caller to classify.
    fn run(&self, program: &str, args: &[&str]) -> io::Result<RunOutput>;
}

impl<T: ProcessRunner + ?Sized> ProcessRunner for &T {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<RunOutput> {
        (**self).run(program, args)
    }
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Runner that waits indefinitely.
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Runner that kills the child after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    fn run_bounded(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> io::Result<RunOutput> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Poll rather than block: std has no native wait-with-timeout.
        // Pipes are drained only after exit; aide keeps stdout small (the
        // report goes to a file), so this cannot back up in practice.
        let deadline = Instant::now() + timeout;
        let timed_out = loop {
            match child.try_wait()? {
                Some(_) => break false,
                None if Instant::now() >= deadline => {
                    child.kill()?;
                    break true;
                }
                None => std::thread::sleep(Duration::from_millis(100)),
            }
        };

        let output = child.wait_with_output()?;
        if timed_out {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("{program} exceeded timeout of {timeout:?}"),
            ));
        }

        Ok(RunOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<RunOutput> {
        debug!(program, ?args, "running external command");

        if let Some(timeout) = self.timeout {
            return self.run_bounded(program, args, timeout);
        }

        let output = Command::new(program).args(args).stdin(Stdio::null()).output()?;
        Ok(RunOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
