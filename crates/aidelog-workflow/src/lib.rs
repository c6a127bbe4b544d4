//! aidelog workflow orchestration
//!
//! Sequences the external AIDE executable, the report parser, and the
//! filesystem into a fail-fast pipeline:
//! check → parse → publish record → update baseline.
//!
//! External collaborators (process execution, filesystem) sit behind narrow
//! traits so the pipeline is testable without a real system.

pub mod fs;
pub mod pipeline;
pub mod process;

pub use fs::{Filesystem, SystemFs};
pub use pipeline::Workflow;
pub use process::{ProcessRunner, RunOutput, SystemRunner};
