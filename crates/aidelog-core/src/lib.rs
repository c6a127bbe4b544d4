//! aidelog Core Library
//!
//! This crate provides the configuration structure and the unified
//! workflow error taxonomy shared by the parser and orchestrator crates.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{WorkflowError, WorkflowResult};

/// Re-export commonly used items
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{WorkflowError, WorkflowResult};
}
