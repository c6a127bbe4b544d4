//! AIDE report parser
//!
//! Turns the free-text audit report written by `aide --check` into a
//! fixed-schema [`ParsedRecord`] in a single forward pass:
//! - Structural validation of the start/end markers and the banner line
//! - An explicit section state machine for added/removed/changed entries
//! - Summary counter extraction
//! - Path truncation for downstream ingestors with bounded field widths

pub mod record;
pub mod report;

pub use record::ParsedRecord;
pub use report::{
    truncate_entry, LineClass, ParseError, ParseResult, ReportParser, Section, SummaryField,
    MIN_ENTRY_LENGTH,
};
