//! Telemetry export adapters
//!
//! This module provides adapters that split a raw instrument export into its
//! sections and return them as raw, string-valued rows.

pub mod header;
mod peach;
pub mod row;
pub mod section;

pub use peach::{PeachCsvAdapter, SectionExtractor};
pub use section::Section;

use crate::types::ParsedData;

/// Trait for instrument export adapters
pub trait ExportAdapter {
    /// Split raw export text into sections
    ///
    /// Never fails: missing sections and malformed rows produce empty
    /// containers rather than errors.
    fn parse(&self, raw_text: &str) -> ParsedData;
}
