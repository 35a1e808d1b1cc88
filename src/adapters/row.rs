//! Row classification
//!
//! Data rows are told apart from headers, blank lines and stray labels by their
//! first field alone: a timestamp or stroke index made only of digits once the
//! decimal point and sign are removed.

use crate::config::ParserConfig;

/// What a line inside a section turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A numeric data row
    Data,
    /// The marker line of another section
    SectionMarker,
    /// Anything else: header rows, blank lines, labels
    Noise,
}

/// Classifies split lines
pub struct RowClassifier<'a> {
    config: &'a ParserConfig,
}

impl<'a> RowClassifier<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self { config }
    }

    /// Classify a raw (unsplit) line of a stroke or periodic section
    pub fn classify(&self, line: &str) -> RowKind {
        if line.starts_with(&self.config.sentinel) {
            return RowKind::SectionMarker;
        }
        let fields = split_fields(line);
        if self.is_data_row(&fields) {
            RowKind::Data
        } else {
            RowKind::Noise
        }
    }

    /// Digit-prefix rule for stroke and periodic rows
    pub fn is_data_row(&self, fields: &[&str]) -> bool {
        let Some(first) = fields.first() else {
            return false;
        };
        let ignored = &self.config.data_row_ignored_chars;
        let mut digits = first.chars().filter(|c| !ignored.contains(*c)).peekable();
        digits.peek().is_some() && digits.all(|c| c.is_ascii_digit())
    }

    /// Crew rows only need a non-blank first field
    pub fn is_crew_row(&self, fields: &[&str]) -> bool {
        fields.first().is_some_and(|first| !first.trim().is_empty())
    }

    /// Rig rows start with an unmodified seat number
    pub fn is_rig_row(&self, fields: &[&str]) -> bool {
        fields.first().is_some_and(|first| is_all_digits(first))
    }
}

/// Trim a line and split it on commas
pub fn split_fields(line: &str) -> Vec<&str> {
    line.trim().split(',').collect()
}

/// Non-empty and ASCII digits only
pub fn is_all_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}
