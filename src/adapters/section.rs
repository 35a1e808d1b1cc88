//! Section location
//!
//! A PowerLine export is a flat list of comma-separated lines. Sections are
//! introduced by a marker line containing `#ERROR!,<Section Name>` and run until
//! the next line that starts with the sentinel.

use crate::config::ParserConfig;

/// Named sections of a PowerLine export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    FileInfo,
    CrewInfo,
    RigInfo,
    Piece,
    StrokeMetrics,
    Periodic,
}

impl Section {
    /// Token following the sentinel on the marker line
    pub fn token(&self) -> &'static str {
        match self {
            Section::FileInfo => "File Info",
            Section::CrewInfo => "Crew Info",
            Section::RigInfo => "Rig Info",
            Section::Piece => "Piece",
            Section::StrokeMetrics => "Aperiodic,0x800A",
            Section::Periodic => "Periodic",
        }
    }

    /// Number of header lines between the marker and the first data row
    pub fn header_rows(&self) -> usize {
        match self {
            Section::FileInfo | Section::CrewInfo | Section::Piece => 1,
            Section::RigInfo | Section::StrokeMetrics | Section::Periodic => 2,
        }
    }

    /// Whether the body ends at the next marker; periodic data runs to end of input
    pub fn stops_at_marker(&self) -> bool {
        !matches!(self, Section::Periodic)
    }
}

/// Finds section markers in a line sequence
pub struct SectionLocator<'a> {
    config: &'a ParserConfig,
}

impl<'a> SectionLocator<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self { config }
    }

    /// Index of the first line containing the section marker
    pub fn find(&self, lines: &[&str], section: Section) -> Option<usize> {
        self.find_token(lines, section.token())
    }

    /// Index of the first line containing `<sentinel>,<token>`
    pub fn find_token(&self, lines: &[&str], token: &str) -> Option<usize> {
        let marker = self.config.marker_for(token);
        lines.iter().position(|line| line.contains(&marker))
    }

    /// Whether a line starts a new section
    pub fn is_marker_line(&self, line: &str) -> bool {
        line.starts_with(&self.config.sentinel)
    }

    /// Line range `[start, end)` holding the section's body
    ///
    /// `marker` is the marker line index; the body starts after the header rows.
    pub fn body_range(&self, lines: &[&str], marker: usize, section: Section) -> (usize, usize) {
        let start = (marker + 1 + section.header_rows()).min(lines.len());
        if !section.stops_at_marker() {
            return (start, lines.len());
        }
        let end = lines[start..]
            .iter()
            .position(|line| self.is_marker_line(line))
            .map_or(lines.len(), |offset| start + offset);
        (start, end)
    }
}
