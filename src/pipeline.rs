//! Pipeline orchestration
//!
//! This module provides the public API for Peach Flux.
//! It wires the export adapter, normalizer and analysis stages together.

use crate::adapters::{ExportAdapter, PeachCsvAdapter};
use crate::averages::aggregate;
use crate::config::FluxConfig;
use crate::error::Result;
use crate::force_curve::force_curve_for_stroke;
use crate::import::{import_session, ImportOptions};
use crate::normalizer::Normalizer;
use crate::periodic::periodic_window;
use crate::types::{
    Athlete, ForceCurve, ParsedData, PeriodicQuery, PeriodicRecord, PeriodicWindow, PieceAverages,
    SessionImport, StrokeRecord,
};

/// Split a raw PowerLine export into its sections.
///
/// # Example
/// ```ignore
/// let parsed = parse_export(&std::fs::read_to_string("session.csv")?);
/// println!("{} stroke rows", parsed.stroke_metrics.len());
/// ```
pub fn parse_export(raw_text: &str) -> ParsedData {
    PeachCsvAdapter::default().parse(raw_text)
}

/// Parse a raw export and assemble its import bundle.
///
/// Pipeline stages:
/// 1. PeachCsvAdapter - Split the export into raw sections
/// 2. Normalizer - Convert stroke and periodic rows to records
/// 3. SessionImporter - Build session, athlete and piece records
pub fn import_export(raw_text: &str, options: &ImportOptions) -> SessionImport {
    let parsed = parse_export(raw_text);
    import_session(&parsed, options)
}

/// Normalized stroke records of a raw export.
pub fn strokes_from_export(raw_text: &str) -> Vec<StrokeRecord> {
    Normalizer::strokes(&parse_export(raw_text))
}

/// Processor carrying parser and analysis settings across calls.
#[derive(Debug, Clone, Default)]
pub struct FluxProcessor {
    config: FluxConfig,
    adapter: PeachCsvAdapter,
}

impl FluxProcessor {
    /// Create a new processor with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with explicit settings
    pub fn with_config(config: FluxConfig) -> Self {
        Self {
            adapter: PeachCsvAdapter::new(config.parser.clone()),
            config,
        }
    }

    /// Create a processor from a JSON configuration document
    pub fn from_config_json(json: &str) -> Result<Self> {
        Ok(Self::with_config(FluxConfig::from_json(json)?))
    }

    pub fn config(&self) -> &FluxConfig {
        &self.config
    }

    /// Split a raw export into its sections
    pub fn parse(&self, raw_text: &str) -> ParsedData {
        self.adapter.parse(raw_text)
    }

    /// Parse a raw export and assemble its import bundle
    pub fn import(&self, raw_text: &str, options: &ImportOptions) -> SessionImport {
        import_session(&self.parse(raw_text), options)
    }

    /// Per-athlete and piece-level averages
    pub fn averages(&self, athletes: &[Athlete], strokes: &[StrokeRecord]) -> Result<PieceAverages> {
        aggregate(athletes, strokes)
    }

    /// Force curve for one stroke, using the configured window
    pub fn force_curve(
        &self,
        strokes: &[StrokeRecord],
        periodic: &[PeriodicRecord],
        stroke_number: i64,
    ) -> Result<ForceCurve> {
        force_curve_for_stroke(strokes, periodic, stroke_number, &self.config.analysis)
    }

    /// Time-windowed, downsampled periodic series
    pub fn periodic_window(
        &self,
        periodic: &[PeriodicRecord],
        query: &PeriodicQuery,
    ) -> Result<PeriodicWindow> {
        periodic_window(periodic, query)
    }
}
