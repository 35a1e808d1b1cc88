//! Core types for the Peach Flux pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw section content, the parsed document, normalized stroke and
//! periodic records, analysis outputs, and the session import bundle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of seats in the largest boat the instrument records
pub const SEAT_COUNT: usize = 8;

/// One value per seat; index 0 is seat 1
pub type SeatValues = [Option<f64>; SEAT_COUNT];

/// A raw row: column name to unconverted string value, ordered by column name
pub type RawRow = BTreeMap<String, String>;

/// A crew row, guaranteed to carry non-empty `Position` and `Name`
pub type CrewRow = RawRow;

/// Raw content of one section, tagged by the section's shape
#[derive(Debug, Clone, PartialEq)]
pub enum RawSection {
    /// One header line zipped with one value line
    Flat(RawRow),
    /// One header line followed by repeated value rows
    Repeated(Vec<RawRow>),
    /// Two merged header lines followed by data rows
    Tabular {
        columns: Vec<String>,
        rows: Vec<RawRow>,
    },
}

impl RawSection {
    /// Flat content, or an empty map for any other shape
    pub fn into_flat(self) -> RawRow {
        match self {
            RawSection::Flat(map) => map,
            _ => RawRow::new(),
        }
    }

    /// Row content of a repeated or tabular section
    pub fn into_rows(self) -> Vec<RawRow> {
        match self {
            RawSection::Repeated(rows) | RawSection::Tabular { rows, .. } => rows,
            RawSection::Flat(_) => Vec::new(),
        }
    }
}

/// Seat/side assignment from the Rig Info section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigRow {
    /// Seat position as written in the export (digits only)
    pub position: String,
    /// Rowing side (e.g. "Port", "Stbd"), absent when the row has one column
    pub side: Option<String>,
}

/// Everything extracted from one export, with values still as strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedData {
    pub file_info: RawRow,
    pub crew: Vec<CrewRow>,
    pub rig_info: Vec<RigRow>,
    pub piece_info: RawRow,
    pub stroke_metrics: Vec<RawRow>,
    pub periodic_data: Vec<RawRow>,
}

/// Normalized per-stroke metrics for every seat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeRecord {
    pub time_ms: Option<i64>,
    pub stroke_number: Option<i64>,
    /// Stroke rate (strokes per minute)
    pub rating: Option<f64>,
    /// Boat speed averaged over the stroke (m/s)
    pub avg_boat_speed: Option<f64>,
    /// Distance travelled per stroke (m)
    pub distance_per_stroke: Option<f64>,
    /// Crew average power (W)
    pub average_power: Option<f64>,
    pub swivel_power: SeatValues,
    pub min_angle: SeatValues,
    pub max_angle: SeatValues,
    pub catch_slip: SeatValues,
    pub finish_slip: SeatValues,
    pub drive_time: SeatValues,
    pub recovery_time: SeatValues,
    pub work_pc_q1: SeatValues,
    pub work_pc_q2: SeatValues,
    pub work_pc_q3: SeatValues,
    pub work_pc_q4: SeatValues,
}

/// Normalized high-frequency sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodicRecord {
    pub time_ms: Option<i64>,
    /// Position within the stroke cycle
    pub normalized_time: Option<f64>,
    pub speed: Option<f64>,
    pub distance: Option<f64>,
    pub accel: Option<f64>,
    pub gate_angle: SeatValues,
    pub gate_force_x: SeatValues,
    pub gate_angle_vel: SeatValues,
}

/// An athlete occupying a seat for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Athlete {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub session_id: String,
    /// 1-based seat position
    pub seat_position: u32,
    pub name: String,
    #[serde(default)]
    pub side: Option<String>,
}

/// Per-athlete averages over a piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteAverage {
    pub seat_position: u32,
    pub name: String,
    pub avg_power: Option<f64>,
    pub avg_stroke_length: Option<f64>,
    pub avg_effective_length: Option<f64>,
    pub avg_catch_slip: Option<f64>,
    pub avg_finish_slip: Option<f64>,
    pub avg_drive_time: Option<f64>,
    pub avg_recovery_time: Option<f64>,
}

/// Piece-level summary across all athletes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceAverages {
    pub total_strokes: usize,
    pub avg_rating: Option<f64>,
    pub avg_boat_speed: Option<f64>,
    pub athletes: Vec<AthleteAverage>,
    /// Mean of the per-athlete average powers that are present
    pub crew_avg_power: Option<f64>,
}

/// Periodic samples spanning one stroke cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceCurve {
    pub stroke_number: i64,
    pub stroke_time_ms: i64,
    pub data_points: usize,
    pub data: Vec<PeriodicRecord>,
}

/// Time window and stride applied to a periodic series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicQuery {
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
    pub downsample: usize,
}

impl Default for PeriodicQuery {
    fn default() -> Self {
        Self {
            start_ms: None,
            end_ms: None,
            downsample: 1,
        }
    }
}

/// Result of a periodic query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicWindow {
    pub total_points: usize,
    pub data: Vec<PeriodicRecord>,
}

/// Session metadata derived from File Info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub name: String,
    pub filename: Option<String>,
    pub serial_number: Option<String>,
    pub start_time: Option<String>,
    pub boat_seats: u32,
    pub imported_at: DateTime<Utc>,
}

/// Piece metadata derived from Piece Info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceRecord {
    pub id: String,
    pub session_id: String,
    pub piece_number: u32,
    pub name: Option<String>,
    pub start_time_ms: Option<i64>,
    pub end_time_ms: Option<i64>,
    pub duration: Option<String>,
    pub distance_meters: Option<f64>,
    pub avg_rating: Option<f64>,
    pub pace: Option<String>,
}

/// Everything the storage collaborator persists for one uploaded export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionImport {
    pub session: SessionRecord,
    pub athletes: Vec<Athlete>,
    pub piece: PieceRecord,
    pub strokes: Vec<StrokeRecord>,
    pub periodic: Vec<PeriodicRecord>,
}

/// Short report of an import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub session_id: String,
    pub session_name: String,
    pub pieces_created: u32,
    pub stroke_count: usize,
    pub athletes: Vec<Athlete>,
}

impl SessionImport {
    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            session_id: self.session.id.clone(),
            session_name: self.session.name.clone(),
            pieces_created: 1,
            stroke_count: self.strokes.len(),
            athletes: self.athletes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_arrays_serialize_as_nullable_arrays() {
        let mut record = StrokeRecord::default();
        record.swivel_power[0] = Some(250.5);
        let json = serde_json::to_value(&record).unwrap();

        let power = json["swivel_power"].as_array().unwrap();
        assert_eq!(power.len(), SEAT_COUNT);
        assert_eq!(power[0], 250.5);
        assert!(power[7].is_null());
        assert!(json["time_ms"].is_null());
    }

    #[test]
    fn test_raw_section_accessors() {
        let mut row = RawRow::new();
        row.insert("Time".to_string(), "10".to_string());

        let tabular = RawSection::Tabular {
            columns: vec!["Time".to_string()],
            rows: vec![row.clone()],
        };
        assert_eq!(tabular.into_rows(), vec![row.clone()]);
        assert!(RawSection::Flat(row).into_rows().is_empty());
        assert!(RawSection::Repeated(vec![]).into_flat().is_empty());
    }

    #[test]
    fn test_athlete_deserializes_without_ids() {
        let athlete: Athlete =
            serde_json::from_str(r#"{"seat_position": 3, "name": "Kim"}"#).unwrap();
        assert_eq!(athlete.seat_position, 3);
        assert!(athlete.id.is_empty());
        assert_eq!(athlete.side, None);
    }
}
