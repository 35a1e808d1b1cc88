//! Session import assembly
//!
//! Builds the session, athlete, piece, stroke and periodic records for one
//! uploaded export. No storage happens here; the caller persists the bundle.

use crate::adapters::row::is_all_digits;
use crate::coerce::{to_float, to_int};
use crate::normalizer::{resolve_side, Normalizer};
use crate::types::{
    Athlete, ParsedData, PieceRecord, RawRow, SessionImport, SessionRecord, SEAT_COUNT,
};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// Session name used when neither the caller nor the export names one
pub const UNKNOWN_SESSION: &str = "Unknown Session";

/// Caller-supplied details of an upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Overrides the export's own session name
    pub session_name: Option<String>,
    /// Name of the uploaded file, used when File Info has no `Filename`
    pub filename: Option<String>,
}

impl ImportOptions {
    pub fn with_session_name(mut self, name: impl Into<String>) -> Self {
        self.session_name = Some(name.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Assembles a [`SessionImport`] from a parsed export
pub struct SessionImporter;

impl SessionImporter {
    pub fn import(parsed: &ParsedData, options: &ImportOptions) -> SessionImport {
        let session = Self::session(&parsed.file_info, options);
        let athletes = Self::athletes(parsed, &session.id);
        let piece = Self::piece(&parsed.piece_info, &session.id);

        let strokes: Vec<_> = Normalizer::strokes(parsed)
            .into_iter()
            .filter(|s| s.stroke_number.is_some())
            .collect();
        let periodic = Normalizer::periodic(parsed);

        let dropped = parsed.stroke_metrics.len() - strokes.len();
        if dropped > 0 {
            debug!(dropped, "Skipped stroke rows without a stroke number");
        }

        info!(
            session_id = %session.id,
            session = %session.name,
            athletes = athletes.len(),
            strokes = strokes.len(),
            periodic = periodic.len(),
            "Assembled session import"
        );

        SessionImport {
            session,
            athletes,
            piece,
            strokes,
            periodic,
        }
    }

    fn session(file_info: &RawRow, options: &ImportOptions) -> SessionRecord {
        let name = options
            .session_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| text(file_info, "Session"))
            .unwrap_or_else(|| UNKNOWN_SESSION.to_string());

        SessionRecord {
            id: new_id(),
            name,
            filename: text(file_info, "Filename").or_else(|| options.filename.clone()),
            serial_number: text(file_info, "Serial #"),
            start_time: text(file_info, "Start Time"),
            boat_seats: SEAT_COUNT as u32,
            imported_at: Utc::now(),
        }
    }

    fn athletes(parsed: &ParsedData, session_id: &str) -> Vec<Athlete> {
        parsed
            .crew
            .iter()
            .filter_map(|member| {
                let position = member.get("Position")?;
                if !is_all_digits(position) {
                    return None;
                }
                let seat_position = position.parse::<u32>().ok()?;
                Some(Athlete {
                    id: new_id(),
                    session_id: session_id.to_string(),
                    seat_position,
                    name: member.get("Name").cloned().unwrap_or_default(),
                    side: resolve_side(&parsed.crew, &parsed.rig_info, position),
                })
            })
            .collect()
    }

    fn piece(piece_info: &RawRow, session_id: &str) -> PieceRecord {
        let field = |key: &str| piece_info.get(key).map(String::as_str);
        PieceRecord {
            id: new_id(),
            session_id: session_id.to_string(),
            piece_number: 1,
            name: text(piece_info, "#"),
            start_time_ms: to_int(field("Start")),
            end_time_ms: to_int(field("End")),
            duration: text(piece_info, "Duration"),
            distance_meters: to_float(field("Distance")),
            avg_rating: to_float(field("Rating")),
            pace: text(piece_info, "Pace"),
        }
    }
}

/// Assemble an import bundle for a parsed export
pub fn import_session(parsed: &ParsedData, options: &ImportOptions) -> SessionImport {
    SessionImporter::import(parsed, options)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Non-blank text value of a flat-section field
fn text(row: &RawRow, key: &str) -> Option<String> {
    row.get(key)
        .filter(|v| !v.trim().is_empty())
        .cloned()
}
