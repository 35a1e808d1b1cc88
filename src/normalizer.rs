//! Record normalization
//!
//! This module turns raw string rows into fixed-shape numeric records.
//! - Boat-level scalars converted with [`crate::coerce`]
//! - Per-seat metrics resolved through the alias table in [`crate::seats`]
//! - Absent data kept as `None`, every seat array exactly eight long

use crate::coerce::{to_float, to_int};
use crate::seats::{
    resolve_seats, CATCH_SLIP, DRIVE_TIME, FINISH_SLIP, GATE_ANGLE, GATE_ANGLE_VEL, GATE_FORCE_X,
    MAX_ANGLE, MIN_ANGLE, RECOVERY_TIME, SWIVEL_POWER, WORK_PC_Q1, WORK_PC_Q2, WORK_PC_Q3,
    WORK_PC_Q4,
};
use crate::types::{CrewRow, ParsedData, PeriodicRecord, RawRow, RigRow, StrokeRecord};

/// Build a normalized stroke record from a raw stroke-metrics row
pub fn build_stroke_record(row: &RawRow) -> StrokeRecord {
    StrokeRecord {
        time_ms: to_int(field(row, "Time")),
        stroke_number: to_int(field(row, "StrokeNumber")),
        rating: to_float(field(row, "Rating")),
        avg_boat_speed: to_float(field(row, "AvgBoatSpeed")),
        distance_per_stroke: to_float(field(row, "Dist/Stroke")),
        average_power: to_float(field(row, "Average Power")),
        swivel_power: resolve_seats(row, &SWIVEL_POWER),
        min_angle: resolve_seats(row, &MIN_ANGLE),
        max_angle: resolve_seats(row, &MAX_ANGLE),
        catch_slip: resolve_seats(row, &CATCH_SLIP),
        finish_slip: resolve_seats(row, &FINISH_SLIP),
        drive_time: resolve_seats(row, &DRIVE_TIME),
        recovery_time: resolve_seats(row, &RECOVERY_TIME),
        work_pc_q1: resolve_seats(row, &WORK_PC_Q1),
        work_pc_q2: resolve_seats(row, &WORK_PC_Q2),
        work_pc_q3: resolve_seats(row, &WORK_PC_Q3),
        work_pc_q4: resolve_seats(row, &WORK_PC_Q4),
    }
}

/// Build a normalized periodic record from a raw periodic row
pub fn build_periodic_record(row: &RawRow) -> PeriodicRecord {
    PeriodicRecord {
        time_ms: to_int(field(row, "Time")),
        normalized_time: to_float(field(row, "Normalized Time")),
        speed: to_float(field(row, "Speed")),
        distance: to_float(field(row, "Distance")),
        accel: to_float(field(row, "Accel")),
        gate_angle: resolve_seats(row, &GATE_ANGLE),
        gate_force_x: resolve_seats(row, &GATE_FORCE_X),
        gate_angle_vel: resolve_seats(row, &GATE_ANGLE_VEL),
    }
}

/// Rowing side for a seat position, from the rig table
///
/// The crew list is accepted for symmetry with the import flow; only the rig
/// table carries side information.
pub fn resolve_side(_crew: &[CrewRow], rig: &[RigRow], position: &str) -> Option<String> {
    rig.iter()
        .find(|r| r.position == position)
        .and_then(|r| r.side.clone())
}

/// Normalizer over a whole parsed document
pub struct Normalizer;

impl Normalizer {
    /// Every raw stroke row as a stroke record
    pub fn strokes(parsed: &ParsedData) -> Vec<StrokeRecord> {
        parsed.stroke_metrics.iter().map(build_stroke_record).collect()
    }

    /// Every raw periodic row as a periodic record
    pub fn periodic(parsed: &ParsedData) -> Vec<PeriodicRecord> {
        parsed.periodic_data.iter().map(build_periodic_record).collect()
    }
}

fn field<'a>(row: &'a RawRow, key: &str) -> Option<&'a str> {
    row.get(key).map(String::as_str)
}
