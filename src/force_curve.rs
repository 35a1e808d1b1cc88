//! Force curve extraction
//!
//! A force curve is the set of periodic samples around one stroke, ordered by
//! their position in the stroke cycle.

use crate::config::AnalysisConfig;
use crate::error::{FluxError, Result};
use crate::types::{ForceCurve, PeriodicRecord, StrokeRecord};
use std::cmp::Ordering;
use tracing::debug;

/// Samples strictly within `half_window_ms` of the stroke, ordered by normalized time
///
/// Samples without a timestamp never match. Absent normalized times sort as
/// zero, ahead of samples with an explicit zero.
pub fn extract_force_curve(
    periodic: &[PeriodicRecord],
    stroke_time_ms: i64,
    half_window_ms: i64,
) -> Vec<PeriodicRecord> {
    let mut curve: Vec<PeriodicRecord> = periodic
        .iter()
        .filter(|p| {
            p.time_ms
                .is_some_and(|t| t.abs_diff(stroke_time_ms) < half_window_ms.unsigned_abs())
        })
        .cloned()
        .collect();

    curve.sort_by(compare_cycle_position);
    curve
}

/// Force curve for a stroke looked up by its number
pub fn force_curve_for_stroke(
    strokes: &[StrokeRecord],
    periodic: &[PeriodicRecord],
    stroke_number: i64,
    config: &AnalysisConfig,
) -> Result<ForceCurve> {
    let stroke_time_ms = strokes
        .iter()
        .find(|s| s.stroke_number == Some(stroke_number))
        .and_then(|s| s.time_ms)
        .ok_or(FluxError::StrokeNotFound(stroke_number))?;

    if periodic.is_empty() {
        return Err(FluxError::NoPeriodicData);
    }

    let data = extract_force_curve(periodic, stroke_time_ms, config.stroke_half_window_ms);
    debug!(
        stroke_number,
        stroke_time_ms,
        points = data.len(),
        "Extracted force curve"
    );

    Ok(ForceCurve {
        stroke_number,
        stroke_time_ms,
        data_points: data.len(),
        data,
    })
}

fn compare_cycle_position(a: &PeriodicRecord, b: &PeriodicRecord) -> Ordering {
    let key = |p: &PeriodicRecord| (p.normalized_time.unwrap_or(0.0), p.normalized_time.is_some());
    let (a_time, a_present) = key(a);
    let (b_time, b_present) = key(b);
    a_time
        .total_cmp(&b_time)
        .then(a_present.cmp(&b_present))
}
