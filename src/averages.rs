//! Per-athlete stroke averages
//!
//! Every athlete's seat is read out of each stroke record's seat arrays and
//! averaged over the piece. Crew power is the mean of the athletes' averages,
//! so each athlete weighs the same regardless of how many strokes they have.

use crate::error::{FluxError, Result};
use crate::types::{Athlete, AthleteAverage, PieceAverages, SeatValues, StrokeRecord, SEAT_COUNT};
use tracing::{debug, warn};

/// Decimal places for power, length and slip averages
const METRIC_DECIMALS: i32 = 2;
/// Decimal places for drive and recovery time averages
const TIMING_DECIMALS: i32 = 4;
/// Decimal places for the piece's average boat speed
const SPEED_DECIMALS: i32 = 4;

/// Compute per-athlete and piece-level averages
///
/// Fails with [`FluxError::NoStrokeData`] when there are no strokes.
pub fn aggregate(athletes: &[Athlete], strokes: &[StrokeRecord]) -> Result<PieceAverages> {
    if strokes.is_empty() {
        return Err(FluxError::NoStrokeData);
    }

    let samples: Vec<SeatSamples> = athletes
        .iter()
        .map(|athlete| SeatSamples::collect(athlete, strokes))
        .collect();

    // Rounded once, over the unrounded per-athlete means
    let crew_avg_power = mean(samples.iter().filter_map(SeatSamples::mean_power))
        .map(|v| round_to(v, METRIC_DECIMALS));

    let athlete_averages: Vec<AthleteAverage> = samples
        .into_iter()
        .zip(athletes)
        .map(|(samples, athlete)| samples.into_average(athlete))
        .collect();

    let avg_rating = mean(strokes.iter().filter_map(|s| s.rating).filter(|v| *v != 0.0))
        .map(|v| round_to(v, METRIC_DECIMALS));
    let avg_boat_speed = mean(
        strokes
            .iter()
            .filter_map(|s| s.avg_boat_speed)
            .filter(|v| *v != 0.0),
    )
    .map(|v| round_to(v, SPEED_DECIMALS));

    debug!(
        athletes = athletes.len(),
        strokes = strokes.len(),
        "Computed piece averages"
    );

    Ok(PieceAverages {
        total_strokes: strokes.len(),
        avg_rating,
        avg_boat_speed,
        athletes: athlete_averages,
        crew_avg_power,
    })
}

/// Samples gathered for one seat across a piece
#[derive(Debug, Default)]
struct SeatSamples {
    powers: Vec<f64>,
    stroke_lengths: Vec<f64>,
    effective_lengths: Vec<f64>,
    catch_slips: Vec<f64>,
    finish_slips: Vec<f64>,
    drive_times: Vec<f64>,
    recovery_times: Vec<f64>,
}

impl SeatSamples {
    fn collect(athlete: &Athlete, strokes: &[StrokeRecord]) -> Self {
        let mut samples = SeatSamples::default();

        let Some(seat) = seat_index(athlete.seat_position) else {
            warn!(
                seat_position = athlete.seat_position,
                name = %athlete.name,
                "Seat position out of range; no samples collected"
            );
            return samples;
        };

        for stroke in strokes {
            samples.add_stroke(stroke, seat);
        }
        samples
    }

    fn add_stroke(&mut self, stroke: &StrokeRecord, seat: usize) {
        let catch_slip = at(&stroke.catch_slip, seat);
        let finish_slip = at(&stroke.finish_slip, seat);

        if let Some(power) = at(&stroke.swivel_power, seat) {
            self.powers.push(power);
        }

        if let (Some(min), Some(max)) = (at(&stroke.min_angle, seat), at(&stroke.max_angle, seat)) {
            let length = max - min;
            self.stroke_lengths.push(length);
            let catch = catch_slip.map_or(0.0, f64::abs);
            let finish = finish_slip.map_or(0.0, f64::abs);
            self.effective_lengths.push(length - catch - finish);
        }

        if let Some(slip) = catch_slip {
            self.catch_slips.push(slip.abs());
        }
        if let Some(slip) = finish_slip {
            self.finish_slips.push(slip.abs());
        }
        if let Some(time) = at(&stroke.drive_time, seat) {
            self.drive_times.push(time);
        }
        if let Some(time) = at(&stroke.recovery_time, seat) {
            self.recovery_times.push(time);
        }
    }

    fn mean_power(&self) -> Option<f64> {
        mean(self.powers.iter().copied())
    }

    fn into_average(self, athlete: &Athlete) -> AthleteAverage {
        AthleteAverage {
            seat_position: athlete.seat_position,
            name: athlete.name.clone(),
            avg_power: rounded_mean(&self.powers, METRIC_DECIMALS),
            avg_stroke_length: rounded_mean(&self.stroke_lengths, METRIC_DECIMALS),
            avg_effective_length: rounded_mean(&self.effective_lengths, METRIC_DECIMALS),
            avg_catch_slip: rounded_mean(&self.catch_slips, METRIC_DECIMALS),
            avg_finish_slip: rounded_mean(&self.finish_slips, METRIC_DECIMALS),
            avg_drive_time: rounded_mean(&self.drive_times, TIMING_DECIMALS),
            avg_recovery_time: rounded_mean(&self.recovery_times, TIMING_DECIMALS),
        }
    }
}

/// 0-based array index for a 1-based seat position
fn seat_index(seat_position: u32) -> Option<usize> {
    let index = (seat_position as usize).checked_sub(1)?;
    (index < SEAT_COUNT).then_some(index)
}

fn rounded_mean(values: &[f64], decimals: i32) -> Option<f64> {
    mean(values.iter().copied()).map(|v| round_to(v, decimals))
}

fn at(values: &SeatValues, seat: usize) -> Option<f64> {
    values.get(seat).copied().flatten()
}

/// Arithmetic mean; `None` for an empty sequence
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Round to `decimals` places, ties to even
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn athlete(seat_position: u32, name: &str) -> Athlete {
        Athlete {
            id: format!("athlete-{seat_position}"),
            session_id: "session".to_string(),
            seat_position,
            name: name.to_string(),
            side: None,
        }
    }

    fn seat(index: usize, value: Option<f64>) -> [Option<f64>; SEAT_COUNT] {
        let mut values = [None; SEAT_COUNT];
        values[index] = value;
        values
    }

    fn stroke_with_power(power: Option<f64>) -> StrokeRecord {
        StrokeRecord {
            swivel_power: seat(1, power),
            ..StrokeRecord::default()
        }
    }

    #[test]
    fn test_average_power_skips_absent_samples() {
        let strokes = vec![
            stroke_with_power(Some(200.0)),
            stroke_with_power(Some(220.0)),
            stroke_with_power(None),
        ];
        let result = aggregate(&[athlete(2, "Ana")], &strokes).unwrap();

        assert_eq!(result.total_strokes, 3);
        assert_eq!(result.athletes[0].avg_power, Some(210.0));
        assert_eq!(result.crew_avg_power, Some(210.0));
    }

    #[test]
    fn test_effective_length() {
        let stroke = StrokeRecord {
            min_angle: seat(0, Some(10.0)),
            max_angle: seat(0, Some(100.0)),
            catch_slip: seat(0, Some(-2.0)),
            finish_slip: seat(0, Some(3.0)),
            ..StrokeRecord::default()
        };
        let result = aggregate(&[athlete(1, "Ben")], &[stroke]).unwrap();
        let avg = &result.athletes[0];

        assert_eq!(avg.avg_stroke_length, Some(90.0));
        assert_eq!(avg.avg_effective_length, Some(85.0));
        assert_eq!(avg.avg_catch_slip, Some(2.0));
        assert_eq!(avg.avg_finish_slip, Some(3.0));
    }

    #[test]
    fn test_missing_slip_counts_as_zero_for_effective_length() {
        let stroke = StrokeRecord {
            min_angle: seat(0, Some(-60.0)),
            max_angle: seat(0, Some(40.0)),
            ..StrokeRecord::default()
        };
        let result = aggregate(&[athlete(1, "Ben")], &[stroke]).unwrap();
        let avg = &result.athletes[0];

        assert_eq!(avg.avg_effective_length, Some(100.0));
        assert_eq!(avg.avg_catch_slip, None);
    }

    #[test]
    fn test_slips_and_timing_do_not_need_angles() {
        let strokes = vec![
            StrokeRecord {
                catch_slip: seat(0, Some(-4.0)),
                drive_time: seat(0, Some(0.81234)),
                recovery_time: seat(0, Some(1.1)),
                ..StrokeRecord::default()
            },
            StrokeRecord {
                catch_slip: seat(0, Some(2.0)),
                drive_time: seat(0, Some(0.8)),
                ..StrokeRecord::default()
            },
        ];
        let result = aggregate(&[athlete(1, "Cal")], &strokes).unwrap();
        let avg = &result.athletes[0];

        assert_eq!(avg.avg_stroke_length, None);
        assert_eq!(avg.avg_catch_slip, Some(3.0));
        assert_eq!(avg.avg_drive_time, Some(0.8062));
        assert_eq!(avg.avg_recovery_time, Some(1.1));
    }

    #[test]
    fn test_crew_power_weights_athletes_equally() {
        let strokes = vec![
            StrokeRecord {
                swivel_power: {
                    let mut v = [None; SEAT_COUNT];
                    v[0] = Some(300.0);
                    v[1] = Some(100.0);
                    v
                },
                ..StrokeRecord::default()
            },
            StrokeRecord {
                swivel_power: seat(0, Some(300.0)),
                ..StrokeRecord::default()
            },
            StrokeRecord {
                swivel_power: seat(0, Some(300.0)),
                ..StrokeRecord::default()
            },
        ];
        let athletes = vec![athlete(1, "Ana"), athlete(2, "Ben"), athlete(3, "Cal")];
        let result = aggregate(&athletes, &strokes).unwrap();

        assert_eq!(result.athletes[2].avg_power, None);
        // Mean of 300 and 100, not of the four raw samples
        assert_eq!(result.crew_avg_power, Some(200.0));
    }

    #[test]
    fn test_crew_power_rounds_once() {
        let strokes = vec![StrokeRecord {
            swivel_power: {
                let mut v = [None; SEAT_COUNT];
                v[0] = Some(1.0049);
                v[1] = Some(1.0049);
                v[2] = Some(1.0099);
                v
            },
            ..StrokeRecord::default()
        }];
        let athletes = vec![athlete(1, "Ana"), athlete(2, "Ben"), athlete(3, "Cal")];
        let result = aggregate(&athletes, &strokes).unwrap();

        assert_eq!(result.athletes[0].avg_power, Some(1.0));
        assert_eq!(result.athletes[2].avg_power, Some(1.01));
        assert_eq!(result.crew_avg_power, Some(1.01));
    }

    #[test]
    fn test_exact_half_rounds_to_even() {
        let strokes = vec![
            StrokeRecord {
                catch_slip: seat(0, Some(2.0)),
                ..StrokeRecord::default()
            },
            StrokeRecord {
                catch_slip: seat(0, Some(-2.25)),
                ..StrokeRecord::default()
            },
        ];
        let result = aggregate(&[athlete(1, "Ana")], &strokes).unwrap();

        assert_eq!(result.athletes[0].avg_catch_slip, Some(2.12));
    }

    #[test]
    fn test_piece_rating_and_speed_exclude_zero() {
        let strokes = vec![
            StrokeRecord {
                rating: Some(32.0),
                avg_boat_speed: Some(4.51234),
                ..StrokeRecord::default()
            },
            StrokeRecord {
                rating: Some(0.0),
                avg_boat_speed: None,
                ..StrokeRecord::default()
            },
            StrokeRecord {
                rating: Some(33.0),
                avg_boat_speed: Some(4.6),
                ..StrokeRecord::default()
            },
        ];
        let result = aggregate(&[], &strokes).unwrap();

        assert_eq!(result.avg_rating, Some(32.5));
        assert_eq!(result.avg_boat_speed, Some(4.5562));
        assert!(result.athletes.is_empty());
        assert_eq!(result.crew_avg_power, None);
    }

    #[test]
    fn test_out_of_range_seat_yields_absent_averages() {
        let strokes = vec![stroke_with_power(Some(250.0))];
        let result = aggregate(&[athlete(0, "Zed"), athlete(9, "Nine")], &strokes).unwrap();

        assert!(result.athletes.iter().all(|a| a.avg_power.is_none()));
        assert_eq!(result.crew_avg_power, None);
    }

    #[test]
    fn test_empty_strokes_is_not_found() {
        let err = aggregate(&[athlete(1, "Ana")], &[]).unwrap_err();
        assert!(matches!(err, FluxError::NoStrokeData));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_mean_and_rounding() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([1.0, 2.0].into_iter()), Some(1.5));
        assert_eq!(round_to(2.34567, 2), 2.35);
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(2.125, 2), 2.12);
        assert_eq!(round_to(2.375, 2), 2.38);
    }
}
