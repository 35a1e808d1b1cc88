//! Per-seat column resolution
//!
//! Per-seat metrics appear as `<metric>_<seat>` columns, but export versions
//! disagree on how the metric is spelled ("DriveTime" vs "Drive Time"). Each
//! logical metric therefore carries an ordered list of alias prefixes.

use crate::coerce::to_float;
use crate::types::{RawRow, SeatValues};

/// A logical per-seat metric and the column prefixes it may appear under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatMetric {
    /// Field name in the normalized record
    pub key: &'static str,
    /// Column prefixes, tried in order
    pub aliases: &'static [&'static str],
}

pub const SWIVEL_POWER: SeatMetric = SeatMetric {
    key: "swivel_power",
    aliases: &["SwivelPower", "Swivel Power"],
};
pub const MIN_ANGLE: SeatMetric = SeatMetric {
    key: "min_angle",
    aliases: &["MinAngle", "Min Angle"],
};
pub const MAX_ANGLE: SeatMetric = SeatMetric {
    key: "max_angle",
    aliases: &["MaxAngle", "Max Angle"],
};
pub const CATCH_SLIP: SeatMetric = SeatMetric {
    key: "catch_slip",
    aliases: &["CatchSlip", "Catch Slip"],
};
pub const FINISH_SLIP: SeatMetric = SeatMetric {
    key: "finish_slip",
    aliases: &["FinishSlip", "Finish Slip"],
};
pub const DRIVE_TIME: SeatMetric = SeatMetric {
    key: "drive_time",
    aliases: &["DriveTime", "Drive Time"],
};
pub const RECOVERY_TIME: SeatMetric = SeatMetric {
    key: "recovery_time",
    aliases: &["RecoveryTime", "Recovery Time"],
};
pub const WORK_PC_Q1: SeatMetric = SeatMetric {
    key: "work_pc_q1",
    aliases: &["WorkPCQ1", "Work PCQ1", "Work PC Q1"],
};
pub const WORK_PC_Q2: SeatMetric = SeatMetric {
    key: "work_pc_q2",
    aliases: &["WorkPCQ2", "Work PCQ2", "Work PC Q2"],
};
pub const WORK_PC_Q3: SeatMetric = SeatMetric {
    key: "work_pc_q3",
    aliases: &["WorkPCQ3", "Work PCQ3", "Work PC Q3"],
};
pub const WORK_PC_Q4: SeatMetric = SeatMetric {
    key: "work_pc_q4",
    aliases: &["WorkPCQ4", "Work PCQ4", "Work PC Q4"],
};

pub const GATE_ANGLE: SeatMetric = SeatMetric {
    key: "gate_angle",
    aliases: &["GateAngle"],
};
pub const GATE_FORCE_X: SeatMetric = SeatMetric {
    key: "gate_force_x",
    aliases: &["GateForceX"],
};
pub const GATE_ANGLE_VEL: SeatMetric = SeatMetric {
    key: "gate_angle_vel",
    aliases: &["GateAngleVel"],
};

/// Resolve one seat's value (seat is 1-based)
///
/// The first alias whose column holds a non-blank value wins, even if that
/// value then fails to convert.
pub fn resolve_seat(row: &RawRow, aliases: &[&str], seat: usize) -> Option<f64> {
    aliases.iter().find_map(|alias| {
        row.get(&format!("{alias}_{seat}"))
            .filter(|value| !value.trim().is_empty())
            .map(|value| to_float(Some(value.as_str())))
    })?
}

/// Resolve a metric for all seats
pub fn resolve_seats(row: &RawRow, metric: &SeatMetric) -> SeatValues {
    std::array::from_fn(|index| resolve_seat(row, metric.aliases, index + 1))
}
