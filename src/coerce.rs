//! Best-effort scalar conversion
//!
//! Export fields are free text. Conversion never fails: anything that is not
//! a finite decimal number becomes `None`, so "no data" stays distinct from a
//! measured zero.

/// Convert a raw field to a float
pub fn to_float(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert a raw field to an integer, truncating toward zero
///
/// Parses as a decimal first so that values such as `"1520.0"` are accepted.
/// Values outside the `i64` range become `None`.
pub fn to_int(value: Option<&str>) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    to_float(value)
        .map(f64::trunc)
        .filter(|v| *v >= i64::MIN as f64 && *v < i64::MAX as f64)
        .map(|v| v as i64)
}
