//! Periodic series windowing
//!
//! Range filtering by timestamp followed by positional downsampling.

use crate::error::{FluxError, Result};
use crate::types::{PeriodicQuery, PeriodicRecord, PeriodicWindow};

/// Keep records whose timestamp lies in `[start_ms, end_ms]`
///
/// With no bounds every record is kept. Once either bound is given, records
/// without a timestamp are dropped.
pub fn filter_by_time(
    records: &[PeriodicRecord],
    start_ms: Option<i64>,
    end_ms: Option<i64>,
) -> Vec<PeriodicRecord> {
    if start_ms.is_none() && end_ms.is_none() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|r| match r.time_ms {
            Some(t) => start_ms.map_or(true, |s| t >= s) && end_ms.map_or(true, |e| t <= e),
            None => false,
        })
        .cloned()
        .collect()
}

/// Keep every `stride`-th record starting with the first
///
/// A stride of 0 or 1 keeps everything.
pub fn downsample(records: Vec<PeriodicRecord>, stride: usize) -> Vec<PeriodicRecord> {
    if stride <= 1 {
        return records;
    }
    records.into_iter().step_by(stride).collect()
}

/// Filter by time, then downsample
pub fn filter_and_downsample(
    records: &[PeriodicRecord],
    start_ms: Option<i64>,
    end_ms: Option<i64>,
    stride: usize,
) -> Vec<PeriodicRecord> {
    downsample(filter_by_time(records, start_ms, end_ms), stride)
}

/// Apply a query to a piece's periodic series
///
/// A piece without periodic data is a not-found condition; an empty result
/// after filtering is not.
pub fn periodic_window(records: &[PeriodicRecord], query: &PeriodicQuery) -> Result<PeriodicWindow> {
    if records.is_empty() {
        return Err(FluxError::NoPeriodicData);
    }

    let data = filter_and_downsample(records, query.start_ms, query.end_ms, query.downsample);
    Ok(PeriodicWindow {
        total_points: data.len(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn series(count: i64) -> Vec<PeriodicRecord> {
        (0..count)
            .map(|i| PeriodicRecord {
                time_ms: Some(i * 20),
                ..PeriodicRecord::default()
            })
            .collect()
    }

    fn times(records: &[PeriodicRecord]) -> Vec<i64> {
        records.iter().filter_map(|r| r.time_ms).collect()
    }

    #[test]
    fn test_stride_three_over_ten() {
        let result = filter_and_downsample(&series(10), None, None, 3);
        assert_eq!(times(&result), vec![0, 60, 120, 180]);
    }

    #[test]
    fn test_stride_one_is_identity() {
        let records = series(5);
        assert_eq!(filter_and_downsample(&records, None, None, 1), records);
        assert_eq!(filter_and_downsample(&records, None, None, 0), records);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let result = filter_and_downsample(&series(10), Some(40), Some(100), 1);
        assert_eq!(times(&result), vec![40, 60, 80, 100]);

        let result = filter_and_downsample(&series(10), None, Some(20), 1);
        assert_eq!(times(&result), vec![0, 20]);

        let result = filter_and_downsample(&series(10), Some(160), None, 1);
        assert_eq!(times(&result), vec![160, 180]);
    }

    #[test]
    fn test_lower_bound_above_maximum_is_empty() {
        let result = filter_and_downsample(&series(10), Some(10_000), None, 1);
        assert!(result.is_empty());
    }

    #[test]
    fn test_untimed_records() {
        let mut records = series(3);
        records.push(PeriodicRecord::default());

        assert_eq!(filter_and_downsample(&records, None, None, 1).len(), 4);
        assert_eq!(filter_and_downsample(&records, Some(0), None, 1).len(), 3);
    }

    #[test]
    fn test_filter_applies_before_stride() {
        let result = filter_and_downsample(&series(10), Some(20), None, 2);
        assert_eq!(times(&result), vec![20, 60, 100, 140, 180]);
    }

    #[test]
    fn test_periodic_window() {
        let query = PeriodicQuery {
            start_ms: Some(100),
            end_ms: None,
            downsample: 2,
        };
        let window = periodic_window(&series(10), &query).unwrap();
        assert_eq!(window.total_points, 3);
        assert_eq!(times(&window.data), vec![100, 140, 180]);

        let err = periodic_window(&[], &PeriodicQuery::default()).unwrap_err();
        assert!(matches!(err, FluxError::NoPeriodicData));
    }
}
