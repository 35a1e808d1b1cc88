//! Two-row header merging
//!
//! Tabular sections label columns with a top row ("Gate Angle") and a sub row
//! (seat number, or "Boat" for boat-level columns). The merged name is
//! `<top>_<sub>` for per-seat columns and the bare top label otherwise.

/// Merge two header rows into composite column names
///
/// The result has `min(top.len(), sub.len())` entries.
pub fn merge_headers<S: AsRef<str>>(top: &[S], sub: &[S], boat_label: &str) -> Vec<String> {
    top.iter()
        .zip(sub.iter())
        .map(|(h1, h2)| {
            let (h1, h2) = (h1.as_ref(), h2.as_ref());
            if h2.is_empty() || h2 == boat_label {
                h1.to_string()
            } else {
                format!("{h1}_{h2}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_boat_and_empty_sub_labels_are_suppressed() {
        let merged = merge_headers(&["Gate Angle", "Gate Angle"], &["", "Boat"], "Boat");
        assert_eq!(merged, vec!["Gate Angle", "Gate Angle"]);
    }

    #[test]
    fn test_seat_sub_labels_are_appended() {
        let merged = merge_headers(&["Gate Angle", "Gate Angle"], &["1", "2"], "Boat");
        assert_eq!(merged, vec!["Gate Angle_1", "Gate Angle_2"]);
    }

    #[test]
    fn test_length_is_shorter_row() {
        let merged = merge_headers(&["Time", "Speed", "Accel"], &["", "Boat"], "Boat");
        assert_eq!(merged, vec!["Time", "Speed"]);

        let merged = merge_headers(&["Time"], &["", "1", "2"], "Boat");
        assert_eq!(merged, vec!["Time"]);
    }

    #[test]
    fn test_custom_boat_label() {
        let merged = merge_headers(&["Speed", "Speed"], &["Hull", "Boat"], "Hull");
        assert_eq!(merged, vec!["Speed", "Speed_Boat"]);
    }
}
