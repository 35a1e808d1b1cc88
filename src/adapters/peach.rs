//! Peach PowerLine export adapter
//!
//! Splits an export into its sections and extracts each one as raw string
//! rows. No value is converted here; that is the normalizer's job.

use crate::adapters::header::merge_headers;
use crate::adapters::row::{split_fields, RowClassifier, RowKind};
use crate::adapters::section::{Section, SectionLocator};
use crate::config::ParserConfig;
use crate::types::{ParsedData, RawRow, RawSection, RigRow};
use tracing::{debug, info};

use super::ExportAdapter;

/// PowerLine CSV export adapter
#[derive(Debug, Clone, Default)]
pub struct PeachCsvAdapter {
    config: ParserConfig,
}

impl PeachCsvAdapter {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }
}

impl ExportAdapter for PeachCsvAdapter {
    fn parse(&self, raw_text: &str) -> ParsedData {
        let lines: Vec<&str> = raw_text.lines().collect();
        let extractor = SectionExtractor::new(&self.config, &lines);

        let parsed = ParsedData {
            file_info: extractor.extract(Section::FileInfo).into_flat(),
            crew: extractor.extract(Section::CrewInfo).into_rows(),
            rig_info: extractor.rig_rows(),
            piece_info: extractor.extract(Section::Piece).into_flat(),
            stroke_metrics: extractor.extract(Section::StrokeMetrics).into_rows(),
            periodic_data: extractor.extract(Section::Periodic).into_rows(),
        };

        info!(
            lines = lines.len(),
            crew = parsed.crew.len(),
            rig = parsed.rig_info.len(),
            strokes = parsed.stroke_metrics.len(),
            periodic = parsed.periodic_data.len(),
            "Parsed PowerLine export"
        );

        parsed
    }
}

/// Extracts sections from a split document
pub struct SectionExtractor<'a> {
    config: &'a ParserConfig,
    lines: &'a [&'a str],
    locator: SectionLocator<'a>,
    classifier: RowClassifier<'a>,
}

impl<'a> SectionExtractor<'a> {
    pub fn new(config: &'a ParserConfig, lines: &'a [&'a str]) -> Self {
        Self {
            config,
            lines,
            locator: SectionLocator::new(config),
            classifier: RowClassifier::new(config),
        }
    }

    /// Extract a section in the shape its type implies
    ///
    /// A missing section yields the empty value of that shape.
    pub fn extract(&self, section: Section) -> RawSection {
        let marker = self.locator.find(self.lines, section);
        if marker.is_none() {
            debug!(section = section.token(), "Section not present");
        }

        match section {
            Section::FileInfo | Section::Piece => {
                RawSection::Flat(marker.map(|m| self.flat(m)).unwrap_or_default())
            }
            Section::CrewInfo => {
                RawSection::Repeated(marker.map(|m| self.crew(m)).unwrap_or_default())
            }
            Section::RigInfo | Section::StrokeMetrics | Section::Periodic => match marker {
                Some(m) => self.tabular(m, section),
                None => RawSection::Tabular {
                    columns: Vec::new(),
                    rows: Vec::new(),
                },
            },
        }
    }

    /// Rig Info rows: seat position and side straight from columns 0 and 1
    pub fn rig_rows(&self) -> Vec<RigRow> {
        let Some(marker) = self.locator.find(self.lines, Section::RigInfo) else {
            debug!(section = Section::RigInfo.token(), "Section not present");
            return Vec::new();
        };

        let (start, end) = self.locator.body_range(self.lines, marker, Section::RigInfo);
        self.lines[start..end]
            .iter()
            .map(|line| split_fields(line))
            .filter(|fields| self.classifier.is_rig_row(fields))
            .map(|fields| RigRow {
                position: fields[0].to_string(),
                side: fields.get(1).map(|s| s.to_string()),
            })
            .collect()
    }

    fn line_fields(&self, index: usize) -> Vec<&'a str> {
        self.lines
            .get(index)
            .map(|line| split_fields(line))
            .unwrap_or_default()
    }

    fn flat(&self, marker: usize) -> RawRow {
        // Both the header and the value line must exist
        if marker + 2 >= self.lines.len() {
            return RawRow::new();
        }
        let header = self.line_fields(marker + 1);
        let values = self.line_fields(marker + 2);
        zip_row(&header, &values)
    }

    fn crew(&self, marker: usize) -> Vec<RawRow> {
        let header = self.line_fields(marker + 1);
        let (start, end) = self.locator.body_range(self.lines, marker, Section::CrewInfo);

        self.lines[start..end]
            .iter()
            .map(|line| split_fields(line))
            .filter(|fields| self.classifier.is_crew_row(fields))
            .map(|fields| zip_row(&header, &fields))
            .filter(|row| has_value(row, "Position") && has_value(row, "Name"))
            .collect()
    }

    fn tabular(&self, marker: usize, section: Section) -> RawSection {
        let columns = merge_headers(
            &self.line_fields(marker + 1),
            &self.line_fields(marker + 2),
            &self.config.boat_sub_label,
        );
        let (start, end) = self.locator.body_range(self.lines, marker, section);

        let mut skipped = 0usize;
        let mut markers = 0usize;
        let mut rows = Vec::new();
        for line in &self.lines[start..end] {
            match self.classifier.classify(line) {
                RowKind::Data => rows.push(zip_row(&columns, &split_fields(line))),
                RowKind::SectionMarker => markers += 1,
                RowKind::Noise => skipped += 1,
            }
        }

        debug!(
            section = section.token(),
            columns = columns.len(),
            rows = rows.len(),
            skipped,
            markers,
            "Extracted tabular section"
        );

        RawSection::Tabular { columns, rows }
    }
}

/// Pair header names with values; surplus on either side is dropped
fn zip_row<S: AsRef<str>>(header: &[S], values: &[&str]) -> RawRow {
    header
        .iter()
        .zip(values.iter())
        .map(|(name, value)| (name.as_ref().to_string(), value.to_string()))
        .collect()
}

fn has_value(row: &RawRow, key: &str) -> bool {
    row.get(key).is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> ParsedData {
        PeachCsvAdapter::default().parse(text)
    }

    #[test]
    fn test_flat_sections() {
        let text = "\
#ERROR!,File Info
Filename,Serial #,Session,Start Time
row.peach,4412,Morning Row
#ERROR!,Piece
#,Start,End,Distance
Piece 1,1000,61000,250.5,extra
";
        let parsed = parse(text);

        assert_eq!(parsed.file_info.len(), 3);
        assert_eq!(parsed.file_info["Serial #"], "4412");
        assert_eq!(parsed.file_info["Session"], "Morning Row");
        assert!(!parsed.file_info.contains_key("Start Time"));

        assert_eq!(parsed.piece_info.len(), 4);
        assert_eq!(parsed.piece_info["#"], "Piece 1");
        assert_eq!(parsed.piece_info["Distance"], "250.5");
    }

    #[test]
    fn test_rows_serialize_in_column_order() {
        let text = "\
#ERROR!,File Info
Session,Filename,Serial #
Morning Row,row.peach,4412
";
        let parsed = parse(text);
        let keys: Vec<&str> = parsed.file_info.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Filename", "Serial #", "Session"]);
        assert_eq!(
            serde_json::to_string(&parsed.file_info).unwrap(),
            r#"{"Filename":"row.peach","Serial #":"4412","Session":"Morning Row"}"#
        );
    }

    #[test]
    fn test_flat_section_without_value_line() {
        let parsed = parse("#ERROR!,File Info\nFilename,Session");
        assert!(parsed.file_info.is_empty());
    }

    #[test]
    fn test_crew_rows_require_position_and_name() {
        let text = "\
#ERROR!,Crew Info
Position,Name,Weight
1,Ana,72
2,,80
,Ghost,70
Cox,Dee
3,Cal
#ERROR!,Rig Info
";
        let parsed = parse(text);

        let names: Vec<&str> = parsed.crew.iter().map(|c| c["Name"].as_str()).collect();
        assert_eq!(names, vec!["Ana", "Dee", "Cal"]);
        assert_eq!(parsed.crew[0]["Weight"], "72");
        assert!(!parsed.crew[2].contains_key("Weight"));
    }

    #[test]
    fn test_rig_rows() {
        let text = "\
#ERROR!,Rig Info
Position,Side
,Boat
1,Stbd,88
2,Port
Sweep,Port
3
#ERROR!,Piece
";
        let parsed = parse(text);

        assert_eq!(
            parsed.rig_info,
            vec![
                RigRow {
                    position: "1".to_string(),
                    side: Some("Stbd".to_string())
                },
                RigRow {
                    position: "2".to_string(),
                    side: Some("Port".to_string())
                },
                RigRow {
                    position: "3".to_string(),
                    side: None
                },
            ]
        );
    }

    #[test]
    fn test_stroke_section_merges_headers_and_filters_rows() {
        let text = "\
#ERROR!,Aperiodic,0x800A
Time,StrokeNumber,Rating,Drive Time,Drive Time
,,Boat,1,2
1000,1,32.5,0.81,0.79
Time,StrokeNumber
2900,2,33.0,0.80
-,x
#ERROR!,Periodic
";
        let parsed = parse(text);

        assert_eq!(parsed.stroke_metrics.len(), 2);
        let first = &parsed.stroke_metrics[0];
        assert_eq!(first["Time"], "1000");
        assert_eq!(first["Rating"], "32.5");
        assert_eq!(first["Drive Time_1"], "0.81");
        assert_eq!(first["Drive Time_2"], "0.79");

        let second = &parsed.stroke_metrics[1];
        assert_eq!(second["Drive Time_1"], "0.80");
        assert!(!second.contains_key("Drive Time_2"));
    }

    #[test]
    fn test_periodic_runs_to_end_of_file() {
        let text = "\
#ERROR!,Periodic
Time,Normalized Time,GateAngle
,,1
1000,0.1,-55.2
#ERROR!,Notes
1020,0.2,-50.1,99
";
        let parsed = parse(text);

        assert_eq!(parsed.periodic_data.len(), 2);
        assert_eq!(parsed.periodic_data[1]["GateAngle_1"], "-50.1");
        assert_eq!(parsed.periodic_data[1].len(), 3);
    }

    #[test]
    fn test_missing_sections_yield_empty_containers() {
        let parsed = parse("nothing,to,see\n1,2,3\n");
        assert_eq!(parsed, ParsedData::default());

        let parsed = parse("");
        assert_eq!(parsed, ParsedData::default());
    }

    #[test]
    fn test_truncated_tabular_header() {
        let parsed = parse("#ERROR!,Aperiodic,0x800A\nTime,Rating");
        assert!(parsed.stroke_metrics.is_empty());
    }

    #[test]
    fn test_extract_reports_columns() {
        let config = ParserConfig::default();
        let lines = vec!["#ERROR!,Periodic", "Time,Speed,GateAngle", ",Boat,1"];
        let extractor = SectionExtractor::new(&config, &lines);

        match extractor.extract(Section::Periodic) {
            RawSection::Tabular { columns, rows } => {
                assert_eq!(columns, vec!["Time", "Speed", "GateAngle_1"]);
                assert!(rows.is_empty());
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }
}
