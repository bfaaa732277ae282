use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::ClusterId;
use crate::segmentation::AssignmentSpan;

/// One row of the upstream assignment table. Window bounds are half-open
/// sample-index ranges; columns beyond the ones named here are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    pub cluster_id: ClusterId,
    pub window_start_time: f64,
    pub window_end_time: f64,
    #[serde(default)]
    pub peak_to_peak: Option<f64>,
    #[serde(default)]
    pub cluster_label: Option<String>,
}

/// Fully parsed table content, ready for model construction.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub signal: Vec<f64>,
    pub spans: Vec<AssignmentSpan>,
    /// Names carried by an optional `cluster_label` column, first one wins.
    pub labels: BTreeMap<ClusterId, String>,
    /// True when at least one row carried no `peak_to_peak` value; those
    /// samples default to 0.0 (segments and labels stay intact).
    pub missing_values: bool,
}

const REQUIRED_COLUMNS: [&str; 3] = ["cluster_id", "window_start_time", "window_end_time"];

/// Parse the CSV assignment table.
///
/// Rows must tile the sample range in order; gaps, overlaps, inverted or
/// non-integer windows reject the whole table. An empty table parses to an
/// empty dataset.
pub fn parse_table(text: &str) -> Result<ParsedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| Error::MalformedInput {
            message: format!("header row: {err}"),
        })?
        .clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|column| column == required) {
            return Err(Error::MalformedInput {
                message: format!("missing required column {required}"),
            });
        }
    }

    let mut signal = Vec::new();
    let mut spans = Vec::new();
    let mut labels = BTreeMap::new();
    let mut missing_values = false;
    let mut cursor = 0usize;

    for (row_index, record) in reader.deserialize::<TableRow>().enumerate() {
        let row = record.map_err(|err| Error::MalformedInput {
            message: format!("row {row_index}: {err}"),
        })?;

        let start = to_sample_index(row.window_start_time, "window_start_time", row_index)?;
        let end = to_sample_index(row.window_end_time, "window_end_time", row_index)?;
        if end <= start {
            return Err(Error::MalformedInput {
                message: format!("row {row_index}: window [{start}, {end}) is empty or inverted"),
            });
        }
        if start != cursor {
            return Err(Error::MalformedInput {
                message: format!(
                    "row {row_index}: window starts at {start} but the previous window ended at {cursor}"
                ),
            });
        }

        let value = match row.peak_to_peak {
            Some(value) => value,
            None => {
                missing_values = true;
                0.0
            }
        };
        signal.extend(std::iter::repeat(value).take(end - start));
        spans.push(AssignmentSpan {
            cluster_id: row.cluster_id,
            start,
            end,
        });
        if let Some(label) = row.cluster_label {
            labels.entry(row.cluster_id).or_insert(label);
        }
        cursor = end;
    }

    Ok(ParsedTable {
        signal,
        spans,
        labels,
        missing_values,
    })
}

/// Parse a raw signal from a flat JSON number array.
pub fn parse_signal_json(text: &str) -> Result<Vec<f64>> {
    serde_json::from_str(text).map_err(|err| Error::MalformedInput {
        message: format!("signal array: {err}"),
    })
}

/// Parse a flat per-sample cluster assignment from a JSON number array.
pub fn parse_assignment_json(text: &str) -> Result<Vec<ClusterId>> {
    serde_json::from_str(text).map_err(|err| Error::MalformedInput {
        message: format!("assignment array: {err}"),
    })
}

fn to_sample_index(value: f64, field: &str, row: usize) -> Result<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(Error::MalformedInput {
            message: format!("row {row}: {field} {value} is not a sample index"),
        });
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_TABLE: &str = "\
cluster_id,window_start_time,window_end_time,peak_to_peak,cluster_label
0,0,3,0.42,Walking
1,3,7,0.85,
2,7,20,0.12,Resting
";

    #[test]
    fn parses_windows_values_and_labels() {
        let parsed = parse_table(FULL_TABLE).unwrap();

        assert_eq!(
            parsed.spans,
            vec![
                AssignmentSpan { cluster_id: 0, start: 0, end: 3 },
                AssignmentSpan { cluster_id: 1, start: 3, end: 7 },
                AssignmentSpan { cluster_id: 2, start: 7, end: 20 },
            ]
        );
        assert_eq!(parsed.signal.len(), 20);
        // Each covered index takes its window's value.
        assert_eq!(parsed.signal[0], 0.42);
        assert_eq!(parsed.signal[2], 0.42);
        assert_eq!(parsed.signal[3], 0.85);
        assert_eq!(parsed.signal[19], 0.12);
        assert!(!parsed.missing_values);

        assert_eq!(parsed.labels.get(&0).map(String::as_str), Some("Walking"));
        assert_eq!(parsed.labels.get(&2).map(String::as_str), Some("Resting"));
        assert!(!parsed.labels.contains_key(&1));
    }

    #[test]
    fn missing_value_column_zeroes_the_signal() {
        let table = "\
cluster_id,window_start_time,window_end_time
0,0,10
1,10,20
";
        let parsed = parse_table(table).unwrap();
        assert!(parsed.missing_values);
        assert!(parsed.signal.iter().all(|&v| v == 0.0));
        assert_eq!(parsed.spans.len(), 2);
    }

    #[test]
    fn rejects_content_without_the_expected_columns() {
        let err = parse_table("this is not a table\n1,2,3\n").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn rejects_unparseable_fields() {
        let table = "\
cluster_id,window_start_time,window_end_time
zero,0,10
";
        assert!(matches!(
            parse_table(table).unwrap_err(),
            Error::MalformedInput { .. }
        ));
    }

    #[test]
    fn rejects_non_integer_window_bounds() {
        let table = "\
cluster_id,window_start_time,window_end_time
0,0,9.5
";
        let err = parse_table(table).unwrap_err();
        assert!(err.to_string().contains("window_end_time"));
    }

    #[test]
    fn rejects_gaps_between_windows() {
        let table = "\
cluster_id,window_start_time,window_end_time
0,0,10
1,12,20
";
        assert!(matches!(
            parse_table(table).unwrap_err(),
            Error::MalformedInput { .. }
        ));
    }

    #[test]
    fn header_only_input_parses_to_an_empty_dataset() {
        let parsed = parse_table("cluster_id,window_start_time,window_end_time\n").unwrap();
        assert!(parsed.spans.is_empty());
        assert!(parsed.signal.is_empty());
    }

    #[test]
    fn flat_json_arrays_parse_and_reject() {
        assert_eq!(parse_signal_json("[0.5, -0.25, 1.0]").unwrap(), vec![0.5, -0.25, 1.0]);
        assert_eq!(parse_assignment_json("[0, 0, 2]").unwrap(), vec![0, 0, 2]);

        assert!(matches!(
            parse_signal_json("{\"not\": \"an array\"}").unwrap_err(),
            Error::MalformedInput { .. }
        ));
        assert!(matches!(
            parse_assignment_json("[-1]").unwrap_err(),
            Error::MalformedInput { .. }
        ));
    }
}
