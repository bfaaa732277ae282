use anyhow::{anyhow, Context, Result};

use crate::labels::LabelStore;
use crate::segmentation::SegmentModel;

/// Serialize the current maximal segments as the row-oriented assignment
/// table: one row per segment with its half-open window and display label.
///
/// The output loads back through `parse_table`; aggregates survive the round
/// trip unchanged.
pub fn export_table(model: &SegmentModel, labels: &LabelStore) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "cluster_id",
        "window_start_time",
        "window_end_time",
        "cluster_label",
    ])?;

    for segment in model.segments() {
        writer.write_record([
            segment.cluster_id.to_string(),
            segment.start.to_string(),
            segment.end.to_string(),
            labels.resolve(segment.cluster_id),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("failed to flush table writer: {err}"))?;
    String::from_utf8(bytes).context("exported table is not valid UTF-8")
}
