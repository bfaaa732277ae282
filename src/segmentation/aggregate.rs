use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::ClusterId;
use crate::segmentation::model::SegmentModel;

/// Per-cluster roll-up of the current segment list, feeding the summary bar
/// charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Number of maximal segments carrying this cluster id.
    pub segment_count: usize,
    /// Mean of the segments' start indices, read as a time value by callers.
    pub mean_start_index: f64,
}

impl SegmentModel {
    /// Count segments and average their start index per cluster id.
    ///
    /// Pure read-only view of the current state; an empty model yields an
    /// empty mapping.
    pub fn aggregate(&self) -> BTreeMap<ClusterId, ClusterSummary> {
        let mut totals: BTreeMap<ClusterId, (usize, f64)> = BTreeMap::new();
        for segment in self.segments() {
            let entry = totals.entry(segment.cluster_id).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += segment.start as f64;
        }

        totals
            .into_iter()
            .map(|(cluster_id, (count, start_sum))| {
                (
                    cluster_id,
                    ClusterSummary {
                        segment_count: count,
                        mean_start_index: start_sum / count as f64,
                    },
                )
            })
            .collect()
    }
}
