use serde::Serialize;

use crate::labels::LabelStore;
use crate::models::ClusterId;
use crate::segmentation::SegmentModel;

/// Fixed rgba palette for cluster traces, cycled by cluster id.
pub const CLUSTER_COLORS: [&str; 12] = [
    "rgba(75, 192, 192, 1)",  // Teal
    "rgba(54, 162, 235, 1)",  // Blue
    "rgba(255, 99, 132, 1)",  // Red
    "rgba(255, 206, 86, 1)",  // Yellow
    "rgba(153, 102, 255, 1)", // Purple
    "rgba(255, 159, 64, 1)",  // Orange
    "rgba(99, 255, 132, 1)",  // Light Green
    "rgba(102, 153, 255, 1)", // Light Blue
    "rgba(255, 102, 178, 1)", // Pink
    "rgba(204, 255, 102, 1)", // Lime
    "rgba(102, 255, 255, 1)", // Cyan
    "rgba(255, 153, 102, 1)", // Peach
];

/// Trace color assigned to a cluster id.
pub fn color_for(cluster_id: ClusterId) -> &'static str {
    CLUSTER_COLORS[cluster_id as usize % CLUSTER_COLORS.len()]
}

/// One point of the line-chart series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub x: usize,
    pub y: f64,
    pub cluster_id: ClusterId,
}

/// Point sequence for the line chart, derived fresh from the model state.
pub fn line_series(model: &SegmentModel) -> Vec<SeriesPoint> {
    model
        .signal()
        .iter()
        .zip(model.assignment())
        .enumerate()
        .map(|(index, (&value, &cluster_id))| SeriesPoint {
            x: index,
            y: value,
            cluster_id,
        })
        .collect()
}

/// Positions of the selection overlay markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryMarkers {
    pub start: usize,
    pub end: usize,
}

/// One bar of the per-cluster summary chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterBar {
    pub cluster_id: ClusterId,
    pub label: String,
    pub segment_count: usize,
    pub mean_start_index: f64,
    pub color: &'static str,
}

/// Bar-chart rows, one per cluster id present in the model, ascending.
pub fn cluster_bars(model: &SegmentModel, labels: &LabelStore) -> Vec<ClusterBar> {
    model
        .aggregate()
        .into_iter()
        .map(|(cluster_id, summary)| ClusterBar {
            cluster_id,
            label: labels.resolve(cluster_id),
            segment_count: summary.segment_count,
            mean_start_index: summary.mean_start_index,
            color: color_for(cluster_id),
        })
        .collect()
}
