use serde::{Deserialize, Serialize};

/// Overlay markers the chart surface lets the user drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerId {
    SelectionStart,
    SelectionEnd,
}

/// Pointer events the chart surface reports back, already resolved to sample
/// indices. Pixel coordinates never reach the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ChartEvent {
    /// Click on or near a data point.
    PointClicked { sample_index: usize },
    /// A selection boundary marker was dropped at a new position.
    MarkerDragged {
        marker: MarkerId,
        new_sample_index: usize,
    },
}
