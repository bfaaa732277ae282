use serde::{Deserialize, Serialize};

/// Identifier assigned by the upstream clustering step. Non-negative; there
/// is no reserved "unassigned" value.
pub type ClusterId = u32;

/// A maximal contiguous run of samples sharing one cluster id.
///
/// Ranges are half-open: `start` is covered, `end` is not. Adjacent segments
/// never share a cluster id, and consecutive segments meet exactly
/// (`segments[k].end == segments[k + 1].start`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub cluster_id: ClusterId,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }
}

/// Which neighbor a boundary move takes samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Left,
    Right,
}
