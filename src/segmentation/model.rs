use crate::error::{Error, Result};
use crate::models::{ClusterId, Segment};

/// One raw row of an upstream assignment table: a half-open window of sample
/// indices carrying one cluster id. Rows need not be maximal; adjacent rows
/// with the same id collapse into a single run during construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentSpan {
    pub cluster_id: ClusterId,
    pub start: usize,
    pub end: usize,
}

/// Canonical state for one loaded signal: the per-sample cluster assignment
/// plus the segment list derived from it.
///
/// The assignment array is the single source of truth. The segment list is a
/// derived cache, rebuilt after every mutation, so the partition invariant
/// (segments tile `[0, N)` exactly) and the maximality invariant (no two
/// adjacent segments share an id) hold unconditionally.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentModel {
    pub(super) signal: Vec<f64>,
    pub(super) assignment: Vec<ClusterId>,
    pub(super) segments: Vec<Segment>,
}

impl SegmentModel {
    /// Build a model from a signal and a parallel per-sample assignment.
    ///
    /// An empty signal yields a valid model with zero segments; callers
    /// handle the zero-segment display themselves.
    pub fn from_assignment(signal: Vec<f64>, assignment: Vec<ClusterId>) -> Result<Self> {
        if signal.len() != assignment.len() {
            return Err(Error::MalformedInput {
                message: format!(
                    "signal has {} samples but assignment has {}",
                    signal.len(),
                    assignment.len()
                ),
            });
        }

        let segments = derive_segments(&assignment);
        Ok(Self {
            signal,
            assignment,
            segments,
        })
    }

    /// Build a model from raw table rows.
    ///
    /// Rows must tile `[0, signal.len())` in order with no gap or overlap.
    /// Coalescing of adjacent equal-id rows falls out of flattening: the
    /// segment list is derived from the flat assignment, which cannot
    /// represent a break between equal ids.
    pub fn from_spans(signal: Vec<f64>, spans: &[AssignmentSpan]) -> Result<Self> {
        let mut assignment = Vec::with_capacity(signal.len());
        let mut cursor = 0usize;

        for (row, span) in spans.iter().enumerate() {
            if span.end <= span.start {
                return Err(Error::MalformedInput {
                    message: format!(
                        "row {row}: window [{}, {}) is empty or inverted",
                        span.start, span.end
                    ),
                });
            }
            if span.start != cursor {
                return Err(Error::MalformedInput {
                    message: format!(
                        "row {row}: window starts at {} but the previous window ended at {cursor}",
                        span.start
                    ),
                });
            }
            assignment.extend(std::iter::repeat(span.cluster_id).take(span.end - span.start));
            cursor = span.end;
        }

        if cursor != signal.len() {
            return Err(Error::MalformedInput {
                message: format!(
                    "windows cover {cursor} samples but the signal has {}",
                    signal.len()
                ),
            });
        }

        Self::from_assignment(signal, assignment)
    }

    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    pub fn signal(&self) -> &[f64] {
        &self.signal
    }

    pub fn assignment(&self) -> &[ClusterId] {
        &self.assignment
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct cluster ids present in the model, ascending.
    pub fn cluster_ids(&self) -> Vec<ClusterId> {
        let mut ids: Vec<ClusterId> = self.segments.iter().map(|s| s.cluster_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Locate the segment covering `index` by binary search over segment ends.
    pub fn find_segment_containing(&self, index: usize) -> Result<&Segment> {
        if index >= self.assignment.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.assignment.len(),
            });
        }

        // First segment whose end is past the index; the partition invariant
        // guarantees it covers the index.
        let pos = self.segments.partition_point(|s| s.end <= index);
        Ok(&self.segments[pos])
    }

    /// Bounds of the maximal run containing `index`, found by scanning the
    /// assignment outward from the anchor in both directions.
    ///
    /// This is the "which run was clicked" query that seeds a selection.
    /// Idempotent between mutations, and always equal to the covering
    /// segment's bounds; it is kept as a direct scan so the click path does
    /// not depend on the derived cache.
    pub fn run_bounds(&self, index: usize) -> Result<(usize, usize)> {
        if index >= self.assignment.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.assignment.len(),
            });
        }

        let id = self.assignment[index];
        let mut start = index;
        while start > 0 && self.assignment[start - 1] == id {
            start -= 1;
        }
        let mut end = index + 1;
        while end < self.assignment.len() && self.assignment[end] == id {
            end += 1;
        }

        Ok((start, end))
    }

    pub(super) fn rebuild_segments(&mut self) {
        self.segments = derive_segments(&self.assignment);
    }
}

/// Run-length derivation: scan the flat assignment left to right and close a
/// segment at every cluster-id change.
pub(super) fn derive_segments(assignment: &[ClusterId]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut start = 0usize;

    for i in 1..assignment.len() {
        if assignment[i] != assignment[i - 1] {
            segments.push(Segment {
                start,
                end: i,
                cluster_id: assignment[i - 1],
            });
            start = i;
        }
    }

    // Close the final run (skipped entirely for an empty assignment).
    if let Some(&last) = assignment.last() {
        segments.push(Segment {
            start,
            end: assignment.len(),
            cluster_id: last,
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_assignment() -> Vec<ClusterId> {
        vec![0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2]
    }

    fn sample_signal() -> Vec<f64> {
        (0..20).map(|i| i as f64 * 0.1).collect()
    }

    #[test]
    fn construct_derives_three_maximal_segments() {
        let model = SegmentModel::from_assignment(sample_signal(), sample_assignment()).unwrap();

        assert_eq!(
            model.segments(),
            &[
                Segment { start: 0, end: 3, cluster_id: 0 },
                Segment { start: 3, end: 7, cluster_id: 1 },
                Segment { start: 7, end: 20, cluster_id: 2 },
            ]
        );
    }

    #[test]
    fn empty_signal_is_a_valid_zero_segment_model() {
        let model = SegmentModel::from_assignment(Vec::new(), Vec::new()).unwrap();
        assert!(model.is_empty());
        assert!(model.segments().is_empty());
        assert!(model.cluster_ids().is_empty());
    }

    #[test]
    fn construct_rejects_length_mismatch() {
        let err = SegmentModel::from_assignment(vec![0.0, 1.0], vec![0]).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn from_spans_coalesces_adjacent_equal_ids() {
        let spans = [
            AssignmentSpan { cluster_id: 0, start: 0, end: 5 },
            AssignmentSpan { cluster_id: 0, start: 5, end: 8 },
            AssignmentSpan { cluster_id: 1, start: 8, end: 10 },
        ];
        let model = SegmentModel::from_spans(vec![0.0; 10], &spans).unwrap();

        assert_eq!(
            model.segments(),
            &[
                Segment { start: 0, end: 8, cluster_id: 0 },
                Segment { start: 8, end: 10, cluster_id: 1 },
            ]
        );
    }

    #[test]
    fn from_spans_rejects_gaps_overlaps_and_inverted_windows() {
        let gap = [
            AssignmentSpan { cluster_id: 0, start: 0, end: 4 },
            AssignmentSpan { cluster_id: 1, start: 6, end: 10 },
        ];
        assert!(matches!(
            SegmentModel::from_spans(vec![0.0; 10], &gap).unwrap_err(),
            Error::MalformedInput { .. }
        ));

        let overlap = [
            AssignmentSpan { cluster_id: 0, start: 0, end: 6 },
            AssignmentSpan { cluster_id: 1, start: 4, end: 10 },
        ];
        assert!(matches!(
            SegmentModel::from_spans(vec![0.0; 10], &overlap).unwrap_err(),
            Error::MalformedInput { .. }
        ));

        let inverted = [AssignmentSpan { cluster_id: 0, start: 4, end: 2 }];
        assert!(matches!(
            SegmentModel::from_spans(vec![0.0; 4], &inverted).unwrap_err(),
            Error::MalformedInput { .. }
        ));
    }

    #[test]
    fn from_spans_rejects_short_coverage() {
        let spans = [AssignmentSpan { cluster_id: 0, start: 0, end: 6 }];
        assert!(matches!(
            SegmentModel::from_spans(vec![0.0; 10], &spans).unwrap_err(),
            Error::MalformedInput { .. }
        ));
    }

    #[test]
    fn find_segment_containing_handles_boundaries() {
        let model = SegmentModel::from_assignment(sample_signal(), sample_assignment()).unwrap();

        assert_eq!(model.find_segment_containing(0).unwrap().cluster_id, 0);
        assert_eq!(model.find_segment_containing(2).unwrap().cluster_id, 0);
        assert_eq!(model.find_segment_containing(3).unwrap().cluster_id, 1);
        assert_eq!(model.find_segment_containing(6).unwrap().cluster_id, 1);
        assert_eq!(model.find_segment_containing(7).unwrap().cluster_id, 2);
        assert_eq!(model.find_segment_containing(19).unwrap().cluster_id, 2);

        assert!(matches!(
            model.find_segment_containing(20).unwrap_err(),
            Error::IndexOutOfRange { index: 20, len: 20 }
        ));
    }

    #[test]
    fn run_bounds_matches_segments_and_is_idempotent() {
        let model = SegmentModel::from_assignment(sample_signal(), sample_assignment()).unwrap();

        assert_eq!(model.run_bounds(1).unwrap(), (0, 3));
        assert_eq!(model.run_bounds(3).unwrap(), (3, 7));
        assert_eq!(model.run_bounds(6).unwrap(), (3, 7));
        assert_eq!(model.run_bounds(12).unwrap(), (7, 20));

        // Repeated queries with no mutation in between agree.
        assert_eq!(model.run_bounds(12).unwrap(), model.run_bounds(12).unwrap());

        assert!(matches!(
            model.run_bounds(25).unwrap_err(),
            Error::IndexOutOfRange { index: 25, len: 20 }
        ));
    }

    #[test]
    fn cluster_ids_are_distinct_and_sorted() {
        let model =
            SegmentModel::from_assignment(vec![0.0; 6], vec![2, 2, 0, 0, 2, 2]).unwrap();
        assert_eq!(model.cluster_ids(), vec![0, 2]);
    }
}
