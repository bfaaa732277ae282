use crate::error::{Error, Result};
use crate::models::{ClusterId, Direction, Segment};
use crate::segmentation::config::ModelConfig;
use crate::segmentation::model::SegmentModel;

impl SegmentModel {
    /// Reassign every sample in the half-open `[start, end)` range to
    /// `new_id`, then re-derive the segment list.
    ///
    /// A range that now matches a neighbor's id is absorbed into it, and a
    /// range strictly inside one run splits that run; both fall out of the
    /// re-derivation. A zero-length range is a no-op.
    pub fn relabel_range(&mut self, start: usize, end: usize, new_id: ClusterId) -> Result<()> {
        let len = self.assignment.len();
        if end > len {
            return Err(Error::IndexOutOfRange { index: end, len });
        }
        if start > end {
            return Err(Error::IndexOutOfRange { index: start, len });
        }
        if start == end {
            return Ok(());
        }

        for slot in &mut self.assignment[start..end] {
            *slot = new_id;
        }
        self.rebuild_segments();
        Ok(())
    }

    /// Move the edge of the run containing `anchor_index` into its neighbor,
    /// reassigning `steps` samples from the neighbor to the anchor's cluster.
    ///
    /// Returns `Ok(true)` when the boundary moved and `Ok(false)` when there
    /// was nothing to do (zero steps, or no neighbor in that direction).
    /// Rejects the move with [`Error::MinSegmentLength`] when the donor would
    /// be left shorter than `config.min_segment_len`; the model is untouched
    /// on rejection.
    pub fn expand_boundary_at(
        &mut self,
        anchor_index: usize,
        direction: Direction,
        steps: usize,
        config: &ModelConfig,
    ) -> Result<bool> {
        let anchor = *self.find_segment_containing(anchor_index)?;
        if steps == 0 {
            return Ok(false);
        }

        let donor = match self.donor_segment(&anchor, direction) {
            Some(segment) => segment,
            None => return Ok(false),
        };

        // The donor must keep at least the configured minimum. This also
        // rules out taking more samples than the donor has.
        if donor.len() < steps + config.min_segment_len {
            return Err(Error::MinSegmentLength {
                cluster_id: donor.cluster_id,
                remaining: donor.len().saturating_sub(steps),
                min: config.min_segment_len,
            });
        }

        let (from, to) = match direction {
            Direction::Left => (anchor.start - steps, anchor.start),
            Direction::Right => (anchor.end, anchor.end + steps),
        };
        for slot in &mut self.assignment[from..to] {
            *slot = anchor.cluster_id;
        }
        self.rebuild_segments();
        Ok(true)
    }

    /// Convenience form addressing the anchor by cluster id: the move applies
    /// to the first run carrying `anchor_id`. Prefer [`expand_boundary_at`]
    /// when a sample index inside the anchored run is known, since several
    /// runs may share an id.
    ///
    /// [`expand_boundary_at`]: SegmentModel::expand_boundary_at
    pub fn expand_boundary(
        &mut self,
        anchor_id: ClusterId,
        direction: Direction,
        steps: usize,
        config: &ModelConfig,
    ) -> Result<bool> {
        let anchor_index = match self.segments.iter().find(|s| s.cluster_id == anchor_id) {
            Some(segment) => segment.start,
            None => return Ok(false),
        };
        self.expand_boundary_at(anchor_index, direction, steps, config)
    }

    fn donor_segment(&self, anchor: &Segment, direction: Direction) -> Option<Segment> {
        match direction {
            Direction::Left => {
                if anchor.start == 0 {
                    return None;
                }
                self.find_segment_containing(anchor.start - 1).ok().copied()
            }
            Direction::Right => {
                if anchor.end >= self.assignment.len() {
                    return None;
                }
                self.find_segment_containing(anchor.end).ok().copied()
            }
        }
    }
}
