/// Tunable thresholds for interactive segment editing.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Minimum length a donor segment may be left with after a boundary move
    /// (shorter donors reject the move outright).
    pub min_segment_len: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            min_segment_len: 10,
        }
    }
}
