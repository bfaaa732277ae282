pub mod chart;
pub mod dataset;
pub mod error;
pub mod labels;
pub mod models;
pub mod segmentation;
pub mod workbench;

pub use error::{Error, Result};
pub use labels::{LabelEntry, LabelStore};
pub use models::{ClusterId, DatasetInfo, Direction, Segment};
pub use segmentation::{AssignmentSpan, ClusterSummary, ModelConfig, SegmentModel};
pub use workbench::{Selection, Workbench};

/// Initialize logging for the embedding shell (reads RUST_LOG).
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
