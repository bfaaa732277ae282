pub mod aggregate;
pub mod config;
pub mod edit;
pub mod model;

pub use aggregate::ClusterSummary;
pub use config::ModelConfig;
pub use model::{AssignmentSpan, SegmentModel};
