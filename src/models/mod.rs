pub mod dataset;
pub mod segment;

pub use dataset::DatasetInfo;
pub use segment::{ClusterId, Direction, Segment};
