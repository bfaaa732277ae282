pub mod events;
pub mod series;

pub use events::{ChartEvent, MarkerId};
pub use series::{cluster_bars, color_for, line_series, BoundaryMarkers, ClusterBar, SeriesPoint};
