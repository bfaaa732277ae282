use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for one successfully loaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub id: String,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
    pub sample_count: usize,
}

impl DatasetInfo {
    pub fn new(source: impl Into<String>, sample_count: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source: source.into(),
            loaded_at: Utc::now(),
            sample_count,
        }
    }
}
