use std::{collections::BTreeMap, fs, path::PathBuf, sync::RwLock};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ClusterId;

/// One stored display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelEntry {
    pub label: String,
    pub updated_at: DateTime<Utc>,
}

/// Persistent cluster-id to display-name mapping.
///
/// Read once at startup and written back on every rename. A store file that
/// fails to parse falls back to an empty mapping instead of blocking startup.
/// Ids without an entry resolve to the synthesized default `Cluster {id}`,
/// which is never persisted on its own.
pub struct LabelStore {
    path: Option<PathBuf>,
    data: RwLock<BTreeMap<ClusterId, LabelEntry>>,
}

impl LabelStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read labels from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    /// Store that never touches disk, for tests and embedders that manage
    /// persistence themselves.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Display name for a cluster, defaulting to `Cluster {id}` when unset.
    pub fn resolve(&self, cluster_id: ClusterId) -> String {
        self.data
            .read()
            .unwrap()
            .get(&cluster_id)
            .map(|entry| entry.label.clone())
            .unwrap_or_else(|| format!("Cluster {cluster_id}"))
    }

    /// Whether an explicit name has been stored for `cluster_id`.
    pub fn contains(&self, cluster_id: ClusterId) -> bool {
        self.data.read().unwrap().contains_key(&cluster_id)
    }

    /// Set a display name unconditionally and persist the mapping.
    ///
    /// Empty strings are accepted; trimming and validation are a UI concern.
    pub fn rename(&self, cluster_id: ClusterId, label: impl Into<String>) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.insert(
            cluster_id,
            LabelEntry {
                label: label.into(),
                updated_at: Utc::now(),
            },
        );
        self.persist(&guard)
    }

    /// Seed names carried by a loaded table. Existing entries win, so a
    /// user's explicit renames survive re-loads; seeded names reach disk on
    /// the next rename.
    pub fn seed(&self, defaults: &BTreeMap<ClusterId, String>) {
        let mut guard = self.data.write().unwrap();
        for (&cluster_id, label) in defaults {
            guard.entry(cluster_id).or_insert_with(|| LabelEntry {
                label: label.clone(),
                updated_at: Utc::now(),
            });
        }
    }

    /// Snapshot of all stored entries.
    pub fn entries(&self) -> BTreeMap<ClusterId, LabelEntry> {
        self.data.read().unwrap().clone()
    }

    fn persist(&self, data: &BTreeMap<ClusterId, LabelEntry>) -> Result<()> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(()),
        };
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write labels to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store_path() -> PathBuf {
        std::env::temp_dir().join(format!("clusterscope_labels_{}.json", Uuid::new_v4()))
    }

    #[test]
    fn resolve_falls_back_to_synthesized_default() {
        let store = LabelStore::in_memory();
        assert_eq!(store.resolve(7), "Cluster 7");
        assert!(!store.contains(7));
    }

    #[test]
    fn rename_is_visible_immediately() {
        let store = LabelStore::in_memory();
        store.rename(2, "Resting").unwrap();

        assert_eq!(store.resolve(2), "Resting");
        assert_eq!(store.resolve(1), "Cluster 1");
        assert!(store.contains(2));
    }

    #[test]
    fn rename_persists_and_reloads() {
        let path = temp_store_path();

        let store = LabelStore::new(path.clone()).unwrap();
        store.rename(0, "Walking").unwrap();
        store.rename(2, "Resting").unwrap();

        let reloaded = LabelStore::new(path.clone()).unwrap();
        assert_eq!(reloaded.resolve(0), "Walking");
        assert_eq!(reloaded.resolve(2), "Resting");
        assert_eq!(reloaded.entries().len(), 2);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_store_file_falls_back_to_empty() {
        let path = temp_store_path();
        fs::write(&path, "not json").unwrap();

        let store = LabelStore::new(path.clone()).unwrap();
        assert_eq!(store.resolve(0), "Cluster 0");
        assert!(store.entries().is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn seed_never_overwrites_explicit_renames() {
        let store = LabelStore::in_memory();
        store.rename(1, "Walking").unwrap();

        let mut defaults = BTreeMap::new();
        defaults.insert(1, "From File".to_string());
        defaults.insert(3, "Climbing".to_string());
        store.seed(&defaults);

        assert_eq!(store.resolve(1), "Walking");
        assert_eq!(store.resolve(3), "Climbing");
    }

    #[test]
    fn empty_label_is_allowed() {
        let store = LabelStore::in_memory();
        store.rename(4, "").unwrap();
        assert_eq!(store.resolve(4), "");
    }
}
