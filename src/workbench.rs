use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{info, warn};

use crate::chart::{
    cluster_bars, line_series, BoundaryMarkers, ChartEvent, ClusterBar, MarkerId, SeriesPoint,
};
use crate::dataset::{export_table, parse_assignment_json, parse_signal_json, parse_table};
use crate::error::Error as ModelError;
use crate::labels::LabelStore;
use crate::models::{ClusterId, DatasetInfo, Direction};
use crate::segmentation::{ModelConfig, SegmentModel};

/// Current half-open selection on the chart, seeded by clicking a run and
/// adjusted by dragging its boundary markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

struct LoadedDataset {
    info: DatasetInfo,
    model: SegmentModel,
}

/// Application root for an embedding chart shell.
///
/// Owns the segment model, the label store, the edit configuration and the
/// interactive selection. Every operation runs to completion on the caller's
/// interaction thread; only file load and save are async. A load either
/// swaps in a fully constructed model or leaves the prior state untouched.
pub struct Workbench {
    config: ModelConfig,
    labels: LabelStore,
    dataset: Option<LoadedDataset>,
    selection: Option<Selection>,
}

impl Workbench {
    pub fn new(labels: LabelStore) -> Self {
        Self::with_config(labels, ModelConfig::default())
    }

    pub fn with_config(labels: LabelStore, config: ModelConfig) -> Self {
        Self {
            config,
            labels,
            dataset: None,
            selection: None,
        }
    }

    pub fn model(&self) -> Option<&SegmentModel> {
        self.dataset.as_ref().map(|loaded| &loaded.model)
    }

    pub fn info(&self) -> Option<&DatasetInfo> {
        self.dataset.as_ref().map(|loaded| &loaded.info)
    }

    pub fn labels(&self) -> &LabelStore {
        &self.labels
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Read and load a combined CSV table from disk.
    pub async fn load_csv_file(&mut self, path: &Path) -> Result<DatasetInfo> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.load_csv_text(&text, &path.display().to_string())
    }

    /// Parse CSV table content and swap the model in if the whole table is
    /// valid. On failure the previously loaded dataset stays active.
    pub fn load_csv_text(&mut self, text: &str, source: &str) -> Result<DatasetInfo> {
        let parsed = parse_table(text)
            .with_context(|| format!("failed to load assignment table from {source}"))?;
        let model = SegmentModel::from_spans(parsed.signal, &parsed.spans)
            .with_context(|| format!("failed to build segments from {source}"))?;

        if parsed.missing_values {
            warn!("{source}: no peak_to_peak values; signal amplitudes default to 0");
        }
        self.labels.seed(&parsed.labels);
        Ok(self.install(model, source))
    }

    /// Load a signal with a parallel per-sample assignment.
    pub fn load_flat(
        &mut self,
        signal: Vec<f64>,
        assignment: Vec<ClusterId>,
        source: &str,
    ) -> Result<DatasetInfo> {
        let model = SegmentModel::from_assignment(signal, assignment)
            .with_context(|| format!("failed to build segments from {source}"))?;
        Ok(self.install(model, source))
    }

    /// Load the flat-array form: a JSON signal array plus a parallel JSON
    /// cluster-id array.
    pub fn load_flat_json(
        &mut self,
        signal_text: &str,
        assignment_text: &str,
        source: &str,
    ) -> Result<DatasetInfo> {
        let signal = parse_signal_json(signal_text)
            .with_context(|| format!("failed to load signal from {source}"))?;
        let assignment = parse_assignment_json(assignment_text)
            .with_context(|| format!("failed to load assignment from {source}"))?;
        self.load_flat(signal, assignment, source)
    }

    fn install(&mut self, model: SegmentModel, source: &str) -> DatasetInfo {
        let info = DatasetInfo::new(source, model.len());
        info!(
            "Loaded dataset {} from {source}: {} samples, {} segments",
            info.id,
            model.len(),
            model.segments().len()
        );
        self.dataset = Some(LoadedDataset {
            info: info.clone(),
            model,
        });
        self.selection = None;
        info
    }

    /// Apply one typed pointer event from the chart surface.
    ///
    /// A click selects the maximal run containing the clicked sample. A
    /// marker drag moves one selection edge, clamped so the selection stays
    /// a non-empty ordered range inside the signal.
    pub fn handle_event(&mut self, event: ChartEvent) -> Result<()> {
        let Some(loaded) = self.dataset.as_ref() else {
            warn!("chart event before any dataset was loaded");
            return Ok(());
        };

        match event {
            ChartEvent::PointClicked { sample_index } => {
                let (start, end) = loaded.model.run_bounds(sample_index)?;
                self.selection = Some(Selection { start, end });
            }
            ChartEvent::MarkerDragged {
                marker,
                new_sample_index,
            } => {
                let Some(mut selection) = self.selection else {
                    warn!("marker drag with no active selection");
                    return Ok(());
                };
                match marker {
                    MarkerId::SelectionStart => {
                        selection.start = new_sample_index.min(selection.end - 1);
                    }
                    MarkerId::SelectionEnd => {
                        selection.end = new_sample_index.clamp(selection.start + 1, loaded.model.len());
                    }
                }
                self.selection = Some(selection);
            }
        }
        Ok(())
    }

    /// Reassign the selected range to `new_id`. The selection survives the
    /// edit and still denotes the same index range.
    pub fn relabel_selection(&mut self, new_id: ClusterId) -> Result<()> {
        let Some(loaded) = self.dataset.as_mut() else {
            bail!("no dataset loaded");
        };
        let Some(selection) = self.selection else {
            bail!("no selection to relabel");
        };

        loaded
            .model
            .relabel_range(selection.start, selection.end, new_id)?;
        info!(
            "Relabeled samples [{}, {}) to cluster {new_id}",
            selection.start, selection.end
        );
        Ok(())
    }

    /// Grow the selected run into its neighbor by `steps` samples.
    ///
    /// Returns whether the boundary moved. A move the minimum-length guard
    /// rejects is reported as a soft warning and leaves everything unchanged.
    pub fn expand_selection_boundary(&mut self, direction: Direction, steps: usize) -> Result<bool> {
        let Some(loaded) = self.dataset.as_mut() else {
            bail!("no dataset loaded");
        };
        let Some(selection) = self.selection else {
            bail!("no selection to expand");
        };

        match loaded
            .model
            .expand_boundary_at(selection.start, direction, steps, &self.config)
        {
            Ok(moved) => {
                if moved {
                    let (start, end) = loaded.model.run_bounds(selection.start)?;
                    self.selection = Some(Selection { start, end });
                }
                Ok(moved)
            }
            Err(err @ ModelError::MinSegmentLength { .. }) => {
                warn!("boundary move rejected: {err}");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Rename a cluster and persist the label store immediately. Visible to
    /// every segment sharing the id, since labels are looked up by id.
    pub fn rename_cluster(&self, cluster_id: ClusterId, label: impl Into<String>) -> Result<()> {
        let label = label.into();
        self.labels.rename(cluster_id, label.clone())?;
        info!("Renamed cluster {cluster_id} to {label:?}");
        Ok(())
    }

    /// Line-chart point sequence for the current model.
    pub fn line_series(&self) -> Vec<SeriesPoint> {
        self.model().map(line_series).unwrap_or_default()
    }

    /// Bar-chart rows for the current model.
    pub fn cluster_bars(&self) -> Vec<ClusterBar> {
        self.model()
            .map(|model| cluster_bars(model, &self.labels))
            .unwrap_or_default()
    }

    /// Overlay positions for the current selection.
    pub fn selection_markers(&self) -> Option<BoundaryMarkers> {
        self.selection.map(|selection| BoundaryMarkers {
            start: selection.start,
            end: selection.end,
        })
    }

    /// Distinct cluster ids available for relabel menus.
    pub fn cluster_ids(&self) -> Vec<ClusterId> {
        self.model().map(SegmentModel::cluster_ids).unwrap_or_default()
    }

    /// Serialize the current assignment table for download.
    pub fn export_table(&self) -> Result<String> {
        let Some(loaded) = self.dataset.as_ref() else {
            bail!("no dataset loaded");
        };
        export_table(&loaded.model, &self.labels)
    }

    /// Write the current assignment table to disk.
    pub async fn save_csv_file(&self, path: &Path) -> Result<()> {
        let table = self.export_table()?;
        tokio::fs::write(path, table)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Saved assignment table to {}", path.display());
        Ok(())
    }
}
