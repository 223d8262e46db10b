pub mod run_log;

use crate::services::archive;
use crate::services::kml;
use crate::types::{ExtractOutcome, OverlayRecord, SkipReason};
use anyhow::{Context, Result};
use run_log::ProcessingLog;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Conventional internal name of the map document inside a KMZ.
pub const KML_INTERNAL_NAME: &str = "doc.kml";
/// Scratch name for the synthesized KML before it is zipped back up.
const CLEANED_KML_NAME: &str = "cleaned.kml";

pub const OUTPUT_DIR_NAME: &str = "processed_kmz";
pub const SCRATCH_DIR_NAME: &str = "temp_extract";

/// Where the driver reads inputs and puts its output and scratch state.
/// Passed in explicitly so tests can point everything at a temp dir.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub scratch_dir: PathBuf,
}

impl PipelineConfig {
    /// Conventional layout: inputs directly in `dir`, output and scratch in
    /// subdirectories next to them.
    pub fn for_dir(dir: &Path) -> Self {
        Self {
            input_dir: dir.to_path_buf(),
            output_dir: dir.join(OUTPUT_DIR_NAME),
            scratch_dir: dir.join(SCRATCH_DIR_NAME),
        }
    }
}

/// Terminal state of one discovered input.
#[derive(Debug)]
pub enum ItemOutcome {
    Completed { output_path: PathBuf },
    SkippedNoKml,
    Skipped(SkipReason),
    Failed(String),
}

/// Per-item outcomes for the whole run, in processing order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub items: Vec<(String, ItemOutcome)>,
}

impl RunSummary {
    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Completed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::SkippedNoKml | ItemOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Per-item extraction directory. Removed when the item's processing ends,
/// on every path out (success, skip or failure).
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(err) = fs::remove_dir_all(&self.path) {
                log::warn!(
                    "Could not remove scratch dir {}: {err}",
                    self.path.display()
                );
            }
        }
    }
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Delete and recreate the output and scratch directories, wiping any
    /// state from previous runs. Failure here is fatal for the whole run.
    pub fn reset_dirs(&self) -> Result<()> {
        for dir in [&self.config.output_dir, &self.config.scratch_dir] {
            if dir.exists() {
                fs::remove_dir_all(dir)
                    .with_context(|| format!("failed to clear {}", dir.display()))?;
            }
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    /// Process every archive in the input directory: extract, parse, clean,
    /// repackage. Individual failures abandon that item only; the run always
    /// finishes, writes its log, and clears the scratch area.
    pub fn run(&self) -> Result<RunSummary> {
        fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!(
                "failed to create output dir {}",
                self.config.output_dir.display()
            )
        })?;
        fs::create_dir_all(&self.config.scratch_dir).with_context(|| {
            format!(
                "failed to create scratch dir {}",
                self.config.scratch_dir.display()
            )
        })?;

        let work_items = self.discover().context("failed to enumerate input files")?;
        log::info!("{} KMZ file(s) to process", work_items.len());

        let mut summary = RunSummary::default();
        let mut processing_log = ProcessingLog::default();

        for item in work_items {
            let name = match item.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => {
                    log::warn!("Skipping {}: non-UTF-8 file name", item.display());
                    continue;
                }
            };
            log::info!("Processing {name}...");

            let outcome = self.process_item(&item, &name, &mut processing_log);
            match &outcome {
                ItemOutcome::Completed { output_path } => {
                    log::info!("Processed {name} -> {}", output_path.display());
                }
                ItemOutcome::SkippedNoKml => {
                    log::info!("No {KML_INTERNAL_NAME} in {name}, skipping");
                }
                ItemOutcome::Skipped(reason) => {
                    log::info!("Skipping {name}: {reason}");
                }
                ItemOutcome::Failed(err) => {
                    log::warn!("Failed to process {name}: {err}");
                }
            }
            summary.items.push((name, outcome));
        }

        processing_log
            .write_to(&self.config.output_dir)
            .context("failed to write run log")?;
        self.cleanup_scratch();
        Ok(summary)
    }

    /// Find work items by suffix (deliberately no content sniffing). Generic
    /// `.zip` bundles are unpacked into the scratch root first and any `.kmz`
    /// they contain is picked up there; bare `.kmz` files in the input
    /// directory are taken directly.
    fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut items = Vec::new();

        for entry in fs::read_dir(&self.config.input_dir).with_context(|| {
            format!(
                "failed to read input dir {}",
                self.config.input_dir.display()
            )
        })? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if has_suffix(&path, "zip") {
                log::info!("Extracting ZIP bundle {}", path.display());
                if let Err(err) = archive::extract_archive(&path, &self.config.scratch_dir) {
                    log::warn!("Skipping {}: {err}", path.display());
                }
            } else if has_suffix(&path, "kmz") {
                items.push(path);
            }
        }

        for entry in fs::read_dir(&self.config.scratch_dir).with_context(|| {
            format!(
                "failed to read scratch dir {}",
                self.config.scratch_dir.display()
            )
        })? {
            let path = entry?.path();
            if path.is_file() && has_suffix(&path, "kmz") {
                items.push(path);
            }
        }

        // Stable processing order keeps the log deterministic run-to-run.
        items.sort();
        Ok(items)
    }

    fn process_item(
        &self,
        archive_path: &Path,
        file_name: &str,
        processing_log: &mut ProcessingLog,
    ) -> ItemOutcome {
        let stem = archive_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "extracted".to_string());
        let scratch = ScratchDir::new(self.config.scratch_dir.join(stem));

        if let Err(err) = archive::extract_archive(archive_path, scratch.path()) {
            return ItemOutcome::Failed(err.to_string());
        }

        let kml_path = scratch.path().join(KML_INTERNAL_NAME);
        if !kml_path.exists() {
            return ItemOutcome::SkippedNoKml;
        }

        let record = match kml::extract_overlay(&kml_path) {
            Ok(ExtractOutcome::Overlay(record)) => record,
            Ok(ExtractOutcome::Skip(reason)) => return ItemOutcome::Skipped(reason),
            Err(err) => return ItemOutcome::Failed(err.to_string()),
        };

        match self.repackage(file_name, scratch.path(), &record) {
            Ok(output_path) => {
                processing_log.record(file_name, &output_path);
                ItemOutcome::Completed { output_path }
            }
            Err(err) => ItemOutcome::Failed(format!("{err:#}")),
        }
    }

    /// Write the cleaned KML into the item's scratch dir, then zip it (under
    /// the conventional internal name) together with the original image into
    /// the output directory, named after the input archive.
    fn repackage(
        &self,
        file_name: &str,
        scratch: &Path,
        record: &OverlayRecord,
    ) -> Result<PathBuf> {
        let cleaned_path = scratch.join(CLEANED_KML_NAME);
        let kml_text = kml::synthesize(record)?;
        fs::write(&cleaned_path, kml_text)
            .with_context(|| format!("failed to write {}", cleaned_path.display()))?;

        let image_path = scratch.join(&record.image_href);
        let output_path = self.config.output_dir.join(file_name);
        archive::create_archive(
            &output_path,
            &[
                (cleaned_path.as_path(), KML_INTERNAL_NAME),
                (image_path.as_path(), record.image_href.as_str()),
            ],
        )?;
        Ok(output_path)
    }

    /// Best-effort removal of the whole scratch area. The run's output is
    /// already complete at this point, so anything left behind is only worth
    /// a warning.
    fn cleanup_scratch(&self) {
        for entry in WalkDir::new(&self.config.scratch_dir)
            .contents_first(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.path() == self.config.scratch_dir {
                continue;
            }
            let result = if entry.file_type().is_dir() {
                fs::remove_dir(entry.path())
            } else {
                fs::remove_file(entry.path())
            };
            if let Err(err) = result {
                log::warn!("Could not remove {}: {err}", entry.path().display());
            }
        }

        match fs::remove_dir(&self.config.scratch_dir) {
            Ok(()) => log::info!("Cleaned up {}", self.config.scratch_dir.display()),
            Err(err) => log::warn!(
                "Could not remove {}: {err}",
                self.config.scratch_dir.display()
            ),
        }
    }
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(suffix))
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
