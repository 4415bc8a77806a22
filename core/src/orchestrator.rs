//! Drives the full figure catalog over one campaign's results.
//!
//! EXECUTION ORDER (per catalog entry, in published figure order):
//!   1. Check the entry's data requirement against the repository.
//!   2. Build the chart value; builders may still skip on filters.
//!   3. Render PNG and SVG, record the outcome in the manifest.
//!
//! RULES:
//!   - A missing table, missing column, or empty filter skips that one
//!     chart and never aborts the run.
//!   - A render or filesystem failure is fatal. A half-written figures
//!     directory with no manifest would look like a finished report.

use crate::chart::{ChartOutcome, DataRequirement, SkipReason};
use crate::charts::CATALOG;
use crate::error::ReportResult;
use crate::manifest::RunManifest;
use crate::render::Renderer;
use crate::repository::ResultRepository;
use std::path::{Path, PathBuf};

pub struct ReportOrchestrator {
    repository:  ResultRepository,
    renderer:    Renderer,
    results_dir: PathBuf,
}

impl ReportOrchestrator {
    pub fn new(repository: ResultRepository, renderer: Renderer, results_dir: &Path) -> Self {
        Self {
            repository,
            renderer,
            results_dir: results_dir.to_path_buf(),
        }
    }

    /// Run the whole catalog and write `manifest.json` next to the
    /// figures. Returns the manifest for callers that print a summary.
    pub fn generate_all(&self) -> ReportResult<RunManifest> {
        let mut manifest = RunManifest::new(&self.results_dir);

        for spec in &CATALOG {
            let outcome = match gate(&self.repository, spec.requirement) {
                Some(reason) => ChartOutcome::Skipped(reason),
                None => (spec.build)(&self.repository),
            };
            match outcome {
                ChartOutcome::Built { chart, notes } => {
                    let files = self.renderer.render(spec.index, spec.slug, &chart)?;
                    log::info!(
                        "fig{}_{} written ({} file(s))",
                        spec.index,
                        spec.slug,
                        files.len()
                    );
                    manifest.record_generated(spec.index, spec.slug, files, notes);
                }
                ChartOutcome::Skipped(reason) => {
                    log::warn!("fig{}_{} skipped: {reason}", spec.index, spec.slug);
                    manifest.record_skipped(spec.index, spec.slug, &reason);
                }
            }
        }

        manifest.write(self.renderer.figures_dir())?;
        log::info!(
            "Report complete: {} generated, {} skipped",
            manifest.generated_count(),
            manifest.skipped_count()
        );
        Ok(manifest)
    }
}

/// First unmet data requirement, or None when the builder may run.
fn gate(repository: &ResultRepository, requirement: DataRequirement) -> Option<SkipReason> {
    match requirement {
        DataRequirement::Table { kind, columns } => match repository.table(kind) {
            None => Some(SkipReason::TableMissing(kind)),
            Some(table) => columns
                .iter()
                .copied()
                .find(|column| !table.has_column(column))
                .map(SkipReason::MissingColumn),
        },
        DataRequirement::Fronts(kind) => {
            if repository.fronts(kind).is_empty() {
                Some(SkipReason::NoParetoFiles(kind))
            } else {
                None
            }
        }
    }
}
