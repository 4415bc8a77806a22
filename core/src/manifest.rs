//! The machine-readable record of a report run, written next to the
//! figures so a skipped chart is visible without scraping logs.

use crate::chart::SkipReason;
use crate::error::ReportResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub generated_at: DateTime<Utc>,
    pub results_dir:  PathBuf,
    pub charts:       Vec<ChartRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRecord {
    pub index:  usize,
    pub slug:   String,
    pub status: ChartStatus,
    /// Files written for a generated chart.
    #[serde(default)]
    pub files:  Vec<PathBuf>,
    /// Why a skipped chart did not render.
    #[serde(default)]
    pub reason: Option<String>,
    /// Fallback branches taken while building.
    #[serde(default)]
    pub notes:  Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStatus {
    Generated,
    Skipped,
}

impl RunManifest {
    pub fn new(results_dir: &Path) -> Self {
        Self {
            generated_at: Utc::now(),
            results_dir:  results_dir.to_path_buf(),
            charts:       Vec::new(),
        }
    }

    pub fn record_generated(
        &mut self,
        index: usize,
        slug: &str,
        files: Vec<PathBuf>,
        notes: Vec<String>,
    ) {
        self.charts.push(ChartRecord {
            index,
            slug: slug.to_string(),
            status: ChartStatus::Generated,
            files,
            reason: None,
            notes,
        });
    }

    pub fn record_skipped(&mut self, index: usize, slug: &str, reason: &SkipReason) {
        self.charts.push(ChartRecord {
            index,
            slug: slug.to_string(),
            status: ChartStatus::Skipped,
            files: Vec::new(),
            reason: Some(reason.to_string()),
            notes: Vec::new(),
        });
    }

    pub fn generated_count(&self) -> usize {
        self.charts.iter().filter(|c| c.status == ChartStatus::Generated).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.charts.iter().filter(|c| c.status == ChartStatus::Skipped).count()
    }

    /// Write `manifest.json` under `dir`, pretty-printed.
    pub fn write(&self, dir: &Path) -> ReportResult<PathBuf> {
        let path = dir.join("manifest.json");
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(path)
    }
}
