//! Loaded result tables and pareto fronts. Both keep the header row so
//! downstream checks can tell "column absent" from "column empty".

use crate::error::ReportResult;
use crate::record::{ExperimentRecord, ParetoPoint};
use crate::types::{FrontKind, SolverStatus, TableKind};
use std::path::Path;

/// One result table, immutable after load.
#[derive(Debug, Clone)]
pub struct ResultTable {
    pub kind:    TableKind,
    pub columns: Vec<String>,
    pub rows:    Vec<ExperimentRecord>,
}

impl ResultTable {
    /// Read a comma-delimited result table. Malformed rows are logged
    /// and dropped; a malformed file is the caller's problem.
    pub fn load(kind: TableKind, path: &Path) -> ReportResult<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for result in reader.deserialize() {
            match result {
                Ok(record) => rows.push(record),
                Err(e) => log::warn!("{}: skipping malformed row: {e}", path.display()),
            }
        }
        Ok(Self { kind, columns, rows })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Rows the solver actually closed. Every chart works on this
    /// subset; infeasible and unknown-status rows never plot.
    pub fn optimal_rows(&self) -> impl Iterator<Item = &ExperimentRecord> {
        self.rows
            .iter()
            .filter(|r| r.solver_status == SolverStatus::Optimal)
    }
}

/// One pareto front, parsed from a semicolon-delimited
/// `<instance>_<family>_pareto.csv` file.
#[derive(Debug, Clone)]
pub struct ParetoFront {
    pub instance: String,
    pub kind:     FrontKind,
    pub columns:  Vec<String>,
    /// Points in file order; the solver writes fronts already ordered.
    pub points:   Vec<ParetoPoint>,
}

impl ParetoFront {
    pub fn load(instance: String, kind: FrontKind, path: &Path) -> ReportResult<Self> {
        let mut reader = csv::ReaderBuilder::new().delimiter(b';').from_path(path)?;
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut points = Vec::new();
        for result in reader.deserialize() {
            match result {
                Ok(point) => points.push(point),
                Err(e) => log::warn!("{}: skipping malformed row: {e}", path.display()),
            }
        }
        Ok(Self { instance, kind, columns, points })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// The objective value paired with cost for this front's family.
    pub fn objective(&self, point: &ParetoPoint) -> Option<f64> {
        match self.kind {
            FrontKind::CostEmissions => point.emissions,
            FrontKind::CostDio => point.dio,
        }
    }
}
