//! Shared vocabulary of the reporting pipeline: solver statuses, carbon
//! policy strategies, BOM topologies, and the closed set of result tables.

use serde::Deserialize;
use std::path::PathBuf;

/// Solver outcome as written by the experiment driver. Anything other
/// than the two known sentinels collapses to `Other`, which keeps the
/// row loadable but excludes it from every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    #[default]
    Other,
}

impl From<String> for SolverStatus {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "OPTIMAL" => SolverStatus::Optimal,
            "INFEASIBLE" => SolverStatus::Infeasible,
            _ => SolverStatus::Other,
        }
    }
}

/// The carbon policy strategies the study compares. Parsing is exact:
/// the experiment driver writes these identifiers verbatim, and an
/// unrecognized value keeps its raw label with a fallback color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    EmisTax,
    EmisCap,
    EmisHybrid,
    Baseline,
}

impl Strategy {
    /// The three policy strategies (baseline excluded), in the order the
    /// comparison figures present them.
    pub const POLICIES: [Strategy; 3] =
        [Strategy::EmisTax, Strategy::EmisCap, Strategy::EmisHybrid];

    pub fn parse(raw: &str) -> Option<Strategy> {
        match raw {
            "EMISTAXE" => Some(Strategy::EmisTax),
            "EMISCAP" => Some(Strategy::EmisCap),
            "EMISHYBRID" => Some(Strategy::EmisHybrid),
            "baseline" => Some(Strategy::Baseline),
            _ => None,
        }
    }

    /// Identifier as it appears in the result tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::EmisTax => "EMISTAXE",
            Strategy::EmisCap => "EMISCAP",
            Strategy::EmisHybrid => "EMISHYBRID",
            Strategy::Baseline => "baseline",
        }
    }
}

/// BOM structure classes, derived from instance identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    MultiLevel,
    Parallel,
    Standard,
}

impl Topology {
    pub fn label(&self) -> &'static str {
        match self {
            Topology::MultiLevel => "Multi-Level",
            Topology::Parallel => "Parallel",
            Topology::Standard => "Standard",
        }
    }
}

/// The result tables a campaign directory can contain. The consolidated
/// table sits at the directory root; everything else lives under
/// `tables/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Consolidated,
    Scalability,
    TaxSweep,
    CapSweep,
    Hybrid,
    ServiceTime,
    Topology,
    ModelComparison,
}

impl TableKind {
    pub const ALL: [TableKind; 8] = [
        TableKind::Consolidated,
        TableKind::Scalability,
        TableKind::TaxSweep,
        TableKind::CapSweep,
        TableKind::Hybrid,
        TableKind::ServiceTime,
        TableKind::Topology,
        TableKind::ModelComparison,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            TableKind::Consolidated => "consolidated_results.csv",
            TableKind::Scalability => "scalability_results.csv",
            TableKind::TaxSweep => "carbon_tax_sweep_results.csv",
            TableKind::CapSweep => "carbon_cap_sweep_results.csv",
            TableKind::Hybrid => "carbon_hybrid_results.csv",
            TableKind::ServiceTime => "service_time_sensitivity_results.csv",
            TableKind::Topology => "topology_baseline_results.csv",
            TableKind::ModelComparison => "nlm_comparison_results.csv",
        }
    }

    /// Location relative to the results directory.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            TableKind::Consolidated => PathBuf::from(self.file_name()),
            _ => PathBuf::from("tables").join(self.file_name()),
        }
    }

    /// Short name used in log lines and skip reasons.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Consolidated => "consolidated",
            TableKind::Scalability => "scalability",
            TableKind::TaxSweep => "tax sweep",
            TableKind::CapSweep => "cap sweep",
            TableKind::Hybrid => "hybrid",
            TableKind::ServiceTime => "service time",
            TableKind::Topology => "topology",
            TableKind::ModelComparison => "model comparison",
        }
    }
}

/// The two pareto front families the study publishes. A third family
/// (`cost_wip`) exists on disk but is not part of the figure catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontKind {
    CostEmissions,
    CostDio,
}

impl FrontKind {
    pub const ALL: [FrontKind; 2] = [FrontKind::CostEmissions, FrontKind::CostDio];

    /// Filename suffix that identifies a front file of this kind.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            FrontKind::CostEmissions => "_cost_emissions_pareto.csv",
            FrontKind::CostDio => "_cost_dio_pareto.csv",
        }
    }

    /// Header of the objective column paired with `Cost`.
    pub fn objective_column(&self) -> &'static str {
        match self {
            FrontKind::CostEmissions => "Emissions",
            FrontKind::CostDio => "DIO",
        }
    }

    /// Short name used in log lines and skip reasons.
    pub fn as_str(&self) -> &'static str {
        match self {
            FrontKind::CostEmissions => "cost-emissions",
            FrontKind::CostDio => "cost-DIO",
        }
    }
}
