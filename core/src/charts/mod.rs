//! The figure catalog: fourteen builders plus the fixed publication
//! order they render in.
//!
//! FIGURE ORDER (fixed, mirrors the published numbering):
//!    1. scalability_runtime        scalability table
//!    2. scalability_emissions      scalability table
//!    3. scalability_buffers        scalability table
//!    4. tax_sweep                  tax sweep table
//!    5. cap_sweep                  cap sweep table
//!    6. hybrid_strategy            hybrid table
//!    7. cost_emissions_pareto      consolidated table
//!    8. strategy_comparison        consolidated table
//!    9. inventory_kpis             consolidated table
//!   10. service_time_sensitivity   service time table
//!   11. topology_comparison        topology table
//!   12. plm_nlm_comparison         model comparison table
//!   13. pareto_cost_emissions      pareto front files
//!   14. pareto_cost_dio            pareto front files
//!
//! RULES:
//!   - Builders read the repository and return data; they never draw.
//!   - Only OPTIMAL rows reach a chart.
//!   - A builder that cannot produce a chart returns a skip reason;
//!     it never panics and never fails the run.

pub mod pareto;
pub mod policy;
pub mod scalability;
pub mod sensitivity;
pub mod strategy;

use crate::chart::{ChartSpec, DataRequirement, Series};
use crate::stats;
use crate::style::Rgb;
use crate::types::{FrontKind, TableKind};

pub const CATALOG: [ChartSpec; 14] = [
    ChartSpec {
        index: 1,
        slug: "scalability_runtime",
        requirement: DataRequirement::Table {
            kind: TableKind::Scalability,
            columns: &["instance_id", "solver_status", "runtime_sec"],
        },
        build: scalability::runtime,
    },
    ChartSpec {
        index: 2,
        slug: "scalability_emissions",
        requirement: DataRequirement::Table {
            kind: TableKind::Scalability,
            columns: &["instance_id", "solver_status", "total_emissions"],
        },
        build: scalability::emissions,
    },
    ChartSpec {
        index: 3,
        slug: "scalability_buffers",
        requirement: DataRequirement::Table {
            kind: TableKind::Scalability,
            columns: &["instance_id", "solver_status", "buffer_count"],
        },
        build: scalability::buffers,
    },
    ChartSpec {
        index: 4,
        slug: "tax_sweep",
        requirement: DataRequirement::Table {
            kind: TableKind::TaxSweep,
            columns: &[
                "instance_id",
                "solver_status",
                "tax_rate",
                "total_emissions",
                "total_cost_with_tax",
            ],
        },
        build: policy::tax_sweep,
    },
    ChartSpec {
        index: 5,
        slug: "cap_sweep",
        requirement: DataRequirement::Table {
            kind: TableKind::CapSweep,
            columns: &[
                "instance_id",
                "solver_status",
                "cap_value",
                "total_cost_without_tax",
                "emission_reduction_pct",
            ],
        },
        build: policy::cap_sweep,
    },
    ChartSpec {
        index: 6,
        slug: "hybrid_strategy",
        requirement: DataRequirement::Table {
            kind: TableKind::Hybrid,
            columns: &[
                "instance_id",
                "solver_status",
                "tax_rate",
                "total_emissions",
                "total_cost_with_tax",
            ],
        },
        build: policy::hybrid_strategy,
    },
    ChartSpec {
        index: 7,
        slug: "cost_emissions_pareto",
        requirement: DataRequirement::Table {
            kind: TableKind::Consolidated,
            columns: &[
                "solver_status",
                "strategy",
                "total_emissions",
                "total_cost_without_tax",
            ],
        },
        build: strategy::tradeoff,
    },
    ChartSpec {
        index: 8,
        slug: "strategy_comparison",
        requirement: DataRequirement::Table {
            kind: TableKind::Consolidated,
            columns: &["solver_status", "strategy"],
        },
        build: strategy::comparison,
    },
    ChartSpec {
        index: 9,
        slug: "inventory_kpis",
        requirement: DataRequirement::Table {
            kind: TableKind::Consolidated,
            columns: &["solver_status", "strategy", "DIO"],
        },
        build: strategy::inventory,
    },
    ChartSpec {
        index: 10,
        slug: "service_time_sensitivity",
        requirement: DataRequirement::Table {
            kind: TableKind::ServiceTime,
            columns: &[
                "solver_status",
                "service_time_promised",
                "buffer_count",
                "total_cost_without_tax",
            ],
        },
        build: sensitivity::service_time,
    },
    ChartSpec {
        index: 11,
        slug: "topology_comparison",
        requirement: DataRequirement::Table {
            kind: TableKind::Topology,
            columns: &["instance_id", "solver_status", "total_emissions", "buffer_count"],
        },
        build: sensitivity::topology,
    },
    ChartSpec {
        index: 12,
        slug: "plm_nlm_comparison",
        requirement: DataRequirement::Table {
            kind: TableKind::ModelComparison,
            columns: &[
                "solver_status",
                "model_type",
                "runtime_sec",
                "total_cost_without_tax",
            ],
        },
        build: sensitivity::model_comparison,
    },
    ChartSpec {
        index: 13,
        slug: "pareto_cost_emissions",
        requirement: DataRequirement::Fronts(FrontKind::CostEmissions),
        build: pareto::cost_emissions,
    },
    ChartSpec {
        index: 14,
        slug: "pareto_cost_dio",
        requirement: DataRequirement::Fronts(FrontKind::CostDio),
        build: pareto::cost_dio,
    },
];

/// Category tick label for a numeric grouping value. Whole numbers lose
/// the trailing `.0` the raw float would print.
fn category_label(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Box series from `(slot, values, color)` groups. Groups too empty to
/// summarize keep their slot and label but draw nothing.
fn boxes_from_groups(groups: Vec<(usize, Vec<f64>, Rgb)>) -> Series {
    let mut boxes = Vec::new();
    let mut colors = Vec::new();
    for (slot, values, color) in groups {
        if let Some(summary) = stats::five_number_summary(&values) {
            boxes.push((slot, summary));
            colors.push(color);
        }
    }
    Series::Boxes { boxes, colors, alpha: 0.7 }
}
