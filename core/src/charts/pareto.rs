//! Pareto front figures, one series per published front file.

use crate::chart::{Chart, ChartOutcome, Marker, Panel, Series, SizeIn, SkipReason};
use crate::repository::ResultRepository;
use crate::style::TAB10;
use crate::types::FrontKind;

/// Figure 13: the cost-emissions fronts.
pub fn cost_emissions(repo: &ResultRepository) -> ChartOutcome {
    front_chart(repo, FrontKind::CostEmissions)
}

/// Figure 14: the cost-DIO fronts.
pub fn cost_dio(repo: &ResultRepository) -> ChartOutcome {
    front_chart(repo, FrontKind::CostDio)
}

fn front_chart(repo: &ResultRepository, kind: FrontKind) -> ChartOutcome {
    let fronts = repo.fronts(kind);
    if fronts.is_empty() {
        return ChartOutcome::Skipped(SkipReason::NoParetoFiles(kind));
    }

    let (title, x_label, marker) = match kind {
        FrontKind::CostEmissions => (
            "Cost-Emissions Pareto Front",
            "Total Emissions (Million kg CO₂)",
            Marker::Circle,
        ),
        FrontKind::CostDio => (
            "Cost-DIO Pareto Front",
            "Days Inventory Outstanding (DIO)",
            Marker::Square,
        ),
    };
    let mut panel = Panel::new(title, x_label, "Total Cost (Thousand $)");
    panel.legend = true;

    let mut color_idx = 0;
    for front in fronts {
        if !front.has_column("Cost") || !front.has_column(kind.objective_column()) {
            log::warn!(
                "{} front '{}' lacks Cost/{} columns, skipping file",
                kind.as_str(),
                front.instance,
                kind.objective_column()
            );
            continue;
        }
        // File order is the solver's sweep order; keep it.
        let points: Vec<(f64, f64)> = front
            .points
            .iter()
            .filter_map(|p| {
                let objective = front.objective(p)?;
                let x = match kind {
                    FrontKind::CostEmissions => objective / 1e6,
                    FrontKind::CostDio => objective,
                };
                Some((x, p.cost? / 1e3))
            })
            .collect();
        if points.is_empty() {
            continue;
        }
        panel.series.push(Series::Line {
            label:    Some(front.instance.clone()),
            points,
            color:    TAB10[color_idx % TAB10.len()],
            width_pt: 2.0,
            alpha:    1.0,
            dashed:   false,
            marker,
        });
        color_idx += 1;
    }

    let mut chart = Chart::new(SizeIn(8.0, 6.0));
    chart.panels.push(panel);
    ChartOutcome::built(chart)
}
