//! Carbon policy sweep figures: tax response, cap compliance cost, and
//! the hybrid tax-plus-cap trade-off.

use crate::chart::{
    Annotation, Chart, ChartOutcome, ColorScale, HAlign, Marker, Panel, Series, SizeIn, SkipReason,
};
use crate::derive::{self, BaselineSource};
use crate::record::ExperimentRecord;
use crate::repository::ResultRepository;
use crate::stats;
use crate::style::{BLACK, SET2, TAB10};
use crate::types::TableKind;

/// Figure 4: per-instance emissions and cost response to the carbon
/// tax, side by side. Instances with fewer than two closed rows are
/// left off both panels.
pub fn tax_sweep(repo: &ResultRepository) -> ChartOutcome {
    let Some(table) = repo.table(TableKind::TaxSweep) else {
        return ChartOutcome::Skipped(SkipReason::TableMissing(TableKind::TaxSweep));
    };
    let rows: Vec<&ExperimentRecord> = table.optimal_rows().collect();
    if rows.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }
    let instances = stats::unique_in_order(rows.iter().map(|r| r.instance_id.clone()));

    let mut emissions_panel = Panel::new(
        "Emissions Response to Carbon Tax",
        "Carbon Tax Rate ($/unit)",
        "Total Emissions (Million kg CO₂)",
    );
    let mut cost_panel = Panel::new(
        "Cost Impact of Carbon Tax",
        "Carbon Tax Rate ($/unit)",
        "Total Cost (Thousand $)",
    );

    for (i, instance) in instances.iter().enumerate() {
        // Color is tied to the instance's position, not to how many
        // instances pass the gate.
        let color = TAB10[i % TAB10.len()];

        let group: Vec<&ExperimentRecord> = rows
            .iter()
            .copied()
            .filter(|r| r.instance_id == *instance)
            .collect();
        // One row-count gate covers both panels, so their legends stay
        // in step even when a metric column is sparse.
        if group.len() < 2 {
            continue;
        }

        let mut emissions: Vec<(f64, f64)> = group
            .iter()
            .filter_map(|r| Some((r.tax_rate?, r.total_emissions? / 1e6)))
            .collect();
        emissions.sort_by(|a, b| a.0.total_cmp(&b.0));
        emissions_panel.series.push(Series::Line {
            label:    Some(instance.clone()),
            points:   emissions,
            color,
            width_pt: 2.0,
            alpha:    1.0,
            dashed:   false,
            marker:   Marker::Circle,
        });

        let mut costs: Vec<(f64, f64)> = group
            .iter()
            .filter_map(|r| Some((r.tax_rate?, r.total_cost_with_tax? / 1e3)))
            .collect();
        costs.sort_by(|a, b| a.0.total_cmp(&b.0));
        cost_panel.series.push(Series::Line {
            label:    Some(instance.clone()),
            points:   costs,
            color,
            width_pt: 2.0,
            alpha:    1.0,
            dashed:   false,
            marker:   Marker::Square,
        });
    }

    emissions_panel.legend = true;
    emissions_panel.legend_size_pt = Some(8);
    cost_panel.legend = true;
    cost_panel.legend_size_pt = Some(8);

    let mut chart = Chart::new(SizeIn(12.0, 5.0));
    chart.panels.push(emissions_panel);
    chart.panels.push(cost_panel);
    ChartOutcome::built(chart)
}

/// Figure 5: compliance cost as the emission cap tightens. The x axis
/// is the cap as a percentage of the instance baseline, inverted so
/// tightening reads left-to-right.
pub fn cap_sweep(repo: &ResultRepository) -> ChartOutcome {
    let Some(table) = repo.table(TableKind::CapSweep) else {
        return ChartOutcome::Skipped(SkipReason::TableMissing(TableKind::CapSweep));
    };
    let rows: Vec<&ExperimentRecord> = table.optimal_rows().collect();
    if rows.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }
    let instances = stats::unique_in_order(rows.iter().map(|r| r.instance_id.clone()));

    let mut panel = Panel::new(
        "Cost of Emission Cap Compliance",
        "Emission Cap (% of baseline)",
        "Total Cost (Thousand $)",
    );
    panel.x_inverted = true;
    panel.legend = true;
    panel.legend_size_pt = Some(8);
    let mut notes = Vec::new();

    for (i, instance) in instances.iter().enumerate() {
        let color = SET2[i % SET2.len()];

        // Loosest cap first; its row carries the designated baseline.
        let mut group: Vec<(&ExperimentRecord, f64)> = rows
            .iter()
            .filter(|r| r.instance_id == *instance)
            .filter_map(|r| r.cap_value.map(|cap| (*r, cap)))
            .collect();
        group.sort_by(|a, b| b.1.total_cmp(&a.1));
        if group.len() < 2 {
            continue;
        }

        let column_baseline = group.first().and_then(|(r, _)| r.baseline_emissions);
        let cap_max = group.iter().map(|(_, cap)| *cap).fold(f64::NEG_INFINITY, f64::max);
        let Some((baseline, source)) = derive::group_baseline(column_baseline, Some(cap_max))
        else {
            continue;
        };
        if source == BaselineSource::GroupMax {
            notes.push(format!(
                "{instance}: cap baseline taken from max cap_value (no baseline_emissions)"
            ));
        }

        let points: Vec<(f64, f64)> = group
            .iter()
            .filter_map(|(r, cap)| {
                Some((derive::pct_of(*cap, baseline), r.total_cost_without_tax? / 1e3))
            })
            .collect();
        if points.len() < 2 {
            continue;
        }
        panel.series.push(Series::Line {
            label:    Some(instance.clone()),
            points,
            color,
            width_pt: 2.0,
            alpha:    1.0,
            dashed:   false,
            marker:   Marker::Circle,
        });
    }

    let mut chart = Chart::new(SizeIn(8.0, 5.0));
    chart.panels.push(panel);
    ChartOutcome::Built { chart, notes }
}

/// Figure 6: hybrid tax-plus-cap trade-off panels for the first two
/// distinct instances, points colored by tax rate. An instance with
/// fewer than two usable runs loses its panel; later instances are
/// never promoted into the pair.
pub fn hybrid_strategy(repo: &ResultRepository) -> ChartOutcome {
    let Some(table) = repo.table(TableKind::Hybrid) else {
        return ChartOutcome::Skipped(SkipReason::TableMissing(TableKind::Hybrid));
    };
    let rows: Vec<&ExperimentRecord> = table.optimal_rows().collect();
    if rows.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }
    let instances = stats::unique_in_order(rows.iter().map(|r| r.instance_id.clone()));

    let mut panels = Vec::new();
    for instance in instances.iter().take(2) {
        // (emissions, cost, tax rate), already scaled for display.
        let group: Vec<(f64, f64, f64)> = rows
            .iter()
            .filter(|r| r.instance_id == *instance)
            .filter_map(|r| {
                Some((r.total_emissions? / 1e6, r.total_cost_with_tax? / 1e3, r.tax_rate?))
            })
            .collect();
        if group.len() < 2 {
            continue;
        }

        let t_min = group.iter().map(|p| p.2).fold(f64::INFINITY, f64::min);
        let t_max = group.iter().map(|p| p.2).fold(f64::NEG_INFINITY, f64::max);
        let span = (t_max - t_min).max(f64::EPSILON);

        let mut panel = Panel::new(
            &format!("Hybrid Strategy Trade-offs: {instance}"),
            "Total Emissions (Million kg CO₂)",
            "Total Cost (Thousand $)",
        );
        panel.color_scale = Some(ColorScale { label: "Tax Rate".into(), min: t_min, max: t_max });
        panel.series.push(Series::ColorScatter {
            points:    group.iter().map(|(x, y, t)| (*x, *y, (t - t_min) / span)).collect(),
            radius_pt: 6,
            alpha:     0.8,
        });
        for (x, y, t) in &group {
            panel.annotations.push(Annotation::Text {
                x:         *x,
                y:         *y,
                text:      format!("τ={t:.2}"),
                color:     BLACK,
                size_pt:   7,
                align:     HAlign::Left,
                offset_pt: (5, 5),
            });
        }
        panels.push(panel);
    }

    if panels.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }
    let mut chart = Chart::new(SizeIn(12.0, 5.0));
    chart.panels = panels;
    ChartOutcome::built(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ResultTable;
    use crate::types::SolverStatus;

    fn cap_row(
        instance: &str,
        cap: f64,
        cost: f64,
        baseline: Option<f64>,
    ) -> ExperimentRecord {
        ExperimentRecord {
            instance_id:            instance.into(),
            solver_status:          SolverStatus::Optimal,
            cap_value:              Some(cap),
            total_cost_without_tax: Some(cost),
            baseline_emissions:     baseline,
            ..ExperimentRecord::default()
        }
    }

    fn cap_repo(rows: Vec<ExperimentRecord>) -> ResultRepository {
        ResultRepository::empty().with_table(ResultTable {
            kind:    TableKind::CapSweep,
            columns: [
                "instance_id",
                "solver_status",
                "cap_value",
                "total_cost_without_tax",
                "baseline_emissions",
                "emission_reduction_pct",
            ]
            .map(String::from)
            .to_vec(),
            rows,
        })
    }

    #[test]
    fn cap_sweep_prefers_the_baseline_column() {
        let repo = cap_repo(vec![
            cap_row("m1", 800.0, 10_000.0, Some(1_000.0)),
            cap_row("m1", 400.0, 14_000.0, Some(1_000.0)),
        ]);
        let ChartOutcome::Built { chart, notes } = cap_sweep(&repo) else {
            panic!("expected a built chart");
        };
        assert!(notes.is_empty(), "no fallback note when the column is present");
        let Series::Line { points, .. } = &chart.panels[0].series[0] else {
            panic!("expected a line series");
        };
        // 800 and 400 against a baseline of 1000, loosest first.
        assert_eq!(points, &vec![(80.0, 10.0), (40.0, 14.0)]);
    }

    #[test]
    fn cap_sweep_falls_back_to_group_max_and_says_so() {
        let repo = cap_repo(vec![
            cap_row("m1", 800.0, 10_000.0, None),
            cap_row("m1", 400.0, 14_000.0, None),
        ]);
        let ChartOutcome::Built { chart, notes } = cap_sweep(&repo) else {
            panic!("expected a built chart");
        };
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("max cap_value"));
        let Series::Line { points, .. } = &chart.panels[0].series[0] else {
            panic!("expected a line series");
        };
        // The loosest cap is exactly 100% of itself.
        assert_eq!(points[0], (100.0, 10.0));
        assert_eq!(points[1], (50.0, 14.0));
    }

    fn sweep_row(
        instance: &str,
        tax: f64,
        emissions: Option<f64>,
        cost: Option<f64>,
    ) -> ExperimentRecord {
        ExperimentRecord {
            instance_id:         instance.into(),
            solver_status:       SolverStatus::Optimal,
            tax_rate:            Some(tax),
            total_emissions:     emissions,
            total_cost_with_tax: cost,
            ..ExperimentRecord::default()
        }
    }

    fn sweep_repo(kind: TableKind, rows: Vec<ExperimentRecord>) -> ResultRepository {
        ResultRepository::empty().with_table(ResultTable {
            kind,
            columns: [
                "instance_id",
                "solver_status",
                "tax_rate",
                "total_emissions",
                "total_cost_with_tax",
            ]
            .map(String::from)
            .to_vec(),
            rows,
        })
    }

    #[test]
    fn tax_sweep_row_gate_keeps_both_panels_in_step() {
        // Two closed rows pass the gate; the sparse cost column plots
        // what it has instead of dropping the instance from one panel.
        let repo = sweep_repo(
            TableKind::TaxSweep,
            vec![
                sweep_row("m1", 0.0, Some(2.0e6), Some(3.0e3)),
                sweep_row("m1", 50.0, Some(1.6e6), None),
            ],
        );
        let ChartOutcome::Built { chart, .. } = tax_sweep(&repo) else {
            panic!("expected a built chart");
        };
        let Series::Line { label, points, .. } = &chart.panels[0].series[0] else {
            panic!("expected a line series");
        };
        assert_eq!(label.as_deref(), Some("m1"));
        assert_eq!(points, &vec![(0.0, 2.0), (50.0, 1.6)]);
        let Series::Line { label, points, .. } = &chart.panels[1].series[0] else {
            panic!("expected a line series");
        };
        assert_eq!(label.as_deref(), Some("m1"));
        assert_eq!(points, &vec![(0.0, 3.0)]);
    }

    #[test]
    fn hybrid_keeps_only_the_first_two_distinct_instances() {
        let mut rows = Vec::new();
        for instance in ["a", "b", "c"] {
            for tax in [1.0, 2.0] {
                rows.push(sweep_row(
                    instance,
                    tax,
                    Some(2e6 - tax * 1e5),
                    Some(3e3 + tax * 1e2),
                ));
            }
        }
        let ChartOutcome::Built { chart, .. } =
            hybrid_strategy(&sweep_repo(TableKind::Hybrid, rows))
        else {
            panic!("expected a built chart");
        };
        assert_eq!(chart.panels.len(), 2);
        assert_eq!(chart.panels[0].title, "Hybrid Strategy Trade-offs: a");
        assert_eq!(chart.panels[1].title, "Hybrid Strategy Trade-offs: b");
    }

    #[test]
    fn hybrid_never_promotes_a_third_instance() {
        // "alpha" has a single usable run: its panel is dropped and the
        // pair is not refilled from "gamma".
        let mut rows = vec![sweep_row("alpha", 1.0, Some(2e6), Some(3e3))];
        for instance in ["beta", "gamma"] {
            for tax in [1.0, 2.0] {
                rows.push(sweep_row(instance, tax, Some(2e6), Some(3e3)));
            }
        }
        let ChartOutcome::Built { chart, .. } =
            hybrid_strategy(&sweep_repo(TableKind::Hybrid, rows))
        else {
            panic!("expected a built chart");
        };
        assert_eq!(chart.panels.len(), 1);
        assert_eq!(chart.panels[0].title, "Hybrid Strategy Trade-offs: beta");
    }

    #[test]
    fn hybrid_skips_when_both_leading_instances_are_thin() {
        let rows = vec![
            sweep_row("alpha", 1.0, Some(2e6), Some(3e3)),
            sweep_row("beta", 1.0, Some(2e6), Some(3e3)),
            sweep_row("gamma", 1.0, Some(2e6), Some(3e3)),
            sweep_row("gamma", 2.0, Some(1.5e6), Some(3.5e3)),
        ];
        assert!(matches!(
            hybrid_strategy(&sweep_repo(TableKind::Hybrid, rows)),
            ChartOutcome::Skipped(SkipReason::EmptyAfterFilter)
        ));
    }

    #[test]
    fn hybrid_with_a_single_instance_builds_one_panel() {
        let rows = vec![
            sweep_row("solo", 1.0, Some(2e6), Some(3e3)),
            sweep_row("solo", 2.0, Some(1.5e6), Some(3.5e3)),
        ];
        let ChartOutcome::Built { chart, .. } =
            hybrid_strategy(&sweep_repo(TableKind::Hybrid, rows))
        else {
            panic!("expected a built chart");
        };
        assert_eq!(chart.panels.len(), 1);
        let Some(scale) = &chart.panels[0].color_scale else {
            panic!("hybrid panels carry a color scale");
        };
        assert_eq!((scale.min, scale.max), (1.0, 2.0));
    }
}
