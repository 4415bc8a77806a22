//! Consolidated-results figures: the cross-strategy trade-off cloud,
//! the distribution comparison, and the inventory KPIs.

use crate::chart::{
    Annotation, AxisSpec, Chart, ChartOutcome, Panel, Series, SizeIn, SkipReason,
};
use crate::record::ExperimentRecord;
use crate::repository::ResultRepository;
use crate::stats;
use crate::style::{strategy_color, strategy_label_color, Rgb, GRAY};
use crate::types::{Strategy, TableKind};

/// Figure 7: cost against emissions for every run, one color per
/// strategy label.
pub fn tradeoff(repo: &ResultRepository) -> ChartOutcome {
    let Some(table) = repo.table(TableKind::Consolidated) else {
        return ChartOutcome::Skipped(SkipReason::TableMissing(TableKind::Consolidated));
    };
    let rows: Vec<&ExperimentRecord> = table.optimal_rows().collect();
    if rows.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }

    let labels = stats::unique_in_order(rows.iter().filter_map(|r| r.strategy.clone()));
    if labels.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }
    let mut panel = Panel::new(
        "Cost-Emissions Trade-offs by Carbon Policy Strategy",
        "Total Emissions (Million kg CO₂)",
        "Total Cost (Thousand $)",
    );
    panel.legend = true;

    for label in &labels {
        let points: Vec<(f64, f64)> = rows
            .iter()
            .filter(|r| r.strategy.as_deref() == Some(label))
            .filter_map(|r| Some((r.total_emissions? / 1e6, r.total_cost_without_tax? / 1e3)))
            .collect();
        if points.is_empty() {
            continue;
        }
        panel.series.push(Series::Scatter {
            label:     Some(label.clone()),
            points,
            color:     strategy_label_color(label),
            radius_pt: 4,
            alpha:     0.6,
            edged:     true,
        });
    }

    let mut chart = Chart::new(SizeIn(10.0, 6.0));
    chart.panels.push(panel);
    ChartOutcome::built(chart)
}

/// Figure 8: cost, emissions, and buffer distributions for the policy
/// strategies. Needs at least two of the three to be worth comparing.
pub fn comparison(repo: &ResultRepository) -> ChartOutcome {
    let Some(table) = repo.table(TableKind::Consolidated) else {
        return ChartOutcome::Skipped(SkipReason::TableMissing(TableKind::Consolidated));
    };
    let rows: Vec<&ExperimentRecord> = table.optimal_rows().collect();
    if rows.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }

    let present: Vec<Strategy> = Strategy::POLICIES
        .into_iter()
        .filter(|s| rows.iter().any(|r| r.strategy.as_deref() == Some(s.as_str())))
        .collect();
    if present.len() < 2 {
        return ChartOutcome::Skipped(SkipReason::TooFewStrategies { found: present.len() });
    }

    let labels: Vec<String> = present.iter().map(|s| s.as_str().to_string()).collect();
    let mut notes = Vec::new();

    let mut cost_groups = Vec::new();
    let mut emission_groups = Vec::new();
    let mut buffer_groups = Vec::new();
    for (slot, strategy) in present.iter().enumerate() {
        let color = strategy_color(Some(*strategy));
        let strat_rows: Vec<&&ExperimentRecord> = rows
            .iter()
            .filter(|r| r.strategy.as_deref() == Some(strategy.as_str()))
            .collect();

        // With-tax cost when any run recorded one, pre-tax otherwise.
        let mut costs: Vec<f64> =
            strat_rows.iter().filter_map(|r| r.total_cost_with_tax).collect();
        if costs.is_empty() {
            costs = strat_rows.iter().filter_map(|r| r.total_cost_without_tax).collect();
            if !costs.is_empty() {
                notes.push(format!(
                    "{}: cost distribution from total_cost_without_tax (no with-tax values)",
                    strategy.as_str()
                ));
            }
        }
        cost_groups.push((slot, costs.iter().map(|c| c / 1e3).collect::<Vec<_>>(), color));

        let emissions: Vec<f64> = strat_rows
            .iter()
            .filter_map(|r| r.total_emissions.map(|e| e / 1e6))
            .collect();
        emission_groups.push((slot, emissions, color));

        let buffers: Vec<f64> = strat_rows.iter().filter_map(|r| r.buffer_count).collect();
        buffer_groups.push((slot, buffers, color));
    }

    let mut cost_panel = Panel::new("Cost Distribution by Strategy", "", "Total Cost (Thousand $)");
    cost_panel.x_axis = AxisSpec::Categorical { labels: labels.clone() };
    cost_panel.series.push(super::boxes_from_groups(cost_groups));

    let mut emission_panel = Panel::new(
        "Emissions Distribution by Strategy",
        "",
        "Total Emissions (Million kg CO₂)",
    );
    emission_panel.x_axis = AxisSpec::Categorical { labels: labels.clone() };
    emission_panel.series.push(super::boxes_from_groups(emission_groups));

    let mut buffer_panel = Panel::new("Buffer Positioning by Strategy", "", "Number of Buffers");
    buffer_panel.x_axis = AxisSpec::Categorical { labels };
    buffer_panel.series.push(super::boxes_from_groups(buffer_groups));

    let mut chart = Chart::new(SizeIn(14.0, 5.0));
    chart.panels.push(cost_panel);
    chart.panels.push(emission_panel);
    chart.panels.push(buffer_panel);
    ChartOutcome::Built { chart, notes }
}

/// Figure 9: average DIO per strategy, plus the improvement over the
/// uncapped baseline when the campaign recorded one.
pub fn inventory(repo: &ResultRepository) -> ChartOutcome {
    let Some(table) = repo.table(TableKind::Consolidated) else {
        return ChartOutcome::Skipped(SkipReason::TableMissing(TableKind::Consolidated));
    };
    let rows: Vec<&ExperimentRecord> = table.optimal_rows().collect();
    if rows.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }

    let labels = stats::unique_in_order(rows.iter().filter_map(|r| r.strategy.clone()));
    if labels.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }
    let colors: Vec<Rgb> = labels.iter().map(|l| strategy_label_color(l)).collect();

    let mut dio_values = Vec::new();
    let mut dio_colors = Vec::new();
    for (slot, label) in labels.iter().enumerate() {
        let values: Vec<f64> = rows
            .iter()
            .filter(|r| r.strategy.as_deref() == Some(label))
            .filter_map(|r| r.dio)
            .collect();
        if let Some(mean) = stats::mean(&values) {
            dio_values.push((slot, mean));
            dio_colors.push(colors[slot]);
        }
    }
    let mut dio_panel = Panel::new(
        "Average DIO by Carbon Policy Strategy",
        "",
        "Days Inventory Outstanding (DIO)",
    );
    dio_panel.x_axis = AxisSpec::Categorical { labels: labels.clone() };
    dio_panel.series.push(Series::Bars { values: dio_values, colors: dio_colors, alpha: 0.7 });

    let mut chart = Chart::new(SizeIn(12.0, 5.0));
    chart.panels.push(dio_panel);

    if table.has_column("DIO_improvement_pct") {
        let values: Vec<(usize, f64)> = labels
            .iter()
            .enumerate()
            .map(|(slot, label)| {
                let improvements: Vec<f64> = rows
                    .iter()
                    .filter(|r| r.strategy.as_deref() == Some(label))
                    .filter_map(|r| r.dio_improvement_pct)
                    .collect();
                // Strategies with no recorded improvement plot as zero.
                (slot, stats::mean(&improvements).unwrap_or(0.0))
            })
            .collect();
        let mut improvement_panel =
            Panel::new("Average DIO Improvement vs Baseline", "", "DIO Improvement (%)");
        improvement_panel.x_axis = AxisSpec::Categorical { labels };
        improvement_panel.series.push(Series::Bars { values, colors, alpha: 0.7 });
        improvement_panel
            .annotations
            .push(Annotation::HLine { y: 0.0, color: GRAY, alpha: 0.5, dashed: true });
        chart.panels.push(improvement_panel);
    }

    ChartOutcome::built(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::FiveNum;
    use crate::table::ResultTable;
    use crate::types::SolverStatus;

    fn run(strategy: &str) -> ExperimentRecord {
        ExperimentRecord {
            instance_id:            "m1".into(),
            solver_status:          SolverStatus::Optimal,
            strategy:               Some(strategy.into()),
            total_emissions:        Some(1e6),
            total_cost_without_tax: Some(5e3),
            buffer_count:           Some(4.0),
            ..ExperimentRecord::default()
        }
    }

    fn consolidated(columns: &[&str], rows: Vec<ExperimentRecord>) -> ResultRepository {
        ResultRepository::empty().with_table(ResultTable {
            kind:    TableKind::Consolidated,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }

    const BASE_COLUMNS: &[&str] = &[
        "instance_id",
        "solver_status",
        "strategy",
        "total_emissions",
        "total_cost_with_tax",
        "total_cost_without_tax",
        "buffer_count",
    ];

    #[test]
    fn comparison_needs_two_policy_strategies() {
        let repo = consolidated(BASE_COLUMNS, vec![run("EMISTAXE"), run("baseline")]);
        assert!(matches!(
            comparison(&repo),
            ChartOutcome::Skipped(SkipReason::TooFewStrategies { found: 1 })
        ));
    }

    #[test]
    fn comparison_falls_back_to_pre_tax_cost_per_strategy() {
        let mut taxed = run("EMISTAXE");
        taxed.total_cost_with_tax = Some(8e3);
        let repo = consolidated(BASE_COLUMNS, vec![taxed, run("EMISCAP")]);
        let ChartOutcome::Built { chart, notes } = comparison(&repo) else {
            panic!("expected a built chart");
        };
        assert_eq!(chart.panels.len(), 3);
        // EMISCAP has no with-tax cost anywhere, so only it gets a note.
        assert_eq!(notes.len(), 1);
        assert!(notes[0].starts_with("EMISCAP"));

        let Series::Boxes { boxes, .. } = &chart.panels[0].series[0] else {
            panic!("expected box series");
        };
        let single = |v: f64| FiveNum { lower: v, q1: v, median: v, q3: v, upper: v };
        assert_eq!(boxes[0], (0, single(8.0)), "EMISTAXE uses with-tax cost");
        assert_eq!(boxes[1], (1, single(5.0)), "EMISCAP uses pre-tax cost");
    }

    #[test]
    fn tradeoff_plots_unknown_strategies_in_the_fallback_color() {
        let repo = consolidated(BASE_COLUMNS, vec![run("EMISTAXE"), run("LEGACY")]);
        let ChartOutcome::Built { chart, .. } = tradeoff(&repo) else {
            panic!("expected a built chart");
        };
        assert_eq!(chart.panels[0].series.len(), 2);
        let Series::Scatter { color, .. } = &chart.panels[0].series[1] else {
            panic!("expected scatter series");
        };
        assert_eq!(*color, crate::style::FALLBACK_COLOR);
    }

    #[test]
    fn inventory_adds_the_improvement_panel_only_with_its_column() {
        let mut with_dio = run("EMISTAXE");
        with_dio.dio = Some(40.0);
        let repo = consolidated(
            &["instance_id", "solver_status", "strategy", "DIO"],
            vec![with_dio.clone()],
        );
        let ChartOutcome::Built { chart, .. } = inventory(&repo) else {
            panic!("expected a built chart");
        };
        assert_eq!(chart.panels.len(), 1, "no improvement column, no second panel");

        let repo = consolidated(
            &["instance_id", "solver_status", "strategy", "DIO", "DIO_improvement_pct"],
            vec![with_dio],
        );
        let ChartOutcome::Built { chart, .. } = inventory(&repo) else {
            panic!("expected a built chart");
        };
        assert_eq!(chart.panels.len(), 2);
        let Series::Bars { values, .. } = &chart.panels[1].series[0] else {
            panic!("expected bar series");
        };
        // No recorded improvements: the bar is drawn at zero, not dropped.
        assert_eq!(values, &vec![(0, 0.0)]);
    }
}
