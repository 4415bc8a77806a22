//! Sensitivity figures: service time constraint, BOM topology, and the
//! piecewise-linear vs nonlinear model comparison.

use crate::chart::{AxisSpec, Chart, ChartOutcome, Panel, Series, SizeIn, SkipReason};
use crate::derive;
use crate::record::ExperimentRecord;
use crate::repository::ResultRepository;
use crate::stats;
use crate::style::{topology_color, Rgb};
use crate::types::{TableKind, Topology};

const BUFFER_BLUE: Rgb = Rgb(0x34, 0x98, 0xdb);
const COST_RED: Rgb = Rgb(0xe7, 0x4c, 0x3c);
const MODEL_COLORS: [Rgb; 2] = [Rgb(0x2e, 0x86, 0xab), Rgb(0xe9, 0x4f, 0x37)];

/// Figure 10: mean buffer count and mean cost per promised service
/// time level, side by side.
pub fn service_time(repo: &ResultRepository) -> ChartOutcome {
    let Some(table) = repo.table(TableKind::ServiceTime) else {
        return ChartOutcome::Skipped(SkipReason::TableMissing(TableKind::ServiceTime));
    };
    let rows: Vec<&ExperimentRecord> = table.optimal_rows().collect();
    if rows.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }

    let mut levels = stats::unique_in_order(rows.iter().filter_map(|r| r.service_time_promised));
    levels.sort_by(f64::total_cmp);
    if levels.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }
    let labels: Vec<String> = levels.iter().map(|v| super::category_label(*v)).collect();

    let mut buffer_values = Vec::new();
    let mut cost_values = Vec::new();
    for (slot, level) in levels.iter().enumerate() {
        let group: Vec<&&ExperimentRecord> = rows
            .iter()
            .filter(|r| r.service_time_promised == Some(*level))
            .collect();
        let buffers: Vec<f64> = group.iter().filter_map(|r| r.buffer_count).collect();
        if let Some(mean) = stats::mean(&buffers) {
            buffer_values.push((slot, mean));
        }
        let costs: Vec<f64> = group.iter().filter_map(|r| r.total_cost_without_tax).collect();
        if let Some(mean) = stats::mean(&costs) {
            cost_values.push((slot, mean / 1e3));
        }
    }

    let mut buffer_panel = Panel::new(
        "Buffer Positioning vs Service Time Constraint",
        "Promised Service Time",
        "Average Number of Buffers",
    );
    buffer_panel.x_axis = AxisSpec::Categorical { labels: labels.clone() };
    let buffer_colors = vec![BUFFER_BLUE; buffer_values.len()];
    buffer_panel.series.push(Series::Bars {
        values: buffer_values,
        colors: buffer_colors,
        alpha:  0.7,
    });

    let mut cost_panel = Panel::new(
        "Cost Impact of Service Time Constraint",
        "Promised Service Time",
        "Average Total Cost (Thousand $)",
    );
    cost_panel.x_axis = AxisSpec::Categorical { labels };
    let cost_colors = vec![COST_RED; cost_values.len()];
    cost_panel.series.push(Series::Bars { values: cost_values, colors: cost_colors, alpha: 0.7 });

    let mut chart = Chart::new(SizeIn(12.0, 5.0));
    chart.panels.push(buffer_panel);
    chart.panels.push(cost_panel);
    ChartOutcome::built(chart)
}

/// Figure 11: emissions and buffer distributions grouped by the BOM
/// topology read out of the instance identifier.
pub fn topology(repo: &ResultRepository) -> ChartOutcome {
    let Some(table) = repo.table(TableKind::Topology) else {
        return ChartOutcome::Skipped(SkipReason::TableMissing(TableKind::Topology));
    };
    let rows: Vec<&ExperimentRecord> = table.optimal_rows().collect();
    if rows.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }

    const PATTERNS: [(&str, Topology); 2] =
        [("ml", Topology::MultiLevel), ("par", Topology::Parallel)];
    let classified: Vec<(Topology, &ExperimentRecord)> = rows
        .iter()
        .map(|r| (derive::classify_by_pattern(&r.instance_id, &PATTERNS, Topology::Standard), *r))
        .collect();

    let topologies = stats::unique_in_order(classified.iter().map(|(t, _)| *t));
    let labels: Vec<String> = topologies.iter().map(|t| t.label().to_string()).collect();

    let mut emission_groups = Vec::new();
    let mut buffer_groups = Vec::new();
    for (slot, topo) in topologies.iter().enumerate() {
        let color = topology_color(*topo);
        let members: Vec<&&ExperimentRecord> = classified
            .iter()
            .filter(|(t, _)| t == topo)
            .map(|(_, r)| r)
            .collect();
        let emissions: Vec<f64> =
            members.iter().filter_map(|r| r.total_emissions.map(|e| e / 1e6)).collect();
        emission_groups.push((slot, emissions, color));
        let buffers: Vec<f64> = members.iter().filter_map(|r| r.buffer_count).collect();
        buffer_groups.push((slot, buffers, color));
    }

    let mut emission_panel =
        Panel::new("Emissions by BOM Topology", "", "Total Emissions (Million kg CO₂)");
    emission_panel.x_axis = AxisSpec::Categorical { labels: labels.clone() };
    emission_panel.series.push(super::boxes_from_groups(emission_groups));

    let mut buffer_panel = Panel::new("Buffer Positioning by BOM Topology", "", "Number of Buffers");
    buffer_panel.x_axis = AxisSpec::Categorical { labels };
    buffer_panel.series.push(super::boxes_from_groups(buffer_groups));

    let mut chart = Chart::new(SizeIn(12.0, 5.0));
    chart.panels.push(emission_panel);
    chart.panels.push(buffer_panel);
    ChartOutcome::built(chart)
}

/// Figure 12: mean runtime and mean cost for each model variant in the
/// comparison table.
pub fn model_comparison(repo: &ResultRepository) -> ChartOutcome {
    let Some(table) = repo.table(TableKind::ModelComparison) else {
        return ChartOutcome::Skipped(SkipReason::TableMissing(TableKind::ModelComparison));
    };
    let rows: Vec<&ExperimentRecord> = table.optimal_rows().collect();
    if rows.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }

    let variants = stats::unique_in_order(rows.iter().filter_map(|r| r.model_type.clone()));
    if variants.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }
    let labels: Vec<String> = variants.clone();

    let mut runtime_values = Vec::new();
    let mut runtime_colors = Vec::new();
    let mut cost_values = Vec::new();
    let mut cost_colors = Vec::new();
    for (slot, variant) in variants.iter().enumerate() {
        let color = MODEL_COLORS[slot % MODEL_COLORS.len()];
        let group: Vec<&&ExperimentRecord> = rows
            .iter()
            .filter(|r| r.model_type.as_deref() == Some(variant))
            .collect();
        let runtimes: Vec<f64> = group.iter().filter_map(|r| r.runtime_sec).collect();
        if let Some(mean) = stats::mean(&runtimes) {
            runtime_values.push((slot, mean));
            runtime_colors.push(color);
        }
        let costs: Vec<f64> = group.iter().filter_map(|r| r.total_cost_without_tax).collect();
        if let Some(mean) = stats::mean(&costs) {
            cost_values.push((slot, mean / 1e3));
            cost_colors.push(color);
        }
    }

    let mut runtime_panel =
        Panel::new("Computation Time: PLM vs NLM", "", "Average Runtime (seconds)");
    runtime_panel.x_axis = AxisSpec::Categorical { labels: labels.clone() };
    runtime_panel.series.push(Series::Bars {
        values: runtime_values,
        colors: runtime_colors,
        alpha:  0.7,
    });

    let mut cost_panel =
        Panel::new("Solution Quality: PLM vs NLM", "", "Average Total Cost (Thousand $)");
    cost_panel.x_axis = AxisSpec::Categorical { labels };
    cost_panel.series.push(Series::Bars { values: cost_values, colors: cost_colors, alpha: 0.7 });

    let mut chart = Chart::new(SizeIn(12.0, 5.0));
    chart.panels.push(runtime_panel);
    chart.panels.push(cost_panel);
    ChartOutcome::built(chart)
}
