//! Scalability figures: how runtime, baseline emissions, and buffer
//! placement respond to BOM size.

use crate::chart::{
    Annotation, AxisSpec, Chart, ChartOutcome, HAlign, Marker, Panel, Series, SizeIn, SkipReason,
};
use crate::derive;
use crate::repository::ResultRepository;
use crate::stats;
use crate::style::{Rgb, GRAY, RED};
use crate::types::TableKind;

const RUNTIME_BLUE: Rgb = Rgb(0x2e, 0x86, 0xab);
const EMISSIONS_RED: Rgb = Rgb(0xe9, 0x4f, 0x37);
const BUFFER_GREEN: Rgb = Rgb(0x2e, 0xcc, 0x71);

/// Figure 1: computation time against BOM size, with the small/medium/
/// large instance bands marked at 10 and 30 components.
pub fn runtime(repo: &ResultRepository) -> ChartOutcome {
    let Some(table) = repo.table(TableKind::Scalability) else {
        return ChartOutcome::Skipped(SkipReason::TableMissing(TableKind::Scalability));
    };

    let mut points: Vec<(f64, f64)> = table
        .optimal_rows()
        .filter_map(|row| Some((derive::bom_size(&row.instance_id)?, row.runtime_sec?)))
        .collect();
    if points.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let y_max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let y_top = y_max * 1.1;

    let mut panel = Panel::new(
        "Computational Scalability of Integrated DDMRP Model",
        "BOM Size (number of components)",
        "Computation Time (seconds)",
    );
    panel.x_axis = AxisSpec::Range { min: 0.0, max: x_max * 1.05 };
    panel.y_axis = AxisSpec::Range { min: 0.0, max: y_top };
    panel.series.push(Series::Line {
        label:    None,
        points:   points.clone(),
        color:    RUNTIME_BLUE,
        width_pt: 1.5,
        alpha:    0.5,
        dashed:   true,
        marker:   Marker::None,
    });
    panel.series.push(Series::Scatter {
        label:     None,
        points,
        color:     RUNTIME_BLUE,
        radius_pt: 4,
        alpha:     0.7,
        edged:     true,
    });

    for x in [10.0, 30.0] {
        panel.annotations.push(Annotation::VLine { x, color: GRAY, alpha: 0.5, dashed: true });
    }
    for (x, label) in [(5.0, "Small"), (20.0, "Medium"), (90.0, "Large")] {
        panel.annotations.push(Annotation::Text {
            x,
            y:         0.9 * y_top,
            text:      label.into(),
            color:     GRAY,
            size_pt:   9,
            align:     HAlign::Center,
            offset_pt: (0, 0),
        });
    }

    let mut chart = Chart::new(SizeIn(8.0, 5.0));
    chart.panels.push(panel);
    ChartOutcome::built(chart)
}

/// Figure 2: baseline emissions per BOM size as categorical bars.
pub fn emissions(repo: &ResultRepository) -> ChartOutcome {
    let Some(table) = repo.table(TableKind::Scalability) else {
        return ChartOutcome::Skipped(SkipReason::TableMissing(TableKind::Scalability));
    };

    let mut rows: Vec<(f64, f64)> = table
        .optimal_rows()
        .filter_map(|row| Some((derive::bom_size(&row.instance_id)?, row.total_emissions?)))
        .collect();
    if rows.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));

    let labels: Vec<String> = rows.iter().map(|(size, _)| super::category_label(*size)).collect();
    let values: Vec<(usize, f64)> = rows
        .iter()
        .enumerate()
        .map(|(slot, (_, emissions))| (slot, emissions / 1e6))
        .collect();
    let colors = vec![EMISSIONS_RED; values.len()];

    let mut panel = Panel::new(
        "Baseline Carbon Emissions by BOM Complexity",
        "BOM Size (number of components)",
        "Baseline Emissions (Million kg CO₂)",
    );
    panel.x_axis = AxisSpec::Categorical { labels };
    panel.series.push(Series::Bars { values, colors, alpha: 0.7 });

    let mut chart = Chart::new(SizeIn(8.0, 5.0));
    chart.panels.push(panel);
    ChartOutcome::built(chart)
}

/// Figure 3: buffers positioned against BOM size with a least-squares
/// trend line when two or more points exist.
pub fn buffers(repo: &ResultRepository) -> ChartOutcome {
    let Some(table) = repo.table(TableKind::Scalability) else {
        return ChartOutcome::Skipped(SkipReason::TableMissing(TableKind::Scalability));
    };

    let mut points: Vec<(f64, f64)> = table
        .optimal_rows()
        .filter_map(|row| Some((derive::bom_size(&row.instance_id)?, row.buffer_count?)))
        .collect();
    if points.is_empty() {
        return ChartOutcome::Skipped(SkipReason::EmptyAfterFilter);
    }
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut panel = Panel::new(
        "DDMRP Buffer Positioning vs BOM Complexity",
        "BOM Size (number of components)",
        "Number of Buffers Positioned",
    );
    panel.series.push(Series::Scatter {
        label:     None,
        points:    points.clone(),
        color:     BUFFER_GREEN,
        radius_pt: 5,
        alpha:     0.7,
        edged:     true,
    });

    if let Some((slope, intercept)) = stats::linear_fit(&points) {
        let trend: Vec<(f64, f64)> =
            points.iter().map(|(x, _)| (*x, slope * x + intercept)).collect();
        panel.series.push(Series::Line {
            label:    Some("Linear trend".into()),
            points:   trend,
            color:    RED,
            width_pt: 1.5,
            alpha:    0.5,
            dashed:   true,
            marker:   Marker::None,
        });
        panel.legend = true;
    }

    let mut chart = Chart::new(SizeIn(8.0, 5.0));
    chart.panels.push(panel);
    ChartOutcome::built(chart)
}
