//! Chart rendering on plotters. One renderer draws every chart twice,
//! once per backend; nothing in here knows what the numbers mean.
//!
//! RULES:
//!   - Geometry lives in inches and points; pixels exist only after a
//!     backend's DPI is applied.
//!   - The raster and vector files of a chart come from the same chart
//!     value, so they can only differ in resolution.
//!   - A chart that fails to draw is a per-chart error; the caller
//!     decides what it takes down.

use crate::chart::{
    Annotation, AxisSpec, Chart, ColorScale, HAlign, Marker, Panel, Series, SizeIn,
};
use crate::error::{ReportError, ReportResult};
use crate::style::{PlotStyle, Rgb};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

pub struct Renderer {
    figures_dir: PathBuf,
    style:       PlotStyle,
}

impl Renderer {
    /// Create the `figures/` directory under `output_dir`. Failing to
    /// create it fails the run; there is nowhere to put the output.
    pub fn create(output_dir: &Path, style: PlotStyle) -> ReportResult<Self> {
        let figures_dir = output_dir.join("figures");
        std::fs::create_dir_all(&figures_dir)?;
        Ok(Self { figures_dir, style })
    }

    pub fn figures_dir(&self) -> &Path {
        &self.figures_dir
    }

    /// Draw `chart` as `fig<index>_<slug>.png` and `.svg`, returning
    /// the paths written.
    pub fn render(&self, index: usize, slug: &str, chart: &Chart) -> ReportResult<Vec<PathBuf>> {
        let stem = format!("fig{index}_{slug}");
        let png = self.figures_dir.join(format!("{stem}.png"));
        let svg = self.figures_dir.join(format!("{stem}.svg"));

        let render_error = |message: String| ReportError::Render {
            index,
            slug: slug.to_string(),
            message,
        };

        let (w, h) = pixel_size(chart.size_in, self.style.raster_dpi);
        let root = BitMapBackend::new(&png, (w, h)).into_drawing_area();
        draw_chart(&root, chart, &self.style, self.style.raster_dpi).map_err(render_error)?;
        drop(root);

        let (w, h) = pixel_size(chart.size_in, self.style.vector_dpi);
        let root = SVGBackend::new(&svg, (w, h)).into_drawing_area();
        draw_chart(&root, chart, &self.style, self.style.vector_dpi).map_err(render_error)?;
        drop(root);

        Ok(vec![png, svg])
    }
}

fn pixel_size(size: SizeIn, dpi: u32) -> (u32, u32) {
    let SizeIn(w_in, h_in) = size;
    (
        (w_in * dpi as f64).round() as u32,
        (h_in * dpi as f64).round() as u32,
    )
}

/// Points to pixels at a backend DPI.
fn px(pt: f64, dpi: u32) -> i32 {
    (pt * dpi as f64 / 72.0).round() as i32
}

/// Font size in pixels; kept fractional so small DPIs do not collapse.
fn font_px(pt: u32, dpi: u32) -> f64 {
    pt as f64 * dpi as f64 / 72.0
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn faded(c: Rgb, alpha: f64) -> RGBAColor {
    rgb(c).mix(alpha)
}

fn to_msg<E: std::fmt::Display>(e: E) -> String {
    e.to_string()
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    style: &PlotStyle,
    dpi: u32,
) -> Result<(), String> {
    root.fill(&WHITE).map_err(to_msg)?;
    let areas = root.split_evenly((1, chart.panels.len().max(1)));
    for (panel, area) in chart.panels.iter().zip(areas.iter()) {
        draw_panel(area, panel, style, dpi)?;
    }
    root.present().map_err(to_msg)
}

/// Min/max accumulator for automatic axis ranges.
struct Extent {
    min: f64,
    max: f64,
}

impl Extent {
    fn new() -> Self {
        Self { min: f64::INFINITY, max: f64::NEG_INFINITY }
    }

    fn add(&mut self, v: f64) {
        if v.is_finite() {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
    }

    fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

fn data_extents(panel: &Panel) -> (Extent, Extent) {
    let mut x = Extent::new();
    let mut y = Extent::new();
    for series in &panel.series {
        match series {
            Series::Scatter { points, .. } | Series::Line { points, .. } => {
                for (px_, py_) in points {
                    x.add(*px_);
                    y.add(*py_);
                }
            }
            Series::Bars { values, .. } => {
                // Bars hang from zero no matter where the values sit.
                y.add(0.0);
                for (_, v) in values {
                    y.add(*v);
                }
            }
            Series::Boxes { boxes, .. } => {
                for (_, f) in boxes {
                    y.add(f.lower);
                    y.add(f.upper);
                }
            }
            Series::ColorScatter { points, .. } => {
                for (px_, py_, _) in points {
                    x.add(*px_);
                    y.add(*py_);
                }
            }
        }
    }
    (x, y)
}

/// An axis spec resolved against the panel data, with the same 5%
/// padding on automatic ranges the published figures had.
fn resolve_axis(spec: &AxisSpec, extent: &Extent) -> (f64, f64) {
    match spec {
        AxisSpec::Range { min, max } => widen_degenerate(*min, *max),
        AxisSpec::Categorical { labels } => (0.0, labels.len().max(1) as f64),
        AxisSpec::Auto => {
            if extent.is_empty() {
                return (0.0, 1.0);
            }
            let span = extent.max - extent.min;
            if span == 0.0 {
                return widen_degenerate(extent.min, extent.max);
            }
            (extent.min - 0.05 * span, extent.max + 0.05 * span)
        }
    }
}

fn widen_degenerate(min: f64, max: f64) -> (f64, f64) {
    if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    }
}

/// Short tick label without float noise.
fn fmt_tick(v: f64) -> String {
    let rounded = (v * 1e6).round() / 1e6;
    let s = format!("{rounded}");
    if s == "-0" { "0".into() } else { s }
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    style: &PlotStyle,
    dpi: u32,
) -> Result<(), String> {
    // The color scale strip is carved off before the axes are laid out.
    let (area, scale_area) = if panel.color_scale.is_some() {
        let (w, _) = area.dim_in_pixel();
        let strip = (0.55 * dpi as f64) as i32;
        let (plot, scale) = area.split_horizontally(w as i32 - strip);
        (plot, Some(scale))
    } else {
        (area.clone(), None)
    };

    let (x_extent, y_extent) = data_extents(panel);
    let (x_lo, x_hi) = resolve_axis(&panel.x_axis, &x_extent);
    let (y_lo, y_hi) = resolve_axis(&panel.y_axis, &y_extent);

    // Inverted axes render negated and print their absolute values, so
    // the coordinate system itself stays ascending.
    let flip = panel.x_inverted;
    let tx = move |x: f64| if flip { -x } else { x };
    let (x_lo, x_hi) = if flip { (-x_hi, -x_lo) } else { (x_lo, x_hi) };
    let x_formatter = move |v: &f64| fmt_tick(if flip { -*v } else { *v });

    let family = style.font_family.as_str();
    let title_font = (family, font_px(style.title_size_pt, dpi)).into_font();
    let label_font = (family, font_px(style.label_size_pt, dpi)).into_font();
    let tick_font = (family, font_px(style.tick_size_pt, dpi)).into_font();
    let categorical = matches!(panel.x_axis, AxisSpec::Categorical { .. });

    let mut chart = ChartBuilder::on(&area)
        .caption(&panel.title, title_font)
        .margin(px(8.0, dpi))
        .x_label_area_size(px((style.tick_size_pt + style.label_size_pt + 14) as f64, dpi))
        .y_label_area_size(px((3 * style.tick_size_pt + style.label_size_pt + 14) as f64, dpi))
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(to_msg)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .disable_y_mesh()
            .x_desc(&panel.x_label)
            .y_desc(&panel.y_label)
            .axis_desc_style(label_font.clone())
            .label_style(tick_font.clone())
            .x_label_formatter(&x_formatter);
        if categorical {
            // Slot labels are drawn by hand under each slot center.
            mesh.x_labels(0);
        }
        mesh.draw().map_err(to_msg)?;
    }

    let mut labeled = false;
    let edge_px = px(0.5, dpi).max(1) as u32;
    let dash = px(4.0, dpi).max(1);
    let gap = px(2.0, dpi).max(1);

    for series in &panel.series {
        match series {
            Series::Scatter { label, points, color, radius_pt, alpha, edged } => {
                let r = px(*radius_pt as f64, dpi).max(1);
                let fill = faded(*color, *alpha);
                let anno = chart
                    .draw_series(
                        points.iter().map(|(x, y)| Circle::new((tx(*x), *y), r, fill.filled())),
                    )
                    .map_err(to_msg)?;
                if panel.legend {
                    if let Some(text) = label {
                        let c = rgb(*color);
                        anno.label(text.as_str())
                            .legend(move |(x, y)| Circle::new((x + 10, y), 5, c.filled()));
                        labeled = true;
                    }
                }
                if *edged {
                    chart
                        .draw_series(points.iter().map(|(x, y)| {
                            Circle::new((tx(*x), *y), r, BLACK.stroke_width(edge_px))
                        }))
                        .map_err(to_msg)?;
                }
            }
            Series::Line { label, points, color, width_pt, alpha, dashed, marker } => {
                let stroke = faded(*color, *alpha).stroke_width(px(*width_pt, dpi).max(1) as u32);
                let pts: Vec<(f64, f64)> = points.iter().map(|(x, y)| (tx(*x), *y)).collect();
                let anno = if *dashed {
                    chart
                        .draw_series(DashedLineSeries::new(pts.clone(), dash, gap, stroke))
                        .map_err(to_msg)?
                } else {
                    chart
                        .draw_series(LineSeries::new(pts.clone(), stroke))
                        .map_err(to_msg)?
                };
                if panel.legend {
                    if let Some(text) = label {
                        let c = rgb(*color);
                        anno.label(text.as_str()).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], c.stroke_width(2))
                        });
                        labeled = true;
                    }
                }
                let half = px(3.0, dpi).max(1);
                let solid = faded(*color, *alpha);
                match marker {
                    Marker::None => {}
                    Marker::Circle => {
                        chart
                            .draw_series(
                                pts.iter().map(|(x, y)| Circle::new((*x, *y), half, solid.filled())),
                            )
                            .map_err(to_msg)?;
                    }
                    Marker::Square => {
                        chart
                            .draw_series(pts.iter().map(|(x, y)| {
                                EmptyElement::at((*x, *y))
                                    + Rectangle::new([(-half, -half), (half, half)], solid.filled())
                            }))
                            .map_err(to_msg)?;
                    }
                }
            }
            Series::Bars { values, colors, alpha } => {
                let fills: Vec<Rectangle<(f64, f64)>> = values
                    .iter()
                    .zip(colors)
                    .map(|((slot, v), c)| {
                        Rectangle::new(bar_corners(*slot, *v), faded(*c, *alpha).filled())
                    })
                    .collect();
                chart.draw_series(fills).map_err(to_msg)?;
                chart
                    .draw_series(values.iter().map(|(slot, v)| {
                        Rectangle::new(bar_corners(*slot, *v), BLACK.stroke_width(edge_px))
                    }))
                    .map_err(to_msg)?;
            }
            Series::Boxes { boxes, colors, alpha } => {
                draw_boxes(&mut chart, boxes, colors, *alpha, edge_px)?;
            }
            Series::ColorScatter { points, radius_pt, alpha } => {
                let r = px(*radius_pt as f64, dpi).max(1);
                chart
                    .draw_series(points.iter().map(|(x, y, t)| {
                        let fill = ViridisRGB.get_color(*t).mix(*alpha);
                        Circle::new((tx(*x), *y), r, fill.filled())
                    }))
                    .map_err(to_msg)?;
                chart
                    .draw_series(points.iter().map(|(x, y, _)| {
                        Circle::new((tx(*x), *y), r, BLACK.stroke_width(edge_px))
                    }))
                    .map_err(to_msg)?;
            }
        }
    }

    for annotation in &panel.annotations {
        match annotation {
            Annotation::VLine { x, color, alpha, dashed } => {
                let stroke = faded(*color, *alpha).stroke_width(px(1.5, dpi).max(1) as u32);
                let pts = vec![(tx(*x), y_lo), (tx(*x), y_hi)];
                if *dashed {
                    chart
                        .draw_series(DashedLineSeries::new(pts, dash, gap, stroke))
                        .map_err(to_msg)?;
                } else {
                    chart.draw_series(LineSeries::new(pts, stroke)).map_err(to_msg)?;
                }
            }
            Annotation::HLine { y, color, alpha, dashed } => {
                let stroke = faded(*color, *alpha).stroke_width(px(1.5, dpi).max(1) as u32);
                let pts = vec![(x_lo, *y), (x_hi, *y)];
                if *dashed {
                    chart
                        .draw_series(DashedLineSeries::new(pts, dash, gap, stroke))
                        .map_err(to_msg)?;
                } else {
                    chart.draw_series(LineSeries::new(pts, stroke)).map_err(to_msg)?;
                }
            }
            Annotation::Text { x, y, text, color, size_pt, align, offset_pt } => {
                let hpos = match align {
                    HAlign::Left => HPos::Left,
                    HAlign::Center => HPos::Center,
                };
                let font = (family, font_px(*size_pt, dpi))
                    .into_font()
                    .color(&rgb(*color))
                    .pos(Pos::new(hpos, VPos::Bottom));
                let (dx, dy) = *offset_pt;
                let element = EmptyElement::at((tx(*x), *y))
                    + Text::new(text.clone(), (px(dx as f64, dpi), -px(dy as f64, dpi)), font);
                chart.plotting_area().draw(&element).map_err(to_msg)?;
            }
        }
    }

    if let AxisSpec::Categorical { labels } = &panel.x_axis {
        let slot_font = tick_font
            .clone()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        for (slot, label) in labels.iter().enumerate() {
            let element = EmptyElement::at((slot as f64 + 0.5, y_lo))
                + Text::new(label.clone(), (0, px(4.0, dpi)), slot_font.clone());
            chart.plotting_area().draw(&element).map_err(to_msg)?;
        }
    }

    if panel.legend && labeled {
        let size = panel.legend_size_pt.unwrap_or(style.legend_size_pt);
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.4))
            .label_font((family, font_px(size, dpi)).into_font())
            .draw()
            .map_err(to_msg)?;
    }

    if let (Some(scale), Some(strip)) = (&panel.color_scale, scale_area) {
        draw_color_scale(&strip, scale, style, dpi)?;
    }

    Ok(())
}

fn bar_corners(slot: usize, value: f64) -> [(f64, f64); 2] {
    let x0 = slot as f64 + 0.1;
    let x1 = slot as f64 + 0.9;
    [(x0, value.min(0.0)), (x1, value.max(0.0))]
}

type PanelChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Box glyphs the way the published figures draw them: filled quartile
/// box, median bar, whiskers with caps at half the box width.
fn draw_boxes<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    boxes: &[(usize, crate::chart::FiveNum)],
    colors: &[Rgb],
    alpha: f64,
    edge_px: u32,
) -> Result<(), String> {
    let half = 0.25;
    let mut fills = Vec::new();
    let mut frames = Vec::new();
    let mut strokes = Vec::new();
    for ((slot, f), color) in boxes.iter().zip(colors) {
        let xc = *slot as f64 + 0.5;
        let corners = [(xc - half, f.q1), (xc + half, f.q3)];
        fills.push(Rectangle::new(corners, faded(*color, alpha).filled()));
        frames.push(Rectangle::new(corners, BLACK.stroke_width(edge_px)));
        strokes.push(PathElement::new(
            vec![(xc - half, f.median), (xc + half, f.median)],
            BLACK.stroke_width(edge_px),
        ));
        strokes.push(PathElement::new(
            vec![(xc, f.q3), (xc, f.upper)],
            BLACK.stroke_width(edge_px),
        ));
        strokes.push(PathElement::new(
            vec![(xc, f.lower), (xc, f.q1)],
            BLACK.stroke_width(edge_px),
        ));
        for fence in [f.lower, f.upper] {
            strokes.push(PathElement::new(
                vec![(xc - half / 2.0, fence), (xc + half / 2.0, fence)],
                BLACK.stroke_width(edge_px),
            ));
        }
    }
    chart.draw_series(fills).map_err(to_msg)?;
    chart.draw_series(frames).map_err(to_msg)?;
    chart.draw_series(strokes).map_err(to_msg)?;
    Ok(())
}

/// The vertical color bar for continuous-color scatters: a viridis
/// gradient with the extremes labeled and the scale name rotated along
/// the right edge.
fn draw_color_scale<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scale: &ColorScale,
    style: &PlotStyle,
    dpi: u32,
) -> Result<(), String> {
    let (w, h) = area.dim_in_pixel();
    let top = px((style.title_size_pt + 16) as f64, dpi);
    let bottom = px((style.tick_size_pt + style.label_size_pt + 14) as f64, dpi);
    let bar_w = (0.12 * dpi as f64) as i32;
    let left = px(4.0, dpi);
    let right = (w as i32 - left - bar_w).max(0);
    let bar = area.margin(top, bottom, left, right);
    let (bw, bh) = bar.dim_in_pixel();

    let steps = 64;
    for i in 0..steps {
        let t = 1.0 - i as f64 / (steps - 1) as f64;
        let y0 = (bh as f64 * i as f64 / steps as f64) as i32;
        let y1 = (bh as f64 * (i + 1) as f64 / steps as f64) as i32 + 1;
        bar.draw(&Rectangle::new(
            [(0, y0), (bw as i32, y1.min(bh as i32))],
            ViridisRGB.get_color(t).filled(),
        ))
        .map_err(to_msg)?;
    }
    bar.draw(&Rectangle::new([(0, 0), (bw as i32, bh as i32)], BLACK.stroke_width(1)))
        .map_err(to_msg)?;

    let family = style.font_family.as_str();
    let tick_font = (family, font_px(style.tick_size_pt, dpi)).into_font().color(&BLACK);
    let pad = px(3.0, dpi);
    bar.draw(&Text::new(
        fmt_tick(scale.max),
        (bw as i32 + pad, 0),
        tick_font.pos(Pos::new(HPos::Left, VPos::Center)),
    ))
    .map_err(to_msg)?;
    let tick_font = (family, font_px(style.tick_size_pt, dpi)).into_font().color(&BLACK);
    bar.draw(&Text::new(
        fmt_tick(scale.min),
        (bw as i32 + pad, bh as i32),
        tick_font.pos(Pos::new(HPos::Left, VPos::Center)),
    ))
    .map_err(to_msg)?;

    let label_font = (family, font_px(style.label_size_pt, dpi))
        .into_font()
        .transform(FontTransform::Rotate270)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        scale.label.clone(),
        (w as i32 - px(6.0, dpi), (h / 2) as i32),
        label_font,
    ))
    .map_err(to_msg)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_size_scales_with_dpi() {
        assert_eq!(pixel_size(SizeIn(8.0, 5.0), 300), (2400, 1500));
        assert_eq!(pixel_size(SizeIn(8.0, 5.0), 100), (800, 500));
    }

    #[test]
    fn auto_axis_pads_and_guards_degenerate_ranges() {
        let mut extent = Extent::new();
        extent.add(0.0);
        extent.add(10.0);
        assert_eq!(resolve_axis(&AxisSpec::Auto, &extent), (-0.5, 10.5));

        let mut flat = Extent::new();
        flat.add(3.0);
        assert_eq!(resolve_axis(&AxisSpec::Auto, &flat), (2.5, 3.5));

        assert_eq!(resolve_axis(&AxisSpec::Auto, &Extent::new()), (0.0, 1.0));
    }

    #[test]
    fn tick_labels_have_no_float_noise() {
        assert_eq!(fmt_tick(10.0), "10");
        assert_eq!(fmt_tick(2.5), "2.5");
        assert_eq!(fmt_tick(0.30000000000000004), "0.3");
        assert_eq!(fmt_tick(-0.0), "0");
    }

    #[test]
    fn bars_always_reach_back_to_zero() {
        assert_eq!(bar_corners(0, 4.0), [(0.1, 0.0), (0.9, 4.0)]);
        assert_eq!(bar_corners(2, -3.0), [(2.1, -3.0), (2.9, 0.0)]);
    }
}
