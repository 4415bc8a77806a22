//! Backend-agnostic chart descriptions.
//!
//! Builders turn repository rows into these values; the renderer turns
//! them into files. Nothing in this module knows about the plotting
//! backend, which keeps every builder testable without touching a
//! canvas.

use crate::repository::ResultRepository;
use crate::style::Rgb;
use crate::types::{FrontKind, TableKind};
use std::fmt;

/// Figure size in inches (width, height). Backends multiply by DPI.
#[derive(Debug, Clone, Copy)]
pub struct SizeIn(pub f64, pub f64);

/// A complete figure: one canvas, one row of panels.
#[derive(Debug, Clone)]
pub struct Chart {
    pub size_in: SizeIn,
    pub panels:  Vec<Panel>,
}

impl Chart {
    pub fn new(size_in: SizeIn) -> Self {
        Self { size_in, panels: Vec::new() }
    }
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub title:          String,
    pub x_label:        String,
    pub y_label:        String,
    pub x_axis:         AxisSpec,
    pub y_axis:         AxisSpec,
    /// Tightening reads left-to-right on the cap sweep.
    pub x_inverted:     bool,
    pub legend:         bool,
    /// Legend font override; the run style's size applies otherwise.
    pub legend_size_pt: Option<u32>,
    pub series:         Vec<Series>,
    pub annotations:    Vec<Annotation>,
    pub color_scale:    Option<ColorScale>,
}

impl Panel {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title:          title.to_string(),
            x_label:        x_label.to_string(),
            y_label:        y_label.to_string(),
            x_axis:         AxisSpec::Auto,
            y_axis:         AxisSpec::Auto,
            x_inverted:     false,
            legend:         false,
            legend_size_pt: None,
            series:         Vec::new(),
            annotations:    Vec::new(),
            color_scale:    None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum AxisSpec {
    /// Padded to the data extent by the renderer.
    Auto,
    Range { min: f64, max: f64 },
    /// Integer slots `0..labels.len()`, one category per slot; slot `i`
    /// is centered at `i + 0.5`.
    Categorical { labels: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    Circle,
    Square,
}

/// Box statistics: whisker fences, quartiles, and median.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNum {
    pub lower:  f64,
    pub q1:     f64,
    pub median: f64,
    pub q3:     f64,
    pub upper:  f64,
}

#[derive(Debug, Clone)]
pub enum Series {
    Scatter {
        label:     Option<String>,
        points:    Vec<(f64, f64)>,
        color:     Rgb,
        radius_pt: u32,
        alpha:     f64,
        /// Thin black stroke around each point.
        edged:     bool,
    },
    Line {
        label:    Option<String>,
        points:   Vec<(f64, f64)>,
        color:    Rgb,
        width_pt: f64,
        alpha:    f64,
        dashed:   bool,
        marker:   Marker,
    },
    /// Bars on a categorical axis, one `(slot, value)` pair per bar.
    Bars {
        values: Vec<(usize, f64)>,
        colors: Vec<Rgb>,
        alpha:  f64,
    },
    /// Hand-drawn box glyphs on a categorical axis.
    Boxes {
        boxes:  Vec<(usize, FiveNum)>,
        colors: Vec<Rgb>,
        alpha:  f64,
    },
    /// Scatter colored by a third value, normalized to the panel's
    /// color scale. Points are `(x, y, t)` with `t` in `[0, 1]`.
    ColorScatter {
        points:    Vec<(f64, f64, f64)>,
        radius_pt: u32,
        alpha:     f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
}

#[derive(Debug, Clone)]
pub enum Annotation {
    VLine {
        x:      f64,
        color:  Rgb,
        alpha:  f64,
        dashed: bool,
    },
    HLine {
        y:      f64,
        color:  Rgb,
        alpha:  f64,
        dashed: bool,
    },
    Text {
        x:         f64,
        y:         f64,
        text:      String,
        color:     Rgb,
        size_pt:   u32,
        align:     HAlign,
        /// Offset from the anchor in points; positive y is upward.
        offset_pt: (i32, i32),
    },
}

/// A continuous color legend (the hybrid chart's tax-rate scale).
#[derive(Debug, Clone)]
pub struct ColorScale {
    pub label: String,
    pub min:   f64,
    pub max:   f64,
}

/// Why a chart was not generated. Skips are expected outcomes, logged
/// and recorded in the run manifest, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TableMissing(TableKind),
    MissingColumn(&'static str),
    EmptyAfterFilter,
    TooFewStrategies { found: usize },
    NoParetoFiles(FrontKind),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TableMissing(kind) => {
                write!(f, "required table {} is missing", kind.file_name())
            }
            SkipReason::MissingColumn(column) => {
                write!(f, "required column '{column}' is missing")
            }
            SkipReason::EmptyAfterFilter => {
                write!(f, "no rows with OPTIMAL solver status")
            }
            SkipReason::TooFewStrategies { found } => {
                write!(f, "needs at least 2 policy strategies, found {found}")
            }
            SkipReason::NoParetoFiles(kind) => {
                write!(f, "no {} pareto front files", kind.as_str())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum ChartOutcome {
    Built {
        chart: Chart,
        /// Fallback branches taken while building, for the manifest.
        notes: Vec<String>,
    },
    Skipped(SkipReason),
}

impl ChartOutcome {
    pub fn built(chart: Chart) -> Self {
        ChartOutcome::Built { chart, notes: Vec::new() }
    }
}

/// What a chart needs before its builder is worth calling. Checked
/// uniformly by the orchestrator so no builder can forget a guard.
#[derive(Debug, Clone, Copy)]
pub enum DataRequirement {
    Table {
        kind:    TableKind,
        columns: &'static [&'static str],
    },
    Fronts(FrontKind),
}

pub type BuildFn = fn(&ResultRepository) -> ChartOutcome;

/// One entry in the fixed figure catalog.
pub struct ChartSpec {
    pub index:       usize,
    pub slug:        &'static str,
    pub requirement: DataRequirement,
    pub build:       BuildFn,
}
