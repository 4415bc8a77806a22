//! Plot styling: fonts, output resolution, palettes, and the category
//! color maps the published figures use.

use crate::error::ReportResult;
use crate::types::{Strategy, Topology};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Backend-independent RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Color for categories outside the known strategy set.
pub const FALLBACK_COLOR: Rgb = Rgb(0x33, 0x33, 0x33);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const GRAY: Rgb = Rgb(128, 128, 128);
pub const RED: Rgb = Rgb(255, 0, 0);

/// The ten-color qualitative palette used for per-instance series.
pub const TAB10: [Rgb; 10] = [
    Rgb(0x1f, 0x77, 0xb4),
    Rgb(0xff, 0x7f, 0x0e),
    Rgb(0x2c, 0xa0, 0x2c),
    Rgb(0xd6, 0x27, 0x28),
    Rgb(0x94, 0x67, 0xbd),
    Rgb(0x8c, 0x56, 0x4b),
    Rgb(0xe3, 0x77, 0xc2),
    Rgb(0x7f, 0x7f, 0x7f),
    Rgb(0xbc, 0xbd, 0x22),
    Rgb(0x17, 0xbe, 0xcf),
];

/// Softer eight-color palette used for the cap sweep series.
pub const SET2: [Rgb; 8] = [
    Rgb(0x66, 0xc2, 0xa5),
    Rgb(0xfc, 0x8d, 0x62),
    Rgb(0x8d, 0xa0, 0xcb),
    Rgb(0xe7, 0x8a, 0xc3),
    Rgb(0xa6, 0xd8, 0x54),
    Rgb(0xff, 0xd9, 0x2f),
    Rgb(0xe5, 0xc4, 0x94),
    Rgb(0xb3, 0xb3, 0xb3),
];

/// Strategy colors as published. Unrecognized strategy labels plot in
/// the fallback color rather than silently stealing a known one.
pub fn strategy_color(strategy: Option<Strategy>) -> Rgb {
    match strategy {
        Some(Strategy::EmisTax) => Rgb(0x2e, 0x86, 0xab),
        Some(Strategy::EmisCap) => Rgb(0xe9, 0x4f, 0x37),
        Some(Strategy::EmisHybrid) => Rgb(0xa2, 0x3b, 0x72),
        Some(Strategy::Baseline) => Rgb(0x6b, 0x8e, 0x23),
        None => FALLBACK_COLOR,
    }
}

/// Color of a raw strategy label from a result table.
pub fn strategy_label_color(label: &str) -> Rgb {
    strategy_color(Strategy::parse(label))
}

/// Topology colors, bound to the category rather than to the order the
/// categories happen to appear in the data.
pub fn topology_color(topology: Topology) -> Rgb {
    match topology {
        Topology::MultiLevel => Rgb(0x9b, 0x59, 0xb6),
        Topology::Parallel => Rgb(0xf3, 0x9c, 0x12),
        Topology::Standard => Rgb(0x34, 0x98, 0xdb),
    }
}

/// Immutable rendering style, fixed for a whole run. Font sizes are in
/// points; each backend scales them by its own DPI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub font_family:    String,
    pub title_size_pt:  u32,
    pub label_size_pt:  u32,
    pub tick_size_pt:   u32,
    pub legend_size_pt: u32,
    pub raster_dpi:     u32,
    pub vector_dpi:     u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            font_family:    "serif".to_string(),
            title_size_pt:  12,
            label_size_pt:  11,
            tick_size_pt:   9,
            legend_size_pt: 9,
            raster_dpi:     300,
            vector_dpi:     100,
        }
    }
}

impl PlotStyle {
    /// Load a style override file. Fields left out fall back to the
    /// defaults, so a file can override just the DPI or just the fonts.
    pub fn from_json_file(path: &Path) -> ReportResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
