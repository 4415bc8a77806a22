//! Post-processing for DDMRP buffer positioning experiment campaigns:
//! loads the solver's CSV result tables and pareto fronts, then renders
//! the publication figure set to PNG and SVG.
//!
//! The pipeline is repository -> chart builders -> renderer. Builders
//! are pure (tables in, chart description out); only the renderer and
//! the run manifest touch the filesystem.

pub mod campaign;
pub mod chart;
pub mod charts;
pub mod derive;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod record;
pub mod render;
pub mod repository;
pub mod stats;
pub mod style;
pub mod table;
pub mod types;
