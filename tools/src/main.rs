//! fig-runner: renders the publication figure set from a campaign
//! results directory.
//!
//! Usage:
//!   fig-runner results/final_campaign_20250812_094500
//!   fig-runner                         (newest final_campaign_* under logs/)
//!   fig-runner --logs-dir /data/logs
//!   fig-runner results/run1 --style style.json

use anyhow::{bail, Result};
use figures_core::campaign::latest_campaign;
use figures_core::manifest::ChartStatus;
use figures_core::orchestrator::ReportOrchestrator;
use figures_core::render::Renderer;
use figures_core::repository::ResultRepository;
use figures_core::style::PlotStyle;
use std::env;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let logs_dir = args
        .windows(2)
        .find(|w| w[0] == "--logs-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("logs");
    let style_path = args
        .windows(2)
        .find(|w| w[0] == "--style")
        .map(|w| w[1].as_str());

    let results_dir = match positional(&args) {
        Some(dir) => PathBuf::from(dir),
        None => match latest_campaign(Path::new(logs_dir)) {
            Some(dir) => {
                println!("Using most recent campaign: {}", dir.display());
                dir
            }
            None => bail!("no results directory given and no final_campaign_* under {logs_dir}/"),
        },
    };
    if !results_dir.is_dir() {
        bail!("results directory {} does not exist", results_dir.display());
    }

    let style = match style_path {
        Some(path) => PlotStyle::from_json_file(Path::new(path))?,
        None => PlotStyle::default(),
    };

    println!("DDMRP Carbon Study: fig-runner");
    println!("  results dir: {}", results_dir.display());
    println!("  raster dpi:  {}", style.raster_dpi);
    println!("  vector dpi:  {}", style.vector_dpi);
    println!();

    let repository = ResultRepository::open(&results_dir);
    let renderer = Renderer::create(&results_dir, style)?;
    let figures_dir = renderer.figures_dir().to_path_buf();
    let orchestrator = ReportOrchestrator::new(repository, renderer, &results_dir);
    let manifest = orchestrator.generate_all()?;

    println!("=== FIGURE SUMMARY ===");
    for chart in &manifest.charts {
        let tag = format!("fig{}_{}", chart.index, chart.slug);
        match chart.status {
            ChartStatus::Generated => println!("  {tag:<32} generated"),
            ChartStatus::Skipped => println!(
                "  {tag:<32} skipped: {}",
                chart.reason.as_deref().unwrap_or("unknown")
            ),
        }
        for note in &chart.notes {
            println!("      note: {note}");
        }
    }
    println!();
    println!("  generated: {}", manifest.generated_count());
    println!("  skipped:   {}", manifest.skipped_count());
    println!("  figures:   {}", figures_dir.display());
    Ok(())
}

/// First argument that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Option<&str> {
    let mut skip_next = false;
    for arg in &args[1..] {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with("--") {
            skip_next = matches!(arg.as_str(), "--logs-dir" | "--style");
            continue;
        }
        return Some(arg);
    }
    None
}
