//! End-to-end runs: a results directory in, a figures directory and
//! manifest out. Sparse directories exercise the tolerant path where
//! every chart skips; the last scenario feeds a real table through the
//! renderer and checks the artifact pair on disk.

use figures_core::manifest::{ChartStatus, RunManifest};
use figures_core::orchestrator::ReportOrchestrator;
use figures_core::render::Renderer;
use figures_core::repository::ResultRepository;
use figures_core::style::PlotStyle;
use std::fs;
use std::path::{Path, PathBuf};

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, contents).expect("write fixture");
}

fn run_catalog(results_dir: &Path) -> (RunManifest, PathBuf) {
    let repository = ResultRepository::open(results_dir);
    let renderer = Renderer::create(results_dir, PlotStyle::default()).expect("renderer");
    let figures_dir = renderer.figures_dir().to_path_buf();
    let orchestrator = ReportOrchestrator::new(repository, renderer, results_dir);
    let manifest = orchestrator.generate_all().expect("report run");
    (manifest, figures_dir)
}

#[test]
fn an_empty_campaign_skips_the_whole_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (manifest, figures_dir) = run_catalog(dir.path());

    assert_eq!(manifest.charts.len(), 14);
    assert_eq!(manifest.skipped_count(), 14);
    assert_eq!(manifest.generated_count(), 0);

    let indices: Vec<usize> = manifest.charts.iter().map(|c| c.index).collect();
    assert_eq!(
        indices,
        (1..=14).collect::<Vec<_>>(),
        "the manifest lists charts in published figure order"
    );

    assert!(figures_dir.join("manifest.json").is_file());
    let entries = fs::read_dir(&figures_dir).expect("read figures").count();
    assert_eq!(entries, 1, "nothing but the manifest should be written");
}

#[test]
fn builders_still_run_behind_a_passing_gate() {
    // Every column the scalability figures need is present, but no row
    // is OPTIMAL: the gate passes and the builders skip instead.
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        &dir.path().join("tables/scalability_results.csv"),
        "instance_id,solver_status,runtime_sec,total_emissions,buffer_count\n\
         scal_bom_10,INFEASIBLE,4.2,900000,12\n",
    );
    let (manifest, _) = run_catalog(dir.path());

    let fig1 = &manifest.charts[0];
    assert_eq!(fig1.status, ChartStatus::Skipped);
    assert_eq!(fig1.reason.as_deref(), Some("no rows with OPTIMAL solver status"));

    // The tax sweep never got past its gate.
    let fig4 = &manifest.charts[3];
    assert_eq!(
        fig4.reason.as_deref(),
        Some("required table carbon_tax_sweep_results.csv is missing")
    );
}

#[test]
fn a_missing_column_names_itself_in_the_manifest() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        &dir.path().join("tables/scalability_results.csv"),
        "instance_id,solver_status\n\
         scal_bom_10,OPTIMAL\n",
    );
    let (manifest, _) = run_catalog(dir.path());

    let fig1 = &manifest.charts[0];
    assert_eq!(fig1.reason.as_deref(), Some("required column 'runtime_sec' is missing"));
}

#[test]
fn the_manifest_on_disk_parses_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (_, figures_dir) = run_catalog(dir.path());

    let json = fs::read_to_string(figures_dir.join("manifest.json")).expect("read manifest");
    let back: RunManifest = serde_json::from_str(&json).expect("manifest parses");
    assert_eq!(back.results_dir, dir.path());
    assert_eq!(back.charts.len(), 14);
    assert!(back.charts.iter().all(|c| c.status == ChartStatus::Skipped));
}

#[test]
fn a_passing_table_renders_its_figure_pair() {
    // Only the runtime figure has its columns; the other thirteen skip.
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        &dir.path().join("tables/scalability_results.csv"),
        "instance_id,solver_status,runtime_sec\n\
         scal_bom_10,OPTIMAL,4.2\n\
         scal_bom_50,OPTIMAL,31.0\n",
    );
    let (manifest, figures_dir) = run_catalog(dir.path());

    assert_eq!(manifest.generated_count(), 1);
    assert_eq!(manifest.skipped_count(), 13);
    let fig1 = &manifest.charts[0];
    assert_eq!(fig1.status, ChartStatus::Generated);
    assert_eq!(
        fig1.files,
        vec![
            figures_dir.join("fig1_scalability_runtime.png"),
            figures_dir.join("fig1_scalability_runtime.svg"),
        ]
    );
    for file in &fig1.files {
        let meta = fs::metadata(file).expect("artifact written");
        assert!(meta.len() > 0, "{} must not be empty", file.display());
    }
}
