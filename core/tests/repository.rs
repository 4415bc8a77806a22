//! Integration tests for loading a campaign results directory.
//!
//! A campaign rarely writes every table. The repository must load what
//! exists, tolerate what is broken, and report the rest as missing.

use figures_core::repository::ResultRepository;
use figures_core::types::{FrontKind, TableKind};
use std::fs;
use std::path::Path;

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, contents).expect("write fixture");
}

#[test]
fn tables_load_from_their_published_locations() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        &dir.path().join("consolidated_results.csv"),
        "instance_id,solver_status,strategy,total_emissions\n\
         m1,OPTIMAL,EMISTAXE,1200000\n\
         m2,INFEASIBLE,EMISCAP,\n",
    );
    write(
        &dir.path().join("tables/scalability_results.csv"),
        "instance_id,solver_status,runtime_sec\n\
         scal_bom_10,OPTIMAL,4.2\n",
    );

    let repo = ResultRepository::open(dir.path());

    let consolidated = repo.table(TableKind::Consolidated).expect("consolidated loads");
    assert_eq!(consolidated.rows.len(), 2);
    assert_eq!(consolidated.rows[0].total_emissions, Some(1_200_000.0));
    assert!(consolidated.has_column("strategy"));

    let scalability = repo.table(TableKind::Scalability).expect("scalability loads");
    assert_eq!(scalability.rows.len(), 1);
    assert_eq!(scalability.rows[0].runtime_sec, Some(4.2));

    assert!(
        repo.table(TableKind::TaxSweep).is_none(),
        "absent tables must stay missing"
    );
}

#[test]
fn only_the_consolidated_table_lives_at_the_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    // A scalability file at the root is in the wrong place; the loader
    // must not pick it up.
    write(
        &dir.path().join("scalability_results.csv"),
        "instance_id,solver_status,runtime_sec\n\
         scal_bom_10,OPTIMAL,4.2\n",
    );

    let repo = ResultRepository::open(dir.path());
    assert!(repo.table(TableKind::Scalability).is_none());
}

#[test]
fn a_corrupt_table_does_not_take_down_the_rest() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        &dir.path().join("consolidated_results.csv"),
        "instance_id,solver_status\n\
         m1,OPTIMAL\n",
    );
    fs::create_dir_all(dir.path().join("tables")).expect("mkdir");
    fs::write(
        dir.path().join("tables/carbon_tax_sweep_results.csv"),
        [0xff, 0xfe, 0x00, 0x41, 0xff],
    )
    .expect("write garbage");

    let repo = ResultRepository::open(dir.path());

    assert!(repo.table(TableKind::Consolidated).is_some());
    assert!(
        repo.table(TableKind::TaxSweep).is_none(),
        "an unreadable table must be treated as missing"
    );
}

#[test]
fn malformed_rows_are_dropped_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        &dir.path().join("consolidated_results.csv"),
        "instance_id,solver_status,runtime_sec\n\
         m1,OPTIMAL,4.2\n\
         m2,OPTIMAL,9.1,extra,fields,here\n\
         m3,OPTIMAL,6.0\n",
    );

    let repo = ResultRepository::open(dir.path());
    let table = repo.table(TableKind::Consolidated).expect("table loads");
    assert_eq!(table.rows.len(), 2, "the over-long row is dropped");
    assert_eq!(table.rows[1].instance_id, "m3");
}

#[test]
fn pareto_files_parse_the_semicolon_layout_in_filename_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        &dir.path().join("pareto/bom_50_cost_emissions_pareto.csv"),
        "Cost;Emissions\n\
         5200000;1800000\n\
         5400000;1650000\n",
    );
    write(
        &dir.path().join("pareto/bom_25_cost_emissions_pareto.csv"),
        "Cost;Emissions\n\
         3100000;900000\n",
    );
    write(
        &dir.path().join("pareto/bom_25_cost_dio_pareto.csv"),
        "Cost;DIO\n\
         3100000;42.5\n",
    );
    // The cost_wip family exists on disk but is outside the catalog.
    write(
        &dir.path().join("pareto/bom_25_cost_wip_pareto.csv"),
        "Cost;WIP\n\
         3100000;77\n",
    );

    let repo = ResultRepository::open(dir.path());

    let emissions = repo.fronts(FrontKind::CostEmissions);
    assert_eq!(emissions.len(), 2);
    assert_eq!(emissions[0].instance, "bom_25", "fronts sort by filename");
    assert_eq!(emissions[1].instance, "bom_50");
    assert_eq!(emissions[1].points.len(), 2);
    assert_eq!(emissions[1].points[0].cost, Some(5_200_000.0));

    let dio = repo.fronts(FrontKind::CostDio);
    assert_eq!(dio.len(), 1);
    assert_eq!(dio[0].objective(&dio[0].points[0]), Some(42.5));
}

#[test]
fn a_directory_with_no_pareto_subdir_has_no_fronts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = ResultRepository::open(dir.path());
    assert!(repo.fronts(FrontKind::CostEmissions).is_empty());
    assert!(repo.fronts(FrontKind::CostDio).is_empty());
}
