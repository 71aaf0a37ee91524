mod common;

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

fn run(counts: &Path, out: &Path) {
    common::write_counts(counts, "TCGA-AA", 8, 5);
    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    cmd.args([
        "run",
        "--out",
        out.to_str().unwrap(),
        "--counts-dir",
        counts.to_str().unwrap(),
        "--projects",
        "TCGA-AA",
        "--min-normals",
        "4",
        "--filter-quantile",
        "0.05",
        "--permutations",
        "50",
        "--seed",
        "11",
        "--no-plots",
    ]);
    cmd.assert().success();
}

fn report(out: &Path) {
    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    cmd.args([
        "report",
        "--out",
        out.to_str().unwrap(),
        "--permutations",
        "50",
        "--seed",
        "11",
        "--no-plots",
    ]);
    cmd.assert().success();
}

#[test]
fn report_rebuilds_aggregates_from_flat_files() {
    let counts = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    run(counts.path(), out.path());

    let matrix = out.path().join("gesp_log2fc_matrix.tsv");
    let enrichment = out.path().join("enrichment_hallmark.tsv");
    let matrix_before = fs::read(&matrix).unwrap();
    let enrichment_before = fs::read(&enrichment).unwrap();

    fs::remove_file(&matrix).unwrap();
    fs::remove_file(&enrichment).unwrap();

    report(out.path());

    assert_eq!(fs::read(&matrix).unwrap(), matrix_before);
    // same seed, same ranking: the permutation null regenerates identically
    assert_eq!(fs::read(&enrichment).unwrap(), enrichment_before);
}

#[test]
fn report_without_a_prior_run_fails() {
    let out = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    cmd.args(["report", "--out", out.path().to_str().unwrap(), "--no-plots"]);
    cmd.assert().failure();
}

#[test]
fn report_fails_when_a_table_is_missing() {
    let counts = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    run(counts.path(), out.path());

    fs::remove_file(out.path().join("TCGA-AA.gesp_labeled.tsv")).unwrap();
    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    cmd.args(["report", "--out", out.path().to_str().unwrap(), "--no-plots"]);
    cmd.assert().failure();
}
