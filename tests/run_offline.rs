mod common;

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

fn run_two_projects(counts: &Path, out: &Path) {
    common::write_counts(counts, "TCGA-AA", 8, 5);
    common::write_counts(counts, "TCGA-BB", 6, 2);
    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    cmd.args([
        "run",
        "--out",
        out.to_str().unwrap(),
        "--counts-dir",
        counts.to_str().unwrap(),
        "--projects",
        "TCGA-AA",
        "TCGA-BB",
        "--min-normals",
        "4",
        "--filter-quantile",
        "0.05",
        "--permutations",
        "50",
        "--no-plots",
    ]);
    cmd.assert().success();
}

#[test]
fn profiled_indication_writes_all_tables() {
    let counts = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    run_two_projects(counts.path(), out.path());

    for name in [
        "TCGA-AA.de_table.tsv",
        "TCGA-AA.gesp_labeled.tsv",
        "TCGA-AA.summary.json",
        "gesp_log2fc_matrix.tsv",
        "enrichment_hallmark.tsv",
        "enrichment_kegg_legacy.tsv",
        "enrichment_reactome.tsv",
        "run_summary.json",
    ] {
        assert!(out.path().join(name).exists(), "missing {}", name);
    }
}

#[test]
fn skipped_indication_writes_nothing() {
    let counts = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    run_two_projects(counts.path(), out.path());

    for name in [
        "TCGA-BB.de_table.tsv",
        "TCGA-BB.gesp_labeled.tsv",
        "TCGA-BB.summary.json",
    ] {
        assert!(!out.path().join(name).exists(), "unexpected {}", name);
    }

    let v: Value =
        serde_json::from_slice(&fs::read(out.path().join("run_summary.json")).unwrap()).unwrap();
    let indications = v["indications"].as_array().unwrap();
    assert_eq!(indications.len(), 2);
    let bb = indications
        .iter()
        .find(|i| i["project"] == "TCGA-BB")
        .unwrap();
    assert_eq!(bb["skipped"], true);
    assert_eq!(bb["n_normal"], 2);
    let aa = indications
        .iter()
        .find(|i| i["project"] == "TCGA-AA")
        .unwrap();
    assert_eq!(aa["skipped"], false);
    assert!(aa["n_up"].as_u64().unwrap() >= 10);
}

#[test]
fn default_guard_requires_ten_normals() {
    let counts = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    common::write_counts(counts.path(), "TCGA-CC", 6, 9);

    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    cmd.args([
        "run",
        "--out",
        out.path().to_str().unwrap(),
        "--counts-dir",
        counts.path().to_str().unwrap(),
        "--projects",
        "TCGA-CC",
        "--permutations",
        "50",
        "--no-plots",
    ]);
    cmd.assert().success();

    assert!(!out.path().join("TCGA-CC.de_table.tsv").exists());
    let v: Value =
        serde_json::from_slice(&fs::read(out.path().join("run_summary.json")).unwrap()).unwrap();
    assert_eq!(v["indications"][0]["skipped"], true);
    assert_eq!(v["thresholds"]["min_normals"], 10);
}

#[test]
fn labeled_table_is_filtered_labeled_and_sorted() {
    let counts = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    run_two_projects(counts.path(), out.path());

    let content = fs::read_to_string(out.path().join("TCGA-AA.gesp_labeled.tsv")).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "gene\tlog2_fold_change\tfdr\tregulation\tenzyme_class\tgene_family"
    );

    let rows: Vec<Vec<&str>> = lines.map(|l| l.split('\t').collect()).collect();
    assert!(!rows.is_empty());

    // sorted by descending fold-change
    let fcs: Vec<f64> = rows.iter().map(|r| r[1].parse().unwrap()).collect();
    for pair in fcs.windows(2) {
        assert!(pair[0] >= pair[1], "not sorted: {:?}", pair);
    }

    // every label is one of the three classes
    for r in &rows {
        assert!(matches!(r[3], "up" | "down" | "not-significant"), "{:?}", r);
    }

    let genes: Vec<&str> = rows.iter().map(|r| r[0]).collect();
    // receptor kinases are strongly up in the synthetic tumors
    let egfr = rows.iter().find(|r| r[0] == "EGFR").expect("EGFR row");
    assert_eq!(egfr[3], "up");
    assert_eq!(egfr[5], "receptor_tyrosine_kinase");
    let itgb6 = rows.iter().find(|r| r[0] == "ITGB6").expect("ITGB6 row");
    assert_eq!(itgb6[3], "down");
    // not in the reference list at all
    assert!(!genes.contains(&"VIM"));
    // in the list but not surface-flagged
    assert!(!genes.contains(&"MKI67"));
}

#[test]
fn matrix_covers_only_profiled_projects() {
    let counts = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    run_two_projects(counts.path(), out.path());

    let content = fs::read_to_string(out.path().join("gesp_log2fc_matrix.tsv")).unwrap();
    let header = content.lines().next().unwrap();
    assert_eq!(header, "gene\tTCGA-AA");
    assert!(content.lines().count() > 10);
}

#[test]
fn enrichment_reports_have_one_row_per_indication() {
    let counts = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    run_two_projects(counts.path(), out.path());

    for name in [
        "enrichment_hallmark.tsv",
        "enrichment_kegg_legacy.tsv",
        "enrichment_reactome.tsv",
    ] {
        let content = fs::read_to_string(out.path().join(name)).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "project\tcollection\tup_pathway\tup_nes\tup_p\tdown_pathway\tdown_nes\tdown_p"
        );
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 1, "{}: {:?}", name, rows);
        assert!(rows[0].starts_with("TCGA-AA\t"));
    }
}
