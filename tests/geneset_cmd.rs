use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

#[test]
fn show_prints_builtin_reference() {
    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    let output = cmd.args(["geneset", "show"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("gesp reference (version v1):"));
    assert!(stdout.contains("EGFR\tsurface\tkinase\treceptor_tyrosine_kinase"));
    assert!(stdout.contains("MKI67\texcluded"));
    assert!(stdout.contains("surface-flagged"));
}

#[test]
fn show_collections_lists_all_three() {
    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    let output = cmd
        .args(["geneset", "show", "--collections"])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("collection hallmark"));
    assert!(stdout.contains("collection kegg_legacy"));
    assert!(stdout.contains("collection reactome"));
    assert!(stdout.contains("HALLMARK_HYPOXIA"));
}

#[test]
fn show_accepts_a_user_list() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("gesp.tsv");
    fs::write(
        &path,
        "#gene_symbol\tsurface\tenzyme_class\tgene_family\nXYZ1\tyes\tnone\ttest_family\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    let output = cmd
        .args(["geneset", "show", "--gesp", path.to_str().unwrap()])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("XYZ1\tsurface\tnone\ttest_family"));
    assert!(stdout.contains("1 entries, 1 surface-flagged"));
}

#[test]
fn malformed_user_list_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("gesp.tsv");
    fs::write(&path, "XYZ1\tmaybe\tnone\ttest_family\n").unwrap();

    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    cmd.args(["geneset", "show", "--gesp", path.to_str().unwrap()])
        .assert()
        .failure();
}
