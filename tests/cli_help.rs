use assert_cmd::Command;

#[test]
fn help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    let output = cmd.arg("--help").assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("run"));
    assert!(stdout.contains("report"));
    assert!(stdout.contains("geneset"));
}

#[test]
fn run_requires_out() {
    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    cmd.arg("run").assert().failure();
}

#[test]
fn unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("gespscan").unwrap();
    cmd.arg("frobnicate").assert().failure();
}
