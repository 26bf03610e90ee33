use assert_cmd::Command;

#[test]
fn cli_help_smoke() {
    let mut cmd = Command::cargo_bin("kira-pseudotimeqc").unwrap();
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn run_requires_input_and_out() {
    let mut cmd = Command::cargo_bin("kira-pseudotimeqc").unwrap();
    cmd.arg("run");
    cmd.assert().failure();
}

#[test]
fn unknown_outlier_mode_is_rejected() {
    let mut cmd = Command::cargo_bin("kira-pseudotimeqc").unwrap();
    cmd.args(["run", "--input", ".", "--out", "out", "--outlier-mode", "sideways"]);
    cmd.assert().failure();
}
