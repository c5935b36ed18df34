use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::str::contains;

fn magika() -> Command {
    let mut cmd = Command::cargo_bin("magika").unwrap();
    cmd.env_remove("MAGIKA_MODEL_DIR");
    cmd
}

#[test]
fn paths_are_required() {
    magika().assert().failure().code(2);
}

#[test]
fn json_conflicts_with_jsonl() {
    magika()
        .args(["--json", "--jsonl", "foo.txt"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn label_conflicts_with_json() {
    magika()
        .args(["--label", "--json", "foo.txt"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn batch_size_zero_is_invalid() {
    magika()
        .args(["--batch-size", "0", "foo.txt"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn unknown_prediction_mode_is_invalid() {
    magika()
        .args(["--prediction-mode", "wild-guess", "foo.txt"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("best-guess"));
}

#[test]
fn missing_model_dir_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("foo.txt").write_str("hello world").unwrap();

    magika()
        .current_dir(&dir)
        .arg("foo.txt")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("--model-dir"));
}

#[test]
fn unloadable_model_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("foo.txt").write_str("hello world").unwrap();
    let model = dir.child("model");
    model.create_dir_all().unwrap();

    magika()
        .current_dir(&dir)
        .args(["--model-dir", "model", "foo.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("failed to load model"));
}

#[test]
fn invalid_exclude_patterns_error() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("foo.txt").write_str("hello world").unwrap();

    magika()
        .current_dir(&dir)
        .args(["--exclude", "[", "foo.txt"])
        .assert()
        .failure()
        .stderr(contains("Every --exclude pattern was invalid"));
}
