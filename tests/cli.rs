use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("third-party-notice").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn missing_manifest_argument() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .assert()
        .code(1)
        .stderr(contains("Error: Path to license file must be provided."))
        .stderr(contains("Usage:"));

    assert!(!dir.path().join("third-party-licenses").exists());
    assert!(!dir.path().join("THIRD_PARTY_LICENSES.md").exists());
}

#[test]
fn include_before_manifest() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("extra.md"), "extra").unwrap();
    cmd(&dir)
        .args(["--include", "extra.md", "licenses.json"])
        .assert()
        .code(1)
        .stderr(contains("must be provided before the --include flag"));
}

#[test]
fn include_with_equals_before_manifest() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("extra.md"), "extra").unwrap();
    fs::write(dir.path().join("licenses.json"), "{}").unwrap();
    cmd(&dir)
        .args(["--include=extra.md", "licenses.json"])
        .assert()
        .code(1)
        .stderr(contains("must be provided before the --include flag"));
    assert!(!dir.path().join("THIRD_PARTY_LICENSES.md").exists());
}

#[test]
fn help_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--include"));
}

#[test]
fn include_without_filename() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["licenses.json", "--include"])
        .assert()
        .code(1)
        .stderr(contains("The --include flag must be followed by a filename."));
}

#[test]
fn include_file_missing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("licenses.json"), "{}").unwrap();
    cmd(&dir)
        .args(["licenses.json", "--include", "extra.md"])
        .assert()
        .code(1)
        .stderr(contains("extra.md does not exist."));
    assert!(!dir.path().join("THIRD_PARTY_LICENSES.md").exists());
}

#[test]
fn manifest_file_missing() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("licenses.json")
        .assert()
        .code(1)
        .stderr(contains("licenses.json does not exist."));
    assert!(!dir.path().join("third-party-licenses").exists());
}

#[test]
fn malformed_manifest() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("licenses.json"), "{\"foo@1.0.0\": ").unwrap();
    cmd(&dir)
        .arg("licenses.json")
        .assert()
        .code(1)
        .stderr(contains("Failed to parse"))
        .stderr(contains("licenses.json"))
        .stderr(contains("at line 1"));
    assert!(!dir.path().join("THIRD_PARTY_LICENSES.md").exists());
}

#[test]
fn field_of_unexpected_type_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("licenses.json"),
        r#"{"foo@1.0.0": {"publisher": 42, "email": ["a@b.test"]}}"#,
    )
    .unwrap();
    cmd(&dir).arg("licenses.json").assert().success();

    let notice = fs::read_to_string(dir.path().join("THIRD_PARTY_LICENSES.md")).unwrap();
    assert!(notice.ends_with("### foo\n\n- Name: foo\n- Version: 1.0.0\n- Publisher: 42"));
}

#[test]
fn copy_failure_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let license_dir = dir.path().join("licdir.txt");
    fs::create_dir(&license_dir).unwrap();
    let manifest = serde_json::json!({
        "foo@1.0.0": { "licenses": "MIT", "licenseFile": license_dir },
    });
    fs::write(dir.path().join("licenses.json"), manifest.to_string()).unwrap();

    cmd(&dir)
        .arg("licenses.json")
        .assert()
        .success()
        .stderr(contains("Failed to copy: "))
        .stdout(contains("Wrote license file "));

    let notice = fs::read_to_string(dir.path().join("THIRD_PARTY_LICENSES.md")).unwrap();
    assert!(notice.ends_with("### foo\n\n- Name: foo\n- Version: 1.0.0\n- License: MIT"));
    let copies = fs::read_dir(dir.path().join("third-party-licenses")).unwrap();
    assert_eq!(copies.count(), 0);
}

#[test]
fn writes_notice_and_copies_licenses() {
    let dir = TempDir::new().unwrap();
    let license = dir.path().join("LICENSE.txt");
    fs::write(&license, "MIT License\n").unwrap();

    let manifest = serde_json::json!({
        "foo@1.0.0": { "licenses": "MIT", "licenseFile": license },
        "@scope/bar@2.0.0": {
            "licenses": "Apache-2.0",
            "licenseFile": dir.path().join("missing.txt"),
            "repository": "https://github.com/scope/bar",
        },
    });
    fs::write(dir.path().join("licenses.json"), manifest.to_string()).unwrap();
    fs::write(dir.path().join("extra.md"), "## Other Dependencies\n\nNone.\n").unwrap();

    cmd(&dir)
        .args(["licenses.json", "--include", "extra.md"])
        .assert()
        .success()
        .stdout(contains("Copied: "))
        .stdout(contains("Included: "))
        .stdout(contains("Wrote license file "))
        .stderr(contains("No license file found for dependency: @scope/bar"));

    let copied = dir.path().join("third-party-licenses").join("foo.txt");
    assert_eq!(fs::read_to_string(copied).unwrap(), "MIT License\n");
    assert!(!dir.path().join("third-party-licenses/_scope_bar.txt").exists());

    let notice = fs::read_to_string(dir.path().join("THIRD_PARTY_LICENSES.md")).unwrap();
    assert!(notice.contains("### foo\n"));
    assert!(notice.contains("- Version: 1.0.0\n"));
    assert!(notice.contains("- License: MIT\n"));
    assert!(notice.contains(
        "- License File: [third-party-licenses/foo.txt](third-party-licenses/foo.txt)\n"
    ));
    assert!(notice.contains(
        "### @scope/bar\n\n- Name: @scope/bar\n- Version: 2.0.0\n- License: Apache-2.0\n\
         - Repository: [https://github.com/scope/bar](https://github.com/scope/bar)\n\n"
    ));
    assert!(notice.ends_with("## Other Dependencies\n\nNone."));
}
