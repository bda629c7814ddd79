//! Profile persistence through CLI invocations (non-interactive paths only).
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

// Each test gets its own XDG_CONFIG_HOME, passed to the child process only.
fn run_vpsdash(config_home: &Path, args: &[&str]) -> (bool, String) {
    let output = Command::cargo_bin("vpsdash")
        .expect("vpsdash binary")
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("VPSDASH_LOG")
        .args(args)
        .output()
        .expect("run vpsdash");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output.status.success(), text)
}

fn profiles_path(config_home: &Path) -> PathBuf {
    config_home.join("vpsdash").join("profiles.json")
}

#[test]
fn profile_created_on_first_use() {
    let td = tempfile::tempdir().unwrap();
    let (ok, out) = run_vpsdash(
        td.path(),
        &["--profile", "unittest", "http://example:1", "--dry-run"],
    );
    assert!(ok, "{out}");
    let data = fs::read_to_string(profiles_path(td.path())).expect("profiles.json created");
    assert!(
        data.contains("unittest") && data.contains("http://example:1"),
        "profiles.json missing profile entry: {data}"
    );
}

#[test]
fn profile_overwrite_only_when_changed() {
    let td = tempfile::tempdir().unwrap();
    run_vpsdash(td.path(), &["--profile", "prod", "http://one:1", "--dry-run"]);
    let first = fs::read_to_string(profiles_path(td.path())).unwrap();

    run_vpsdash(td.path(), &["--profile", "prod", "http://one:1", "--dry-run"]);
    let second = fs::read_to_string(profiles_path(td.path())).unwrap();
    assert_eq!(first, second, "Profile file changed despite identical input");

    // --save overwrites without prompting
    run_vpsdash(
        td.path(),
        &["--profile", "prod", "--save", "http://two:2", "--dry-run"],
    );
    let third = fs::read_to_string(profiles_path(td.path())).unwrap();
    assert!(third.contains("two"), "Updated URL not written: {third}");
}

#[test]
fn profile_tls_ca_persisted() {
    let td = tempfile::tempdir().unwrap();
    run_vpsdash(
        td.path(),
        &[
            "--profile",
            "secureX",
            "--tls-ca",
            "/tmp/cert.pem",
            "https://host:5000",
            "--dry-run",
        ],
    );
    let data = fs::read_to_string(profiles_path(td.path())).unwrap();
    assert!(data.contains("secureX"));
    assert!(data.contains("cert.pem"));
}

#[test]
fn saved_profile_and_timings_are_used() {
    let td = tempfile::tempdir().unwrap();
    fs::create_dir_all(td.path().join("vpsdash")).unwrap();
    fs::write(
        profiles_path(td.path()),
        r#"{
            "profiles": {
                "phone": {"url": "http://10.0.0.5:5000", "timings": {"dashboard_interval_ms": 10000}}
            },
            "download_dir": "/tmp/vpsdash-downloads"
        }"#,
    )
    .unwrap();

    let (ok, out) = run_vpsdash(td.path(), &["-P", "phone", "--dry-run"]);
    assert!(ok, "{out}");
    assert!(out.contains("http://10.0.0.5:5000"), "{out}");
    assert!(out.contains("every 10s"), "{out}");
    assert!(out.contains("/tmp/vpsdash-downloads"), "{out}");

    // --interval overrides the stored timing
    let (_, out) = run_vpsdash(td.path(), &["-P", "phone", "--interval", "5", "--dry-run"]);
    assert!(out.contains("every 5s"), "{out}");
}

#[test]
fn nothing_to_connect_to() {
    let td = tempfile::tempdir().unwrap();
    let (ok, out) = run_vpsdash(td.path(), &["--dry-run"]);
    assert!(ok);
    assert!(out.contains("No URL provided"), "{out}");
}
