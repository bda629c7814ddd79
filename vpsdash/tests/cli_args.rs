//! CLI arg parsing tests for vpsdash
use assert_cmd::Command;

fn run(args: &[&str]) -> (bool, String) {
    let output = Command::cargo_bin("vpsdash")
        .expect("vpsdash binary")
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

#[test]
fn help_mentions_short_and_long_flags() {
    let (ok, text) = run(&["--help"]);
    assert!(ok);
    for flag in ["--tls-ca", "-t", "--profile", "-P", "--dry-run", "--interval", "--download-dir", "--log"] {
        assert!(text.contains(flag), "help text missing {flag}\n{text}");
    }
}

#[test]
fn help_wins_over_other_flags() {
    for args in [
        &["--tls-ca", "/tmp/cert.pem", "--help"][..],
        &["-t", "/tmp/cert.pem", "--help"][..],
        &["--profile", "dev", "--help"][..],
        &["--interval=15", "-h"][..],
    ] {
        let (ok, text) = run(args);
        assert!(ok, "{args:?} did not succeed");
        assert!(text.contains("Usage:"), "{args:?}: {text}");
    }
}

#[test]
fn bad_interval_is_reported() {
    let (_ok, text) = run(&["--interval", "soon", "http://127.0.0.1:9"]);
    assert!(text.contains("whole seconds"), "{text}");
}

#[test]
fn non_http_url_is_refused() {
    let td = tempfile::tempdir().unwrap();
    let output = Command::cargo_bin("vpsdash")
        .unwrap()
        .env("XDG_CONFIG_HOME", td.path())
        .args(["ws://127.0.0.1:9/ws", "--dry-run"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad API URL"));
}
