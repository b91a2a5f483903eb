use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const RELEASE_KEY_SHA256: &str =
    "6JW_dL7pVZZk5oqVcwlNvYU21Okn1368BjKVt70QFT0";

/// Runs in `dir` with no config inherited from the environment.
fn ctl(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("openyoloctl");
    cmd.current_dir(dir)
        .env_remove("OPENYOLO_CONFIG_PATH")
        .env_remove("OPENYOLO_CONFIG_JSON")
        .env_remove("RUST_LOG");
    cmd
}

/// Store holding one package signed by `certs`.
fn store_with(package: &str, certs: &[&[u8]]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let package_dir = dir.path().join(package);
    fs::create_dir(&package_dir).unwrap();
    for (i, cert) in certs.iter().enumerate() {
        fs::write(package_dir.join(format!("{i}.der")), cert).unwrap();
    }
    dir
}

#[test]
fn help_lists_every_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    let out = ctl(dir.path())
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&out);
    for sub in [
        "parse",
        "fingerprint",
        "android",
        "web",
        "resolve",
        "self",
        "encode",
        "decode",
    ] {
        assert!(text.contains(sub), "help missing {sub}");
    }
}

#[test]
fn parse_describes_a_legacy_android_domain() {
    let dir = tempfile::tempdir().unwrap();
    ctl(dir.path())
        .args(["parse", "android://AAAA@com.example.app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("package:     com.example.app"))
        .stdout(predicate::str::contains("sha512 (implied)"));
}

#[test]
fn parse_json_reports_web_parts() {
    let dir = tempfile::tempdir().unwrap();
    let out = ctl(dir.path())
        .args(["parse", "--json", "https://example.com:8443"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["kind"], "web");
    assert_eq!(json["host"], "example.com");
    assert_eq!(json["port"], 8443);
    assert_eq!(json["domain"], "https://example.com:8443");
}

#[test]
fn parse_rejects_paths() {
    let dir = tempfile::tempdir().unwrap();
    ctl(dir.path())
        .args(["parse", "https://example.com/login"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid authentication domain"));
}

#[test]
fn fingerprint_and_android_agree() {
    let dir = tempfile::tempdir().unwrap();
    let cert = dir.path().join("release.der");
    fs::write(&cert, b"release-key").unwrap();

    ctl(dir.path())
        .args(["fingerprint", "--cert"])
        .arg(&cert)
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{RELEASE_KEY_SHA256}\n")));

    ctl(dir.path())
        .args(["android", "--package", "com.example.app", "--cert"])
        .arg(&cert)
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "android://sha256~{RELEASE_KEY_SHA256}@com.example.app\n"
        )));
}

#[test]
fn web_keeps_only_the_origin() {
    let dir = tempfile::tempdir().unwrap();
    ctl(dir.path())
        .args(["web", "https://Example.com:443/login?next=/"])
        .assert()
        .success()
        .stdout("https://example.com\n");
}

#[test]
fn encode_then_decode() {
    let dir = tempfile::tempdir().unwrap();
    ctl(dir.path())
        .args(["encode", "https://a.io"])
        .assert()
        .success()
        .stdout("0a0c68747470733a2f2f612e696f\n");

    ctl(dir.path())
        .args(["decode", "0a0c68747470733a2f2f612e696f"])
        .assert()
        .success()
        .stdout("https://a.io\n");
}

#[test]
fn decode_rejects_malformed_bytes() {
    let dir = tempfile::tempdir().unwrap();
    // Declares a 12 byte string but carries 2.
    ctl(dir.path())
        .args(["decode", "0a0c6874"])
        .assert()
        .failure();
    ctl(dir.path()).args(["decode", "zz"]).assert().failure();
}

#[test]
fn resolve_single_signer() {
    let store = store_with("com.example.app", &[b"release-key"]);
    ctl(store.path())
        .args(["resolve", "--package", "com.example.app", "--store"])
        .arg(store.path())
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "android://sha256~{RELEASE_KEY_SHA256}@com.example.app\n"
        )));
}

#[test]
fn resolve_untrusted_exits_with_two() {
    let store = store_with("com.example.multi", &[b"one", b"two"]);
    for package in ["com.example.multi", "com.example.missing"] {
        ctl(store.path())
            .args(["resolve", "--package", package, "--store"])
            .arg(store.path())
            .assert()
            .code(2)
            .stdout("");
    }
}

#[test]
fn self_uses_configured_package_and_algorithm() {
    let store = store_with("com.example.self", &[b"release-key"]);
    let config = store.path().join("ctl.json");
    fs::write(
        &config,
        serde_json::json!({
            "fingerprint_algorithm": "sha512",
            "signature_store": store.path(),
            "self_package": "com.example.self",
        })
        .to_string(),
    )
    .unwrap();

    // self always mints with the default algorithm.
    ctl(store.path())
        .arg("--config")
        .arg(&config)
        .arg("self")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "android://sha256~{RELEASE_KEY_SHA256}@com.example.self\n"
        )));

    ctl(store.path())
        .arg("--config")
        .arg(&config)
        .args(["resolve", "--package", "com.example.self"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("android://sha512~"));
}

#[test]
fn self_without_package_fails() {
    let store = tempfile::tempdir().unwrap();
    ctl(store.path())
        .args(["self", "--store"])
        .arg(store.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("self_package"));
}
