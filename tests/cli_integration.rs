use std::process::Command;
use tempfile::tempdir;

use bincookies::binarycookies::BinaryCookiesFile;
use bincookies::model::CookieRecord;

fn bin() -> String {
    env!("CARGO_BIN_EXE_bincookies").to_string()
}

fn sample_bytes() -> Vec<u8> {
    BinaryCookiesFile::from_records(vec![
        CookieRecord {
            domain: "example.com".into(),
            name: "session".into(),
            path: "/".into(),
            value: "abc123".into(),
            secure: true,
            http_only: true,
            ..CookieRecord::default()
        },
        CookieRecord {
            domain: "other.org".into(),
            name: "id".into(),
            path: "/".into(),
            value: "42".into(),
            ..CookieRecord::default()
        },
    ])
    .encode()
    .unwrap()
}

#[test]
fn cli_info_reports_structure() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("Cookies.binarycookies");
    std::fs::write(&input, sample_bytes()).unwrap();

    let out = Command::new(bin()).arg("info").arg(&input).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("pages: 2"));
    assert!(stdout.contains("cookies: 2"));
}

#[test]
fn cli_dump_json_lists_cookies() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("Cookies.binarycookies");
    std::fs::write(&input, sample_bytes()).unwrap();

    let out = Command::new(bin())
        .args(["--json", "dump"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());

    let cookies: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let cookies = cookies.as_array().unwrap();
    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies[0]["domain"], "example.com");
    assert_eq!(cookies[0]["name"], "session");
    assert_eq!(cookies[0]["secure"], true);
    assert_eq!(cookies[1]["value"], "42");
}

#[test]
fn cli_recode_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.binarycookies");
    let output = dir.path().join("out.binarycookies");
    let original = sample_bytes();
    std::fs::write(&input, &original).unwrap();

    let st = Command::new(bin())
        .arg("recode")
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());

    // Canonical input recodes byte-identically.
    assert_eq!(std::fs::read(&output).unwrap(), original);
}

#[test]
fn cli_recode_refuses_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.binarycookies");
    let output = dir.path().join("out.binarycookies");
    std::fs::write(&input, sample_bytes()).unwrap();
    std::fs::write(&output, b"existing").unwrap();

    let st = Command::new(bin())
        .arg("recode")
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(!st.success());
    assert_eq!(std::fs::read(&output).unwrap(), b"existing");

    let st = Command::new(bin())
        .arg("--force")
        .arg("recode")
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&output).unwrap(), sample_bytes());
}

#[test]
fn cli_rejects_non_cookie_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("garbage");
    std::fs::write(&input, b"xxxx definitely not cookies").unwrap();

    let out = Command::new(bin()).arg("info").arg(&input).output().unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("bad magic"));
}
