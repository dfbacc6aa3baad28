use assert_cmd::Command;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const ALLOW_BANNER_GB18030: &[u8] = &[
    0xD4, 0xCA, 0xD0, 0xED, 0xC1, 0xD0, 0xB1, 0xED, 0xD6, 0xD0, 0xCB, 0xF9, 0xD3, 0xD0,
];
const DENY_BANNER_GB18030: &[u8] = &[
    0xBE, 0xDC, 0xBE, 0xF8, 0xC1, 0xD0, 0xB1, 0xED, 0xD6, 0xD0, 0xCB, 0xF9, 0xD3, 0xD0,
];

#[allow(deprecated)]
fn winops() -> Command {
    Command::cargo_bin("winops").expect("binary")
}

fn parse(listing: &str, input: &Path, extra: &[&str]) -> Value {
    let output = winops()
        .arg("--quiet")
        .arg("parse")
        .arg(listing)
        .arg("--input")
        .arg(input)
        .args(extra)
        .output()
        .expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn gb18030_filter_listing() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("filters.txt");
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"\r\n");
    bytes.extend_from_slice(ALLOW_BANNER_GB18030);
    bytes.extend_from_slice(b" MAC:\r\n1\t00-1c-23-20-af-4a\tOffice PC\r\n\r\n");
    bytes.extend_from_slice(DENY_BANNER_GB18030);
    bytes.extend_from_slice(b" MAC:\r\n2\t9C-B6-D0-E8-38-47\tGuest phone\r\n");
    fs::write(&path, bytes).unwrap();

    let got = parse("dhcp-filters", &path, &[]);
    assert_eq!(
        got,
        json!([
            {"allow": true, "address": "00-1C-23-20-AF-4A", "comment": "Office PC"},
            {"allow": false, "address": "9C-B6-D0-E8-38-47", "comment": "Guest phone"},
        ])
    );
}

#[test]
fn dns_records_from_stdin() {
    let output = winops()
        .args(["--quiet", "parse", "dns-records", "--input", "-"])
        .write_stdin("win2016\t\t3600 A 192.168.123.101\r\n\t\t3600 A 172.16.22.182\r\n")
        .output()
        .expect("command run");
    assert!(output.status.success());
    let got: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        got,
        json!([
            {"name": "win2016", "data": "192.168.123.101"},
            {"name": "win2016", "data": "172.16.22.182"},
        ])
    );
}

#[test]
fn svn_permissions_need_the_queried_path() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("rules.txt");
    fs::write(
        &path,
        "Path    Access     AccountId      AccountName\n\
         ----    ------     ---------      -----------\n\
         /       ReadWrite  S-1-5-32-545   BUILTIN\\Users\n\
         /trunk  ReadOnly   S-1-5-32-544   BUILTIN\\Administrators\n",
    )
    .unwrap();

    let got = parse("svn-permissions", &path, &["--path", "/trunk"]);
    assert_eq!(got[0]["inherited"], true);
    assert_eq!(got[1]["inherited"], false);
    assert_eq!(got[1]["access_level"], "read_only");

    winops()
        .args(["parse", "svn-permissions", "--input"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicates::str::contains("--path is required"));
}

#[test]
fn foreign_repository_in_folder_listing_fails() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("folders.txt");
    fs::write(
        &path,
        "Repository Name  Path   Url\n---------- ----  ----   ---\nprod       trunk /trunk https://svn.example.com/svn/prod/trunk\n",
    )
    .unwrap();

    winops()
        .args(["parse", "svn-folders", "--repo", "test", "--input"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicates::str::contains("Scope mismatch"));
}

#[test]
fn directory_users_from_export() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("users.json");
    fs::write(
        &path,
        r#"[
            {"account": "zoe", "displayName": "Zoe Z", "objectSid": ""},
            {"account": "Administrator", "objectSid": "AQEAAAAAAAUgAAAAIAIAAA=="}
        ]"#,
    )
    .unwrap();

    let got = parse("directory-users", &path, &[]);
    assert_eq!(
        got,
        json!([
            {"id": "S-1-5-32-544", "name": "Administrator", "account": "Administrator"},
            {"id": "", "name": "Zoe Z", "account": "zoe"},
        ])
    );
}

#[test]
fn missing_input_is_reported() {
    winops()
        .args(["parse", "dhcp-scopes", "--input", "/nonexistent/scopes.txt"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Failed to read /nonexistent/scopes.txt"));
}
