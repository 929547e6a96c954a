//! Binary-level tests for quorumctl.

use assert_cmd::Command;
use predicates::prelude::*;

fn quorumctl() -> Command {
    let mut cmd = Command::cargo_bin("quorumctl").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("QUORUM_CONFIG");
    cmd
}

fn scenario(name: &str) -> String {
    format!("{}/scenarios/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn roles_lists_substitutes() {
    quorumctl()
        .arg("roles")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vice President"))
        .stdout(predicate::str::contains("Legal Adviser"));
}

#[test]
fn rules_for_one_module_as_json() {
    let output = quorumctl()
        .args(["--output", "json", "rules", "--module", "content"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["module"], "content");
    assert_eq!(rows[0]["policy"], "publication pair");
}

#[test]
fn evaluate_reports_verdict() {
    let output = quorumctl()
        .args([
            "-o",
            "json",
            "evaluate",
            "--module",
            "finances",
            "--initiator",
            "treasurer",
            "--approved",
            "treasurer,financial_secretary",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let evaluation: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(evaluation["result"]["is_valid"], false);
    assert_eq!(evaluation["result"]["required_count"], 4);
}

#[test]
fn evaluate_rejects_unknown_role() {
    quorumctl()
        .args([
            "evaluate",
            "--module",
            "finances",
            "--initiator",
            "treasurer",
            "--approved",
            "janitor",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("janitor"));
}

#[test]
fn simulate_authorizes_transfer() {
    let output = quorumctl()
        .args(["--output", "json", "simulate", &scenario("finances-transfer.json")])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["session"]["status"], "authorized");
    assert_eq!(report["steps"].as_array().unwrap().len(), 6);
    assert_eq!(report["steps"][5]["outcome"], "recorded, authorized");
}

#[test]
fn simulate_text_shows_expiry() {
    quorumctl()
        .args(["simulate", &scenario("elections-expired.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("expired"))
        .stdout(predicate::str::contains("Action not authorized"));
}

#[test]
fn simulate_missing_file_fails() {
    quorumctl()
        .args(["simulate", "/nonexistent/scenario.json"])
        .assert()
        .failure();
}

fn write_scenario(name: &str, contents: &str) -> String {
    let path = std::env::temp_dir().join(format!("quorumctl-{}-{}.json", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn simulate_rejects_out_of_range_durations() {
    let advance = write_scenario(
        "huge-advance",
        r#"{ "module": "settings", "initiator": "president",
             "steps": [{ "op": "advance", "secs": 9223372036854775807 }] }"#,
    );
    quorumctl()
        .args(["simulate", &advance])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid scenario"));

    let ttl = write_scenario(
        "huge-ttl",
        r#"{ "module": "settings", "initiator": "president",
             "ttl_secs": 9223372036854775807, "steps": [] }"#,
    );
    quorumctl()
        .args(["simulate", &ttl])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid scenario"));
}
