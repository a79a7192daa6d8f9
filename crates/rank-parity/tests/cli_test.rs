#![cfg(unix)]

mod common;

use std::fs;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;

use common::{scenario_toml, sides_toml, write_scripts};

fn bin() -> Command {
    Command::cargo_bin("rank-parity").unwrap()
}

#[test]
fn test_all_scenarios_pass() {
    let tmp = tempfile::tempdir().unwrap();
    write_scripts(tmp.path());
    let mut cfg = sides_toml();
    cfg.push_str(&scenario_toml("letters", false, None, "Basic letters"));
    cfg.push_str(&scenario_toml("cellCycleKO", false, Some(6178), "cellCycleKO N"));
    let cfg_path = tmp.path().join("parity.toml");
    fs::write(&cfg_path, cfg).unwrap();

    bin()
        .args(["--config", cfg_path.to_str().unwrap()])
        .args(["--base-dir", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("COMPREHENSIVE Left vs Right COMPARISON TEST"))
        .stdout(predicate::str::contains("Passed: 2"))
        .stdout(predicate::str::contains(
            "ALL TESTS PASSED! Left and Right implementations are identical.",
        ));

    let calls = fs::read_to_string(tmp.path().join("calls.log")).unwrap();
    assert_eq!(calls, "letters False None\ncellCycleKO False 6178\n");
    assert!(!tmp.path().join("left.csv").exists());
    assert!(!tmp.path().join("right.csv").exists());
}

#[test]
fn test_failures_set_exit_code_and_are_listed() {
    let tmp = tempfile::tempdir().unwrap();
    write_scripts(tmp.path());
    let mut cfg = sides_toml();
    cfg.push_str(&scenario_toml("broken", true, None, "invocation fails"));
    cfg.push_str(&scenario_toml("drift", false, Some(15), "values drift"));
    cfg.push_str(&scenario_toml("extra", false, None, "extra row"));
    cfg.push_str(&scenario_toml("letters", true, Some(20), "still runs"));
    let cfg_path = tmp.path().join("parity.toml");
    fs::write(&cfg_path, cfg).unwrap();
    let json_path = tmp.path().join("out/report.json");

    bin()
        .args(["--config", cfg_path.to_str().unwrap()])
        .args(["--base-dir", tmp.path().to_str().unwrap()])
        .args(["--json", json_path.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failed: 3"))
        .stdout(predicate::str::contains("✗ FAIL: Left error: ValueError: Unknown dataset: broken"))
        .stdout(predicate::str::contains("Values differ (max diff: 1.00e-07)"))
        .stdout(predicate::str::contains(
            "Row indices don't match! Left has 3 rows, Right has 4 rows",
        ))
        .stdout(predicate::str::contains("3 test(s) failed. See details above."));

    let report: Value = serde_json::from_slice(&fs::read(&json_path).unwrap()).unwrap();
    assert_eq!(report["total"], 4);
    assert_eq!(report["passed"], 1);
    let statuses: Vec<&str> = report["outcomes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, ["FAIL", "FAIL", "FAIL", "PASS"]);
}

#[test]
fn test_list_prints_default_matrix() {
    bin()
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Basic letters, full=False, N=None"))
        .stdout(predicate::str::contains("7. cellCycleKO, full=False, N=6178"));
}

#[test]
fn test_invalid_config_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg_path = tmp.path().join("bad.toml");
    fs::write(
        &cfg_path,
        "[left]\nlabel = \"A\"\nruntime = \"sh\"\nscript = \"a.sh\"\nartifact = \"temp_r_output.csv\"\n",
    )
    .unwrap();

    bin()
        .args(["--config", cfg_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("both sides write the same artifact"));
}
