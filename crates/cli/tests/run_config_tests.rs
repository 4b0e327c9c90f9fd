// Integration tests for `llens run` and `llens validate`.
//
// Config paths resolve relative to the config file, not the cwd; these
// tests run the binary from the test harness cwd against a tempdir to
// prove that.

use std::fs;
use std::path::Path;
use std::process::Command;

fn llens() -> Command {
    Command::new(env!("CARGO_BIN_EXE_llens"))
}

const BANK_CSV: &str = "\
Description,Debit,Credit,Balance
Coffee beans,,4.50,995.50
Invoice 42 TP2P,12.00,,983.50
Stationery,8.00,,975.50
";

const WALLET_CSV: &str = "\
Description,Debit,Credit
Coffee beans,,4.50
Invoice 42,,12.00
";

fn fixture(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn test_run_resolves_paths_relative_to_config() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), "bank.csv", BANK_CSV);
    fixture(dir.path(), "wallet.csv", WALLET_CSV);
    let config = fixture(
        dir.path(),
        "reconcile.toml",
        "\
bank = \"bank.csv\"
wallet1 = \"wallet.csv\"

[export]
json = \"out.json\"
",
    );

    let output = llens().args(["run", &config]).output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("wrote"), "stderr: {stderr}");
    assert!(stderr.contains("matched 2 of 3 bank rows (67%)"), "stderr: {stderr}");

    let written = fs::read_to_string(dir.path().join("out.json")).unwrap();
    let v: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(v["statistics"]["bank_rows"], 3);
    assert_eq!(v["statistics"]["matching_rows"], 2);
}

#[test]
fn test_run_json_flag_prints_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), "bank.csv", BANK_CSV);
    fixture(dir.path(), "wallet.csv", WALLET_CSV);
    let config = fixture(
        dir.path(),
        "reconcile.toml",
        "bank = \"bank.csv\"\nwallet1 = \"wallet.csv\"\n",
    );

    let output = llens()
        .args(["run", &config, "--json", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stderr.is_empty());

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["statistics"]["unique_rows"], 1);
}

#[test]
fn test_run_output_flag_overrides_config_target() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), "bank.csv", BANK_CSV);
    fixture(dir.path(), "wallet.csv", WALLET_CSV);
    let config = fixture(
        dir.path(),
        "reconcile.toml",
        "\
bank = \"bank.csv\"
wallet1 = \"wallet.csv\"

[export]
json = \"from-config.json\"
",
    );
    let override_path = dir.path().join("from-flag.json");

    let output = llens()
        .args([
            "run",
            &config,
            "--output",
            override_path.to_str().unwrap(),
            "--quiet",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(override_path.is_file());
    assert!(!dir.path().join("from-config.json").exists());
}

#[test]
fn test_run_strict_option_fails_on_unreconciled_rows() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), "bank.csv", BANK_CSV);
    fixture(dir.path(), "wallet.csv", WALLET_CSV);
    let config = fixture(
        dir.path(),
        "reconcile.toml",
        "\
bank = \"bank.csv\"
wallet1 = \"wallet.csv\"

[options]
strict = true
",
    );

    let output = llens().args(["run", &config, "--quiet"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unreconciled rows remain"));
}

#[test]
fn test_run_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path(), "reconcile.toml", "bank = \"bank.csv\"\n");

    let output = llens().args(["run", &config]).output().unwrap();
    assert_eq!(output.status.code(), Some(6));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid config"));
}

#[test]
fn test_run_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let output = llens()
        .args(["run", missing.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read config"));
}

#[test]
fn test_run_missing_bank_file() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), "wallet.csv", WALLET_CSV);
    let config = fixture(
        dir.path(),
        "reconcile.toml",
        "bank = \"absent.csv\"\nwallet1 = \"wallet.csv\"\n",
    );

    let output = llens().args(["run", &config]).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn test_validate_good_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(
        dir.path(),
        "reconcile.toml",
        "bank = \"bank.csv\"\nwallet1 = \"w1.csv\"\nwallet2 = \"w2.csv\"\n",
    );

    let output = llens().args(["validate", &config]).output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("valid: bank 'bank.csv' vs 2 wallet sheet(s)"),
        "stderr: {stderr}"
    );
}

#[test]
fn test_validate_rejects_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(
        dir.path(),
        "reconcile.toml",
        "bank = \"bank.csv\"\nwallet1 = \"w.csv\"\nbannk = \"typo.csv\"\n",
    );

    let output = llens().args(["validate", &config]).output().unwrap();
    assert_eq!(output.status.code(), Some(6));
}
