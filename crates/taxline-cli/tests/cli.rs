//! End-to-end tests for the taxline binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const CATALOG_JSON: &str = r#"{
  "taxes": [
    {"tax_id": "GST18", "tax_name": "GST 18 (9 + 9)", "tax_percentage": 18.0, "tax_type": "tax_group"},
    {"tax_id": "IGST18", "tax_name": "IGST 18", "tax_percentage": 18.0, "tax_type": "tax"}
  ]
}"#;

fn write_fixture(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn taxline() -> Command {
    Command::cargo_bin("taxline").unwrap()
}

#[test]
fn check_reports_an_intrastate_order() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_fixture(dir.path(), "catalog.json", CATALOG_JSON);
    let order = write_fixture(
        dir.path(),
        "order.json",
        r#"{
          "reference": "SO-1001",
          "destination_state": "Karnataka",
          "lines": [
            {"description": "Brass statuette", "hsn_sac": "83062990", "quantity": 1.0, "final_price": 118.0}
          ]
        }"#,
    );

    taxline()
        .arg("check")
        .arg(&order)
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("intrastate (CGST/SGST)"))
        .stdout(predicate::str::contains("100.00"));
}

#[test]
fn check_fails_on_igst_in_intrastate_order() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_fixture(dir.path(), "catalog.json", CATALOG_JSON);
    // A system charge line keeps its IGST selection, so the resolver
    // leaves it alone and the validator must flag it.
    let order = write_fixture(
        dir.path(),
        "order.json",
        r#"{
          "destination_state": "Karnataka",
          "lines": [
            {"description": "COD charges", "item_ref": "system", "quantity": 1.0, "final_price": 59.0, "tax_id": "IGST18"}
          ]
        }"#,
    );

    taxline()
        .arg("check")
        .arg(&order)
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "IGST cannot be applied as this is an intrastate transaction.",
        ));
}

#[test]
fn no_fail_downgrades_issues_to_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_fixture(dir.path(), "catalog.json", CATALOG_JSON);
    let order = write_fixture(
        dir.path(),
        "order.json",
        r#"{
          "destination_state": "Karnataka",
          "lines": [
            {"description": "COD charges", "item_ref": "system", "quantity": 1.0, "final_price": 59.0, "tax_id": "IGST18"}
          ]
        }"#,
    );

    taxline()
        .arg("check")
        .arg(&order)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--no-fail")
        .assert()
        .success();
}

#[test]
fn json_report_carries_the_corrected_selection() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_fixture(dir.path(), "catalog.json", CATALOG_JSON);
    let order = write_fixture(
        dir.path(),
        "order.json",
        r#"{
          "destination_state": "Maharashtra",
          "lines": [
            {"description": "Brass statuette", "hsn_sac": "83062990", "quantity": 1.0, "final_price": 118.0, "tax_id": "GST18"}
          ]
        }"#,
    );

    taxline()
        .arg("check")
        .arg(&order)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""tax_id": "IGST18""#))
        .stdout(predicate::str::contains(r#""tax_auto_corrected": true"#))
        .stdout(predicate::str::contains(r#""interstate": true"#));
}

#[test]
fn check_rejects_a_missing_order_file() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_fixture(dir.path(), "catalog.json", CATALOG_JSON);

    taxline()
        .arg("check")
        .arg(dir.path().join("missing.json"))
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Order file not found"));
}

#[test]
fn catalog_show_lists_families() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_fixture(dir.path(), "catalog.json", CATALOG_JSON);

    taxline()
        .arg("catalog")
        .arg("show")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("IGST18"))
        .stdout(predicate::str::contains("interstate"))
        .stdout(predicate::str::contains("intrastate"));
}

#[test]
fn batch_summarizes_multiple_orders() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_fixture(dir.path(), "catalog.json", CATALOG_JSON);
    write_fixture(
        dir.path(),
        "order-1.json",
        r#"{"destination_state": "Karnataka", "lines": [
            {"description": "Statuette", "hsn_sac": "83062990", "quantity": 1.0, "final_price": 118.0}
        ]}"#,
    );
    write_fixture(
        dir.path(),
        "order-2.json",
        r#"{"destination_state": "Maharashtra", "lines": [
            {"description": "Statuette", "hsn_sac": "83062990", "quantity": 2.0, "final_price": 118.0}
        ]}"#,
    );
    let summary = dir.path().join("summary.csv");

    taxline()
        .arg("batch")
        .arg(dir.path().join("order-*.json").to_str().unwrap())
        .arg("--catalog")
        .arg(&catalog)
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 clean"));

    let written = fs::read_to_string(&summary).unwrap();
    assert!(written.contains("order-1.json"));
    assert!(written.contains("clean"));
}
