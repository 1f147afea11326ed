//! Integration tests for the autoparts CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get an autoparts command isolated from the user's config
fn autoparts(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("autoparts").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("AUTOPARTS_DATABASE")
        .env_remove("AUTOPARTS_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a store with demo data in a temp directory
fn setup_demo_store() -> TempDir {
    let tmp = TempDir::new().unwrap();
    autoparts(tmp.path())
        .args(["init", "--demo"])
        .assert()
        .success();
    tmp
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    autoparts(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("table"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    autoparts(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("autoparts"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    autoparts(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("autoparts"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_store() {
    let tmp = TempDir::new().unwrap();
    autoparts(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized auto-parts store"));

    assert!(tmp.path().join(".autoparts/config.yaml").exists());
    assert!(tmp.path().join(".autoparts/store.db").exists());
}

#[test]
fn test_init_twice_warns() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_outside_store_fail() {
    let tmp = TempDir::new().unwrap();
    autoparts(tmp.path())
        .args(["table", "list", "products"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no auto-parts store found"));
}

#[test]
fn test_database_option_overrides_discovery() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("elsewhere.db");
    autoparts(tmp.path())
        .args(["status", "-f", "json", "--database"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"records\": 0"));
    assert!(db.exists());
}

// ============================================================================
// Registry Tests
// ============================================================================

#[test]
fn test_tables_lists_registry() {
    let tmp = TempDir::new().unwrap();
    autoparts(tmp.path())
        .args(["tables", "-f", "id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("suppliers"))
        .stdout(predicate::str::contains("custom-payments"));
}

#[test]
fn test_table_columns_shows_reference() {
    let tmp = TempDir::new().unwrap();
    autoparts(tmp.path())
        .args(["table", "columns", "suppliers", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("supplier_category_id"))
        .stdout(predicate::str::contains("supplier-categories.category_name"));
}

#[test]
fn test_unknown_table_fails() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["table", "list", "widgets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("widgets"));
}

// ============================================================================
// CRUD Tests
// ============================================================================

#[test]
fn test_list_products_csv() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["table", "list", "products", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("key,Name,Sale price,Description"))
        .stdout(predicate::str::contains("1,Brake pads,45.50,"))
        .stdout(predicate::str::contains("2,Oil filter,12.00,\n"));
}

#[test]
fn test_list_limit() {
    let tmp = setup_demo_store();
    let output = autoparts(tmp.path())
        .args(["table", "list", "products", "-f", "id", "--limit", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1\n2\n");
}

#[test]
fn test_search_contains() {
    let tmp = setup_demo_store();
    let output = autoparts(tmp.path())
        .args(["table", "search", "products", "Name", "filter", "-f", "id"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "2\n4\n");
}

#[test]
fn test_search_is_case_sensitive() {
    let tmp = setup_demo_store();
    let output = autoparts(tmp.path())
        .args(["table", "search", "products", "Name", "FILTER", "-f", "id"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_search_unknown_column_fails() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["table", "search", "products", "Colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column 'Colour' not found"));
}

#[test]
fn test_show_record() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["table", "show", "customers", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kuznetsova"));
}

#[test]
fn test_show_composite_key() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["table", "show", "delivery-terms", "2", "1", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Denso Trade"))
        .stdout(predicate::str::contains("28.0"));
}

#[test]
fn test_new_edit_show_product() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args([
            "table",
            "new",
            "products",
            "--set",
            "Name=Wiper blade",
            "--set",
            "Sale price=9,90",
            "-f",
            "id",
        ])
        .assert()
        .success()
        .stdout("6\n");

    autoparts(tmp.path())
        .args(["table", "edit", "products", "6", "--set", "product_sale_price=11.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated products record"));

    autoparts(tmp.path())
        .args(["table", "show", "products", "6", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("6,Wiper blade,11.50,"));
}

#[test]
fn test_new_missing_required_field_fails() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["table", "new", "products", "--set", "Name=Wiper blade"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Sale price"));
}

#[test]
fn test_new_invalid_value_fails() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args([
            "table",
            "new",
            "products",
            "--set",
            "Name=Wiper blade",
            "--set",
            "Sale price=cheap",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cheap"));
}

#[test]
fn test_delete_in_use_fails() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["table", "delete", "products", "1", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("used in other tables"));
}

#[test]
fn test_delete_unused_record() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["table", "delete", "storage-cells", "3", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted storage-cells record"));

    autoparts(tmp.path())
        .args(["table", "show", "storage-cells", "3"])
        .assert()
        .failure();
}

#[test]
fn test_delete_without_confirmation_aborts() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["table", "delete", "storage-cells", "3"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted."));

    autoparts(tmp.path())
        .args(["table", "show", "storage-cells", "3"])
        .assert()
        .success();
}

#[test]
fn test_delete_missing_record_fails() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["table", "delete", "products", "99", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_reference_options_mark_current() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["table", "options", "suppliers", "Category", "3", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1,Manufacturer,no"))
        .stdout(predicate::str::contains("2,Dealer,yes"));
}

// ============================================================================
// Report Tests
// ============================================================================

#[test]
fn test_report_list() {
    let tmp = TempDir::new().unwrap();
    autoparts(tmp.path())
        .args(["report", "list", "-f", "id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("supplier-products"))
        .stdout(predicate::str::contains("customs"));
}

#[test]
fn test_report_show_lists_choices() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["report", "show", "supplier-products"])
        .assert()
        .success()
        .stdout(predicate::str::contains("min-volume"))
        .stdout(predicate::str::contains("Brake pads"));
}

#[test]
fn test_report_run_supplier_products() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args([
            "report",
            "run",
            "supplier-products",
            "--param",
            "product=1",
            "--param",
            "category=1",
            "-f",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bosch Parts"))
        .stdout(predicate::str::contains("Denso Trade"))
        .stdout(predicate::str::contains("AutoDealer").not());
}

#[test]
fn test_report_run_missing_parameter_fails() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["report", "run", "supplier-products", "--param", "product=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("category"));
}

#[test]
fn test_report_run_unknown_variation_fails() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["report", "run", "supplier-products", "--variation", "weekly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("weekly"));
}

#[test]
fn test_report_run_writes_markdown() {
    let tmp = setup_demo_store();
    let out = tmp.path().join("cash.md");
    autoparts(tmp.path())
        .args([
            "report",
            "run",
            "cash-report",
            "--param",
            "start=2024-02-01",
            "--param",
            "end=29.02.2024",
            "-o",
        ])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written"));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("376.75"));
    assert!(content.contains("## Results"));
}

// ============================================================================
// Import Tests
// ============================================================================

#[test]
fn test_import_csv() {
    let tmp = setup_demo_store();
    let csv = tmp.path().join("cells.csv");
    fs::write(
        &csv,
        "Cell,Location,Width,Depth,Height\nC1,Aisle C,1.0,0.5,0.5\nC2,,1.0,0.5,0.5\n",
    )
    .unwrap();

    autoparts(tmp.path())
        .args(["import", "storage-cells"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Records created: 2"));

    autoparts(tmp.path())
        .args(["table", "search", "storage-cells", "Cell", "C", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("C1,Aisle C"))
        .stdout(predicate::str::contains("C2,,"));
}

#[test]
fn test_import_dry_run() {
    let tmp = setup_demo_store();
    let csv = tmp.path().join("products.csv");
    fs::write(&csv, "Name,Sale price\nWiper blade,9.90\n").unwrap();

    autoparts(tmp.path())
        .args(["import", "products", "--dry-run"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid rows"));

    let output = autoparts(tmp.path())
        .args(["table", "list", "products", "-f", "id"])
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 5);
}

#[test]
fn test_import_template() {
    let tmp = TempDir::new().unwrap();
    autoparts(tmp.path())
        .args(["import", "products", "--template"])
        .assert()
        .success()
        .stdout("product_name,product_sale_price,product_description\n");
}

// ============================================================================
// Status and Config Tests
// ============================================================================

#[test]
fn test_status_reports_counts() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema version"))
        .stdout(predicate::str::contains("products"));
}

#[test]
fn test_config_set_default_format() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["config", "set", "default_format", "csv"])
        .assert()
        .success();

    autoparts(tmp.path())
        .args(["config", "show", "default_format"])
        .assert()
        .success()
        .stdout("csv\n");

    autoparts(tmp.path())
        .args(["table", "list", "positions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Manager,"));
}

#[test]
fn test_config_disable_delete_confirmation() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["config", "set", "confirm_delete", "false"])
        .assert()
        .success();

    autoparts(tmp.path())
        .args(["table", "delete", "storage-cells", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));
}

#[test]
fn test_config_unknown_key_fails() {
    let tmp = setup_demo_store();
    autoparts(tmp.path())
        .args(["config", "set", "author", "me"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}
