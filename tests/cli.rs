use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Runs `warung` with HOME and the data dir pointed inside `home`.
fn warung(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("warung").unwrap();
    cmd.env("HOME", home.path())
        .env("WARUNG_DATA_DIR", home.path().join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn initialized() -> TempDir {
    let home = tempfile::tempdir().unwrap();
    warung(&home)
        .args(["init", "--business-name", "Toko Uji"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized warung"));
    home
}

#[test]
fn test_commands_require_init() {
    let home = tempfile::tempdir().unwrap();
    warung(&home)
        .args(["items", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("warung init"));
}

#[test]
fn test_init_writes_settings() {
    let home = initialized();
    let settings = home.path().join(".config").join("warung").join("settings.json");
    let text = std::fs::read_to_string(settings).unwrap();
    assert!(text.contains("Toko Uji"));
    assert!(home.path().join("data").join("warung.db").exists());

    warung(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Toko Uji"))
        .stdout(predicate::str::contains("Items:         0"));
}

#[test]
fn test_item_add_and_list() {
    let home = initialized();
    warung(&home)
        .args([
            "items", "add", "--code", "B001", "--name", "Beras 5kg",
            "--opening", "20", "--stock-in", "5", "--stock-out", "3", "--price", "72000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("closing stock 22"));

    warung(&home)
        .args(["items", "list", "--search", "beras"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B001"))
        .stdout(predicate::str::contains("Menipis"));
}

#[test]
fn test_clear_transfer_note() {
    let home = initialized();
    warung(&home)
        .args(["items", "add", "--code", "T01", "--name", "Teh", "--transfer-note", "ke cabang dua"])
        .assert()
        .success();
    warung(&home)
        .args(["items", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ke cabang dua"));

    warung(&home)
        .args(["items", "update", "1", "--clear-transfer-note"])
        .assert()
        .success();
    warung(&home)
        .args(["items", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ke cabang dua").not());
}

#[test]
fn test_duplicate_code_rejected() {
    let home = initialized();
    for expect_ok in [true, false] {
        let assert = warung(&home)
            .args(["items", "add", "--code", "G01", "--name", "Gula"])
            .assert();
        if expect_ok {
            assert.success();
        } else {
            assert
                .failure()
                .stderr(predicate::str::contains("Item code already exists: G01"));
        }
    }
}

#[test]
fn test_kos_report_running_balance() {
    let home = initialized();
    warung(&home)
        .args(["kos", "add", "--date", "2025-03-01", "--description", "Sewa kamar 1", "--receipt", "500000"])
        .assert()
        .success();
    warung(&home)
        .args(["kos", "add", "--date", "2025-03-05", "--description", "Bayar listrik", "--expense", "150000"])
        .assert()
        .success();

    warung(&home)
        .args(["report", "kos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rp 500.000"))
        .stdout(predicate::str::contains("Rp 350.000"))
        .stdout(predicate::str::contains("05 Maret 2025"));
}

#[test]
fn test_dashboard_for_month() {
    let home = initialized();
    warung(&home)
        .args(["cash", "add", "--date", "2025-03-02", "--rp100k", "3", "--rp1k", "4", "--rice", "50000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rp 304.000"));
    warung(&home)
        .args(["kos", "add", "--date", "2025-03-03", "--description", "Bayar wifi", "--expense", "100000"])
        .assert()
        .success();

    warung(&home)
        .args(["dashboard", "--month", "3", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Toko Uji"))
        .stdout(predicate::str::contains("Income (this month)"))
        .stdout(predicate::str::contains("Mar"))
        .stdout(predicate::str::contains("02/03"))
        .stdout(predicate::str::contains("Wifi"));
}

#[test]
fn test_export_csv_default_location() {
    let home = initialized();
    warung(&home)
        .args(["cash", "add", "--date", "2025-03-02", "--rp50k", "2"])
        .assert()
        .success();

    warung(&home)
        .args(["export", "cash", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("laporan-kas-harian-"));

    let exports = home.path().join("data").join("exports");
    let files: Vec<_> = std::fs::read_dir(&exports).unwrap().collect();
    assert_eq!(files.len(), 1);
    let text = std::fs::read_to_string(files[0].as_ref().unwrap().path()).unwrap();
    assert!(text.contains("2025-03-02,0,2,0,0,0,0,0,0,,,100000"));
}

#[test]
fn test_check_reports_consistent_store() {
    let home = initialized();
    warung(&home)
        .args(["items", "add", "--code", "M01", "--name", "Minyak", "--opening", "8"])
        .assert()
        .success();
    warung(&home)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All 1 records consistent."));
}

#[test]
fn test_unknown_id_is_an_error() {
    let home = initialized();
    warung(&home)
        .args(["kos", "delete", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No kos transaction with ID 42"));
    warung(&home)
        .args(["items", "update", "7", "--name", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No item with ID 7"));
}

#[test]
fn test_negative_amount_rejected() {
    let home = initialized();
    warung(&home)
        .args(["kos", "add", "--description", "Sewa", "--receipt=-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}
