use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn payshare_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("payshare"))
}

const INCOME_JSON: &str = r#"[
  {
    "_id": "inc-1",
    "date": "2025-04-10T00:00:00.000Z",
    "jobTitle": "Website Development",
    "clientName": "Acme Corp",
    "amount": 100,
    "category": "Development",
    "paymentStatus": "paid"
  },
  {
    "_id": "inc-2",
    "date": "2025-05-02",
    "jobTitle": "Logo Design",
    "clientName": "Other Client",
    "amount": 500
  }
]"#;

const EXPENSES_JSON: &str = r#"[
  {
    "_id": "exp-1",
    "date": "2025-04-12",
    "title": "Hosting",
    "amount": 40,
    "category": "Software",
    "isTaxDeductible": true
  }
]"#;

const COLLABORATIONS_JSON: &str = r#"[
  {
    "_id": "col-1",
    "name": "Studio",
    "description": "Design partnership",
    "members": [
      { "user": "alice@example.com", "role": "admin", "sharePercentage": 60 },
      { "user": { "_id": "u-2", "firstName": "Bob", "lastName": "Builder" }, "sharePercentage": 40 }
    ]
  },
  {
    "_id": "col-2",
    "name": "Side Project",
    "members": [
      { "user": "carol@example.com", "sharePercentage": 60 }
    ]
  }
]"#;

/// Initialize a config directory and fill it with fixture data
fn setup_config() -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("payshare-config");

    payshare_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    let data = config_path.join("data");
    fs::write(data.join("income.json"), INCOME_JSON).unwrap();
    fs::write(data.join("expenses.json"), EXPENSES_JSON).unwrap();
    fs::write(data.join("collaborations.json"), COLLABORATIONS_JSON).unwrap();

    (temp_dir, config_path)
}

fn cfg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_help() {
    payshare_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Freelancer income and expense reports",
        ));
}

#[test]
fn test_version() {
    payshare_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("payshare"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("payshare-config");

    payshare_cmd()
        .args(["-C", cfg(&config_path), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized payshare config"));

    // Check files were created
    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("data/income.json").exists());
    assert!(config_path.join("data/expenses.json").exists());
    assert!(config_path.join("data/collaborations.json").exists());
    assert!(config_path.join("output").is_dir());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("payshare-config");

    // First init should succeed
    payshare_cmd()
        .args(["-C", cfg(&config_path), "init"])
        .assert()
        .success();

    // Second init should fail
    payshare_cmd()
        .args(["-C", cfg(&config_path), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_summary_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    payshare_cmd()
        .args(["-C", cfg(&config_path), "summary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_summary_for_month() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "summary", "--month", "2025-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary for April 2025"))
        .stdout(predicate::str::contains("Total income:    $100.00"))
        .stdout(predicate::str::contains("Total expenses:  $40.00"))
        .stdout(predicate::str::contains("Net profit:      $60.00"))
        .stdout(predicate::str::contains("Profit sharing: Studio"))
        .stdout(predicate::str::contains("$36.00"))
        .stdout(predicate::str::contains("$24.00"))
        .stdout(predicate::str::contains("Bob Builder"));
}

#[test]
fn test_summary_for_year_groups_thousands() {
    let (_temp_dir, config_path) = setup_config();
    let data = config_path.join("data");
    fs::write(
        data.join("income.json"),
        r#"[{"_id": "big", "date": "2025-06-01", "jobTitle": "Retainer", "amount": 12500}]"#,
    )
    .unwrap();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "summary", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary for 2025"))
        .stdout(predicate::str::contains("$12,500.00"))
        .stdout(predicate::str::contains("$12,460.00"));
}

#[test]
fn test_summary_groups_very_large_amounts() {
    let (_temp_dir, config_path) = setup_config();
    fs::write(
        config_path.join("data/income.json"),
        r#"[{"_id": "huge", "date": "2025-04-01", "jobTitle": "Windfall", "amount": 1e20}]"#,
    )
    .unwrap();
    fs::write(config_path.join("data/expenses.json"), "[]").unwrap();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "summary", "--month", "2025-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Total income:    $100,000,000,000,000,000,000.00",
        ));
}

#[test]
fn test_summary_without_profit() {
    let (_temp_dir, config_path) = setup_config();

    // Nothing is recorded in June
    payshare_cmd()
        .args(["-C", cfg(&config_path), "summary", "--month", "2025-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Net profit:      $0.00"))
        .stdout(predicate::str::contains("No net profit to distribute"));
}

#[test]
fn test_summary_rejects_invalid_month() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "summary", "--month", "2025-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid period"));
}

#[test]
fn test_summary_rejects_negative_amount() {
    let (_temp_dir, config_path) = setup_config();
    fs::write(
        config_path.join("data/expenses.json"),
        r#"[{"_id": "bad", "date": "2025-04-01", "title": "Refund", "amount": -5}]"#,
    )
    .unwrap();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "summary", "--month", "2025-04"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be negative"));
}

#[test]
fn test_period_flags_conflict() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args([
            "-C",
            cfg(&config_path),
            "summary",
            "--month",
            "2025-04",
            "--year",
            "2025",
        ])
        .assert()
        .failure();
}

#[test]
fn test_report_text() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args([
            "-C",
            cfg(&config_path),
            "report",
            "--text",
            "--month",
            "2025-04",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Generated Income_Expense_Report_April_2025.txt",
        ))
        .stdout(predicate::str::contains("Income:     1 entries"));

    let report_path = config_path.join("output/Income_Expense_Report_April_2025.txt");
    assert!(report_path.exists());

    let content = fs::read_to_string(&report_path).unwrap();
    assert!(content.contains("Income & Expense Report"));
    assert!(content.contains("April 2025"));
    assert!(content.contains("Website Development"));
    assert!(!content.contains("Logo Design"));
    assert!(content.contains("Total Income: $100.00"));
    assert!(content.contains("Total Expenses: $40.00"));
    assert!(content.contains("Net Profit: $60.00"));
    assert!(content.contains("Studio (Design partnership)"));
    assert!(content.contains("36.00"));
    assert!(content.contains("24.00"));
    assert!(content.contains("Page 1 of 1"));
}

#[test]
fn test_report_custom_output() {
    let (temp_dir, config_path) = setup_config();
    let output = temp_dir.path().join("custom.txt");

    payshare_cmd()
        .args([
            "-C",
            cfg(&config_path),
            "report",
            "--text",
            "--quarter",
            "2025-Q2",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("Q2 2025"));
    // Both April and May entries fall in the quarter
    assert!(content.contains("Logo Design"));
    assert!(content.contains("Net Profit: $560.00"));
}

#[test]
fn test_report_format_from_config() {
    let (_temp_dir, config_path) = setup_config();
    let config = fs::read_to_string(config_path.join("config.toml")).unwrap();
    fs::write(
        config_path.join("config.toml"),
        config.replace(r#"format = "pdf""#, r#"format = "text""#),
    )
    .unwrap();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "report", "--month", "2025-04"])
        .assert()
        .success();

    assert!(config_path
        .join("output/Income_Expense_Report_April_2025.txt")
        .exists());
}

#[test]
fn test_remote_without_backend() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "summary", "--remote"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No backend configured"));
}

#[test]
fn test_csv_export() {
    let (temp_dir, config_path) = setup_config();
    let output = temp_dir.path().join("export.csv");

    payshare_cmd()
        .args([
            "-C",
            cfg(&config_path),
            "csv",
            "--month",
            "2025-04",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 rows for April 2025"));

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Date,Type,Category,Description,Amount,Status");
    assert_eq!(
        lines[1],
        "2025-04-10,Income,Development,Website Development,100.00,paid"
    );
    assert_eq!(lines[2], "2025-04-12,Expense,Software,Hosting,-40.00,paid");
}

#[test]
fn test_csv_default_file_name() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "csv", "--month", "2025-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("income_report_"));

    let exported = fs::read_dir(config_path.join("output"))
        .unwrap()
        .filter_map(|e| e.ok())
        .any(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            name.starts_with("income_report_") && name.ends_with(".csv")
        });
    assert!(exported);
}

#[test]
fn test_period_set_and_show() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "period", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No report period set"));

    payshare_cmd()
        .args(["-C", cfg(&config_path), "period", "set", "--month", "2025-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report period set to April 2025"));

    payshare_cmd()
        .args(["-C", cfg(&config_path), "period", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Report period: April 2025 (2025-04-01 to 2025-04-30)",
        ));

    // Commands without period flags use the remembered period
    payshare_cmd()
        .args(["-C", cfg(&config_path), "report", "--text"])
        .assert()
        .success();

    assert!(config_path
        .join("output/Income_Expense_Report_April_2025.txt")
        .exists());
}

#[test]
fn test_period_set_custom_range() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args([
            "-C",
            cfg(&config_path),
            "period",
            "set",
            "--from",
            "2025-04-01",
            "--to",
            "2025-05-15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-04-01 to 2025-05-15"));

    payshare_cmd()
        .args(["-C", cfg(&config_path), "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total income:    $600.00"));
}

#[test]
fn test_period_set_requires_a_flag() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "period", "set"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid period"));
}

#[test]
fn test_shares_lists_members() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "shares", "studio"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Collaboration: Studio"))
        .stdout(predicate::str::contains("alice@example.com"))
        .stdout(predicate::str::contains("Total share: 100%"));
}

#[test]
fn test_shares_add_over_limit_fails() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args([
            "-C",
            cfg(&config_path),
            "shares",
            "col-1",
            "--add",
            "dave@example.com:10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot exceed 100%"));

    // Rejected member is not saved
    let saved = fs::read_to_string(config_path.join("data/collaborations.json")).unwrap();
    assert!(!saved.contains("dave@example.com"));
}

#[test]
fn test_shares_add_under_allocated_warns() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args([
            "-C",
            cfg(&config_path),
            "shares",
            "Side Project",
            "--add",
            "dave@example.com:30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added dave@example.com with 30% share"))
        .stdout(predicate::str::contains(
            "Warning: Total share is 90% (should equal 100%)",
        ));

    let saved = fs::read_to_string(config_path.join("data/collaborations.json")).unwrap();
    assert!(saved.contains("dave@example.com"));
}

#[test]
fn test_shares_add_invalid_input() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "shares", "studio", "--add", "dave"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("user:percentage"));
}

#[test]
fn test_shares_unknown_collaboration() {
    let (_temp_dir, config_path) = setup_config();

    payshare_cmd()
        .args(["-C", cfg(&config_path), "shares", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Collaboration 'nope' not found"));
}

#[test]
fn test_template_output() {
    payshare_cmd()
        .args(["template", "income"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Work Date,Date,Job Title,Client Name,Bill Amount",
        ));

    payshare_cmd()
        .args(["template", "expense"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Work Date,Date,Title,Vendor,Amount"));
}

#[test]
fn test_import_template_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("payshare-config");
    payshare_cmd()
        .args(["-C", cfg(&config_path), "init"])
        .assert()
        .success();

    let template = payshare_cmd()
        .args(["template", "income"])
        .output()
        .unwrap()
        .stdout;
    let csv_path = temp_dir.path().join("income.csv");
    fs::write(&csv_path, template).unwrap();

    payshare_cmd()
        .args([
            "-C",
            cfg(&config_path),
            "import",
            "income",
            csv_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 income entries"));

    payshare_cmd()
        .args(["-C", cfg(&config_path), "summary", "--month", "2025-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total income:    $202.50"));
}

#[test]
fn test_import_reports_bad_row() {
    let (temp_dir, config_path) = setup_config();
    let csv_path = temp_dir.path().join("expenses.csv");
    fs::write(
        &csv_path,
        "Work Date,Date,Title,Vendor,Amount\n,2025-04-01,Paper,Staples,12\n,2025-04-02,Ink,Staples,lots\n",
    )
    .unwrap();

    payshare_cmd()
        .args([
            "-C",
            cfg(&config_path),
            "import",
            "expense",
            csv_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row 2"))
        .stderr(predicate::str::contains("'lots' is not a number"));

    // Nothing is written when any row fails
    let saved = fs::read_to_string(config_path.join("data/expenses.json")).unwrap();
    assert!(!saved.contains("Paper"));
}
