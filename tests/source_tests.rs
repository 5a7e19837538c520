use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;

use payshare::config::{load_config, PeriodStore, TomlPeriodStore, CONFIG_TEMPLATE};
use payshare::models::{
    Collaboration, ExpenseEntry, IncomeEntry, Member, PeriodSelection, Role, UserRef,
};
use payshare::report::ReportFormat;
use payshare::source::{load_inputs, EntrySource, HttpSource, JsonDirSource};
use payshare::LedgerError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_missing_files_mean_no_entries() {
    let temp_dir = TempDir::new().unwrap();
    let source = JsonDirSource::new(temp_dir.path());
    let period = PeriodSelection::Yearly { year: 2025 }.period().unwrap();

    let inputs = load_inputs(&source, &period).unwrap();
    assert!(inputs.income.is_empty());
    assert!(inputs.expenses.is_empty());
    assert!(inputs.collaborations.is_empty());
    assert_eq!(source.overview(&period).unwrap(), None);
}

#[test]
fn test_backend_shapes_deserialize() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("income.json"),
        r#"[
          {"_id": "a", "date": "2025-04-30T23:59:59.000Z", "workDate": "", "jobTitle": "Late", "amount": 1},
          {"_id": "b", "date": "2025-05-01T00:00:00.000Z", "jobTitle": "Next month", "amount": 2}
        ]"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("collaborations.json"),
        r#"[{
          "_id": "c",
          "name": "Team",
          "owner": {"_id": "u1", "firstName": "Ana", "lastName": "Lima", "email": "ana@example.com"},
          "members": [{"user": {"_id": "u1", "firstName": "Ana", "lastName": "Lima"}, "role": "admin", "sharePercentage": 100, "status": "active"}],
          "settings": {"visibility": "invite-only"}
        }]"#,
    )
    .unwrap();

    let source = JsonDirSource::new(temp_dir.path());
    let april = PeriodSelection::parse_month("2025-04").unwrap().period().unwrap();

    let income = source.income(&april).unwrap();
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].id, "a");
    assert_eq!(income[0].work_date, None);
    assert_eq!(income[0].currency, "USD");

    let collaborations = source.collaborations().unwrap();
    let member = &collaborations[0].members[0];
    assert_eq!(member.display_name(), "Ana Lima");
    assert_eq!(member.user.id(), "u1");
    assert_eq!(member.role, Role::Admin);
    assert!(collaborations[0].settings.allow_income_sharing);
    assert!(matches!(collaborations[0].owner, Some(UserRef::Profile(_))));
}

#[test]
fn test_malformed_data_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("expenses.json"), "{ not json").unwrap();

    let source = JsonDirSource::new(temp_dir.path());
    let err = source.all_expenses().unwrap_err();
    assert!(matches!(err, LedgerError::DataParse { .. }));
    assert!(err.to_string().contains("expenses.json"));
}

#[test]
fn test_overview_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("overview.json"),
        r#"{"totalIncome": 100, "totalExpenses": 40, "netProfit": 60}"#,
    )
    .unwrap();

    let source = JsonDirSource::new(temp_dir.path());
    let period = PeriodSelection::Yearly { year: 2025 }.period().unwrap();
    let overview = source.overview(&period).unwrap().unwrap();
    assert_eq!(overview.net_profit, 60.0);
}

#[test]
fn test_append_numbers_entries() {
    let temp_dir = TempDir::new().unwrap();
    let source = JsonDirSource::new(temp_dir.path().join("data"));

    let first = vec![IncomeEntry::new("x", date(2025, 4, 1), "One", "C", 10.0)];
    assert_eq!(source.append_income(first).unwrap(), 1);
    let second = vec![
        IncomeEntry::new("x", date(2025, 4, 2), "Two", "C", 20.0),
        IncomeEntry::new("x", date(2025, 4, 3), "Three", "C", 30.0),
    ];
    assert_eq!(source.append_income(second).unwrap(), 2);

    let ids: Vec<String> = source.all_income().unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, ["income-1", "income-2", "income-3"]);

    let expenses = vec![ExpenseEntry::new("x", date(2025, 4, 1), "Paper", 5.0)];
    source.append_expenses(expenses).unwrap();
    assert_eq!(source.all_expenses().unwrap()[0].id, "expense-1");
}

#[test]
fn test_append_rejects_invalid_entry() {
    let temp_dir = TempDir::new().unwrap();
    let source = JsonDirSource::new(temp_dir.path());

    let bad = vec![IncomeEntry::new("x", date(2025, 4, 1), "Bad", "C", -1.0)];
    assert!(source.append_income(bad).is_err());
    assert!(source.all_income().unwrap().is_empty());
}

#[test]
fn test_collaborations_round_trip_through_disk() {
    let temp_dir = TempDir::new().unwrap();
    let source = JsonDirSource::new(temp_dir.path());

    let mut team = Collaboration::new("c1", "Team");
    team.add_member(Member::new("ana@example.com", Role::Admin, 70.0))
        .unwrap();
    source.save_collaborations(&[team.clone()]).unwrap();

    assert_eq!(source.collaborations().unwrap(), vec![team]);
}

#[test]
fn test_period_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = TomlPeriodStore::new(temp_dir.path());

    assert_eq!(store.load_period().unwrap(), None);

    let quarter = PeriodSelection::parse_quarter("2025-Q2").unwrap();
    store.save_period(quarter).unwrap();
    assert_eq!(store.load_period().unwrap(), Some(quarter));

    let custom = PeriodSelection::custom(date(2025, 1, 15), date(2025, 2, 14)).unwrap();
    store.save_period(custom).unwrap();
    assert_eq!(store.load_period().unwrap(), Some(custom));
}

#[test]
fn test_period_ranges() {
    let april = PeriodSelection::parse_month("2025-04").unwrap().period().unwrap();
    assert_eq!(april.start(), date(2025, 4, 1));
    assert_eq!(april.last_day(), date(2025, 4, 30));
    assert!(april.contains(date(2025, 4, 30)));
    assert!(!april.contains(date(2025, 5, 1)));
    assert_eq!(april.label(), "April 2025");

    let december = PeriodSelection::parse_month("2024-12").unwrap().period().unwrap();
    assert_eq!(december.end(), date(2025, 1, 1));

    let q4 = PeriodSelection::parse_quarter("2025-q4").unwrap().period().unwrap();
    assert_eq!(q4.start(), date(2025, 10, 1));
    assert_eq!(q4.months().len(), 3);
    assert_eq!(q4.file_label(), "Q4_2025");

    let custom = PeriodSelection::custom(date(2025, 3, 30), date(2025, 4, 2))
        .unwrap()
        .period()
        .unwrap();
    assert!(custom.contains(date(2025, 4, 2)));
    assert_eq!(custom.months(), vec![(2025, 3), (2025, 4)]);
    assert_eq!(custom.label(), "2025-03-30 to 2025-04-02");
}

#[test]
fn test_invalid_periods() {
    assert!(PeriodSelection::parse_month("2025-00").is_err());
    assert!(PeriodSelection::parse_month("April").is_err());
    assert!(PeriodSelection::parse_quarter("2025-Q5").is_err());
    assert!(PeriodSelection::custom(date(2025, 5, 1), date(2025, 4, 1)).is_err());
}

#[test]
fn test_config_template_loads() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.toml"), CONFIG_TEMPLATE).unwrap();

    let config = load_config(temp_dir.path()).unwrap();
    assert_eq!(config.report.currency_symbol, "$");
    assert_eq!(config.export.format, ReportFormat::Pdf);
    assert_eq!(config.backend.base_url, None);
    assert_eq!(config.backend.timeout_secs, 10);

    let options = config.report_options(date(2025, 4, 30));
    assert_eq!(options.title, "Income & Expense Report");
    assert_eq!(options.geometry.width, 210.0);
}

#[test]
fn test_http_source_requires_base_url() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.toml"), CONFIG_TEMPLATE).unwrap();
    let config = load_config(temp_dir.path()).unwrap();

    assert!(matches!(
        HttpSource::from_settings(&config.backend),
        Err(LedgerError::NoBackend)
    ));
}

#[test]
fn test_append_continues_after_highest_id() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("income.json"),
        r#"[
          {"id": "income-2", "date": "2025-04-02", "jobTitle": "Kept", "amount": 1},
          {"id": "inc-99", "date": "2025-04-03", "jobTitle": "Backend id", "amount": 1}
        ]"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("expenses.json"),
        r#"[{"id": "expense-7", "date": "2025-04-02", "title": "Kept", "amount": 1}]"#,
    )
    .unwrap();
    let source = JsonDirSource::new(temp_dir.path());

    let incoming = vec![
        IncomeEntry::new("import-1", date(2025, 4, 4), "New", "C", 5.0),
        IncomeEntry::new("import-2", date(2025, 4, 5), "Newer", "C", 6.0),
    ];
    source.append_income(incoming).unwrap();
    let ids: Vec<String> = source.all_income().unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, ["income-2", "inc-99", "income-3", "income-4"]);

    let incoming = vec![ExpenseEntry::new("import-1", date(2025, 4, 4), "Ink", 2.0)];
    source.append_expenses(incoming).unwrap();
    let ids: Vec<String> = source.all_expenses().unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, ["expense-7", "expense-8"]);
}
