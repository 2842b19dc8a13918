use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use assert_cmd::Command;
use tempfile::TempDir;

fn dashboard_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("dashboard"))
}

const FORM_B: &str = "\
Sl No, Name ,No of Days Worked,Basic,Total,Net Payment
1,Asha,22,15000,20000,abc
2,Bala,,14000,18000,15000
3,Chitra,24,16000,21000,19500
4,Dev,20,12000,16000,14200
,,,,,
,TOTAL,66,57000,75000,48700
";

fn calc_args<'a>(config_path: &'a str, month: &'a str) -> Vec<&'a str> {
    vec![
        "-C",
        config_path,
        "calc",
        "--month",
        month,
        "--income",
        "100000",
        "--gross-salary",
        "40000",
        "--deductions",
        "2000",
        "--emi",
        "5000",
        "--office-expenses",
        "3000",
    ]
}

#[test]
fn test_help() {
    dashboard_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly business dashboard"));
}

#[test]
fn test_version() {
    dashboard_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");

    dashboard_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized dashboard config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("output").is_dir());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");

    // First init should succeed
    dashboard_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    // Second init should fail
    dashboard_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    dashboard_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard Status"))
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains("Monthly Profit & Attendance Report"));
}

#[test]
fn test_status_reads_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    fs::create_dir_all(&config_path).unwrap();
    fs::write(
        config_path.join("config.toml"),
        "[display]\ncurrency_symbol = \"Rs.\"\n[report]\ntitle = \"Branch Report\"\n",
    )
    .unwrap();

    dashboard_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Branch Report"))
        .stdout(predicate::str::contains("Rs."));
}

#[test]
fn test_status_with_empty_config_tables() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    fs::create_dir_all(&config_path).unwrap();
    fs::write(config_path.join("config.toml"), "[display]\n\n[attendance]\n").unwrap();

    dashboard_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Currency:         ₹"))
        .stdout(predicate::str::contains("data/attendance_cleaned.csv"));
}

#[test]
fn test_broken_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    fs::create_dir_all(&config_path).unwrap();
    fs::write(config_path.join("config.toml"), "[report\ntitle = 1").unwrap();

    dashboard_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_calc_prints_net_salary_and_profit() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    let config_str = config_path.to_str().unwrap();

    dashboard_cmd()
        .args(calc_args(config_str, "January"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Net Salary: ₹38,000.00"))
        .stdout(predicate::str::contains(
            "Predicted Profit for January: ₹54,000.00",
        ))
        .stdout(predicate::str::contains("Formula Used:"));
}

#[test]
fn test_calc_accepts_month_in_any_case() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");

    dashboard_cmd()
        .args(calc_args(config_path.to_str().unwrap(), "march"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Predicted Profit for March"));
}

#[test]
fn test_calc_invalid_month() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");

    dashboard_cmd()
        .args(calc_args(config_path.to_str().unwrap(), "Smarch"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown month 'Smarch'"));
}

#[test]
fn test_calc_rejects_negative_amount() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    let config_str = config_path.to_str().unwrap();

    let mut args = calc_args(config_str, "January");
    let idx = args.iter().position(|a| *a == "5000").unwrap();
    args[idx] = "-5000";

    dashboard_cmd()
        .args(args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount '-5000' for EMI"))
        .stderr(predicate::str::contains("must not be negative"));
}

#[test]
fn test_calc_rejects_non_numeric_amount() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    let config_str = config_path.to_str().unwrap();

    let mut args = calc_args(config_str, "January");
    let idx = args.iter().position(|a| *a == "100000").unwrap();
    args[idx] = "lots";

    dashboard_cmd()
        .args(args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a number"));
}

#[test]
fn test_calc_export_writes_ledger_csv() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    let out_dir = temp_dir.path().join("out");
    let config_str = config_path.to_str().unwrap();

    let mut args = calc_args(config_str, "January");
    args.extend(["--export", "-o", out_dir.to_str().unwrap()]);

    dashboard_cmd()
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("monthly_profit_log.csv"));

    let csv = fs::read_to_string(out_dir.join("monthly_profit_log.csv")).unwrap();
    assert_eq!(
        csv,
        "Month,Income,Gross Salary,Deductions,EMI,Office Expenses,Net Salary,Profit\n\
         January,100000,40000,2000,5000,3000,38000,54000\n"
    );
}

#[test]
fn test_calc_report_without_typst_fails_cleanly() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    fs::create_dir_all(&config_path).unwrap();
    let work_dir = temp_dir.path().join("work");
    fs::write(
        config_path.join("config.toml"),
        format!(
            "[report]\ntypst = \"no-such-typst-binary\"\nwork_dir = \"{}\"\n",
            work_dir.display()
        ),
    )
    .unwrap();

    let config_str = config_path.to_str().unwrap();
    let mut args = calc_args(config_str, "January");
    args.push("--report");

    dashboard_cmd()
        .args(args)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Net Salary"))
        .stderr(predicate::str::contains("Typst not found"));

    // The profit chart was staged before the renderer ran
    assert!(work_dir.join("profit_plot.svg").exists());
}

#[test]
fn test_attendance_summary_table() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    let csv_path = temp_dir.path().join("form_b.csv");
    fs::write(&csv_path, FORM_B).unwrap();

    dashboard_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "attendance",
            "--month",
            "February",
            "--file",
            csv_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary Table - February"))
        .stdout(predicate::str::contains("Chitra"))
        .stdout(predicate::str::contains("Dev"))
        .stdout(predicate::str::contains("Asha").not())
        .stdout(predicate::str::contains("Bala").not())
        .stdout(predicate::str::contains("48,700").not())
        .stdout(predicate::str::contains("Employees:   2"))
        .stdout(predicate::str::contains("Net Payment: ₹33,700.00"));
}

#[test]
fn test_attendance_filter_by_employee() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    let csv_path = temp_dir.path().join("form_b.csv");
    fs::write(&csv_path, FORM_B).unwrap();

    dashboard_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "attendance",
            "-m",
            "February",
            "-f",
            csv_path.to_str().unwrap(),
            "--employee",
            "chitra",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chitra"))
        .stdout(predicate::str::contains("Dev").not());
}

#[test]
fn test_attendance_missing_columns() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    let csv_path = temp_dir.path().join("bad.csv");
    fs::write(&csv_path, "Name,Total\nAsha,20000\n").unwrap();

    dashboard_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "attendance",
            "--month",
            "February",
            "--file",
            csv_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Missing column(s): no of days worked, net payment",
        ));
}

#[test]
fn test_attendance_unreadable_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    let csv_path = temp_dir.path().join("binary.csv");
    fs::write(&csv_path, [0xff, 0xfe, 0x00, 0x41, b'\n', 0xc3, 0x28]).unwrap();

    dashboard_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "attendance",
            "--month",
            "February",
            "--file",
            csv_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error reading file"));
}

#[test]
fn test_attendance_writes_charts() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    let csv_path = temp_dir.path().join("form_b.csv");
    let charts_dir = temp_dir.path().join("charts");
    fs::write(&csv_path, FORM_B).unwrap();

    dashboard_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "attendance",
            "--month",
            "February",
            "--file",
            csv_path.to_str().unwrap(),
            "--charts-dir",
            charts_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let days = fs::read_to_string(charts_dir.join("days_worked.svg")).unwrap();
    assert!(days.starts_with("<svg"));
    assert!(days.contains("Days Worked per Employee"));
    assert!(charts_dir.join("net_payment.svg").exists());
}

#[test]
fn test_session_keeps_duplicate_months() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    let export = temp_dir.path().join("log.csv");

    let script = format!(
        "calc January 100000 40000 2000 5000 3000\n\
         calc January 90000 40000 2000 5000 3000\n\
         overview\n\
         export {}\n\
         quit\n",
        export.display()
    );

    dashboard_cmd()
        .args(["-C", config_path.to_str().unwrap(), "session"])
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly Summary Table"))
        .stdout(predicate::str::contains("Total: 2 calculation(s)"))
        .stdout(predicate::str::contains("Profit:     ₹98,000.00"));

    let csv = fs::read_to_string(&export).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("January,100000,"));
    assert!(lines[2].starts_with("January,90000,"));
}

#[test]
fn test_session_errors_do_not_end_session() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");

    dashboard_cmd()
        .args(["-C", config_path.to_str().unwrap(), "session"])
        .write_stdin(
            "calc Smarch 1 2 3 4 5\n\
             frobnicate\n\
             calc February 50000 20000 1000 0 0\n\
             overview\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Unknown month 'Smarch'"))
        .stdout(predicate::str::contains("Error: Unknown command 'frobnicate'"))
        .stdout(predicate::str::contains("Total: 1 calculation(s)"));
}

#[test]
fn test_session_report_before_any_calculation() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dashboard-config");
    let export = temp_dir.path().join("log.csv");

    dashboard_cmd()
        .args(["-C", config_path.to_str().unwrap(), "session"])
        .write_stdin(format!(
            "report\noverview\nexport {}\nquit\n",
            export.display()
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No data available yet. Please use the Profit Calculator first.",
        ))
        .stdout(predicate::str::contains("Saved").not());

    assert!(!export.exists());
}
