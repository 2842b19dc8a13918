mod history;
mod normalize;

pub use history::{AttendanceHistory, HistoryRow, MonthlyTotals};
pub use normalize::{
    normalize, normalize_path, normalize_reader, AttendanceRow, RawTable, REQUIRED_COLUMNS,
};

use rust_decimal::prelude::ToPrimitive;

use crate::chart::{ChartData, ChartKind};

/// Rows for one employee, matched on the exact (trimmed, case-insensitive) name
pub fn filter_employee<'a>(rows: &'a [AttendanceRow], employee: &str) -> Vec<&'a AttendanceRow> {
    let wanted = employee.trim().to_lowercase();
    rows.iter()
        .filter(|r| r.employee_name.to_lowercase() == wanted)
        .collect()
}

/// Distinct employee names in first-seen order
pub fn employees(rows: &[AttendanceRow]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for row in rows {
        if !names.contains(&row.employee_name.as_str()) {
            names.push(&row.employee_name);
        }
    }
    names
}

pub fn days_worked_chart(rows: &[AttendanceRow]) -> ChartData {
    ChartData::new(
        ChartKind::GroupedBar,
        "Days Worked per Employee",
        rows.iter().map(|r| r.employee_name.clone()).collect(),
    )
    .axis_labels("Employee Name", "Days Worked")
    .with_series(
        "Days Worked",
        rows.iter()
            .map(|r| r.days_worked.to_f64().unwrap_or(0.0))
            .collect(),
    )
}

pub fn net_payment_chart(rows: &[AttendanceRow]) -> ChartData {
    ChartData::new(
        ChartKind::Line,
        "Net Payment per Employee",
        rows.iter().map(|r| r.employee_name.clone()).collect(),
    )
    .axis_labels("Employee Name", "Net Payment")
    .with_series(
        "Net Payment",
        rows.iter()
            .map(|r| r.net_payment.to_f64().unwrap_or(0.0))
            .collect(),
    )
}
