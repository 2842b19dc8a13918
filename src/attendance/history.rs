use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::chart::{ChartData, ChartKind};
use crate::error::{DashboardError, Result};
use crate::profit::Month;

/// One employee-month line of the cleaned attendance export.
/// Blank or non-numeric counts read as `None`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HistoryRow {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Employee Name")]
    pub employee_name: String,
    #[serde(rename = "Present", default, deserialize_with = "csv::invalid_option")]
    pub present: Option<f64>,
    #[serde(rename = "Absent", default, deserialize_with = "csv::invalid_option")]
    pub absent: Option<f64>,
    #[serde(rename = "OT", default, deserialize_with = "csv::invalid_option")]
    pub ot: Option<f64>,
    #[serde(rename = "Total Days", default, deserialize_with = "csv::invalid_option")]
    pub total_days: Option<f64>,
}

/// Multi-month attendance data backing the report's attendance charts
#[derive(Debug, Clone, Default)]
pub struct AttendanceHistory {
    rows: Vec<HistoryRow>,
}

/// Present/Absent/OT summed over every employee of one month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotals {
    pub month: String,
    pub present: f64,
    pub absent: f64,
    pub ot: f64,
}

/// Ordering key: calendar months first, unrecognised labels after them by name
fn month_key(label: &str) -> (u32, String) {
    match Month::parse(label) {
        Ok(m) => (m.number(), String::new()),
        Err(_) => (13, label.to_string()),
    }
}

impl AttendanceHistory {
    pub fn new(rows: Vec<HistoryRow>) -> Self {
        Self { rows }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut rows = Vec::new();
        for result in rdr.deserialize() {
            let row: HistoryRow = result.map_err(|e| DashboardError::FileRead(e.to_string()))?;
            rows.push(row);
        }
        Ok(Self { rows })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load the history file if it exists and parses; `None` otherwise.
    /// The report is still produced without attendance charts in that case.
    pub fn load_optional(path: &Path) -> Option<Self> {
        if !path.exists() {
            log::info!("no attendance history at {}", path.display());
            return None;
        }
        match Self::from_path(path) {
            Ok(history) if !history.rows.is_empty() => Some(history),
            Ok(_) => {
                log::warn!("attendance history {} is empty", path.display());
                None
            }
            Err(e) => {
                log::warn!("skipping attendance history {}: {e}", path.display());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn months(&self) -> Vec<String> {
        let mut months: Vec<String> = self
            .rows
            .iter()
            .map(|r| r.month.trim().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        months.sort_by_key(|m| month_key(m));
        months
    }

    pub fn monthly_totals(&self) -> Vec<MonthlyTotals> {
        self.months()
            .into_iter()
            .map(|month| {
                let mut totals = MonthlyTotals {
                    month: month.clone(),
                    present: 0.0,
                    absent: 0.0,
                    ot: 0.0,
                };
                for row in self.rows.iter().filter(|r| r.month.trim() == month) {
                    totals.present += row.present.unwrap_or(0.0);
                    totals.absent += row.absent.unwrap_or(0.0);
                    totals.ot += row.ot.unwrap_or(0.0);
                }
                totals
            })
            .collect()
    }

    /// Mean Total Days per employee per month; months without data count as 0.
    /// Employees are returned sorted by name.
    pub fn employee_trend(&self) -> (Vec<String>, Vec<(String, Vec<f64>)>) {
        let months = self.months();
        let mut cells: BTreeMap<&str, BTreeMap<&str, (f64, usize)>> = BTreeMap::new();
        for row in &self.rows {
            let Some(days) = row.total_days else {
                continue;
            };
            let cell = cells
                .entry(row.employee_name.trim())
                .or_default()
                .entry(row.month.trim())
                .or_insert((0.0, 0));
            cell.0 += days;
            cell.1 += 1;
        }

        let series = cells
            .into_iter()
            .map(|(employee, by_month)| {
                let values = months
                    .iter()
                    .map(|m| match by_month.get(m.as_str()) {
                        Some((sum, count)) if *count > 0 => sum / *count as f64,
                        _ => 0.0,
                    })
                    .collect();
                (employee.to_string(), values)
            })
            .collect();

        (months, series)
    }

    /// Grouped bar chart of monthly Present/Absent/OT
    pub fn summary_chart(&self) -> ChartData {
        let totals = self.monthly_totals();
        ChartData::new(
            ChartKind::GroupedBar,
            "Monthly Attendance Summary",
            totals.iter().map(|t| t.month.clone()).collect(),
        )
        .axis_labels("Month", "Days")
        .with_series("Present", totals.iter().map(|t| t.present).collect())
        .with_series("Absent", totals.iter().map(|t| t.absent).collect())
        .with_series("OT", totals.iter().map(|t| t.ot).collect())
        .with_legend(true)
    }

    /// One line per employee of Total Days across months
    pub fn trend_chart(&self) -> ChartData {
        let (months, series) = self.employee_trend();
        series.into_iter().fold(
            ChartData::new(ChartKind::Line, "Employee Attendance Trend", months)
                .axis_labels("Month", "Total Days"),
            |chart, (employee, values)| chart.with_series(employee, values),
        )
    }
}
