use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{DashboardError, Result};

/// Source columns every attendance upload must carry, after trimming and
/// lowercasing the header row.
pub const REQUIRED_COLUMNS: [&str; 4] = ["name", "no of days worked", "total", "net payment"];

/// An uploaded table exactly as read: header row plus string cells.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// One employee line of a validated attendance upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRow {
    #[serde(rename = "Employee Name")]
    pub employee_name: String,
    #[serde(rename = "Days Worked")]
    pub days_worked: Decimal,
    /// Left empty when the source cell is not numeric; the row is still kept
    #[serde(rename = "Total Earnings")]
    pub total_earnings: Option<Decimal>,
    #[serde(rename = "Net Payment")]
    pub net_payment: Decimal,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a delimited table with a header row.
    ///
    /// Anything that keeps the content from being read as a table (bad
    /// encoding, no header, a row wider than the header) becomes
    /// [`DashboardError::FileRead`]. Short rows are padded with empty cells.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| DashboardError::FileRead(e.to_string()))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(DashboardError::FileRead(
                "No columns to parse from file".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| DashboardError::FileRead(e.to_string()))?;
            if record.len() > headers.len() {
                return Err(DashboardError::FileRead(format!(
                    "Expected {} fields in line {}, saw {}",
                    headers.len(),
                    i + 2,
                    record.len()
                )));
            }
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| DashboardError::FileRead(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(file)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Validate an uploaded table and reshape it into attendance rows.
///
/// Missing required columns fail the whole upload. Individual rows with a
/// blank name, a `total` footer name, or non-numeric days worked / net
/// payment are dropped silently. Input order is preserved.
pub fn normalize(raw: &RawTable) -> Result<Vec<AttendanceRow>> {
    let headers: Vec<String> = raw
        .headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let position = |column: &str| headers.iter().position(|h| h == column);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| position(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DashboardError::SchemaValidation { missing });
    }

    // All four are present past this point
    let [name_col, days_col, total_col, net_col] = REQUIRED_COLUMNS.map(|c| position(c).unwrap_or(0));

    let mut rows = Vec::new();
    for (i, row) in raw.rows.iter().enumerate() {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let cell = |idx: usize| row.get(idx).map(|s| s.as_str()).unwrap_or("");

        let name = cell(name_col).trim();
        if name.is_empty() || name.to_lowercase() == "total" {
            continue;
        }

        let (Some(days_worked), Some(net_payment)) =
            (parse_number(cell(days_col)), parse_number(cell(net_col)))
        else {
            log::debug!("dropping attendance row {} ({name}): non-numeric value", i + 1);
            continue;
        };

        rows.push(AttendanceRow {
            employee_name: name.to_string(),
            days_worked,
            total_earnings: parse_number(cell(total_col)),
            net_payment,
        });
    }

    log::info!(
        "normalized attendance upload: {} of {} rows kept",
        rows.len(),
        raw.rows.len()
    );
    Ok(rows)
}

/// Read and normalize in one step
pub fn normalize_reader<R: Read>(reader: R) -> Result<Vec<AttendanceRow>> {
    normalize(&RawTable::from_reader(reader)?)
}

pub fn normalize_path(path: &Path) -> Result<Vec<AttendanceRow>> {
    normalize(&RawTable::from_path(path)?)
}

fn parse_number(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_plain_and_scientific() {
        assert_eq!(parse_number(" 22 "), Some(Decimal::from(22)));
        assert_eq!(parse_number("1.5e3"), Some(Decimal::from(1500)));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("1,000"), None);
    }

    #[test]
    fn short_rows_are_padded() {
        let raw = RawTable::from_reader("a,b,c\n1\n".as_bytes()).unwrap();
        assert_eq!(raw.rows[0], vec!["1", "", ""]);
    }

    #[test]
    fn wide_rows_fail_to_read() {
        let err = RawTable::from_reader("a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::FileRead(_)));
    }
}
