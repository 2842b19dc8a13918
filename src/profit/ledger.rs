use std::io::Write;

use rust_decimal::Decimal;

use super::ProfitRecord;
use crate::error::{DashboardError, Result};

/// Column order of the ledger export
pub const LEDGER_COLUMNS: [&str; 8] = [
    "Month",
    "Income",
    "Gross Salary",
    "Deductions",
    "EMI",
    "Office Expenses",
    "Net Salary",
    "Profit",
];

/// Append-only history of profit calculations for one session.
///
/// Records keep insertion order; calculating the same month twice yields two
/// entries. There is no way to remove or edit a record.
#[derive(Debug, Default)]
pub struct ProfitLedger {
    records: Vec<ProfitRecord>,
}

/// Column totals across the whole ledger
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerTotals {
    pub income: Decimal,
    pub net_salary: Decimal,
    pub profit: Decimal,
}

impl ProfitLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ProfitRecord) {
        log::debug!(
            "ledger append #{}: {} profit={}",
            self.records.len() + 1,
            record.month(),
            record.profit()
        );
        self.records.push(record);
    }

    pub fn all(&self) -> &[ProfitRecord] {
        &self.records
    }

    pub fn latest(&self) -> Result<&ProfitRecord> {
        self.records.last().ok_or(DashboardError::EmptyLedger)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn totals(&self) -> LedgerTotals {
        self.records
            .iter()
            .fold(LedgerTotals::default(), |acc, r| LedgerTotals {
                income: acc.income + r.income(),
                net_salary: acc.net_salary + r.net_salary(),
                profit: acc.profit + r.profit(),
            })
    }

    /// Write the ledger as a flat CSV table, one row per record.
    /// The header row is written even when the ledger is empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(LEDGER_COLUMNS)?;
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}
