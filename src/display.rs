use std::io::Write;

use rust_decimal::Decimal;
use tabled::{settings::Style, Table, Tabled};

use crate::attendance::AttendanceRow;
use crate::error::Result;
use crate::profit::{ProfitLedger, ProfitRecord};
use crate::report::{format_amount, format_money};

pub const FORMULA: &str =
    "Profit = Income - (Gross Salary - Deductions) - EMI - Office Expenses";

// Table row structs for tabled
#[derive(Tabled)]
struct LedgerRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "MONTH")]
    month: String,
    #[tabled(rename = "INCOME")]
    income: String,
    #[tabled(rename = "GROSS SALARY")]
    gross_salary: String,
    #[tabled(rename = "DEDUCTIONS")]
    deductions: String,
    #[tabled(rename = "EMI")]
    emi: String,
    #[tabled(rename = "OFFICE EXPENSES")]
    office_expenses: String,
    #[tabled(rename = "NET SALARY")]
    net_salary: String,
    #[tabled(rename = "PROFIT")]
    profit: String,
}

#[derive(Tabled)]
struct AttendanceTableRow {
    #[tabled(rename = "EMPLOYEE NAME")]
    employee_name: String,
    #[tabled(rename = "DAYS WORKED")]
    days_worked: String,
    #[tabled(rename = "TOTAL EARNINGS")]
    total_earnings: String,
    #[tabled(rename = "NET PAYMENT")]
    net_payment: String,
}

/// Feedback shown after a calculation
pub fn write_calculation<W: Write>(out: &mut W, record: &ProfitRecord, symbol: &str) -> Result<()> {
    writeln!(out, "Net Salary: {}", format_money(record.net_salary(), symbol))?;
    writeln!(
        out,
        "Predicted Profit for {}: {}",
        record.month(),
        format_money(record.profit(), symbol)
    )?;
    writeln!(out, "Formula Used: {FORMULA}")?;
    Ok(())
}

/// Monthly summary table followed by the column totals
pub fn write_overview<W: Write>(out: &mut W, ledger: &ProfitLedger, symbol: &str) -> Result<()> {
    if ledger.is_empty() {
        writeln!(
            out,
            "No data available yet. Please use the Profit Calculator first."
        )?;
        return Ok(());
    }

    let rows: Vec<LedgerRow> = ledger
        .all()
        .iter()
        .enumerate()
        .map(|(idx, r)| LedgerRow {
            index: idx + 1,
            month: r.month().to_string(),
            income: format_amount(r.income()),
            gross_salary: format_amount(r.gross_salary()),
            deductions: format_amount(r.deductions()),
            emi: format_amount(r.emi()),
            office_expenses: format_amount(r.office_expenses()),
            net_salary: format_amount(r.net_salary()),
            profit: format_amount(r.profit()),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    writeln!(out, "Monthly Summary Table")?;
    writeln!(out, "{table}")?;

    let totals = ledger.totals();
    writeln!(out)?;
    writeln!(out, "Income:     {}", format_money(totals.income, symbol))?;
    writeln!(out, "Net Salary: {}", format_money(totals.net_salary, symbol))?;
    writeln!(out, "Profit:     {}", format_money(totals.profit, symbol))?;
    writeln!(out, "Total: {} calculation(s)", ledger.len())?;
    Ok(())
}

fn plain(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn attendance_table<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = &'a AttendanceRow>,
{
    let rows: Vec<AttendanceTableRow> = rows
        .into_iter()
        .map(|r| AttendanceTableRow {
            employee_name: r.employee_name.clone(),
            days_worked: plain(r.days_worked),
            total_earnings: r.total_earnings.map(format_amount).unwrap_or_default(),
            net_payment: format_amount(r.net_payment),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Summary table plus per-employee totals for an attendance upload
pub fn write_attendance<W: Write>(
    out: &mut W,
    month_context: &str,
    rows: &[AttendanceRow],
    symbol: &str,
) -> Result<()> {
    writeln!(out, "Summary Table - {month_context}")?;
    if rows.is_empty() {
        writeln!(out, "No employee rows left after cleaning.")?;
        return Ok(());
    }
    writeln!(out, "{}", attendance_table(rows))?;

    let days: Decimal = rows.iter().map(|r| r.days_worked).sum();
    let net: Decimal = rows.iter().map(|r| r.net_payment).sum();
    writeln!(out, "Employees:   {}", crate::attendance::employees(rows).len())?;
    writeln!(out, "Days Worked: {}", plain(days))?;
    writeln!(out, "Net Payment: {}", format_money(net, symbol))?;
    Ok(())
}
