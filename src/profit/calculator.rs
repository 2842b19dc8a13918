use rust_decimal::Decimal;
use serde::Serialize;

use super::Month;
use crate::report::{FieldValue, SummaryField};

/// One monthly profit calculation. Built only by [`compute`], never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitRecord {
    #[serde(rename = "Month")]
    month: Month,
    #[serde(rename = "Income")]
    income: Decimal,
    #[serde(rename = "Gross Salary")]
    gross_salary: Decimal,
    #[serde(rename = "Deductions")]
    deductions: Decimal,
    #[serde(rename = "EMI")]
    emi: Decimal,
    #[serde(rename = "Office Expenses")]
    office_expenses: Decimal,
    #[serde(rename = "Net Salary")]
    net_salary: Decimal,
    #[serde(rename = "Profit")]
    profit: Decimal,
}

/// Derive net salary and profit for a month.
///
/// `Net Salary = Gross Salary - Deductions` and
/// `Profit = Income - Net Salary - EMI - Office Expenses`, exact decimal
/// arithmetic with no rounding. Negative inputs are not rejected here.
pub fn compute(
    month: Month,
    income: Decimal,
    gross_salary: Decimal,
    deductions: Decimal,
    emi: Decimal,
    office_expenses: Decimal,
) -> ProfitRecord {
    let net_salary = gross_salary - deductions;
    let profit = income - net_salary - emi - office_expenses;

    ProfitRecord {
        month,
        income,
        gross_salary,
        deductions,
        emi,
        office_expenses,
        net_salary,
        profit,
    }
}

impl ProfitRecord {
    pub fn month(&self) -> Month {
        self.month
    }

    pub fn income(&self) -> Decimal {
        self.income
    }

    pub fn gross_salary(&self) -> Decimal {
        self.gross_salary
    }

    pub fn deductions(&self) -> Decimal {
        self.deductions
    }

    pub fn emi(&self) -> Decimal {
        self.emi
    }

    pub fn office_expenses(&self) -> Decimal {
        self.office_expenses
    }

    pub fn net_salary(&self) -> Decimal {
        self.net_salary
    }

    pub fn profit(&self) -> Decimal {
        self.profit
    }

    /// Key/value lines for the report title page, in ledger column order
    pub fn summary_fields(&self) -> Vec<SummaryField> {
        vec![
            SummaryField::new("Month", FieldValue::Text(self.month.to_string())),
            SummaryField::new("Income", FieldValue::Amount(self.income)),
            SummaryField::new("Gross Salary", FieldValue::Amount(self.gross_salary)),
            SummaryField::new("Deductions", FieldValue::Amount(self.deductions)),
            SummaryField::new("EMI", FieldValue::Amount(self.emi)),
            SummaryField::new("Office Expenses", FieldValue::Amount(self.office_expenses)),
            SummaryField::new("Net Salary", FieldValue::Amount(self.net_salary)),
            SummaryField::new("Profit", FieldValue::Amount(self.profit)),
        ]
    }
}
