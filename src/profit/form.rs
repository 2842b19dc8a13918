use std::str::FromStr;

use rust_decimal::Decimal;

use super::{compute, Month, ProfitRecord};
use crate::error::{DashboardError, Result};

/// Raw values of the profit calculator form, validated.
///
/// This is where the non-negative rule for inputs lives; [`compute`] itself
/// accepts any value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitForm {
    pub month: Month,
    pub income: Decimal,
    pub gross_salary: Decimal,
    pub deductions: Decimal,
    pub emi: Decimal,
    pub office_expenses: Decimal,
}

/// Field names in the order the form takes its amounts
pub const FORM_FIELDS: [&str; 5] = [
    "Income",
    "Gross Salary",
    "Deductions",
    "EMI",
    "Office Expenses",
];

impl ProfitForm {
    /// Parse a month name plus the five amounts in [`FORM_FIELDS`] order
    pub fn parse(month: &str, amounts: [&str; 5]) -> Result<Self> {
        let month = Month::parse(month)?;
        let mut parsed = [Decimal::ZERO; 5];
        for (slot, (field, raw)) in parsed.iter_mut().zip(FORM_FIELDS.iter().zip(amounts)) {
            *slot = parse_amount(field, raw)?;
        }
        let [income, gross_salary, deductions, emi, office_expenses] = parsed;

        Ok(Self {
            month,
            income,
            gross_salary,
            deductions,
            emi,
            office_expenses,
        })
    }

    pub fn submit(&self) -> ProfitRecord {
        compute(
            self.month,
            self.income,
            self.gross_salary,
            self.deductions,
            self.emi,
            self.office_expenses,
        )
    }
}

/// Parse one non-negative amount. Thousands separators are accepted.
pub fn parse_amount(field: &str, raw: &str) -> Result<Decimal> {
    let cleaned = raw.trim().replace(',', "");
    let invalid = |reason: &str| DashboardError::InvalidAmount {
        field: field.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    if cleaned.is_empty() {
        return Err(invalid("a value is required"));
    }
    let value = Decimal::from_str(&cleaned).map_err(|_| invalid("must be a number"))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid("must not be negative"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_form_in_field_order() {
        let form =
            ProfitForm::parse("march", ["100000", "40,000", "2000", "5000", "3000"]).unwrap();
        assert_eq!(form.month, Month::March);
        assert_eq!(form.gross_salary, dec!(40000));
        assert_eq!(form.office_expenses, dec!(3000));
        assert_eq!(form.submit().profit(), dec!(54000));
    }

    #[test]
    fn rejects_negative_and_garbage() {
        let err = parse_amount("EMI", "-5").unwrap_err();
        assert!(err.to_string().contains("must not be negative"));
        let err = parse_amount("EMI", "five").unwrap_err();
        assert!(err.to_string().contains("must be a number"));
        assert!(parse_amount("EMI", " ").is_err());
        assert_eq!(parse_amount("EMI", "-0").unwrap(), dec!(0));
    }
}
