mod calculator;
mod form;
mod ledger;
mod month;

pub use calculator::{compute, ProfitRecord};
pub use form::{parse_amount, ProfitForm, FORM_FIELDS};
pub use ledger::{LedgerTotals, ProfitLedger, LEDGER_COLUMNS};
pub use month::Month;
