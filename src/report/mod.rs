mod composer;
mod format;
mod typst;

pub use composer::{
    sanitize, Block, DocumentRenderer, FieldValue, ReportComposer, ReportDocument, SummaryField,
};
pub use format::{format_amount, format_grouped_int, format_money};
pub use typst::TypstRenderer;

/// Download name for a month's report
pub fn report_file_name(month: crate::profit::Month) -> String {
    format!("{}_Report.pdf", month)
}

pub const LEDGER_EXPORT_FILE: &str = "monthly_profit_log.csv";
