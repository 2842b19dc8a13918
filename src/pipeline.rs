use std::fs;
use std::path::Path;

use crate::attendance::AttendanceHistory;
use crate::chart::{profit_trend_chart, ChartImage, ChartRenderer};
use crate::error::Result;
use crate::profit::ProfitLedger;
use crate::report::{DocumentRenderer, ReportComposer};

/// Build the report for the most recent ledger entry.
///
/// Fails with `EmptyLedger` when nothing has been calculated yet. Attendance
/// charts are added only when `history` is supplied and renders cleanly;
/// otherwise the report carries the profit chart alone.
pub fn build_report<C, R>(
    ledger: &ProfitLedger,
    charts: &C,
    composer: &ReportComposer<R>,
    history: Option<&AttendanceHistory>,
) -> Result<Vec<u8>>
where
    C: ChartRenderer + ?Sized,
    R: DocumentRenderer,
{
    let latest = ledger.latest()?;
    let profit_chart = charts.render(&profit_trend_chart(ledger))?;

    let (summary_chart, trend_chart) = match history {
        Some(history) => attendance_charts(charts, history),
        None => (None, None),
    };

    composer.compose(
        &latest.summary_fields(),
        &profit_chart,
        summary_chart.as_ref(),
        trend_chart.as_ref(),
    )
}

fn attendance_charts<C: ChartRenderer + ?Sized>(
    charts: &C,
    history: &AttendanceHistory,
) -> (Option<ChartImage>, Option<ChartImage>) {
    let render = |data| match charts.render(&data) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("leaving attendance chart out of the report: {e}");
            None
        }
    };
    (render(history.summary_chart()), render(history.trend_chart()))
}

/// Write report bytes to `path`, creating parent directories
pub fn save_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Export the whole ledger as CSV to `path`
pub fn export_ledger(ledger: &ProfitLedger, path: &Path) -> Result<()> {
    save_bytes(path, &ledger.to_csv_bytes()?)
}
