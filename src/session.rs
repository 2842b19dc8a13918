//! Interactive, line-oriented dashboard session.
//!
//! A session owns exactly one [`ProfitLedger`] for its lifetime. Commands run
//! one at a time; a failing command prints its error and leaves the ledger as
//! it was.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::attendance::{self, AttendanceHistory};
use crate::chart::ChartRenderer;
use crate::display;
use crate::error::{DashboardError, Result};
use crate::pipeline;
use crate::profit::{Month, ProfitForm, ProfitLedger};
use crate::report::{report_file_name, DocumentRenderer, ReportComposer, LEDGER_EXPORT_FILE};

pub const HELP: &str = "\
Commands:
  calc <month> <income> <gross-salary> <deductions> <emi> <office-expenses>
  overview                          show every calculation so far
  report [path]                     build the PDF for the latest calculation
  export [path]                     save all calculations as CSV
  attendance <month> <csv> [name]   clean an attendance upload, optionally one employee
  help
  quit
Quote paths or names that contain spaces: attendance March \"May uploads/form b.csv\"";

/// Split a command line into words. Single or double quotes group a word
/// that contains spaces.
fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(DashboardError::Usage(format!("unclosed quote in: {}", line.trim())));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Paths and display settings a session needs
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub currency_symbol: String,
    pub output_dir: PathBuf,
    pub history_file: PathBuf,
}

pub struct Session<C, R> {
    ledger: ProfitLedger,
    charts: C,
    composer: ReportComposer<R>,
    settings: SessionSettings,
}

impl<C: ChartRenderer, R: DocumentRenderer> Session<C, R> {
    pub fn new(charts: C, composer: ReportComposer<R>, settings: SessionSettings) -> Self {
        Self {
            ledger: ProfitLedger::new(),
            charts,
            composer,
            settings,
        }
    }

    pub fn ledger(&self) -> &ProfitLedger {
        &self.ledger
    }

    /// Read commands until `quit` or end of input
    pub fn run<I: BufRead, W: Write>(&mut self, input: I, out: &mut W) -> Result<()> {
        writeln!(out, "Monthly Business Dashboard. Type 'help' for commands.")?;
        for line in input.lines() {
            let line = line?;
            match self.execute(&line, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    log::debug!("command '{}' failed: {e:?}", line.trim());
                    writeln!(out, "Error: {e}")?;
                }
            }
        }
        log::info!("session ended with {} calculation(s)", self.ledger.len());
        Ok(())
    }

    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        if line.trim_start().starts_with('#') {
            return Ok(Flow::Continue);
        }
        let words = split_words(line)?;
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        let Some((&command, args)) = words.split_first() else {
            return Ok(Flow::Continue);
        };

        match command.to_lowercase().as_str() {
            "calc" => self.calc(args, out)?,
            "overview" => {
                display::write_overview(out, &self.ledger, &self.settings.currency_symbol)?
            }
            "report" => self.report(args.first().map(PathBuf::from), out)?,
            "export" => self.export(args.first().map(PathBuf::from), out)?,
            "attendance" => self.attendance(args, out)?,
            "help" => writeln!(out, "{HELP}")?,
            "quit" | "exit" => return Ok(Flow::Quit),
            other => return Err(DashboardError::UnknownCommand(other.to_string())),
        }
        Ok(Flow::Continue)
    }

    fn calc<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        let [month, income, gross, deductions, emi, office] = args else {
            return Err(DashboardError::Usage(
                "calc <month> <income> <gross-salary> <deductions> <emi> <office-expenses>"
                    .to_string(),
            ));
        };
        let form = ProfitForm::parse(month, [*income, *gross, *deductions, *emi, *office])?;
        let record = form.submit();
        display::write_calculation(out, &record, &self.settings.currency_symbol)?;
        self.ledger.append(record);
        Ok(())
    }

    fn report<W: Write>(&mut self, path: Option<PathBuf>, out: &mut W) -> Result<()> {
        let Ok(latest) = self.ledger.latest() else {
            writeln!(
                out,
                "No data available yet. Please use the Profit Calculator first."
            )?;
            return Ok(());
        };
        let path =
            path.unwrap_or_else(|| self.settings.output_dir.join(report_file_name(latest.month())));

        let history = AttendanceHistory::load_optional(&self.settings.history_file);
        let bytes =
            pipeline::build_report(&self.ledger, &self.charts, &self.composer, history.as_ref())?;
        pipeline::save_bytes(&path, &bytes)?;
        writeln!(out, "Saved report: {}", path.display())?;
        Ok(())
    }

    fn export<W: Write>(&mut self, path: Option<PathBuf>, out: &mut W) -> Result<()> {
        if self.ledger.is_empty() {
            writeln!(
                out,
                "No data available yet. Please use the Profit Calculator first."
            )?;
            return Ok(());
        }
        let path = path.unwrap_or_else(|| self.settings.output_dir.join(LEDGER_EXPORT_FILE));
        pipeline::export_ledger(&self.ledger, &path)?;
        writeln!(
            out,
            "Saved {} calculation(s): {}",
            self.ledger.len(),
            path.display()
        )?;
        Ok(())
    }

    fn attendance<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        let [month, file, employee @ ..] = args else {
            return Err(DashboardError::Usage(
                "attendance <month> <csv> [employee name]".to_string(),
            ));
        };
        let month = Month::parse(month)?;
        let rows = attendance::normalize_path(Path::new(file))?;
        log::debug!("attendance upload labelled {month}; month is not checked against the data");

        if employee.is_empty() {
            display::write_attendance(out, &month.to_string(), &rows, &self.settings.currency_symbol)?;
        } else {
            let name = employee.join(" ");
            let matches = attendance::filter_employee(&rows, &name);
            if matches.is_empty() {
                writeln!(out, "No rows for employee '{name}'.")?;
            } else {
                writeln!(out, "{}", display::attendance_table(matches))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartData, ChartImage, ImageFormat};
    use crate::report::ReportDocument;
    use rust_decimal_macros::dec;

    struct StubCharts;

    impl ChartRenderer for StubCharts {
        fn render(&self, chart: &ChartData) -> Result<ChartImage> {
            Ok(ChartImage::new(ImageFormat::Svg, chart.title.clone().into_bytes()))
        }
    }

    /// Emits the document's text lines as the "PDF"
    struct LinesRenderer;

    impl DocumentRenderer for LinesRenderer {
        fn render(&self, document: &ReportDocument, _work_dir: &Path) -> Result<Vec<u8>> {
            Ok(document.lines().join("\n").into_bytes())
        }
    }

    fn session(dir: &Path) -> Session<StubCharts, LinesRenderer> {
        Session::new(
            StubCharts,
            ReportComposer::new(LinesRenderer, dir.join("work")),
            SessionSettings {
                currency_symbol: "Rs ".to_string(),
                output_dir: dir.join("out"),
                history_file: dir.join("missing.csv"),
            },
        )
    }

    fn run(session: &mut Session<StubCharts, LinesRenderer>, script: &str) -> String {
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn failed_calc_leaves_ledger_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let out = run(
            &mut session,
            "calc January 100000 40000 2000 5000 3000\n\
             calc Smarch 1 1 1 1 1\n\
             calc February 1 -1 1 1 1\n\
             calc March 1 1\n",
        );

        assert_eq!(session.ledger().len(), 1);
        assert!(out.contains("Predicted Profit for January: Rs 54,000.00"));
        assert!(out.contains("Error: Unknown month 'Smarch'"));
        assert!(out.contains("must not be negative"));
        assert!(out.contains("Error: Usage: calc"));
    }

    #[test]
    fn report_uses_latest_calculation() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let out = run(
            &mut session,
            "calc January 100000 40000 2000 5000 3000\n\
             calc February 90000 40000 2000 5000 3000\n\
             report\n",
        );

        let path = dir.path().join("out").join("February_Report.pdf");
        assert!(out.contains("Saved report:"));
        let body = std::fs::read_to_string(path).unwrap();
        assert!(body.starts_with("Month: February"));
        assert!(body.contains("Profit: 44,000.00"));
    }

    #[test]
    fn quit_stops_reading() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        run(
            &mut session,
            "# warm-up\n\ncalc May 10 0 0 0 0\nquit\ncalc June 10 0 0 0 0\n",
        );
        assert_eq!(session.ledger().len(), 1);
        assert_eq!(session.ledger().latest().unwrap().profit(), dec!(10));
    }

    #[test]
    fn quoted_words_keep_spaces() {
        assert_eq!(
            split_words(r#"attendance March "form b.csv" 'Chitra Devi'"#).unwrap(),
            vec!["attendance", "March", "form b.csv", "Chitra Devi"]
        );
        assert_eq!(split_words("  calc  May \"\" ").unwrap(), vec!["calc", "May", ""]);
        assert!(matches!(
            split_words("attendance March \"form b.csv"),
            Err(DashboardError::Usage(_))
        ));
    }

    #[test]
    fn attendance_reads_quoted_path() {
        let dir = tempfile::tempdir().unwrap();
        let upload = dir.path().join("form b.csv");
        std::fs::write(
            &upload,
            "Name,No of Days Worked,Total,Net Payment\nChitra Devi,26,15000,14200\n",
        )
        .unwrap();

        let mut session = session(dir.path());
        let out = run(
            &mut session,
            &format!("attendance March \"{}\" \"chitra devi\"\n", upload.display()),
        );
        assert!(!out.contains("Error:"), "{out}");
        assert!(out.contains("Chitra Devi"));
        assert!(out.contains("14,200.00"));
    }

    #[test]
    fn export_needs_a_calculation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let mut session = session(dir.path());
        let out = run(&mut session, &format!("export {}\n", path.display()));

        assert!(out.contains("No data available yet"));
        assert!(!path.exists());
    }

    #[test]
    fn unknown_command_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = session(dir.path()).execute("plot", &mut out).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownCommand(c) if c == "plot"));
    }
}
