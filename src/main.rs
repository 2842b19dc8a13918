use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use dashboard::attendance::{self, AttendanceHistory};
use dashboard::chart::{ChartRenderer, SvgChartRenderer};
use dashboard::config::{
    config_dir, load_config, resolve_output_dir, resolve_work_dir, Config, CONFIG_TEMPLATE,
};
use dashboard::error::{DashboardError, Result};
use dashboard::profit::{Month, ProfitForm, ProfitLedger};
use dashboard::report::{report_file_name, ReportComposer, TypstRenderer, LEDGER_EXPORT_FILE};
use dashboard::session::{Session, SessionSettings};
use dashboard::{display, pipeline};

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(version, about = "Monthly business dashboard: profit and attendance reports", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.dashboard or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Calculate net salary and profit for a month
    Calc {
        /// Month name (e.g., January)
        #[arg(short, long)]
        month: String,

        #[arg(long, allow_hyphen_values = true)]
        income: String,

        #[arg(long, allow_hyphen_values = true)]
        gross_salary: String,

        /// PF + ESI deductions
        #[arg(long, allow_hyphen_values = true)]
        deductions: String,

        #[arg(long, allow_hyphen_values = true)]
        emi: String,

        #[arg(long, allow_hyphen_values = true)]
        office_expenses: String,

        /// Also build the PDF report (<Month>_Report.pdf)
        #[arg(long)]
        report: bool,

        /// Also write monthly_profit_log.csv
        #[arg(long)]
        export: bool,

        /// Directory for the report and export (default: configured output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clean and summarize an attendance (Form B) CSV
    Attendance {
        /// Which month's data this is
        #[arg(short, long)]
        month: String,

        /// CSV with Name, No of Days Worked, Total, Net Payment columns
        #[arg(short, long)]
        file: PathBuf,

        /// Show only this employee
        #[arg(short, long)]
        employee: Option<String>,

        /// Write per-employee charts (SVG) into this directory
        #[arg(long)]
        charts_dir: Option<PathBuf>,
    },

    /// Interactive session; calculations are kept until the session ends
    Session,

    /// Show resolved configuration
    Status,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Calc {
            month,
            income,
            gross_salary,
            deductions,
            emi,
            office_expenses,
            report,
            export,
            output,
        } => {
            let form = ProfitForm::parse(
                &month,
                [
                    income.as_str(),
                    gross_salary.as_str(),
                    deductions.as_str(),
                    emi.as_str(),
                    office_expenses.as_str(),
                ],
            )?;
            cmd_calc(&cfg_dir, &form, report, export, output)
        }
        Commands::Attendance {
            month,
            file,
            employee,
            charts_dir,
        } => cmd_attendance(&cfg_dir, &month, &file, employee.as_deref(), charts_dir),
        Commands::Session => cmd_session(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
    }
}

fn composer_for(config: &Config) -> ReportComposer<TypstRenderer> {
    ReportComposer::new(
        TypstRenderer::new(config.report.typst.clone()),
        resolve_work_dir(&config.report),
    )
    .with_title(config.report.title.clone())
    .with_subtitle(format!(
        "Generated {}",
        chrono::Local::now().format("%B %d, %Y")
    ))
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(DashboardError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized dashboard config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Review settings:        $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Calculate a month:      dashboard calc --month January --income ...");
    println!("  3. Or start a session:     dashboard session");

    Ok(())
}

/// One calculation on a fresh ledger, with optional report and export
fn cmd_calc(
    cfg_dir: &Path,
    form: &ProfitForm,
    report: bool,
    export: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let symbol = &config.display.currency_symbol;
    let output_dir =
        output.unwrap_or_else(|| resolve_output_dir(&config.report.output_dir, cfg_dir));

    let mut ledger = ProfitLedger::new();
    let record = form.submit();
    let month = record.month();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    display::write_calculation(&mut out, &record, symbol)?;
    ledger.append(record);

    if export {
        let path = output_dir.join(LEDGER_EXPORT_FILE);
        pipeline::export_ledger(&ledger, &path)?;
        writeln!(out, "  Saved: {}", path.display())?;
    }

    if report {
        let history = AttendanceHistory::load_optional(Path::new(&config.attendance.history_file));
        let bytes = pipeline::build_report(
            &ledger,
            &SvgChartRenderer::default(),
            &composer_for(&config),
            history.as_ref(),
        )?;
        let path = output_dir.join(report_file_name(month));
        pipeline::save_bytes(&path, &bytes)?;
        writeln!(out, "  Saved: {}", path.display())?;
    }

    Ok(())
}

fn cmd_attendance(
    cfg_dir: &Path,
    month: &str,
    file: &Path,
    employee: Option<&str>,
    charts_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let month = Month::parse(month)?;
    let rows = attendance::normalize_path(file)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match employee {
        Some(name) => {
            let matches = attendance::filter_employee(&rows, name);
            if matches.is_empty() {
                writeln!(out, "No rows for employee '{name}'.")?;
            } else {
                writeln!(out, "{}", display::attendance_table(matches))?;
            }
        }
        None => display::write_attendance(
            &mut out,
            &month.to_string(),
            &rows,
            &config.display.currency_symbol,
        )?,
    }

    if let Some(dir) = charts_dir {
        if rows.is_empty() {
            writeln!(out, "No rows to chart.")?;
            return Ok(());
        }
        let renderer = SvgChartRenderer::default();
        for (name, chart) in [
            ("days_worked", attendance::days_worked_chart(&rows)),
            ("net_payment", attendance::net_payment_chart(&rows)),
        ] {
            let image = renderer.render(&chart)?;
            let path = dir.join(format!("{}.{}", name, image.format().extension()));
            pipeline::save_bytes(&path, image.bytes())?;
            writeln!(out, "  Chart: {}", path.display())?;
        }
    }

    Ok(())
}

fn cmd_session(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let settings = SessionSettings {
        currency_symbol: config.display.currency_symbol.clone(),
        output_dir: resolve_output_dir(&config.report.output_dir, cfg_dir),
        history_file: PathBuf::from(&config.attendance.history_file),
    };

    let mut session = Session::new(SvgChartRenderer::default(), composer_for(&config), settings);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    session.run(stdin.lock(), &mut out)
}

/// Show resolved configuration
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let config_file = cfg_dir.join("config.toml");
    let history = Path::new(&config.attendance.history_file);

    println!("Dashboard Status");
    println!("{}", "-".repeat(50));
    if config_file.exists() {
        println!("Config file:      {}", config_file.display());
    } else {
        println!("Config file:      {} (not found, using defaults)", config_file.display());
    }
    println!(
        "Output directory: {}",
        resolve_output_dir(&config.report.output_dir, cfg_dir).display()
    );
    println!(
        "Work directory:   {}",
        resolve_work_dir(&config.report).display()
    );
    println!("Report title:     {}", config.report.title);
    println!("Currency:         {}", config.display.currency_symbol);
    println!(
        "Attendance data:  {}{}",
        history.display(),
        if history.exists() { "" } else { " (not found)" }
    );

    Ok(())
}
