mod settings;

pub use settings::{AttendanceSettings, Config, DisplaySettings, ReportSettings};

use crate::error::{DashboardError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.dashboard/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "dashboard") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.dashboard/
    let home = dirs_home().ok_or_else(|| {
        DashboardError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".dashboard"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Load config.toml, falling back to defaults when it does not exist
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| DashboardError::ConfigParse { path, source: e })
}

/// Resolve the report output directory; relative paths live under the config dir
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let expanded = expand_path(output_dir);
    if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    }
}

/// Resolve the scratch directory used while composing reports
pub fn resolve_work_dir(report: &ReportSettings) -> PathBuf {
    match &report.work_dir {
        Some(dir) => expand_path(dir),
        None => std::env::temp_dir().join("dashboard-report"),
    }
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[display]
currency_symbol = "₹"

[report]
title = "Monthly Profit & Attendance Report"
output_dir = "output"            # relative to this directory, or absolute / ~/...
# work_dir = "/tmp/dashboard-report"   # scratch space for chart images
typst = "typst"                  # Typst executable used to build the PDF

[attendance]
# Cleaned multi-month export with columns:
#   Month, Employee Name, Present, Absent, OT, Total Days
# When present, the report gets two extra attendance charts.
history_file = "data/attendance_cleaned.csv"
"#;
