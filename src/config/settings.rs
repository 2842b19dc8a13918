use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub attendance: AttendanceSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DisplaySettings {
    pub currency_symbol: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ReportSettings {
    pub title: String,
    pub output_dir: String,
    /// Scratch directory for chart images and the Typst sources
    pub work_dir: Option<String>,
    pub typst: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: "Monthly Profit & Attendance Report".to_string(),
            output_dir: "output".to_string(),
            work_dir: None,
            typst: "typst".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AttendanceSettings {
    /// Cleaned multi-month attendance export used for the report charts
    pub history_file: String,
}

impl Default for AttendanceSettings {
    fn default() -> Self {
        Self {
            history_file: "data/attendance_cleaned.csv".to_string(),
        }
    }
}
