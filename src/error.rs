use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Missing column(s): {}", .missing.join(", "))]
    SchemaValidation { missing: Vec<String> },

    #[error("Error reading file: {0}")]
    FileRead(String),

    #[error("No data available yet. Please use the Profit Calculator first.")]
    EmptyLedger,

    #[error("Unknown month '{0}'. Use a full month name such as 'January'.")]
    InvalidMonth(String),

    #[error("Invalid amount '{value}' for {field}: {reason}")]
    InvalidAmount {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Chart '{0}' has no data to plot")]
    EmptyChart(String),

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
