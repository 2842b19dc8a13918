pub mod attendance;
pub mod chart;
pub mod config;
pub mod display;
pub mod error;
pub mod pipeline;
pub mod profit;
pub mod report;
pub mod session;

pub use attendance::{normalize, AttendanceHistory, AttendanceRow, RawTable};
pub use chart::{ChartData, ChartImage, ChartRenderer, SvgChartRenderer};
pub use config::Config;
pub use error::{DashboardError, Result};
pub use profit::{compute, Month, ProfitLedger, ProfitRecord};
pub use report::{ReportComposer, SummaryField, TypstRenderer};
pub use session::{Session, SessionSettings};
