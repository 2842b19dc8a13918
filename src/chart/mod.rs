mod svg;

pub use svg::SvgChartRenderer;

use std::io::Cursor;

use rust_decimal::prelude::ToPrimitive;

use crate::error::Result;
use crate::profit::ProfitLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Line with point markers, one line per series
    Line,
    /// Bars side by side within each category, one bar per series
    GroupedBar,
}

/// A named numeric column aligned with the chart's categories
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Tabular input for a chart: one category column plus numeric series
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    pub legend: bool,
}

impl ChartData {
    pub fn new(kind: ChartKind, title: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            categories,
            series: Vec::new(),
            legend: false,
        }
    }

    pub fn axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    pub fn with_series(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.series.push(Series {
            name: name.into(),
            values,
        });
        self
    }

    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() || self.series.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

/// Rendered chart. The bytes can be read from the start any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartImage {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl ChartImage {
    pub fn new(format: ImageFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A fresh reader positioned at the first byte
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.bytes.as_slice())
    }
}

/// Turns chart data into an embeddable image
pub trait ChartRenderer {
    fn render(&self, chart: &ChartData) -> Result<ChartImage>;
}

/// Profit over month, one point per ledger record in insertion order
pub fn profit_trend_chart(ledger: &ProfitLedger) -> ChartData {
    let records = ledger.all();
    ChartData::new(
        ChartKind::Line,
        "Monthly Profit Trend",
        records.iter().map(|r| r.month().to_string()).collect(),
    )
    .axis_labels("Month", "Profit")
    .with_series(
        "Profit",
        records
            .iter()
            .map(|r| r.profit().to_f64().unwrap_or(0.0))
            .collect(),
    )
}
