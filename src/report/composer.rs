use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Serialize;

use super::format::format_amount;
use crate::chart::{ChartImage, ImageFormat};
use crate::error::Result;

/// Scratch file stems, reused by every composition
const PROFIT_PLOT: &str = "profit_plot";
const ATTENDANCE_SUMMARY: &str = "attendance_summary";
const ATTENDANCE_TREND: &str = "attendance_trend";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Amount(Decimal),
    Text(String),
}

/// One `label: value` line on the report's first page
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryField {
    pub label: String,
    pub value: FieldValue,
}

impl SummaryField {
    pub fn new(label: impl Into<String>, value: FieldValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    /// Printable line; characters outside printable ASCII are dropped
    pub fn line(&self) -> String {
        let value = match &self.value {
            FieldValue::Amount(amount) => format_amount(*amount),
            FieldValue::Text(text) => sanitize(text),
        };
        format!("{}: {}", sanitize(&self.label), value)
    }
}

/// Layout element of a report, in reading order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Block {
    Line { text: String },
    Space { points: u32 },
    /// Full-width image, referenced by file name inside the work directory
    Image { file: String },
    PageBreak,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub subtitle: Option<String>,
    pub blocks: Vec<Block>,
}

impl ReportDocument {
    pub fn images(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Image { file } => Some(file.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Line { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn page_count(&self) -> usize {
        1 + self
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::PageBreak))
            .count()
    }
}

/// Turns a laid-out document plus the images staged in `work_dir` into bytes
pub trait DocumentRenderer {
    fn render(&self, document: &ReportDocument, work_dir: &Path) -> Result<Vec<u8>>;
}

/// Assembles summary figures and chart images into one paginated document.
///
/// Chart images are written to fixed file names in the work directory before
/// the renderer runs. Every call first removes whatever a previous call left
/// there, so an image that is not supplied this time can never be embedded.
pub struct ReportComposer<R> {
    renderer: R,
    work_dir: PathBuf,
    title: String,
    subtitle: Option<String>,
}

impl<R: DocumentRenderer> ReportComposer<R> {
    pub fn new(renderer: R, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            work_dir: work_dir.into(),
            title: "Monthly Profit & Attendance Report".to_string(),
            subtitle: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Block layout for the given inputs. Pure; nothing is written.
    pub fn layout(
        &self,
        summary: &[SummaryField],
        profit_chart: &ChartImage,
        attendance_summary: Option<&ChartImage>,
        attendance_trend: Option<&ChartImage>,
    ) -> ReportDocument {
        let mut blocks: Vec<Block> = summary
            .iter()
            .map(|field| Block::Line { text: field.line() })
            .collect();

        blocks.push(Block::Space { points: 5 });
        blocks.push(Block::Image {
            file: artifact_name(PROFIT_PLOT, profit_chart.format()),
        });

        if let Some(chart) = attendance_summary {
            blocks.push(Block::PageBreak);
            blocks.push(Block::Image {
                file: artifact_name(ATTENDANCE_SUMMARY, chart.format()),
            });
        }

        if let Some(chart) = attendance_trend {
            blocks.push(Block::Space { points: 10 });
            blocks.push(Block::Image {
                file: artifact_name(ATTENDANCE_TREND, chart.format()),
            });
        }

        ReportDocument {
            title: sanitize(&self.title),
            subtitle: self.subtitle.as_deref().map(sanitize),
            blocks,
        }
    }

    pub fn compose(
        &self,
        summary: &[SummaryField],
        profit_chart: &ChartImage,
        attendance_summary: Option<&ChartImage>,
        attendance_trend: Option<&ChartImage>,
    ) -> Result<Vec<u8>> {
        fs::create_dir_all(&self.work_dir)?;
        self.clear_artifacts()?;

        let document = self.layout(summary, profit_chart, attendance_summary, attendance_trend);

        self.stage(PROFIT_PLOT, profit_chart)?;
        if let Some(chart) = attendance_summary {
            self.stage(ATTENDANCE_SUMMARY, chart)?;
        }
        if let Some(chart) = attendance_trend {
            self.stage(ATTENDANCE_TREND, chart)?;
        }

        log::info!(
            "composing report: {} summary lines, {} images, {} page(s)",
            document.lines().len(),
            document.images().len(),
            document.page_count()
        );
        self.renderer.render(&document, &self.work_dir)
    }

    fn clear_artifacts(&self) -> Result<()> {
        for stem in [PROFIT_PLOT, ATTENDANCE_SUMMARY, ATTENDANCE_TREND] {
            for format in [ImageFormat::Svg, ImageFormat::Png] {
                let path = self.work_dir.join(artifact_name(stem, format));
                match fs::remove_file(&path) {
                    Ok(()) => log::debug!("removed stale {}", path.display()),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Ok(())
    }

    /// Write the image in full and sync it before anything references it
    fn stage(&self, stem: &str, image: &ChartImage) -> Result<PathBuf> {
        let path = self.work_dir.join(artifact_name(stem, image.format()));
        let mut file = File::create(&path)?;
        io::copy(&mut image.reader(), &mut file)?;
        file.flush()?;
        file.sync_all()?;
        Ok(path)
    }
}

fn artifact_name(stem: &str, format: ImageFormat) -> String {
    format!("{}.{}", stem, format.extension())
}

/// Keep printable ASCII only
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| matches!(*c, ' '..='~')).collect()
}
