use super::{ChartData, ChartImage, ChartKind, ChartRenderer, ImageFormat};
use crate::error::{DashboardError, Result};

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const TICKS: usize = 5;

/// Renders charts as standalone SVG documents.
///
/// Output is deterministic for the same input, so reports built twice from
/// the same ledger embed byte-identical images.
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    pub width: f64,
    pub height: f64,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        // 6x3 inch figure at 100 dpi
        Self {
            width: 600.0,
            height: 300.0,
        }
    }
}

struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn y(&self, value: f64) -> f64 {
        let span = self.y_max - self.y_min;
        self.bottom - (value - self.y_min) / span * (self.bottom - self.top)
    }

    fn band(&self, n: usize) -> f64 {
        (self.right - self.left) / n as f64
    }

    fn center(&self, n: usize, i: usize) -> f64 {
        self.left + self.band(n) * (i as f64 + 0.5)
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, chart: &ChartData) -> Result<ChartImage> {
        if chart.is_empty() {
            return Err(DashboardError::EmptyChart(chart.title.clone()));
        }

        let (y_min, y_max) = value_range(chart);
        let frame = Frame {
            left: 70.0,
            right: self.width - if chart.legend { 110.0 } else { 20.0 },
            top: 35.0,
            bottom: self.height - 55.0,
            y_min,
            y_max,
        };

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="Helvetica, Arial, sans-serif">"#,
            w = self.width,
            h = self.height
        );
        svg.push_str(&format!(
            r#"<rect width="{}" height="{}" fill="white"/>"#,
            self.width, self.height
        ));

        self.draw_axes(&mut svg, chart, &frame);
        match chart.kind {
            ChartKind::Line => draw_lines(&mut svg, chart, &frame),
            ChartKind::GroupedBar => draw_bars(&mut svg, chart, &frame),
        }
        if chart.legend {
            draw_legend(&mut svg, chart, &frame);
        }

        svg.push_str("</svg>\n");
        log::debug!("rendered chart '{}' ({} bytes)", chart.title, svg.len());
        Ok(ChartImage::new(ImageFormat::Svg, svg.into_bytes()))
    }
}

impl SvgChartRenderer {
    fn draw_axes(&self, svg: &mut String, chart: &ChartData, frame: &Frame) {
        svg.push_str(&format!(
            r#"<text x="{}" y="20" font-size="14" text-anchor="middle">{}</text>"#,
            self.width / 2.0,
            escape(&chart.title)
        ));

        // Horizontal grid with tick labels
        for i in 0..=TICKS {
            let value = frame.y_min + (frame.y_max - frame.y_min) * i as f64 / TICKS as f64;
            let y = frame.y(value);
            svg.push_str(&format!(
                r##"<line x1="{l}" y1="{y:.1}" x2="{r}" y2="{y:.1}" stroke="#dddddd" stroke-width="1"/>"##,
                l = frame.left,
                r = frame.right,
            ));
            svg.push_str(&format!(
                r#"<text x="{}" y="{:.1}" font-size="10" text-anchor="end">{}</text>"#,
                frame.left - 6.0,
                y + 3.0,
                format_tick(value)
            ));
        }

        if frame.y_min < 0.0 {
            let y0 = frame.y(0.0);
            svg.push_str(&format!(
                r##"<line x1="{}" y1="{y0:.1}" x2="{}" y2="{y0:.1}" stroke="#555555" stroke-width="1"/>"##,
                frame.left, frame.right,
            ));
        }

        svg.push_str(&format!(
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="#333333" stroke-width="1"/>"##,
            frame.left,
            frame.top,
            frame.right - frame.left,
            frame.bottom - frame.top
        ));

        let n = chart.categories.len();
        let rotate = n > 6;
        for (i, category) in chart.categories.iter().enumerate() {
            let x = frame.center(n, i);
            let y = frame.bottom + 14.0;
            if rotate {
                svg.push_str(&format!(
                    r#"<text x="{x:.1}" y="{y:.1}" font-size="10" text-anchor="end" transform="rotate(-35 {x:.1} {y:.1})">{}</text>"#,
                    escape(category)
                ));
            } else {
                svg.push_str(&format!(
                    r#"<text x="{x:.1}" y="{y:.1}" font-size="10" text-anchor="middle">{}</text>"#,
                    escape(category)
                ));
            }
        }

        if !chart.x_label.is_empty() {
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">{}</text>"#,
                (frame.left + frame.right) / 2.0,
                self.height - 8.0,
                escape(&chart.x_label)
            ));
        }
        if !chart.y_label.is_empty() {
            let cy = (frame.top + frame.bottom) / 2.0;
            svg.push_str(&format!(
                r#"<text x="14" y="{cy:.1}" font-size="11" text-anchor="middle" transform="rotate(-90 14 {cy:.1})">{}</text>"#,
                escape(&chart.y_label)
            ));
        }
    }
}

fn draw_lines(svg: &mut String, chart: &ChartData, frame: &Frame) {
    let n = chart.categories.len();
    for (s, series) in chart.series.iter().enumerate() {
        let color = PALETTE[s % PALETTE.len()];
        let points: Vec<(f64, f64)> = series
            .values
            .iter()
            .take(n)
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, v)| (frame.center(n, i), frame.y(*v)))
            .collect();

        let path: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{x:.1},{y:.1}"))
            .collect();
        svg.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="2"/>"#,
            path.join(" ")
        ));
        for (x, y) in points {
            svg.push_str(&format!(
                r#"<circle cx="{x:.1}" cy="{y:.1}" r="3" fill="{color}"/>"#
            ));
        }
    }
}

fn draw_bars(svg: &mut String, chart: &ChartData, frame: &Frame) {
    let n = chart.categories.len();
    let group = frame.band(n) * 0.8;
    let bar = group / chart.series.len() as f64;
    let base = frame.y(0.0_f64.clamp(frame.y_min, frame.y_max));

    for (s, series) in chart.series.iter().enumerate() {
        let color = PALETTE[s % PALETTE.len()];
        for (i, value) in series.values.iter().take(n).enumerate() {
            if !value.is_finite() {
                continue;
            }
            let x = frame.center(n, i) - group / 2.0 + bar * s as f64;
            let y = frame.y(*value);
            let (top, height) = if y < base { (y, base - y) } else { (base, y - base) };
            svg.push_str(&format!(
                r#"<rect x="{x:.1}" y="{top:.1}" width="{bar:.1}" height="{height:.1}" fill="{color}"/>"#
            ));
        }
    }
}

fn draw_legend(svg: &mut String, chart: &ChartData, frame: &Frame) {
    let x = frame.right + 10.0;
    for (s, series) in chart.series.iter().enumerate() {
        let y = frame.top + 16.0 * s as f64;
        let color = PALETTE[s % PALETTE.len()];
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="10" height="10" fill="{color}"/>"#
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="10">{}</text>"#,
            x + 14.0,
            y + 9.0,
            escape(&series.name)
        ));
    }
}

/// Y extent over all finite values, always including zero
fn value_range(chart: &ChartData) -> (f64, f64) {
    let values = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .filter(|v| v.is_finite());
    let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if (max - min).abs() < f64::EPSILON {
        (min, min + 1.0)
    } else {
        let pad = (max - min) * 0.05;
        (if min < 0.0 { min - pad } else { min }, max + pad)
    }
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 1000.0 {
        let rounded = value.round() as i64;
        crate::report::format_grouped_int(rounded)
    } else if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
