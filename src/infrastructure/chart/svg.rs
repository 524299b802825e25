//! Dependency-free SVG charts: a closing-price line chart and a sector pie.

use crate::domain::error::DomainError;
use crate::domain::ports::chart_port::{ChartRenderer, LineChart, PieChart};
use std::f64::consts::PI;
use std::fmt::Write;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 120.0;

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct SvgChartRenderer;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn fmt_err(e: std::fmt::Error) -> DomainError {
    DomainError::Chart(e.to_string())
}

impl SvgChartRenderer {
    pub fn render_line(spec: &LineChart) -> Result<String, DomainError> {
        if spec.values.is_empty() {
            return Err(DomainError::Chart("Line chart needs at least one point".into()));
        }
        if spec.labels.len() != spec.values.len() {
            return Err(DomainError::Chart(format!(
                "{} labels for {} values",
                spec.labels.len(),
                spec.values.len()
            )));
        }

        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let min = spec.values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = spec.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        // Pad flat series so the line sits mid-plot
        let (lo, hi) = if (max - min).abs() < f64::EPSILON {
            (min - 1.0, max + 1.0)
        } else {
            let pad = (max - min) * 0.05;
            (min - pad, max + pad)
        };

        let n = spec.values.len();
        let x_at = |i: usize| {
            if n == 1 {
                MARGIN_LEFT + plot_w / 2.0
            } else {
                MARGIN_LEFT + plot_w * i as f64 / (n - 1) as f64
            }
        };
        let y_at = |v: f64| MARGIN_TOP + plot_h * (1.0 - (v - lo) / (hi - lo));

        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
        )
        .map_err(fmt_err)?;
        writeln!(svg, r##"<rect width="100%" height="100%" fill="#eaeaf2"/>"##).map_err(fmt_err)?;
        writeln!(
            svg,
            r#"<text x="{}" y="32" text-anchor="middle" font-size="20">{}</text>"#,
            WIDTH / 2.0,
            escape(&spec.title)
        )
        .map_err(fmt_err)?;

        // Horizontal grid with five value ticks
        for k in 0..=4 {
            let v = lo + (hi - lo) * k as f64 / 4.0;
            let y = y_at(v);
            writeln!(
                svg,
                r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#ffffff" stroke-width="1"/>"##,
                WIDTH - MARGIN_RIGHT
            )
            .map_err(fmt_err)?;
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{v:.2}</text>"#,
                MARGIN_LEFT - 8.0,
                y + 4.0
            )
            .map_err(fmt_err)?;
        }

        let points: Vec<String> = spec
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:.1},{:.1}", x_at(i), y_at(*v)))
            .collect();
        writeln!(
            svg,
            r#"<polyline fill="none" stroke="blue" stroke-width="2" points="{}"/>"#,
            points.join(" ")
        )
        .map_err(fmt_err)?;

        for (i, v) in spec.values.iter().enumerate() {
            let (x, y) = (x_at(i), y_at(*v));
            writeln!(svg, r#"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="blue"/>"#).map_err(fmt_err)?;
            // Rotated date labels, like an auto-formatted x axis
            writeln!(
                svg,
                r#"<text x="{x:.1}" y="{:.1}" font-size="11" text-anchor="end" transform="rotate(-45 {x:.1} {:.1})">{}</text>"#,
                HEIGHT - MARGIN_BOTTOM + 18.0,
                HEIGHT - MARGIN_BOTTOM + 18.0,
                escape(&spec.labels[i])
            )
            .map_err(fmt_err)?;
        }

        writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="14">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            HEIGHT - 12.0,
            escape(&spec.x_label)
        )
        .map_err(fmt_err)?;
        writeln!(
            svg,
            r#"<text x="20" y="{y}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {y})">{}</text>"#,
            escape(&spec.y_label),
            y = MARGIN_TOP + plot_h / 2.0
        )
        .map_err(fmt_err)?;
        svg.push_str("</svg>\n");
        Ok(svg)
    }

    pub fn render_pie(spec: &PieChart) -> Result<String, DomainError> {
        let total: f64 = spec.slices.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return Err(DomainError::Chart("Pie chart needs a positive total".into()));
        }

        let (cx, cy, r) = (320.0_f64, 260.0_f64, 200.0_f64);
        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="640" height="520" viewBox="0 0 640 520" font-family="sans-serif">"#
        )
        .map_err(fmt_err)?;
        if let Some(title) = &spec.title {
            writeln!(svg, r#"<text x="{cx}" y="30" text-anchor="middle" font-size="18">{}</text>"#, escape(title))
                .map_err(fmt_err)?;
        }

        // Start at 3 o'clock and go counter-clockwise
        let mut angle = 0.0_f64;
        for (i, (label, weight)) in spec.slices.iter().enumerate() {
            let share = weight.max(0.0) / total;
            if share <= 0.0 {
                continue;
            }
            let color = PALETTE[i % PALETTE.len()];
            let sweep = share * 2.0 * PI;

            if share >= 1.0 - 1e-9 {
                writeln!(svg, r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{color}"/>"#).map_err(fmt_err)?;
            } else {
                let (x1, y1) = (cx + r * angle.cos(), cy - r * angle.sin());
                let end = angle + sweep;
                let (x2, y2) = (cx + r * end.cos(), cy - r * end.sin());
                let large = if sweep > PI { 1 } else { 0 };
                writeln!(
                    svg,
                    r#"<path d="M {cx} {cy} L {x1:.2} {y1:.2} A {r} {r} 0 {large} 0 {x2:.2} {y2:.2} Z" fill="{color}"/>"#
                )
                .map_err(fmt_err)?;
            }

            let mid = angle + sweep / 2.0;
            let (px, py) = (cx + r * 0.6 * mid.cos(), cy - r * 0.6 * mid.sin());
            writeln!(
                svg,
                r#"<text x="{px:.1}" y="{py:.1}" text-anchor="middle" font-size="13">{:.1}%</text>"#,
                share * 100.0
            )
            .map_err(fmt_err)?;
            let (lx, ly) = (cx + r * 1.12 * mid.cos(), cy - r * 1.12 * mid.sin());
            let anchor = if mid.cos() >= 0.0 { "start" } else { "end" };
            writeln!(
                svg,
                r#"<text x="{lx:.1}" y="{ly:.1}" text-anchor="{anchor}" font-size="14">{}</text>"#,
                escape(label)
            )
            .map_err(fmt_err)?;

            angle += sweep;
        }
        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn mime(&self) -> &'static str {
        "image/svg+xml"
    }

    fn line_chart(&self, spec: &LineChart) -> Result<Vec<u8>, DomainError> {
        Self::render_line(spec).map(String::into_bytes)
    }

    fn pie_chart(&self, spec: &PieChart) -> Result<Vec<u8>, DomainError> {
        Self::render_pie(spec).map(String::into_bytes)
    }
}
