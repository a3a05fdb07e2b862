//! SVG rendering of aggregated results.
//!
//! Renders one grouped-bar panel per fusion method, stacked vertically and
//! labelled `a)`, `b)`, `c)`, with a shared legend. The y axis is fixed to
//! [0, 1]: all three plotted metrics are naturally bounded in that range.

use std::fmt::Write;
use std::path::Path;

use crate::aggregate::MethodSummary;
use crate::error::Result;

/// Default output file name for the rendered figure
pub const DEFAULT_CHART_FILENAME: &str = "evaluation_results.svg";

/// Legend labels, in bar order
const LEGEND_LABELS: [&str; 3] = [
    "mean distance metric",
    "mean grasp quality",
    "mean evaluation metric",
];

/// Chart geometry and colors
#[derive(Clone, Debug)]
pub struct ChartConfig {
    /// Total figure width in pixels
    pub width: f32,
    /// Total figure height in pixels
    pub height: f32,
    /// Left margin (y-axis labels)
    pub margin_left: f32,
    /// Right margin
    pub margin_right: f32,
    /// Vertical space above each panel (panel label)
    pub panel_header: f32,
    /// Vertical space below each panel (weight labels)
    pub panel_footer: f32,
    /// Height reserved for the legend at the bottom
    pub legend_height: f32,
    /// Bar fill colors: distance, quality, metric
    pub bar_colors: [&'static str; 3],
    /// Axis and text color
    pub axis_color: &'static str,
    /// Horizontal grid line color
    pub grid_color: &'static str,
    /// Figure background color
    pub background: &'static str,
}

impl Default for ChartConfig {
    fn default() -> Self {
        // 5.8 x 7.6 inches at 100 dpi, the historical figure size
        Self {
            width: 580.0,
            height: 760.0,
            margin_left: 52.0,
            margin_right: 16.0,
            panel_header: 26.0,
            panel_footer: 24.0,
            legend_height: 46.0,
            bar_colors: ["#0065BD", "#64A0C8", "#98C6EA"],
            axis_color: "#333333",
            grid_color: "#DDDDDD",
            background: "#FFFFFF",
        }
    }
}

/// Render the per-method summaries as a stacked-panel SVG figure.
pub fn render_summary_chart(summaries: &[MethodSummary], config: &ChartConfig) -> String {
    let mut svg = String::new();

    writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#).unwrap();
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" font-family="sans-serif">"#,
        config.width, config.height, config.width, config.height
    )
    .unwrap();
    writeln!(
        &mut svg,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        config.background
    )
    .unwrap();

    let panel_height = (config.height - config.legend_height) / summaries.len().max(1) as f32;
    for (panel_idx, summary) in summaries.iter().enumerate() {
        render_panel(&mut svg, summary, panel_idx, panel_height, config);
    }

    render_legend(&mut svg, config);

    writeln!(&mut svg, "</svg>").unwrap();
    svg
}

/// Render the figure and write it to `path`.
pub fn save_summary_chart(
    summaries: &[MethodSummary],
    config: &ChartConfig,
    path: &Path,
) -> Result<()> {
    std::fs::write(path, render_summary_chart(summaries, config))?;
    Ok(())
}

fn render_panel(
    svg: &mut String,
    summary: &MethodSummary,
    panel_idx: usize,
    panel_height: f32,
    config: &ChartConfig,
) {
    let panel_top = panel_idx as f32 * panel_height;
    let plot_left = config.margin_left;
    let plot_right = config.width - config.margin_right;
    let plot_top = panel_top + config.panel_header;
    let plot_bottom = panel_top + panel_height - config.panel_footer;
    let plot_width = plot_right - plot_left;
    let plot_height = plot_bottom - plot_top;

    writeln!(svg, r#"  <g id="panel-{}">"#, summary.method).unwrap();

    // Panel label: a), b), c)
    let label = (b'a' + panel_idx as u8) as char;
    writeln!(
        svg,
        r#"    <text x="{:.1}" y="{:.1}" font-size="14" fill="{}">{}) </text>"#,
        plot_left, panel_top + 16.0, config.axis_color, label
    )
    .unwrap();

    // Horizontal grid and y tick labels, fixed [0, 1] range
    for tick in 0..=5 {
        let value = tick as f32 * 0.2;
        let y = plot_bottom - value * plot_height;
        writeln!(
            svg,
            r#"    <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/>"#,
            plot_left, y, plot_right, y, config.grid_color
        )
        .unwrap();
        writeln!(
            svg,
            r#"    <text x="{:.1}" y="{:.1}" font-size="10" text-anchor="end" fill="{}">{:.1}</text>"#,
            plot_left - 6.0,
            y + 3.5,
            config.axis_color,
            value
        )
        .unwrap();
    }

    // Bars: one cluster per weight, one bar per metric
    let group_width = plot_width / summary.rows.len().max(1) as f32;
    let cluster_width = group_width * 0.7;
    let bar_width = cluster_width / 3.0;

    for (group_idx, row) in summary.rows.iter().enumerate() {
        let group_left = plot_left + group_idx as f32 * group_width;
        let cluster_left = group_left + (group_width - cluster_width) / 2.0;

        let values = [row.mean_distance, row.mean_quality, row.mean_metric];
        for (bar_idx, value) in values.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            let clamped = value.clamp(0.0, 1.0) as f32;
            let bar_height = clamped * plot_height;
            let x = cluster_left + bar_idx as f32 * bar_width;
            writeln!(
                svg,
                r#"    <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
                x,
                plot_bottom - bar_height,
                bar_width,
                bar_height,
                config.bar_colors[bar_idx]
            )
            .unwrap();
        }

        // Weight label under the cluster
        writeln!(
            svg,
            r#"    <text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle" fill="{}">{}</text>"#,
            group_left + group_width / 2.0,
            plot_bottom + 16.0,
            config.axis_color,
            row.weight
        )
        .unwrap();
    }

    // Axis line along the bottom of the panel
    writeln!(
        svg,
        r#"    <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/>"#,
        plot_left, plot_bottom, plot_right, plot_bottom, config.axis_color
    )
    .unwrap();

    writeln!(svg, "  </g>").unwrap();
}

fn render_legend(svg: &mut String, config: &ChartConfig) {
    let entry_width = 170.0;
    let total_width = entry_width * LEGEND_LABELS.len() as f32;
    let start_x = (config.width - total_width) / 2.0;
    let y = config.height - config.legend_height / 2.0;

    writeln!(svg, r#"  <g id="legend">"#).unwrap();
    for (idx, label) in LEGEND_LABELS.iter().enumerate() {
        let x = start_x + idx as f32 * entry_width;
        writeln!(
            svg,
            r#"    <rect x="{:.1}" y="{:.1}" width="10" height="10" fill="{}"/>"#,
            x,
            y - 9.0,
            config.bar_colors[idx]
        )
        .unwrap();
        writeln!(
            svg,
            r#"    <text x="{:.1}" y="{:.1}" font-size="11" fill="{}">{}</text>"#,
            x + 14.0,
            y,
            config.axis_color,
            label
        )
        .unwrap();
    }
    writeln!(svg, "  </g>").unwrap();
}
