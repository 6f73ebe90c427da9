//! Plain-text presentation of an [`AnalysisReport`].

use crate::schema::{AnalysisReport, Chart, MetricTile, MetricUnit, StatementTable};
use std::fmt::Write;

const BAR_WIDTH: usize = 40;

/// Formats a value rounded to whole units with comma thousands separators.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3 + 1);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        out.insert(0, '-');
    }
    out
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn format_tile(tile: &MetricTile) -> String {
    let value = match tile.unit {
        MetricUnit::Currency => format_thousands(tile.value),
        MetricUnit::Percent => format_percent(tile.value),
        MetricUnit::Ratio => format!("{:.2}", tile.value),
    };
    format!("{}: {}", tile.title, value)
}

/// Markdown pipe table with label, both values, growth and current-year share.
pub fn markdown_table(table: &StatementTable) -> String {
    let mut out = String::new();
    out.push_str("| Item | Prior year | Current year | Growth (%) | Current year share (%) |\n");
    out.push_str("|:-----|-----------:|-------------:|-----------:|-----------------------:|\n");
    for item in &table.items {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {:.2} | {:.2} |",
            item.label.replace('|', "\\|"),
            format_thousands(item.prior_value),
            format_thousands(item.current_value),
            item.growth_pct,
            item.current_share_pct
        );
    }
    out
}

fn statement_table(table: &StatementTable) -> String {
    let label_width = table
        .items
        .iter()
        .map(|item| item.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Item".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w$}  {:>18}  {:>18}  {:>14}  {:>12}  {:>12}",
        "Item",
        "Prior year",
        "Current year",
        "Growth",
        "Share prior",
        "Share curr.",
        w = label_width
    );
    for item in &table.items {
        let pad = label_width - item.label.chars().count();
        let _ = writeln!(
            out,
            "{}{}  {:>18}  {:>18}  {:>14}  {:>12}  {:>12}",
            item.label,
            " ".repeat(pad),
            format_thousands(item.prior_value),
            format_thousands(item.current_value),
            format_percent(item.growth_pct),
            format_percent(item.prior_share_pct),
            format_percent(item.current_share_pct),
        );
    }
    out
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || !value.is_finite() {
        return String::new();
    }
    let len = ((value.abs() / max) * BAR_WIDTH as f64).round() as usize;
    let ch = if value < 0.0 { '-' } else { '#' };
    std::iter::repeat(ch).take(len.min(BAR_WIDTH)).collect()
}

fn max_magnitude(values: impl Iterator<Item = f64>) -> f64 {
    values
        .filter(|v| v.is_finite())
        .map(f64::abs)
        .fold(0.0, f64::max)
}

pub fn render_chart(chart: &Chart) -> String {
    let mut out = String::new();
    match chart {
        Chart::Pie { title, slices } => {
            let _ = writeln!(out, "{}", title);
            let total: f64 = slices.iter().map(|s| s.value).sum();
            for slice in slices {
                let share = if total != 0.0 {
                    100.0 * slice.value / total
                } else {
                    0.0
                };
                let _ = writeln!(
                    out,
                    "  {:<40} {:>8} {}",
                    slice.label,
                    format_percent(share),
                    bar(share, 100.0)
                );
            }
        }
        Chart::Bar { title, bars } => {
            let _ = writeln!(out, "{}", title);
            let max = max_magnitude(bars.iter().map(|b| b.value));
            for point in bars {
                let _ = writeln!(
                    out,
                    "  {:<40} {:>12} {}",
                    point.label,
                    format_percent(point.value),
                    bar(point.value, max)
                );
            }
        }
        Chart::GroupedBar { title, groups } => {
            let _ = writeln!(out, "{}", title);
            let max = max_magnitude(groups.iter().flat_map(|g| [g.prior, g.current]));
            for group in groups {
                let _ = writeln!(out, "  {}", group.label);
                let _ = writeln!(
                    out,
                    "    prior   {:>18} {}",
                    format_thousands(group.prior),
                    bar(group.prior, max)
                );
                let _ = writeln!(
                    out,
                    "    current {:>18} {}",
                    format_thousands(group.current),
                    bar(group.current, max)
                );
            }
        }
    }
    out
}

pub fn render_report(report: &AnalysisReport, narrative: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Financial statement analysis: {} ({})",
        report.source_name,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Table 1: Growth and composition");
    out.push_str(&statement_table(&report.table));
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Current ratio: prior year {}, current year {}",
        report.ratios.current_ratio_prior, report.ratios.current_ratio_current
    );

    for warning in &report.warnings {
        let _ = writeln!(out, "Warning: {}", warning);
    }

    let dashboard = &report.dashboard;
    if !dashboard.headline.is_empty() || !dashboard.indicators.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Table 2: Key indicators");
        for tile in dashboard.headline.iter().chain(&dashboard.indicators) {
            let _ = writeln!(out, "  {}", format_tile(tile));
        }
    }

    if let Some(text) = narrative {
        let _ = writeln!(out);
        let _ = writeln!(out, "AI analysis");
        let _ = writeln!(out, "{}", text.trim_end());
    }

    if !dashboard.charts.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Table 3: Charts");
        for chart in &dashboard.charts {
            let _ = writeln!(out);
            out.push_str(&render_chart(chart));
        }
    }

    out
}
