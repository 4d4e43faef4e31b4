//! Plain-text rendering of summaries and dashboard views.

use std::io::{self, Write};

use socdash_core::Platform;
use socdash_metrics::{ActiveView, Dashboard, DateRange, Summary, ViewOutput};

/// Width of the longest histogram bar, in characters.
const BAR_WIDTH: usize = 40;

/// Formats a metric value without a trailing `.00` for whole numbers.
pub(crate) fn fmt_number(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

pub(crate) fn fmt_share(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

pub(crate) fn write_views(
    out: &mut impl Write,
    platform: Platform,
    views: &[ActiveView],
) -> io::Result<()> {
    writeln!(out, "Views for {platform}:")?;
    for view in views {
        let marker = if *view == ActiveView::default_for(platform) {
            " (default)"
        } else {
            ""
        };
        writeln!(out, "  {:<22}{}{marker}", view.as_str(), view.title())?;
    }
    Ok(())
}

pub(crate) fn write_summary(
    out: &mut impl Write,
    summary: &Summary,
    range: Option<DateRange>,
) -> io::Result<()> {
    writeln!(out, "Platform:     {}", summary.platform)?;
    if let Some(range) = range {
        writeln!(out, "Date range:   {} to {}", range.start, range.end)?;
    }
    writeln!(out, "Total posts:  {}", summary.total_posts)?;
    let synthesized = if summary.engagement_synthesized {
        " (no engagement column found; zero-filled)"
    } else {
        ""
    };
    writeln!(
        out,
        "Engagement:   {} total {}, mean {}{synthesized}",
        summary.engagement_column,
        fmt_number(summary.total_engagement),
        fmt_number(summary.mean_engagement),
    )?;
    if summary.metrics.len() > 1 {
        writeln!(out)?;
        writeln!(out, "{:<24}{:>14}{:>12}", "METRIC", "TOTAL", "MEAN")?;
        for metric in &summary.metrics {
            writeln!(
                out,
                "{:<24}{:>14}{:>12}",
                metric.metric,
                fmt_number(metric.total),
                fmt_number(metric.mean)
            )?;
        }
    }
    Ok(())
}

pub(crate) fn write_dashboard(out: &mut impl Write, dashboard: &Dashboard) -> io::Result<()> {
    write_summary(out, &dashboard.summary, dashboard.range)?;
    writeln!(out)?;
    writeln!(out, "== {} ==", dashboard.title)?;
    write_output(out, &dashboard.output)
}

pub(crate) fn write_output(out: &mut impl Write, output: &ViewOutput) -> io::Result<()> {
    match output {
        ViewOutput::Histogram { metric, bins } => {
            let peak = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
            writeln!(out, "{:>25}  COUNT  ({metric})", "RANGE")?;
            for bin in bins {
                let bar = "#".repeat(bin.count * BAR_WIDTH / peak);
                writeln!(
                    out,
                    "{:>11} - {:>11}  {:>5}  {bar}",
                    fmt_number(bin.lower),
                    fmt_number(bin.upper),
                    bin.count
                )?;
            }
        }
        ViewOutput::Ranking {
            group_column,
            metric,
            rows,
        } => {
            writeln!(out, "{:<6}{:<40}{:>14}", "RANK", group_column, metric)?;
            for (rank, row) in rows.iter().enumerate() {
                writeln!(
                    out,
                    "{:<6}{:<40}{:>14}",
                    rank + 1,
                    row.key,
                    fmt_number(row.total)
                )?;
            }
        }
        ViewOutput::DailyTotals { metric, points } => {
            writeln!(out, "{:<12}{:>14}", "DATE", metric)?;
            for point in points {
                writeln!(out, "{:<12}{:>14}", point.date, fmt_number(point.total))?;
            }
        }
        ViewOutput::DailyCounts {
            period_label,
            available_years,
            points,
            ..
        } => {
            let years: Vec<String> = available_years.iter().map(ToString::to_string).collect();
            writeln!(
                out,
                "Period: {period_label} (years with posts: {})",
                years.join(", ")
            )?;
            writeln!(out, "{:<12}{:>8}", "DATE", "POSTS")?;
            for point in points {
                writeln!(out, "{:<12}{:>8}", point.date, point.count)?;
            }
        }
        ViewOutput::GroupMeans {
            group_column,
            metrics,
            rows,
        } => {
            write!(out, "{group_column:<16}{:>8}", "POSTS")?;
            for metric in metrics {
                write!(out, "{metric:>18}")?;
            }
            writeln!(out)?;
            for row in rows {
                write!(out, "{:<16}{:>8}", row.key, row.posts)?;
                for metric in metrics {
                    write!(out, "{:>18}", fmt_number(row.mean(metric).unwrap_or(0.0)))?;
                }
                writeln!(out)?;
            }
        }
        ViewOutput::Shares {
            group_column,
            slices,
        } => {
            writeln!(out, "{group_column:<16}{:>8}{:>9}", "POSTS", "SHARE")?;
            for slice in slices {
                writeln!(
                    out,
                    "{:<16}{:>8}{:>9}",
                    slice.key,
                    slice.count,
                    fmt_share(slice.share)
                )?;
            }
        }
        ViewOutput::Notice { reason, message } => {
            writeln!(out, "[{}] {message}", reason.as_str())?;
        }
    }
    Ok(())
}
