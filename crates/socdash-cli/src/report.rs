//! Markdown report covering every view of the loaded platform.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use socdash_ingest::PostTable;
use socdash_metrics::{render, ActiveView, RenderOptions, Session, ViewOutput};

use crate::output::{fmt_number, fmt_share};

/// Write a markdown report for `table` to `out`.
///
/// Every view of the session's platform is rendered with the session's
/// filters; views that cannot be drawn appear as a quoted notice.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub(crate) fn write_report(
    out: &mut impl Write,
    table: &PostTable,
    session: &Session,
    options: RenderOptions,
    generated_at: DateTime<Utc>,
) -> io::Result<()> {
    let mut session = session.clone();
    let views = ActiveView::for_platform(session.platform);

    writeln!(out, "# Social Post Report")?;
    writeln!(out)?;
    writeln!(out, "**Generated**: {}", generated_at.format("%Y-%m-%d %H:%M UTC"))?;
    writeln!(out, "**Platform**: {}", session.platform)?;
    match (session.range, table.date_bounds()) {
        (Some(range), _) => writeln!(out, "**Date range**: {} to {}", range.start, range.end)?,
        (None, Some((lo, hi))) => writeln!(out, "**Date range**: {lo} to {hi} (all posts)")?,
        (None, None) => writeln!(out, "**Date range**: no dated posts")?,
    }

    for (idx, view) in views.iter().enumerate() {
        session.active_view = *view;
        let dashboard = render(&session, table, options);

        if idx == 0 {
            let summary = &dashboard.summary;
            writeln!(out)?;
            writeln!(out, "## Summary")?;
            writeln!(out)?;
            writeln!(out, "- Total posts: {}", summary.total_posts)?;
            writeln!(
                out,
                "- Total {}: {}",
                summary.engagement_column,
                fmt_number(summary.total_engagement)
            )?;
            writeln!(
                out,
                "- Mean {}: {}",
                summary.engagement_column,
                fmt_number(summary.mean_engagement)
            )?;
            for metric in summary.metrics.iter().skip(1) {
                writeln!(
                    out,
                    "- Total {}: {} (mean {})",
                    metric.metric,
                    fmt_number(metric.total),
                    fmt_number(metric.mean)
                )?;
            }
        }

        writeln!(out)?;
        writeln!(out, "## {}", dashboard.title)?;
        writeln!(out)?;
        write_section(out, &dashboard.output)?;
    }

    Ok(())
}

fn write_section(out: &mut impl Write, output: &ViewOutput) -> io::Result<()> {
    match output {
        ViewOutput::Histogram { metric, bins } => {
            writeln!(out, "| {metric} from | to | Posts |")?;
            writeln!(out, "|---|---|---|")?;
            for bin in bins.iter().filter(|b| b.count > 0) {
                writeln!(
                    out,
                    "| {} | {} | {} |",
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
            writeln!(out, "| # | {group_column} | {metric} |")?;
            writeln!(out, "|---|---|---|")?;
            for (rank, row) in rows.iter().enumerate() {
                writeln!(out, "| {} | {} | {} |", rank + 1, row.key, fmt_number(row.total))?;
            }
        }
        ViewOutput::DailyTotals { metric, points } => {
            writeln!(out, "| Date | {metric} |")?;
            writeln!(out, "|---|---|")?;
            for point in points {
                writeln!(out, "| {} | {} |", point.date, fmt_number(point.total))?;
            }
        }
        ViewOutput::DailyCounts {
            period_label,
            points,
            ..
        } => {
            writeln!(out, "Period: {period_label}")?;
            writeln!(out)?;
            writeln!(out, "| Date | Posts |")?;
            writeln!(out, "|---|---|")?;
            for point in points {
                writeln!(out, "| {} | {} |", point.date, point.count)?;
            }
        }
        ViewOutput::GroupMeans {
            group_column,
            metrics,
            rows,
        } => {
            writeln!(out, "| {group_column} | Posts | {} |", metrics.join(" | "))?;
            writeln!(out, "|---|---|{}", "---|".repeat(metrics.len()))?;
            for row in rows {
                let means: Vec<String> = metrics
                    .iter()
                    .map(|m| fmt_number(row.mean(m).unwrap_or(0.0)))
                    .collect();
                writeln!(out, "| {} | {} | {} |", row.key, row.posts, means.join(" | "))?;
            }
        }
        ViewOutput::Shares {
            group_column,
            slices,
        } => {
            writeln!(out, "| {group_column} | Posts | Share |")?;
            writeln!(out, "|---|---|---|")?;
            for slice in slices {
                writeln!(
                    out,
                    "| {} | {} | {} |",
                    slice.key,
                    slice.count,
                    fmt_share(slice.share)
                )?;
            }
        }
        ViewOutput::Notice { reason, message } => {
            writeln!(out, "> **{}**: {message}", reason.as_str())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeZone;
    use socdash_core::Platform;
    use socdash_ingest::PostRecord;
    use socdash_metrics::COMPANY_COLUMN;

    use super::*;

    fn post(company: &str, reactions: f64, day: Option<u32>) -> PostRecord {
        PostRecord {
            fields: HashMap::from([(COMPANY_COLUMN.to_string(), company.to_string())]),
            metrics: HashMap::from([("numReactions".to_string(), reactions)]),
            posted_at: day.map(|d| Utc.with_ymd_and_hms(2024, 6, d, 9, 0, 0).unwrap()),
        }
    }

    fn table(posts: Vec<PostRecord>) -> PostTable {
        PostTable {
            platform: Platform::LinkedIn,
            columns: vec!["numReactions".into(), COMPANY_COLUMN.into()],
            numeric_columns: vec!["numReactions".into()],
            engagement_column: "numReactions".into(),
            engagement_synthesized: false,
            posts,
        }
    }

    fn report(table: &PostTable) -> String {
        let mut buf = Vec::new();
        write_report(
            &mut buf,
            table,
            &Session::new(table.platform),
            RenderOptions::default(),
            Utc.with_ymd_and_hms(2024, 6, 20, 8, 30, 0).unwrap(),
        )
        .expect("write report");
        String::from_utf8(buf).expect("utf-8 report")
    }

    #[test]
    fn report_has_a_section_per_view() {
        let text = report(&table(vec![
            post("Acme", 5.0, Some(1)),
            post("Globex", 10.0, Some(3)),
        ]));
        assert!(text.starts_with("# Social Post Report\n"));
        assert!(text.contains("**Generated**: 2024-06-20 08:30 UTC"));
        assert!(text.contains("**Date range**: 2024-06-01 to 2024-06-03 (all posts)"));
        assert!(text.contains("- Total posts: 2"));
        assert!(text.contains("- Total numReactions: 15"));
        for view in ActiveView::for_platform(Platform::LinkedIn) {
            assert!(text.contains(&format!("## {}", view.title())), "{view}");
        }
        assert!(text.contains("| 1 | Globex | 10 |"));
    }

    #[test]
    fn report_covers_views_in_order_regardless_of_active_view() {
        let table = table(vec![post("Acme", 5.0, Some(1))]);
        let mut session = Session::new(Platform::LinkedIn);
        session.select(ActiveView::TopCompanies).expect("linkedin view");
        let mut buf = Vec::new();
        write_report(
            &mut buf,
            &table,
            &session,
            RenderOptions::default(),
            Utc.with_ymd_and_hms(2024, 6, 20, 8, 30, 0).unwrap(),
        )
        .expect("write report");
        let text = String::from_utf8(buf).expect("utf-8 report");

        let positions: Vec<usize> = ActiveView::for_platform(Platform::LinkedIn)
            .iter()
            .map(|view| {
                text.find(&format!("## {}", view.title()))
                    .expect("section present")
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert_eq!(session.active_view, ActiveView::TopCompanies);
    }

    #[test]
    fn undated_posts_show_invalid_time_notice() {
        let text = report(&table(vec![post("Acme", 5.0, None)]));
        assert!(text.contains("**Date range**: no dated posts"));
        assert!(text.contains("> **invalid_time**:"));
    }
}
