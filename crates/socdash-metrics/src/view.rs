//! Turns a session and a table snapshot into a serializable [`Dashboard`].

use serde::Serialize;
use socdash_core::Platform;
use socdash_ingest::PostTable;

use crate::aggregate::{
    group_count, group_count_by_date, group_mean, group_sum, group_sum_by_date, mean, total,
    total_count, DateCount, DateTotal, GroupMean, GroupShare, GroupTotal,
};
use crate::filter::{
    available_years, default_period, filter_by_month, filter_by_range, DateRange, YearMonth,
};
use crate::histogram::{histogram, HistogramBin, DEFAULT_BINS};
use crate::session::{ActiveView, Session};

/// Column holding the company name in LinkedIn exports.
pub const COMPANY_COLUMN: &str = "activityOfCompany/name";
/// Column holding the content type in Instagram exports.
pub const TYPE_COLUMN: &str = "type";
/// Default length of the company ranking.
pub const DEFAULT_TOP_K: usize = 10;

/// Knobs that shape rendered views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub top_k: usize,
    pub histogram_bins: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            histogram_bins: DEFAULT_BINS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: String,
    pub total: f64,
    pub mean: f64,
}

/// Headline numbers shown above every view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub platform: Platform,
    pub total_posts: usize,
    pub engagement_column: String,
    pub engagement_synthesized: bool,
    pub total_engagement: f64,
    pub mean_engagement: f64,
    /// One entry per numeric column, in table order.
    pub metrics: Vec<MetricSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// No post has a usable time value.
    InvalidTime,
    /// A column the view needs is absent from the dataset.
    NotAvailable,
    /// The current filters leave nothing to show.
    NoData,
}

impl NoticeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidTime => "invalid_time",
            Self::NotAvailable => "not_available",
            Self::NoData => "no_data",
        }
    }
}

/// Chart payload for one view, or an inline notice in its place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum ViewOutput {
    Histogram {
        metric: String,
        bins: Vec<HistogramBin>,
    },
    Ranking {
        group_column: String,
        metric: String,
        rows: Vec<GroupTotal>,
    },
    DailyTotals {
        metric: String,
        points: Vec<DateTotal>,
    },
    DailyCounts {
        period: YearMonth,
        period_label: String,
        available_years: Vec<i32>,
        points: Vec<DateCount>,
    },
    GroupMeans {
        group_column: String,
        metrics: Vec<String>,
        rows: Vec<GroupMean>,
    },
    Shares {
        group_column: String,
        slices: Vec<GroupShare>,
    },
    Notice {
        reason: NoticeKind,
        message: String,
    },
}

impl ViewOutput {
    fn notice(reason: NoticeKind, message: impl Into<String>) -> Self {
        Self::Notice {
            reason,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::Notice { .. })
    }
}

/// Everything needed to draw one dashboard screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub view: ActiveView,
    pub title: &'static str,
    pub range: Option<DateRange>,
    pub summary: Summary,
    pub output: ViewOutput,
}

#[must_use]
pub fn summarize(table: &PostTable) -> Summary {
    let engagement = &table.engagement_column;
    Summary {
        platform: table.platform,
        total_posts: total_count(table),
        engagement_column: engagement.clone(),
        engagement_synthesized: table.engagement_synthesized,
        total_engagement: total(table, engagement),
        mean_engagement: mean(table, engagement),
        metrics: table
            .numeric_columns
            .iter()
            .map(|metric| MetricSummary {
                metric: metric.clone(),
                total: total(table, metric),
                mean: mean(table, metric),
            })
            .collect(),
    }
}

/// Applies the session's date range to `table`, then renders the summary
/// and the active view over the filtered rows.
#[must_use]
pub fn render(session: &Session, table: &PostTable, options: RenderOptions) -> Dashboard {
    let filtered = match &session.range {
        Some(range) => filter_by_range(table, range),
        None => table.clone(),
    };
    let output = render_view(session.active_view, &filtered, session.period, options);
    tracing::debug!(
        view = %session.active_view,
        rows = filtered.len(),
        notice = output.is_notice(),
        "view rendered"
    );
    Dashboard {
        view: session.active_view,
        title: session.active_view.title(),
        range: session.range,
        summary: summarize(&filtered),
        output,
    }
}

/// Renders one view over an already-filtered table.
///
/// `period` is only read by [`ActiveView::PostsPerDay`]; `None` picks the
/// earliest month with data.
#[must_use]
pub fn render_view(
    view: ActiveView,
    table: &PostTable,
    period: Option<YearMonth>,
    options: RenderOptions,
) -> ViewOutput {
    if table.is_empty() {
        return ViewOutput::notice(NoticeKind::NoData, "no posts match the current filters");
    }

    match view {
        ActiveView::Distribution => distribution(table, options.histogram_bins),
        ActiveView::TopCompanies => top_companies(table, options.top_k),
        ActiveView::DailyTrend => daily_trend(table),
        ActiveView::PostsPerDay => posts_per_day(table, period),
        ActiveView::Engagement => engagement_by_type(table),
        ActiveView::ContentDistribution => content_distribution(table),
    }
}

fn distribution(table: &PostTable, bins: usize) -> ViewOutput {
    let metric = &table.engagement_column;
    let values: Vec<f64> = table.posts.iter().map(|p| p.metric(metric)).collect();
    ViewOutput::Histogram {
        metric: metric.clone(),
        bins: histogram(&values, bins),
    }
}

fn top_companies(table: &PostTable, top_k: usize) -> ViewOutput {
    if !table.has_column(COMPANY_COLUMN) {
        return ViewOutput::notice(
            NoticeKind::NotAvailable,
            format!("column '{COMPANY_COLUMN}' is not in this dataset"),
        );
    }
    let rows = group_sum(table, COMPANY_COLUMN, &table.engagement_column, Some(top_k));
    if rows.is_empty() {
        return ViewOutput::notice(NoticeKind::NoData, "no posts have a company name");
    }
    ViewOutput::Ranking {
        group_column: COMPANY_COLUMN.to_string(),
        metric: table.engagement_column.clone(),
        rows,
    }
}

fn daily_trend(table: &PostTable) -> ViewOutput {
    if table.all_unresolved() {
        return ViewOutput::notice(
            NoticeKind::InvalidTime,
            "post times could not be resolved; the daily trend is unavailable",
        );
    }
    ViewOutput::DailyTotals {
        metric: table.engagement_column.clone(),
        points: group_sum_by_date(table, &table.engagement_column),
    }
}

fn posts_per_day(table: &PostTable, period: Option<YearMonth>) -> ViewOutput {
    if table.all_unresolved() {
        return ViewOutput::notice(
            NoticeKind::InvalidTime,
            "post times could not be resolved; posts per day is unavailable",
        );
    }
    let Some(period) = period.or_else(|| default_period(table)) else {
        return ViewOutput::notice(NoticeKind::NoData, "no dated posts");
    };
    let points = group_count_by_date(&filter_by_month(table, period));
    if points.is_empty() {
        return ViewOutput::notice(NoticeKind::NoData, format!("no posts in {period}"));
    }
    ViewOutput::DailyCounts {
        period,
        period_label: period.to_string(),
        available_years: available_years(table),
        points,
    }
}

fn engagement_by_type(table: &PostTable) -> ViewOutput {
    if !table.has_column(TYPE_COLUMN) {
        return ViewOutput::notice(
            NoticeKind::NotAvailable,
            format!("column '{TYPE_COLUMN}' is not in this dataset"),
        );
    }
    let rows = group_mean(table, TYPE_COLUMN, &table.numeric_columns);
    if rows.is_empty() {
        return ViewOutput::notice(NoticeKind::NotAvailable, "engagement data is not available");
    }
    ViewOutput::GroupMeans {
        group_column: TYPE_COLUMN.to_string(),
        metrics: table.numeric_columns.clone(),
        rows,
    }
}

fn content_distribution(table: &PostTable) -> ViewOutput {
    if !table.has_column(TYPE_COLUMN) {
        return ViewOutput::notice(
            NoticeKind::NotAvailable,
            format!("column '{TYPE_COLUMN}' is not in this dataset"),
        );
    }
    let slices = group_count(table, TYPE_COLUMN);
    if slices.is_empty() {
        return ViewOutput::notice(NoticeKind::NoData, "no posts have a content type");
    }
    ViewOutput::Shares {
        group_column: TYPE_COLUMN.to_string(),
        slices,
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
