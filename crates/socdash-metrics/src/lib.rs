//! Aggregates, filters and view rendering over a normalized [`PostTable`].
//!
//! [`PostTable`]: socdash_ingest::PostTable

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod session;
pub mod view;

pub use aggregate::{
    group_count, group_count_by_date, group_mean, group_sum, group_sum_by_date, mean, total,
    total_count, DateCount, DateTotal, GroupMean, GroupShare, GroupTotal, MetricValue,
};
pub use error::SessionError;
pub use filter::{
    available_months, available_years, default_period, default_range, filter_by_month,
    filter_by_range, resolve_period, resolve_range, DateRange, YearMonth,
};
pub use histogram::{histogram, HistogramBin, DEFAULT_BINS};
pub use session::{ActiveView, Session};
pub use view::{
    render, render_view, summarize, Dashboard, MetricSummary, NoticeKind, RenderOptions, Summary,
    ViewOutput, COMPANY_COLUMN, DEFAULT_TOP_K, TYPE_COLUMN,
};
