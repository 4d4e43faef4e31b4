use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use socdash_core::Platform;

/// One normalized row of a post export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostRecord {
    /// Retained non-numeric columns, raw cell text.
    pub fields: HashMap<String, String>,
    /// Numeric columns after coercion. Always finite and non-negative.
    pub metrics: HashMap<String, f64>,
    /// Resolved post time; `None` when the time cell could not be understood.
    pub posted_at: Option<DateTime<Utc>>,
}

impl PostRecord {
    /// Text value of `column`, or `None` if absent or blank.
    #[must_use]
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Numeric value of `column`; absent metrics read as zero.
    #[must_use]
    pub fn metric(&self, column: &str) -> f64 {
        self.metrics.get(column).copied().unwrap_or(0.0)
    }

    /// Calendar date (UTC) of the resolved post time.
    #[must_use]
    pub fn posted_date(&self) -> Option<NaiveDate> {
        self.posted_at.map(|t| t.date_naive())
    }
}

/// A normalized dataset: the retained column layout plus its rows.
///
/// Read-only once built; filters produce new snapshots through
/// [`PostTable::with_posts`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostTable {
    pub platform: Platform,
    /// Retained columns in declared order, including numeric ones.
    pub columns: Vec<String>,
    /// Columns stored in [`PostRecord::metrics`].
    pub numeric_columns: Vec<String>,
    /// Column used as the primary engagement metric.
    pub engagement_column: String,
    /// `true` when no reaction/like column existed and a zero column was added.
    pub engagement_synthesized: bool,
    pub posts: Vec<PostRecord>,
}

impl PostTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    #[must_use]
    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric_columns.iter().any(|c| c == column)
    }

    /// Same layout, different rows.
    #[must_use]
    pub fn with_posts(&self, posts: Vec<PostRecord>) -> Self {
        Self {
            platform: self.platform,
            columns: self.columns.clone(),
            numeric_columns: self.numeric_columns.clone(),
            engagement_column: self.engagement_column.clone(),
            engagement_synthesized: self.engagement_synthesized,
            posts,
        }
    }

    /// `true` when no row has a resolved post time (including the empty table).
    #[must_use]
    pub fn all_unresolved(&self) -> bool {
        self.posts.iter().all(|p| p.posted_at.is_none())
    }

    /// Earliest and latest resolved calendar dates.
    #[must_use]
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.posts.iter().filter_map(PostRecord::posted_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}
