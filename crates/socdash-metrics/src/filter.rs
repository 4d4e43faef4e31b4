//! Date-range and year/month filtering.
//!
//! Filters never mutate the source table; each returns a fresh snapshot.
//! Posts without a resolved time never match a date filter.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use socdash_ingest::{PostRecord, PostTable};

use crate::error::SessionError;

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidRange`] when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SessionError> {
        if start > end {
            return Err(SessionError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// A calendar month in a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidMonth`] unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, SessionError> {
        if !(1..=12).contains(&month) {
            return Err(SessionError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// English month name, e.g. `"March"`.
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or("", |m| m.name())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

/// Posts whose resolved date falls inside `range`.
#[must_use]
pub fn filter_by_range(table: &PostTable, range: &DateRange) -> PostTable {
    table.with_posts(
        table
            .posts
            .iter()
            .filter(|p| p.posted_date().is_some_and(|d| range.contains(d)))
            .cloned()
            .collect(),
    )
}

/// Posts whose resolved date falls inside `period`.
#[must_use]
pub fn filter_by_month(table: &PostTable, period: YearMonth) -> PostTable {
    table.with_posts(
        table
            .posts
            .iter()
            .filter(|p| p.posted_date().is_some_and(|d| period.contains(d)))
            .cloned()
            .collect(),
    )
}

/// Distinct years with at least one resolved post, ascending.
#[must_use]
pub fn available_years(table: &PostTable) -> Vec<i32> {
    table
        .posts
        .iter()
        .filter_map(PostRecord::posted_date)
        .map(|d| d.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct months of `year` with at least one resolved post, ascending.
#[must_use]
pub fn available_months(table: &PostTable, year: i32) -> Vec<u32> {
    table
        .posts
        .iter()
        .filter_map(PostRecord::posted_date)
        .filter(|d| d.year() == year)
        .map(|d| d.month())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The full span of resolved dates, or `None` if nothing is resolved.
#[must_use]
pub fn default_range(table: &PostTable) -> Option<DateRange> {
    table
        .date_bounds()
        .map(|(start, end)| DateRange { start, end })
}

/// Earliest available year paired with its earliest available month.
#[must_use]
pub fn default_period(table: &PostTable) -> Option<YearMonth> {
    let year = *available_years(table).first()?;
    let month = *available_months(table, year).first()?;
    Some(YearMonth { year, month })
}

/// Builds a range from optional bounds. A missing bound falls back to the
/// data's own bound, or to the given bound when the data's bound would
/// invert the range or nothing is dated. A lone bound past the data
/// therefore yields a range that matches no posts.
///
/// # Errors
///
/// Returns [`SessionError::InvalidRange`] when both bounds are given and the
/// start is after the end.
pub fn resolve_range(
    table: &PostTable,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Option<DateRange>, SessionError> {
    let bounds = table.date_bounds();
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => DateRange::new(start, end).map(Some),
        (Some(start), None) => {
            let end = bounds.map_or(start, |(_, hi)| hi.max(start));
            Ok(Some(DateRange { start, end }))
        }
        (None, Some(end)) => {
            let start = bounds.map_or(end, |(lo, _)| lo.min(end));
            Ok(Some(DateRange { start, end }))
        }
    }
}

/// Builds a year/month selection from optional parts.
///
/// A year without a month picks that year's earliest month with posts
/// (January if it has none); a month without a year picks the earliest
/// year with posts.
///
/// # Errors
///
/// Returns [`SessionError::InvalidMonth`] for a month outside `1..=12`.
pub fn resolve_period(
    table: &PostTable,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<Option<YearMonth>, SessionError> {
    match (year, month) {
        (None, None) => Ok(None),
        (Some(year), Some(month)) => YearMonth::new(year, month).map(Some),
        (Some(year), None) => {
            let month = available_months(table, year).first().copied().unwrap_or(1);
            YearMonth::new(year, month).map(Some)
        }
        (None, Some(month)) => {
            if !(1..=12).contains(&month) {
                return Err(SessionError::InvalidMonth(month));
            }
            Ok(available_years(table)
                .first()
                .map(|&year| YearMonth { year, month }))
        }
    }
}
