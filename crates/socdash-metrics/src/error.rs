use chrono::NaiveDate;
use socdash_core::Platform;
use thiserror::Error;

use crate::session::ActiveView;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid month {0}; expected 1-12")]
    InvalidMonth(u32),

    #[error("unknown view '{0}'")]
    UnknownView(String),

    #[error("view '{view}' is not available for {platform} datasets")]
    ViewNotAvailable { view: ActiveView, platform: Platform },
}
