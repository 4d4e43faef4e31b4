//! Loading and normalization of social-post exports.
//!
//! [`load_dataset`] runs the loader, the column normalizer and the time
//! resolver in sequence and returns a read-only [`PostTable`].

pub mod error;
pub mod loader;
pub mod normalize;
pub mod time;
pub mod types;

use chrono::{DateTime, Utc};
use socdash_core::DatasetProfile;

pub use error::IngestError;
pub use loader::{load_csv, read_csv, RawTable};
pub use normalize::{
    coerce_number, detect_engagement_column, normalize_table, select_columns,
    SYNTHESIZED_ENGAGEMENT_COLUMN,
};
pub use time::{resolve_absolute, resolve_relative, resolve_time, DAYS_PER_MONTH};
pub use types::{PostRecord, PostTable};

/// Load the CSV named by `profile.path` and normalize it.
///
/// # Errors
///
/// Returns [`IngestError::NotFound`] when the file is absent, or another
/// [`IngestError`] when it cannot be read as CSV.
pub fn load_dataset(
    profile: &DatasetProfile,
    now: DateTime<Utc>,
) -> Result<PostTable, IngestError> {
    let raw = load_csv(&profile.path)?;
    let table = normalize_table(&raw, profile, now);
    tracing::info!(
        profile = %profile.name,
        path = %profile.path.display(),
        rows = table.len(),
        engagement = %table.engagement_column,
        "dataset loaded"
    );
    Ok(table)
}
