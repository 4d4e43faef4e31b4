//! Normalization from a [`RawTable`] to a [`PostTable`].
//!
//! Column layout is driven by the [`DatasetProfile`]; time parsing is
//! delegated to [`crate::time`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use socdash_core::DatasetProfile;

use crate::loader::RawTable;
use crate::time::resolve_time;
use crate::types::{PostRecord, PostTable};

/// Name of the zero-filled column added when no engagement column exists.
pub const SYNTHESIZED_ENGAGEMENT_COLUMN: &str = "reaction_count";

/// Returns the first column whose name contains `reaction` or `like`
/// (case-insensitive), scanning `columns` in declared order.
#[must_use]
pub fn detect_engagement_column(columns: &[String]) -> Option<&str> {
    columns
        .iter()
        .find(|c| {
            let lower = c.to_lowercase();
            lower.contains("reaction") || lower.contains("like")
        })
        .map(String::as_str)
}

/// Coerce a raw cell into a finite, non-negative number.
///
/// Unparseable, negative, `NaN` and infinite values all become `0.0`.
/// Applying this to the textual form of its own output is a no-op.
#[must_use]
pub fn coerce_number(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Columns to retain: the allowlist intersected with `headers` (allowlist
/// order), or every header when the allowlist is empty. Duplicates are
/// dropped.
#[must_use]
pub fn select_columns(headers: &[String], allowlist: &[String]) -> Vec<String> {
    let candidates = if allowlist.is_empty() {
        headers
    } else {
        allowlist
    };

    let mut selected: Vec<String> = Vec::new();
    for column in candidates {
        if headers.contains(column) && !selected.contains(column) {
            selected.push(column.clone());
        }
    }
    selected
}

/// Normalizes a [`RawTable`] according to `profile`.
///
/// Relative time tokens are resolved against `now`. When
/// `profile.drop_unresolved` is set, rows without a resolvable time are
/// removed; otherwise they are kept with `posted_at = None`.
#[must_use]
pub fn normalize_table(
    raw: &RawTable,
    profile: &DatasetProfile,
    now: DateTime<Utc>,
) -> PostTable {
    let mut columns = select_columns(&raw.headers, &profile.columns);

    let missing: Vec<&String> = profile
        .columns
        .iter()
        .filter(|c| !raw.headers.contains(c))
        .collect();
    if !missing.is_empty() {
        tracing::warn!(profile = %profile.name, ?missing, "expected columns absent from dataset");
    }

    let detected = detect_engagement_column(&columns).map(str::to_string);
    let (engagement_column, engagement_synthesized) = match detected {
        Some(col) => (col, false),
        None => {
            tracing::warn!(
                profile = %profile.name,
                "no reaction/like column found; using zero-filled {SYNTHESIZED_ENGAGEMENT_COLUMN}"
            );
            columns.push(SYNTHESIZED_ENGAGEMENT_COLUMN.to_string());
            (SYNTHESIZED_ENGAGEMENT_COLUMN.to_string(), true)
        }
    };

    let mut numeric_columns = vec![engagement_column.clone()];
    for col in &profile.numeric_columns {
        if columns.contains(col) && !numeric_columns.contains(col) {
            numeric_columns.push(col.clone());
        }
    }

    // (column name, source index) for every retained column present in the file.
    let layout: Vec<(&String, usize)> = columns
        .iter()
        .filter_map(|c| raw.column_index(c).map(|idx| (c, idx)))
        .collect();

    let time_idx = raw.column_index(&profile.time_column);
    if time_idx.is_none() {
        tracing::warn!(
            profile = %profile.name,
            column = %profile.time_column,
            "time column missing; every post is unresolved"
        );
    }

    let mut coerced_cells = 0usize;
    let mut posts = Vec::with_capacity(raw.records.len());

    for record in &raw.records {
        let mut fields = HashMap::new();
        let mut metrics = HashMap::new();

        for &(column, idx) in &layout {
            let cell = record.get(idx).map_or("", String::as_str);
            if numeric_columns.contains(column) {
                if !cell.trim().is_empty() && cell.trim().parse::<f64>().is_err() {
                    coerced_cells += 1;
                }
                metrics.insert(column.clone(), coerce_number(cell));
            } else {
                fields.insert(column.clone(), cell.to_string());
            }
        }

        if engagement_synthesized {
            metrics.insert(engagement_column.clone(), 0.0);
        }

        let posted_at = time_idx
            .and_then(|idx| record.get(idx))
            .and_then(|cell| resolve_time(profile.time_kind, cell, now));

        posts.push(PostRecord {
            fields,
            metrics,
            posted_at,
        });
    }

    let unresolved = posts.iter().filter(|p| p.posted_at.is_none()).count();
    if profile.drop_unresolved && unresolved > 0 {
        posts.retain(|p| p.posted_at.is_some());
        tracing::info!(
            profile = %profile.name,
            dropped = unresolved,
            "dropped posts with unresolvable time"
        );
    }

    tracing::debug!(
        profile = %profile.name,
        coerced_cells,
        unresolved,
        "normalization complete"
    );

    PostTable {
        platform: profile.platform,
        columns,
        numeric_columns,
        engagement_column,
        engagement_synthesized,
        posts,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
