//! Post-time resolution.
//!
//! LinkedIn exports carry an age token (`3d`, `2w`, `1mo`) relative to the
//! moment of scraping; Instagram exports carry absolute timestamps. Both are
//! mapped to a UTC instant, or `None` when the value cannot be understood.
//! Callers pass `now` explicitly so results are reproducible.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use socdash_core::TimeKind;

/// Days in an approximated month. Not calendar-accurate.
pub const DAYS_PER_MONTH: i64 = 30;

/// Resolve `raw` according to `kind`.
#[must_use]
pub fn resolve_time(kind: TimeKind, raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match kind {
        TimeKind::Relative => resolve_relative(raw, now),
        TimeKind::Absolute => resolve_absolute(raw),
    }
}

/// Resolve an age token such as `"3d"`, `"2w"`, `"1mo"` or `"4m"` against `now`.
///
/// Rules, checked in order on the lowercased, trimmed token:
/// 1. contains `d` → N days ago, N = token with every `d` removed;
/// 2. contains `w` → N weeks ago, N = token with every `w` removed;
/// 3. contains `mo` or `m` → N × 30 days ago, N = token with `mo` then `m`
///    removed.
///
/// N must be an unsigned integer once surrounding whitespace is trimmed. A
/// token containing both `d` and `w` is handled by the day rule only.
/// Everything else, including arithmetic overflow, yields `None`.
#[must_use]
pub fn resolve_relative(token: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let token = token.trim().to_lowercase();

    let offset = if token.contains('d') {
        TimeDelta::try_days(parse_count(&token.replace('d', ""))?)?
    } else if token.contains('w') {
        TimeDelta::try_weeks(parse_count(&token.replace('w', ""))?)?
    } else if token.contains("mo") || token.contains('m') {
        let months = parse_count(&token.replace("mo", "").replace('m', ""))?;
        TimeDelta::try_days(months.checked_mul(DAYS_PER_MONTH)?)?
    } else {
        return None;
    };

    now.checked_sub_signed(offset)
}

fn parse_count(s: &str) -> Option<i64> {
    s.trim().parse::<u32>().ok().map(i64::from)
}

/// Parse an absolute timestamp.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00.000Z`), `YYYY-MM-DD HH:MM:SS[.f]`
/// with or without a `T` separator and an optional numeric offset, and a
/// bare `YYYY-MM-DD` (midnight). Naive values are taken as UTC.
#[must_use]
pub fn resolve_absolute(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn days_token() {
        assert_eq!(
            resolve_relative("3d", now()),
            Some(now() - TimeDelta::days(3))
        );
    }

    #[test]
    fn weeks_token() {
        assert_eq!(
            resolve_relative("2w", now()),
            Some(now() - TimeDelta::weeks(2))
        );
    }

    #[test]
    fn month_tokens_are_thirty_days() {
        let expected = Some(now() - TimeDelta::days(60));
        assert_eq!(resolve_relative("2mo", now()), expected);
        assert_eq!(resolve_relative("2m", now()), expected);
    }

    #[test]
    fn tokens_are_case_and_whitespace_insensitive() {
        assert_eq!(
            resolve_relative("  5D ", now()),
            Some(now() - TimeDelta::days(5))
        );
        assert_eq!(
            resolve_relative("1MO", now()),
            Some(now() - TimeDelta::days(30))
        );
    }

    #[test]
    fn space_between_number_and_suffix_is_accepted() {
        assert_eq!(
            resolve_relative("4 w", now()),
            Some(now() - TimeDelta::weeks(4))
        );
    }

    #[test]
    fn zero_is_now() {
        assert_eq!(resolve_relative("0d", now()), Some(now()));
    }

    #[test]
    fn unrecognized_tokens_are_unresolved() {
        for token in ["", "   ", "yesterday", "abc", "5h", "3 days", "d", "-3d", "1.5w"] {
            assert_eq!(resolve_relative(token, now()), None, "token {token:?}");
        }
    }

    #[test]
    fn day_rule_preempts_week_rule() {
        // "1dw" goes through the day rule, leaving "1w", which is not a number.
        assert_eq!(resolve_relative("1dw", now()), None);
        // "2wd" also hits the day rule first.
        assert_eq!(resolve_relative("2wd", now()), None);
    }

    #[test]
    fn overflowing_counts_are_unresolved() {
        assert_eq!(resolve_relative("4294967295mo", now()), None);
        assert_eq!(resolve_relative("99999999999d", now()), None);
    }

    #[test]
    fn absolute_rfc3339() {
        assert_eq!(
            resolve_absolute("2024-03-01T10:00:00.000Z"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn absolute_with_offset_is_converted_to_utc() {
        assert_eq!(
            resolve_absolute("2024-03-01T10:00:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
        );
        assert_eq!(
            resolve_absolute("2024-03-01 10:00:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn absolute_naive_forms() {
        let expected = Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap());
        assert_eq!(resolve_absolute("2024-03-01 10:30:00"), expected);
        assert_eq!(resolve_absolute("2024-03-01T10:30:00"), expected);
        assert_eq!(resolve_absolute("2024-03-01 10:30"), expected);
    }

    #[test]
    fn absolute_date_only_is_midnight() {
        assert_eq!(
            resolve_absolute("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn absolute_garbage_is_unresolved() {
        for raw in ["", "not a date", "2024-13-01", "3d"] {
            assert_eq!(resolve_absolute(raw), None, "raw {raw:?}");
        }
    }

    #[test]
    fn resolve_time_dispatches_on_kind() {
        assert_eq!(
            resolve_time(TimeKind::Relative, "1w", now()),
            Some(now() - TimeDelta::weeks(1))
        );
        assert_eq!(resolve_time(TimeKind::Absolute, "1w", now()), None);
    }
}
