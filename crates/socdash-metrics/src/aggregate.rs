//! Summary and grouped statistics over a [`PostTable`] snapshot.
//!
//! Every function is read-only. Rows whose group key is missing or blank are
//! left out of grouped results; rows without a resolved post time are left
//! out of date-keyed results.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use socdash_ingest::{PostRecord, PostTable};

/// Sum of one metric for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

/// Number of posts on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Sum of one metric on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTotal {
    pub date: NaiveDate,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub metric: String,
    pub value: f64,
}

/// Per-metric means for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub key: String,
    pub posts: usize,
    pub means: Vec<MetricValue>,
}

impl GroupMean {
    /// Mean for `metric`, if it was requested.
    #[must_use]
    pub fn mean(&self, metric: &str) -> Option<f64> {
        self.means
            .iter()
            .find(|m| m.metric == metric)
            .map(|m| m.value)
    }
}

/// Post count for one group and its share of all keyed posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupShare {
    pub key: String,
    pub count: usize,
    /// Fraction in `[0, 1]`.
    pub share: f64,
}

#[must_use]
pub fn total_count(table: &PostTable) -> usize {
    table.len()
}

/// Sum of `metric` over every row. Absent metrics count as zero.
#[must_use]
pub fn total(table: &PostTable, metric: &str) -> f64 {
    table.posts.iter().map(|p| p.metric(metric)).sum()
}

/// Arithmetic mean of `metric`. The mean of an empty table is `0.0`.
#[must_use]
pub fn mean(table: &PostTable, metric: &str) -> f64 {
    if table.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let denom = table.len() as f64;
    total(table, metric) / denom
}

/// Sum of `metric` per distinct value of `key`, largest first.
///
/// Equal sums keep the order in which their groups first appear in the
/// table. With `top_k`, only the first `top_k` groups are returned.
#[must_use]
pub fn group_sum(
    table: &PostTable,
    key: &str,
    metric: &str,
    top_k: Option<usize>,
) -> Vec<GroupTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<GroupTotal> = Vec::new();

    for post in &table.posts {
        let Some(group) = post.field(key) else {
            continue;
        };
        let slot = *index.entry(group).or_insert_with(|| {
            rows.push(GroupTotal {
                key: group.to_string(),
                total: 0.0,
            });
            rows.len() - 1
        });
        rows[slot].total += post.metric(metric);
    }

    // `sort_by` is stable, so ties stay in first-seen order.
    rows.sort_by(|a, b| b.total.total_cmp(&a.total));

    if let Some(k) = top_k {
        rows.truncate(k);
    }
    rows
}

/// Number of posts per resolved calendar date, oldest first.
#[must_use]
pub fn group_count_by_date(table: &PostTable) -> Vec<DateCount> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in table.posts.iter().filter_map(PostRecord::posted_date) {
        *counts.entry(date).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(date, count)| DateCount { date, count })
        .collect()
}

/// Sum of `metric` per resolved calendar date, oldest first.
#[must_use]
pub fn group_sum_by_date(table: &PostTable, metric: &str) -> Vec<DateTotal> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for post in &table.posts {
        if let Some(date) = post.posted_date() {
            *totals.entry(date).or_default() += post.metric(metric);
        }
    }
    totals
        .into_iter()
        .map(|(date, total)| DateTotal { date, total })
        .collect()
}

/// Mean of each of `metrics` per distinct value of `key`, keys ascending.
#[must_use]
pub fn group_mean(table: &PostTable, key: &str, metrics: &[String]) -> Vec<GroupMean> {
    let mut groups: BTreeMap<&str, (usize, Vec<f64>)> = BTreeMap::new();

    for post in &table.posts {
        let Some(group) = post.field(key) else {
            continue;
        };
        let (count, sums) = groups
            .entry(group)
            .or_insert_with(|| (0, vec![0.0; metrics.len()]));
        *count += 1;
        for (sum, metric) in sums.iter_mut().zip(metrics) {
            *sum += post.metric(metric);
        }
    }

    groups
        .into_iter()
        .map(|(group, (count, sums))| {
            #[allow(clippy::cast_precision_loss)]
            let denom = count as f64;
            GroupMean {
                key: group.to_string(),
                posts: count,
                means: metrics
                    .iter()
                    .zip(sums)
                    .map(|(metric, sum)| MetricValue {
                        metric: metric.clone(),
                        value: sum / denom,
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Post count per distinct value of `key`, most frequent first.
///
/// Ties keep first-seen order. Shares are relative to posts that have a key.
#[must_use]
pub fn group_count(table: &PostTable, key: &str) -> Vec<GroupShare> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<GroupShare> = Vec::new();

    for post in &table.posts {
        let Some(group) = post.field(key) else {
            continue;
        };
        let slot = *index.entry(group).or_insert_with(|| {
            rows.push(GroupShare {
                key: group.to_string(),
                count: 0,
                share: 0.0,
            });
            rows.len() - 1
        });
        rows[slot].count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let keyed = rows.iter().map(|r| r.count).sum::<usize>() as f64;
    for row in &mut rows {
        #[allow(clippy::cast_precision_loss)]
        let count = row.count as f64;
        row.share = count / keyed;
    }

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};
    use socdash_core::Platform;

    use super::*;

    fn post(key: Option<&str>, likes: f64, day: Option<u32>) -> PostRecord {
        let mut fields = HashMap::new();
        if let Some(k) = key {
            fields.insert("type".to_string(), k.to_string());
        }
        PostRecord {
            fields,
            metrics: HashMap::from([
                ("likes".to_string(), likes),
                ("comments".to_string(), likes / 10.0),
            ]),
            posted_at: day.map(|d| Utc.with_ymd_and_hms(2024, 3, d, 9, 0, 0).unwrap()),
        }
    }

    fn table(posts: Vec<PostRecord>) -> PostTable {
        PostTable {
            platform: Platform::Instagram,
            columns: vec!["type".into(), "likes".into(), "comments".into()],
            numeric_columns: vec!["likes".into(), "comments".into()],
            engagement_column: "likes".into(),
            engagement_synthesized: false,
            posts,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn totals_and_means() {
        let t = table(vec![
            post(Some("a"), 5.0, None),
            post(Some("b"), 0.0, None),
            post(Some("a"), 10.0, None),
        ]);
        assert_eq!(total_count(&t), 3);
        assert!((total(&t, "likes") - 15.0).abs() < f64::EPSILON);
        assert!((mean(&t, "likes") - 5.0).abs() < f64::EPSILON);
        assert!(total(&t, "missing").abs() < f64::EPSILON);
    }

    #[test]
    fn mean_of_empty_table_is_zero() {
        let t = table(vec![]);
        assert_eq!(total_count(&t), 0);
        assert!(mean(&t, "likes").abs() < f64::EPSILON);
    }

    #[test]
    fn group_sum_orders_descending() {
        let t = table(vec![
            post(Some("small"), 1.0, None),
            post(Some("big"), 50.0, None),
            post(Some("mid"), 10.0, None),
            post(Some("small"), 1.0, None),
        ]);
        let keys: Vec<_> = group_sum(&t, "type", "likes", None)
            .into_iter()
            .map(|g| (g.key, g.total))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("big".to_string(), 50.0),
                ("mid".to_string(), 10.0),
                ("small".to_string(), 2.0)
            ]
        );
    }

    #[test]
    fn group_sum_ties_keep_first_seen_order() {
        let t = table(vec![
            post(Some("zeta"), 4.0, None),
            post(Some("alpha"), 4.0, None),
            post(Some("top"), 9.0, None),
            post(Some("mid"), 2.0, None),
            post(Some("mid"), 2.0, None),
        ]);
        let keys: Vec<_> = group_sum(&t, "type", "likes", None)
            .into_iter()
            .map(|g| g.key)
            .collect();
        assert_eq!(keys, vec!["top", "zeta", "alpha", "mid"]);
    }

    #[test]
    fn group_sum_truncates_to_top_k() {
        let posts = (0..15)
            .map(|i| post(Some(&format!("company-{i}")), f64::from(i), None))
            .collect();
        let top = group_sum(&table(posts), "type", "likes", Some(10));
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].key, "company-14");
        assert_eq!(top[9].key, "company-5");
    }

    #[test]
    fn group_sum_skips_blank_keys() {
        let t = table(vec![
            post(None, 100.0, None),
            post(Some("  "), 100.0, None),
            post(Some("a"), 1.0, None),
        ]);
        let groups = group_sum(&t, "type", "likes", None);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "a");
    }

    #[test]
    fn count_by_date_is_ascending_and_skips_unresolved() {
        let t = table(vec![
            post(None, 1.0, Some(5)),
            post(None, 1.0, Some(2)),
            post(None, 1.0, Some(5)),
            post(None, 1.0, None),
        ]);
        assert_eq!(
            group_count_by_date(&t),
            vec![
                DateCount {
                    date: date(2),
                    count: 1
                },
                DateCount {
                    date: date(5),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn sum_by_date_adds_metric_per_day() {
        let t = table(vec![
            post(None, 3.0, Some(7)),
            post(None, 4.0, Some(7)),
            post(None, 1.0, Some(1)),
            post(None, 99.0, None),
        ]);
        let series = group_sum_by_date(&t, "likes");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, date(1));
        assert!((series[1].total - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn group_mean_per_metric() {
        let t = table(vec![
            post(Some("image"), 10.0, None),
            post(Some("image"), 20.0, None),
            post(Some("video"), 5.0, None),
        ]);
        let metrics = vec!["likes".to_string(), "comments".to_string()];
        let groups = group_mean(&t, "type", &metrics);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "image");
        assert_eq!(groups[0].posts, 2);
        assert_eq!(groups[0].mean("likes"), Some(15.0));
        assert_eq!(groups[0].mean("comments"), Some(1.5));
        assert_eq!(groups[1].mean("likes"), Some(5.0));
        assert_eq!(groups[1].mean("views"), None);
    }

    #[test]
    fn group_count_shares() {
        let t = table(vec![
            post(Some("Video"), 0.0, None),
            post(Some("Image"), 0.0, None),
            post(Some("Image"), 0.0, None),
            post(Some("Sidecar"), 0.0, None),
            post(None, 0.0, None),
        ]);
        let shares = group_count(&t, "type");
        let keys: Vec<_> = shares.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["Image", "Video", "Sidecar"]);
        assert!((shares[0].share - 0.5).abs() < f64::EPSILON);
        assert!((shares.iter().map(|s| s.share).sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
