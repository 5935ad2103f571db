//! Deterministic, side-effect-free computation over an immutable [`Dataset`].
//!
//! Nothing here can fail for structurally valid canonical parameters: empty
//! selections aggregate to zero and zero denominators resolve to 0.0, in line
//! with the resilience contract of the normalization layer above.

use time::{Date, Month};

use crate::dataset::{Dataset, MetricRecord, first_of_month, month_of_index};
use crate::models::{
    AggregateSummary, Aggregation, ComparisonRow, DistributionBucket, GroupBy, LatestSnapshot,
    MetricKey, TimeRange, TimeSeriesPoint,
};

/// Starting customer base for the running churn-rate denominator.
const CUSTOMER_BASE: i64 = 1_000;

pub const DEFAULT_DISTRIBUTION_SEGMENTS: usize = 4;

/// Suffix of the dataset whose date is on or after the range cutoff,
/// original order preserved. `All` returns the whole dataset; a range that
/// excludes everything returns an empty slice.
#[must_use]
pub fn filter_by_time_range(dataset: &Dataset, range: TimeRange) -> &[MetricRecord] {
    let records = dataset.records();
    let Some(cutoff) = cutoff_for(dataset.reference_now(), range) else {
        return records;
    };

    // Records are ordered by month, so the suffix starts at the first date
    // not below the cutoff.
    let start = records.partition_point(|record| record.date < cutoff);
    &records[start..]
}

/// First date included by the range. An N-month window covers the last N
/// calendar months ending at (and including) the reference month, so a
/// 3-month window over a dataset that ends at the reference month selects
/// exactly 3 records.
fn cutoff_for(now: Date, range: TimeRange) -> Option<Date> {
    match range {
        TimeRange::All => None,
        TimeRange::Last6Months => Some(window_start(now, 6)),
        TimeRange::Last3Months => Some(window_start(now, 3)),
        TimeRange::Ytd => Some(first_of_month(now.year(), Month::January)),
    }
}

fn window_start(now: Date, window_months: i32) -> Date {
    months_back(now, window_months - 1)
}

fn months_back(date: Date, months: i32) -> Date {
    let total = date.year() * 12 + i32::from(u8::from(date.month())) - 1 - months;
    let year = total.div_euclid(12);
    let month = month_of_index(total.rem_euclid(12) as usize);
    first_of_month(year, month)
}

/// Reduces values by the requested mode. Empty input yields 0 for every
/// mode; the average is the arithmetic mean rounded half-up.
#[must_use]
pub fn aggregate(values: &[i64], aggregation: Aggregation) -> i64 {
    if values.is_empty() {
        return 0;
    }

    match aggregation {
        Aggregation::Sum => values.iter().sum(),
        Aggregation::Avg => {
            let sum: i64 = values.iter().sum();
            (sum as f64 / values.len() as f64).round() as i64
        }
        Aggregation::Min => values.iter().copied().min().unwrap_or(0),
        Aggregation::Max => values.iter().copied().max().unwrap_or(0),
        Aggregation::Count => values.len() as i64,
    }
}

/// Filter, project the metric field, aggregate.
#[must_use]
pub fn query_data(
    dataset: &Dataset,
    metric: MetricKey,
    aggregation: Aggregation,
    time_range: TimeRange,
) -> AggregateSummary {
    let filtered = filter_by_time_range(dataset, time_range);
    let values: Vec<i64> = filtered.iter().map(|record| record.value(metric)).collect();

    AggregateSummary {
        result: aggregate(&values, aggregation),
        metric,
        aggregation,
        data_points: filtered.len(),
    }
}

/// Chronological `{date, value}` projection of one metric.
#[must_use]
pub fn time_series(
    dataset: &Dataset,
    metric: MetricKey,
    time_range: TimeRange,
) -> Vec<TimeSeriesPoint> {
    filter_by_time_range(dataset, time_range)
        .iter()
        .map(|record| TimeSeriesPoint {
            date: record.date_string(),
            value: record.value(metric),
        })
        .collect()
}

/// Grouped comparison over the full dataset. Quarter grouping partitions
/// records into `"Q{1-4} {year}"` buckets and averages each metric per
/// bucket (rounded); month grouping passes raw per-record values through.
/// Rows appear in first-encounter order, which is chronological because the
/// dataset is ordered.
#[must_use]
pub fn comparison(dataset: &Dataset, metrics: &[MetricKey], group_by: GroupBy) -> Vec<ComparisonRow> {
    match group_by {
        GroupBy::Month => dataset
            .records()
            .iter()
            .map(|record| ComparisonRow {
                name: record.date_string(),
                values: metrics
                    .iter()
                    .map(|metric| (metric.as_str().to_string(), record.value(*metric)))
                    .collect(),
            })
            .collect(),
        GroupBy::Quarter => {
            let mut buckets: Vec<(String, Vec<&MetricRecord>)> = Vec::new();
            for record in dataset.records() {
                let key = quarter_key(record.date);
                match buckets.iter_mut().find(|(name, _)| *name == key) {
                    Some((_, members)) => members.push(record),
                    None => buckets.push((key, vec![record])),
                }
            }

            buckets
                .into_iter()
                .map(|(name, members)| ComparisonRow {
                    name,
                    values: metrics
                        .iter()
                        .map(|metric| {
                            let values: Vec<i64> =
                                members.iter().map(|record| record.value(*metric)).collect();
                            (
                                metric.as_str().to_string(),
                                aggregate(&values, Aggregation::Avg),
                            )
                        })
                        .collect(),
                })
                .collect()
        }
    }
}

#[must_use]
pub fn quarter_key(date: Date) -> String {
    let quarter = (u8::from(date.month()) - 1) / 3 + 1;
    format!("Q{quarter} {}", date.year())
}

/// Equal-width value distribution over the full (unfiltered) dataset. Only
/// buckets actually hit appear, in first-hit order; a value exactly at the
/// maximum is clamped into the last bucket. Accumulation is keyed by the
/// rounded `low-high` label, so segments whose boundaries round to the same
/// label merge into one bucket. When every value is identical the width is
/// zero and everything lands in bucket 0.
#[must_use]
pub fn distribution(
    dataset: &Dataset,
    metric: MetricKey,
    segments: usize,
) -> Vec<DistributionBucket> {
    let records = dataset.records();
    if records.is_empty() || segments == 0 {
        return Vec::new();
    }

    let values: Vec<i64> = records.iter().map(|record| record.value(metric)).collect();
    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);
    let width = (max - min) as f64 / segments as f64;

    let mut buckets: Vec<DistributionBucket> = Vec::new();
    for value in &values {
        let index = if width > 0.0 {
            ((((value - min) as f64) / width).floor() as usize).min(segments - 1)
        } else {
            0
        };
        let low = (min as f64 + index as f64 * width).round() as i64;
        let high = (min as f64 + (index + 1) as f64 * width).round() as i64;
        let name = format!("{low}-{high}");
        match buckets.iter_mut().find(|bucket| bucket.name == name) {
            Some(bucket) => bucket.value += 1,
            None => buckets.push(DistributionBucket { name, value: 1 }),
        }
    }
    buckets
}

/// Snapshot of the most recent month. See [`LatestSnapshot`] for the churn
/// denominator caveat. Zero or missing denominators resolve to 0.0.
#[must_use]
pub fn latest_metrics(dataset: &Dataset) -> LatestSnapshot {
    let records = dataset.records();
    let Some(latest) = records.last() else {
        return LatestSnapshot::default();
    };

    let previous = records.len().checked_sub(2).map(|index| &records[index]);
    let mrr_change = match previous {
        Some(previous) if previous.mrr > 0 => {
            round_one_decimal((latest.mrr - previous.mrr) as f64 / previous.mrr as f64 * 100.0)
        }
        _ => 0.0,
    };

    let customer_base: i64 = CUSTOMER_BASE
        + records
            .iter()
            .map(|record| record.new_customers - record.churned_customers)
            .sum::<i64>();
    let churn_rate = if customer_base > 0 {
        round_one_decimal(latest.churned_customers as f64 / customer_base as f64 * 100.0)
    } else {
        0.0
    };

    LatestSnapshot {
        mrr: latest.mrr,
        mrr_change,
        new_customers: latest.new_customers,
        churn_rate,
        nps: latest.nps,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
