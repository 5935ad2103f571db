use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::metrics::{Aggregation, MetricKey};

/// Scalar aggregation outcome plus the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AggregateSummary {
    pub result: i64,
    pub metric: MetricKey,
    pub aggregation: Aggregation,
    pub data_points: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TimeSeriesPoint {
    /// First-of-month date formatted `YYYY-MM-DD`.
    pub date: String,
    pub value: i64,
}

/// One comparison row: the bucket (or month) name plus one numeric field per
/// requested metric, flattened into the row object on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComparisonRow {
    pub name: String,

    #[serde(flatten)]
    pub values: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DistributionBucket {
    /// Bucket label built from the rounded numeric boundaries, `low-high`.
    pub name: String,
    /// Count of records whose value landed in this bucket.
    pub value: usize,
}

/// Most-recent-month snapshot. `churn_rate` divides the latest month's churn
/// by a running customer total accumulated from a fixed base of 1000 across
/// the whole dataset; that denominator is preserved for output parity even
/// though it is not a true active-customer balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LatestSnapshot {
    pub mrr: i64,
    /// Percent change versus the prior month, rounded to one decimal.
    pub mrr_change: f64,
    pub new_customers: i64,
    /// Percent, rounded to one decimal.
    pub churn_rate: f64,
    pub nps: i64,
}
