//! Renderer-facing seam: the chart surface calls these builders with raw,
//! possibly AI-generated strings. Each builder normalizes its inputs, runs
//! the query engine, and returns props conforming to the matching component
//! schema in the registry. Like the normalizer, nothing here fails on
//! unrecognized input.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::dataset::Dataset;
use crate::models::{
    ComparisonRow, DistributionBucket, InsightMetric, MetricKey, TimeSeriesPoint, Trend,
};
use crate::normalize::{
    normalize_group_by, normalize_insight_metric, normalize_metric, normalize_time_range,
    normalize_trend,
};
use crate::query;

pub const DEFAULT_LINE_COLOR: &str = "#00f0ff";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LineChartProps {
    pub data: Vec<TimeSeriesPoint>,
    pub title: String,
    pub x_axis_key: String,
    pub y_axis_key: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BarChartProps {
    pub data: Vec<ComparisonRow>,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PieChartProps {
    pub data: Vec<DistributionBucket>,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InsightCardProps {
    pub title: String,
    pub value: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,

    pub trend: Trend,
}

#[must_use]
pub fn line_chart(
    dataset: &Dataset,
    metric: Option<&str>,
    time_range: Option<&str>,
) -> LineChartProps {
    let metric = normalize_metric(metric);
    let time_range = normalize_time_range(time_range);

    LineChartProps {
        data: query::time_series(dataset, metric, time_range),
        title: panel_title(metric.label(), time_range.as_str()),
        x_axis_key: "date".to_string(),
        y_axis_key: "value".to_string(),
        color: DEFAULT_LINE_COLOR.to_string(),
    }
}

#[must_use]
pub fn bar_chart(dataset: &Dataset, metrics: &[&str], group_by: Option<&str>) -> BarChartProps {
    let metrics: Vec<MetricKey> = if metrics.is_empty() {
        vec![MetricKey::Mrr]
    } else {
        metrics
            .iter()
            .map(|metric| normalize_metric(Some(metric)))
            .collect()
    };
    let group_by = normalize_group_by(group_by);

    BarChartProps {
        data: query::comparison(dataset, &metrics, group_by),
        title: format!("Comparison by {}", group_by.as_str()),
    }
}

#[must_use]
pub fn pie_chart(dataset: &Dataset, metric: Option<&str>, segments: Option<usize>) -> PieChartProps {
    let metric = normalize_metric(metric);
    let segments = segments.unwrap_or(query::DEFAULT_DISTRIBUTION_SEGMENTS);

    PieChartProps {
        data: query::distribution(dataset, metric, segments),
        title: format!("{} distribution", metric.label()),
    }
}

#[must_use]
pub fn insight_card(
    dataset: &Dataset,
    metric: Option<&str>,
    trend: Option<&str>,
) -> InsightCardProps {
    let metric = normalize_insight_metric(metric);
    let trend = normalize_trend(trend);
    let snapshot = query::latest_metrics(dataset);

    let (title, value, change) = match metric {
        InsightMetric::Mrr => (
            "Monthly Recurring Revenue",
            json!(snapshot.mrr),
            Some(snapshot.mrr_change),
        ),
        InsightMetric::NewCustomers => ("New Customers", json!(snapshot.new_customers), None),
        InsightMetric::ChurnRate => ("Churn Rate", json!(snapshot.churn_rate), None),
        InsightMetric::Nps => ("Net Promoter Score", json!(snapshot.nps), None),
    };

    InsightCardProps {
        title: title.to_string(),
        value,
        change,
        trend,
    }
}

fn panel_title(label: &str, range: &str) -> String {
    if range == "all" {
        label.to_string()
    } else {
        format!("{label}, {range}")
    }
}
