//! Fuzzy-string resolution for AI-supplied parameters.
//!
//! Every function here is total: unknown, empty, or missing input resolves to
//! the documented default instead of an error, because the upstream caller is
//! a language model that cannot be trusted to emit exact tokens. Substring
//! rules are evaluated in a fixed order; the first match wins even when the
//! input contains several candidate tokens.

use crate::models::{GroupBy, InsightMetric, MetricKey, TimeRange, Trend};

/// Exact-match synonym table for the full metric set. Lookups run against the
/// lowercased, trimmed input.
pub const METRIC_SYNONYMS: &[(&str, MetricKey)] = &[
    ("mrr", MetricKey::Mrr),
    ("revenue", MetricKey::Mrr),
    ("monthly recurring revenue", MetricKey::Mrr),
    ("monthly_recurring_revenue", MetricKey::Mrr),
    ("newcustomers", MetricKey::NewCustomers),
    ("new_customers", MetricKey::NewCustomers),
    ("new customers", MetricKey::NewCustomers),
    ("customers", MetricKey::NewCustomers),
    ("churnedcustomers", MetricKey::ChurnedCustomers),
    ("churned_customers", MetricKey::ChurnedCustomers),
    ("churned customers", MetricKey::ChurnedCustomers),
    ("churn", MetricKey::ChurnedCustomers),
    ("cac", MetricKey::Cac),
    ("customer acquisition cost", MetricKey::Cac),
    ("customer_acquisition_cost", MetricKey::Cac),
    ("nps", MetricKey::Nps),
    ("net promoter score", MetricKey::Nps),
    ("net_promoter_score", MetricKey::Nps),
    ("supporttickets", MetricKey::SupportTickets),
    ("support_tickets", MetricKey::SupportTickets),
    ("support tickets", MetricKey::SupportTickets),
    ("tickets", MetricKey::SupportTickets),
    ("featureadoption", MetricKey::FeatureAdoption),
    ("feature_adoption", MetricKey::FeatureAdoption),
    ("feature adoption", MetricKey::FeatureAdoption),
    ("adoption", MetricKey::FeatureAdoption),
];

/// A fully normalized request, ready for the query engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalParameters {
    pub metric: MetricKey,
    pub time_range: TimeRange,
    pub group_by: GroupBy,
    pub trend: Trend,
}

#[must_use]
pub fn normalize_request(
    metric: Option<&str>,
    time_range: Option<&str>,
    group_by: Option<&str>,
    trend: Option<&str>,
) -> CanonicalParameters {
    CanonicalParameters {
        metric: normalize_metric(metric),
        time_range: normalize_time_range(time_range),
        group_by: normalize_group_by(group_by),
        trend: normalize_trend(trend),
    }
}

/// Defaults to [`MetricKey::Mrr`] when nothing in the synonym table matches.
#[must_use]
pub fn normalize_metric(input: Option<&str>) -> MetricKey {
    let Some(input) = input else {
        return MetricKey::Mrr;
    };
    let needle = input.trim().to_lowercase();
    METRIC_SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == needle)
        .map_or(MetricKey::Mrr, |(_, key)| *key)
}

/// Ordered substring rules: churn terms beat customer terms beat satisfaction
/// terms. Defaults to [`InsightMetric::Mrr`].
#[must_use]
pub fn normalize_insight_metric(input: Option<&str>) -> InsightMetric {
    let Some(input) = input else {
        return InsightMetric::Mrr;
    };
    let needle = input.trim().to_lowercase();
    if needle.contains("churn") {
        return InsightMetric::ChurnRate;
    }
    if needle.contains("customer") || needle.contains("new") {
        return InsightMetric::NewCustomers;
    }
    if needle.contains("nps") || needle.contains("promoter") {
        return InsightMetric::Nps;
    }
    InsightMetric::Mrr
}

/// Defaults to [`TimeRange::All`].
#[must_use]
pub fn normalize_time_range(input: Option<&str>) -> TimeRange {
    let Some(input) = input else {
        return TimeRange::All;
    };
    let needle = input.trim().to_lowercase();
    if needle.contains('6') || needle.contains("six") {
        return TimeRange::Last6Months;
    }
    if needle.contains('3') || needle.contains("three") {
        return TimeRange::Last3Months;
    }
    if needle.contains("ytd") || needle.contains("year") {
        return TimeRange::Ytd;
    }
    TimeRange::All
}

/// Quarterly grouping is the default, not an error fallback.
#[must_use]
pub fn normalize_group_by(input: Option<&str>) -> GroupBy {
    let Some(input) = input else {
        return GroupBy::Quarter;
    };
    if input.trim().to_lowercase().contains("month") {
        GroupBy::Month
    } else {
        GroupBy::Quarter
    }
}

/// Defaults to [`Trend::Neutral`]. Positive vocabulary is checked before
/// negative, so "up and down" resolves up.
#[must_use]
pub fn normalize_trend(input: Option<&str>) -> Trend {
    let Some(input) = input else {
        return Trend::Neutral;
    };
    let needle = input.trim().to_lowercase();
    if needle.contains("up") || needle.contains("positive") || needle.contains("increase") {
        return Trend::Up;
    }
    if needle.contains("down") || needle.contains("negative") || needle.contains("decrease") {
        return Trend::Down;
    }
    Trend::Neutral
}
