use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One of the seven numeric fields tracked per monthly record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    Mrr,
    NewCustomers,
    ChurnedCustomers,
    Cac,
    Nps,
    SupportTickets,
    FeatureAdoption,
}

impl MetricKey {
    pub const ALL: [Self; 7] = [
        Self::Mrr,
        Self::NewCustomers,
        Self::ChurnedCustomers,
        Self::Cac,
        Self::Nps,
        Self::SupportTickets,
        Self::FeatureAdoption,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mrr => "mrr",
            Self::NewCustomers => "newCustomers",
            Self::ChurnedCustomers => "churnedCustomers",
            Self::Cac => "cac",
            Self::Nps => "nps",
            Self::SupportTickets => "supportTickets",
            Self::FeatureAdoption => "featureAdoption",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mrr => "Monthly Recurring Revenue ($)",
            Self::NewCustomers => "New Customer Acquisitions",
            Self::ChurnedCustomers => "Churned Customers",
            Self::Cac => "Customer Acquisition Cost ($)",
            Self::Nps => "Net Promoter Score",
            Self::SupportTickets => "Support Ticket Volume",
            Self::FeatureAdoption => "Feature Adoption Rate (%)",
        }
    }
}

/// Reduced metric set used by insight summaries. Distinct from [`MetricKey`]:
/// `churnRate` is a derived ratio, not a raw column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum InsightMetric {
    Mrr,
    NewCustomers,
    ChurnRate,
    Nps,
}

impl InsightMetric {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mrr => "mrr",
            Self::NewCustomers => "newCustomers",
            Self::ChurnRate => "churnRate",
            Self::Nps => "nps",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl Aggregation {
    pub const ALL: [Self; 5] = [Self::Sum, Self::Avg, Self::Min, Self::Max, Self::Count];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
            Self::Count => "count",
        }
    }

    /// Exact keyword lookup for CLI input. Fuzzy callers default unmatched
    /// keywords to [`Aggregation::Sum`] themselves.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|aggregation| aggregation.as_str() == keyword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    All,
    Last6Months,
    Last3Months,
    Ytd,
}

impl TimeRange {
    pub const ALL_RANGES: [Self; 4] = [Self::All, Self::Last6Months, Self::Last3Months, Self::Ytd];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Last6Months => "last6months",
            Self::Last3Months => "last3months",
            Self::Ytd => "ytd",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Quarter,
    Month,
}

impl GroupBy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quarter => "quarter",
            Self::Month => "month",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Neutral => "neutral",
        }
    }
}
