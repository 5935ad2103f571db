pub mod envelope;
pub mod metrics;
pub mod results;

pub use envelope::{
    ENVELOPE_SCHEMA_VERSION, EnvelopeCommandFailure, EnvelopeError, EnvelopeMeta, ToolEnvelope,
};
pub use metrics::{Aggregation, GroupBy, InsightMetric, MetricKey, TimeRange, Trend};
pub use results::{
    AggregateSummary, ComparisonRow, DistributionBucket, LatestSnapshot, TimeSeriesPoint,
};
