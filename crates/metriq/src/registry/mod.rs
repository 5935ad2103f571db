//! Declarative tool/component table exposed to the orchestration caller.
//!
//! Each tool binds an external name to an input schema, an output schema, and
//! a query-engine operation. Arguments are validated against the input schema
//! before dispatch and results against the output schema after; the result
//! check is an internal consistency gate, so a failure there signals an
//! engine bug rather than a caller mistake. The registry is built once at
//! startup and read-only afterwards.

use std::fmt::{Display, Formatter};

use schemars::{JsonSchema, schema_for};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataset::Dataset;
use crate::models::{
    AggregateSummary, Aggregation, ComparisonRow, DistributionBucket, GroupBy, LatestSnapshot,
    MetricKey, TimeRange, TimeSeriesPoint,
};
use crate::panels::{BarChartProps, InsightCardProps, LineChartProps, PieChartProps};
use crate::query;

type Handler = fn(&Dataset, Value) -> Result<Value, ToolError>;

/// One externally callable operation: name, contract, implementation.
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub output_schema: Value,
    handler: Handler,
}

/// Renderer boundary entry: the registry declares the props contract but the
/// component itself lives outside this core.
pub struct ComponentDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub props_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    UnknownTool {
        name: String,
    },
    /// Caller-supplied arguments violated the input schema.
    InvalidArguments {
        tool: String,
        violations: Vec<String>,
    },
    /// Engine output violated its own declared schema; an internal bug.
    OutputContract {
        tool: String,
        violations: Vec<String>,
    },
}

impl ToolError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownTool { .. } => "unknown_tool",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::OutputContract { .. } => "output_contract_violation",
        }
    }

    #[must_use]
    pub fn violations(&self) -> &[String] {
        match self {
            Self::UnknownTool { .. } => &[],
            Self::InvalidArguments { violations, .. } | Self::OutputContract { violations, .. } => {
                violations
            }
        }
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTool { name } => {
                write!(f, "unknown tool `{name}`")
            }
            Self::InvalidArguments { tool, violations } => {
                write!(
                    f,
                    "arguments for `{tool}` violate its input schema: {}",
                    violations.join("; ")
                )
            }
            Self::OutputContract { tool, violations } => {
                write!(
                    f,
                    "result of `{tool}` violates its output schema: {}",
                    violations.join("; ")
                )
            }
        }
    }
}

impl std::error::Error for ToolError {}

/// The fixed, ordered tool and component table bound to one dataset.
pub struct ToolRegistry<'a> {
    dataset: &'a Dataset,
    tools: Vec<ToolDescriptor>,
    components: Vec<ComponentDescriptor>,
}

impl<'a> ToolRegistry<'a> {
    #[must_use]
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            tools: tool_table(),
            components: component_table(),
        }
    }

    #[must_use]
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    #[must_use]
    pub fn components(&self) -> &[ComponentDescriptor] {
        &self.components
    }

    #[must_use]
    pub fn tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|descriptor| descriptor.name == name)
    }

    /// Schema-gated dispatch: validate arguments, run the bound operation,
    /// validate the result.
    pub fn invoke(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let descriptor = self.tool(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
        })?;

        if let Err(violations) = validate_against_schema(&descriptor.input_schema, &args) {
            return Err(ToolError::InvalidArguments {
                tool: descriptor.name.to_string(),
                violations,
            });
        }

        let output = (descriptor.handler)(self.dataset, args)?;

        if let Err(violations) = validate_against_schema(&descriptor.output_schema, &output) {
            return Err(ToolError::OutputContract {
                tool: descriptor.name.to_string(),
                violations,
            });
        }

        Ok(output)
    }
}

fn validate_against_schema(schema: &Value, instance: &Value) -> Result<(), Vec<String>> {
    let compiled = jsonschema::JSONSchema::compile(schema)
        .map_err(|error| vec![format!("schema failed to compile: {error}")])?;

    let violations: Vec<String> = compiled
        .validate(instance)
        .err()
        .map(|errors| {
            errors
                .map(|error| {
                    let path = error.instance_path.to_string();
                    if path.is_empty() {
                        error.to_string()
                    } else {
                        format!("{path}: {error}")
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct QueryDataInput {
    metric: MetricKey,

    #[serde(default)]
    aggregation: Option<Aggregation>,

    #[serde(default)]
    time_range: Option<TimeRange>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct TimeSeriesInput {
    metric: MetricKey,

    #[serde(default)]
    time_range: Option<TimeRange>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ComparisonInput {
    metrics: Vec<MetricKey>,

    #[serde(default)]
    group_by: Option<GroupBy>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DistributionInput {
    metric: MetricKey,

    #[serde(default)]
    segments: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct LatestMetricsInput {}

fn tool_table() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "queryData",
            description: "Aggregate one metric over a time range (sum, avg, min, max, or count).",
            input_schema: schema_value::<QueryDataInput>(),
            output_schema: schema_value::<AggregateSummary>(),
            handler: query_data_tool,
        },
        ToolDescriptor {
            name: "getTimeSeriesData",
            description: "Monthly values of one metric over a time range, in date order.",
            input_schema: schema_value::<TimeSeriesInput>(),
            output_schema: schema_value::<Vec<TimeSeriesPoint>>(),
            handler: time_series_tool,
        },
        ToolDescriptor {
            name: "getComparisonData",
            description: "Compare metrics grouped by quarter (averaged) or by month (raw).",
            input_schema: schema_value::<ComparisonInput>(),
            output_schema: schema_value::<Vec<ComparisonRow>>(),
            handler: comparison_tool,
        },
        ToolDescriptor {
            name: "getDistributionData",
            description: "Bucket one metric into equal-width segments and count records per bucket.",
            input_schema: schema_value::<DistributionInput>(),
            output_schema: schema_value::<Vec<DistributionBucket>>(),
            handler: distribution_tool,
        },
        ToolDescriptor {
            name: "getLatestMetrics",
            description: "Snapshot of the most recent month: mrr, change, customers, churn, nps.",
            input_schema: schema_value::<LatestMetricsInput>(),
            output_schema: schema_value::<LatestSnapshot>(),
            handler: latest_metrics_tool,
        },
    ]
}

fn component_table() -> Vec<ComponentDescriptor> {
    vec![
        ComponentDescriptor {
            name: "LineChart",
            description: "A line chart for trends over time. Use for revenue, growth, or any time-series data.",
            props_schema: schema_value::<LineChartProps>(),
        },
        ComponentDescriptor {
            name: "BarChart",
            description: "A bar chart for comparing categories. Use for quarterly comparisons or category breakdowns.",
            props_schema: schema_value::<BarChartProps>(),
        },
        ComponentDescriptor {
            name: "PieChart",
            description: "A donut chart for proportional distribution. Use for segments or percentage breakdowns.",
            props_schema: schema_value::<PieChartProps>(),
        },
        ComponentDescriptor {
            name: "InsightCard",
            description: "A metric card showing one key value with a trend indicator. Use for KPIs.",
            props_schema: schema_value::<InsightCardProps>(),
        },
    ]
}

fn schema_value<T: JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T)).unwrap_or_else(|error| {
        // schemars output is always valid JSON; reaching this is a build bug.
        panic!("failed to encode generated schema: {error}")
    })
}

fn decode_input<T: DeserializeOwned>(tool: &'static str, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|error| ToolError::InvalidArguments {
        tool: tool.to_string(),
        violations: vec![error.to_string()],
    })
}

fn encode_output<T: Serialize>(tool: &'static str, output: &T) -> Result<Value, ToolError> {
    serde_json::to_value(output).map_err(|error| ToolError::OutputContract {
        tool: tool.to_string(),
        violations: vec![error.to_string()],
    })
}

fn query_data_tool(dataset: &Dataset, args: Value) -> Result<Value, ToolError> {
    let input: QueryDataInput = decode_input("queryData", args)?;
    let summary = query::query_data(
        dataset,
        input.metric,
        input.aggregation.unwrap_or(Aggregation::Sum),
        input.time_range.unwrap_or(TimeRange::All),
    );
    encode_output("queryData", &summary)
}

fn time_series_tool(dataset: &Dataset, args: Value) -> Result<Value, ToolError> {
    let input: TimeSeriesInput = decode_input("getTimeSeriesData", args)?;
    let series = query::time_series(
        dataset,
        input.metric,
        input.time_range.unwrap_or(TimeRange::All),
    );
    encode_output("getTimeSeriesData", &series)
}

fn comparison_tool(dataset: &Dataset, args: Value) -> Result<Value, ToolError> {
    let input: ComparisonInput = decode_input("getComparisonData", args)?;
    let rows = query::comparison(
        dataset,
        &input.metrics,
        input.group_by.unwrap_or(GroupBy::Quarter),
    );
    encode_output("getComparisonData", &rows)
}

fn distribution_tool(dataset: &Dataset, args: Value) -> Result<Value, ToolError> {
    let input: DistributionInput = decode_input("getDistributionData", args)?;
    let buckets = query::distribution(
        dataset,
        input.metric,
        input
            .segments
            .unwrap_or(query::DEFAULT_DISTRIBUTION_SEGMENTS),
    );
    encode_output("getDistributionData", &buckets)
}

fn latest_metrics_tool(dataset: &Dataset, args: Value) -> Result<Value, ToolError> {
    let LatestMetricsInput {} = decode_input("getLatestMetrics", args)?;
    encode_output("getLatestMetrics", &query::latest_metrics(dataset))
}
