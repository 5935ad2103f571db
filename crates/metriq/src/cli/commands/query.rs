use anyhow::{Error, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use super::emit_envelope;
use crate::dataset::Dataset;
use crate::models::{Aggregation, EnvelopeCommandFailure, ToolEnvelope};
use crate::normalize::{
    normalize_group_by, normalize_insight_metric, normalize_metric, normalize_time_range,
    normalize_trend,
};
use crate::{panels, query};

#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    #[command(subcommand)]
    pub command: QueryCommand,
}

/// All parameters on these subcommands are fuzzy: they pass through the
/// normalizer, so misspelled or synonym input resolves to defaults instead
/// of failing.
#[derive(Debug, Clone, Subcommand)]
pub enum QueryCommand {
    Aggregate(AggregateArgs),
    Series(SeriesArgs),
    Compare(CompareArgs),
    Distribution(DistributionArgs),
    Latest,
    Insight(InsightArgs),
}

#[derive(Debug, Clone, Args)]
pub struct AggregateArgs {
    #[arg(value_name = "METRIC")]
    pub metric: Option<String>,

    #[arg(long, value_name = "MODE")]
    pub aggregation: Option<String>,

    #[arg(long, value_name = "RANGE")]
    pub time_range: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SeriesArgs {
    #[arg(value_name = "METRIC")]
    pub metric: Option<String>,

    #[arg(long, value_name = "RANGE")]
    pub time_range: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CompareArgs {
    #[arg(value_name = "METRIC", num_args = 1..)]
    pub metrics: Vec<String>,

    #[arg(long, value_name = "UNIT")]
    pub group_by: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DistributionArgs {
    #[arg(value_name = "METRIC")]
    pub metric: Option<String>,

    #[arg(long, default_value_t = query::DEFAULT_DISTRIBUTION_SEGMENTS)]
    pub segments: usize,
}

#[derive(Debug, Clone, Args)]
pub struct InsightArgs {
    #[arg(value_name = "METRIC")]
    pub metric: Option<String>,

    #[arg(long, value_name = "DIRECTION")]
    pub trend: Option<String>,
}

pub fn run(args: &QueryArgs, dataset: &Dataset) -> Result<()> {
    match &args.command {
        QueryCommand::Aggregate(aggregate_args) => run_aggregate(aggregate_args, dataset),
        QueryCommand::Series(series_args) => run_series(series_args, dataset),
        QueryCommand::Compare(compare_args) => run_compare(compare_args, dataset),
        QueryCommand::Distribution(distribution_args) => {
            run_distribution(distribution_args, dataset)
        }
        QueryCommand::Latest => run_latest(dataset),
        QueryCommand::Insight(insight_args) => run_insight(insight_args, dataset),
    }
}

fn run_aggregate(args: &AggregateArgs, dataset: &Dataset) -> Result<()> {
    let metric = normalize_metric(args.metric.as_deref());
    let aggregation = args
        .aggregation
        .as_deref()
        .and_then(|mode| Aggregation::from_keyword(&mode.trim().to_lowercase()))
        .unwrap_or(Aggregation::Sum);
    let time_range = normalize_time_range(args.time_range.as_deref());

    let summary = query::query_data(dataset, metric, aggregation, time_range);
    let envelope = ToolEnvelope::ok("query.aggregate", encode("query.aggregate", &summary)?)
        .with_meta("time_range", json!(time_range.as_str()));
    emit_envelope(envelope)
}

fn run_series(args: &SeriesArgs, dataset: &Dataset) -> Result<()> {
    let metric = normalize_metric(args.metric.as_deref());
    let time_range = normalize_time_range(args.time_range.as_deref());

    let series = query::time_series(dataset, metric, time_range);
    let envelope = ToolEnvelope::ok("query.series", encode("query.series", &series)?)
        .with_meta("metric", json!(metric.as_str()))
        .with_meta("time_range", json!(time_range.as_str()))
        .with_meta("point_count", json!(series.len()));
    emit_envelope(envelope)
}

fn run_compare(args: &CompareArgs, dataset: &Dataset) -> Result<()> {
    let metrics: Vec<_> = args
        .metrics
        .iter()
        .map(|metric| normalize_metric(Some(metric)))
        .collect();
    let group_by = normalize_group_by(args.group_by.as_deref());

    let rows = query::comparison(dataset, &metrics, group_by);
    let envelope = ToolEnvelope::ok("query.compare", encode("query.compare", &rows)?)
        .with_meta("group_by", json!(group_by.as_str()))
        .with_meta("row_count", json!(rows.len()));
    emit_envelope(envelope)
}

fn run_distribution(args: &DistributionArgs, dataset: &Dataset) -> Result<()> {
    let metric = normalize_metric(args.metric.as_deref());

    let buckets = query::distribution(dataset, metric, args.segments);
    let envelope = ToolEnvelope::ok(
        "query.distribution",
        encode("query.distribution", &buckets)?,
    )
    .with_meta("metric", json!(metric.as_str()))
    .with_meta("segments", json!(args.segments));
    emit_envelope(envelope)
}

fn run_latest(dataset: &Dataset) -> Result<()> {
    let snapshot = query::latest_metrics(dataset);
    let envelope = ToolEnvelope::ok("query.latest", encode("query.latest", &snapshot)?);
    emit_envelope(envelope)
}

fn run_insight(args: &InsightArgs, dataset: &Dataset) -> Result<()> {
    let metric = normalize_insight_metric(args.metric.as_deref());
    let props = panels::insight_card(dataset, args.metric.as_deref(), args.trend.as_deref());
    let envelope = ToolEnvelope::ok("query.insight", encode("query.insight", &props)?)
        .with_meta("metric", json!(metric.as_str()))
        .with_meta("trend", json!(normalize_trend(args.trend.as_deref()).as_str()));
    emit_envelope(envelope)
}

fn encode<T: serde::Serialize>(tool: &str, data: &T) -> Result<serde_json::Value> {
    serde_json::to_value(data).map_err(|error| {
        Error::new(EnvelopeCommandFailure::new(
            ToolEnvelope::error(tool, "response_encode_failed", "failed to encode result")
                .with_error_details(json!({ "cause": format!("{error:#}") })),
        ))
    })
}
