use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::{Value, json};

use super::emit_envelope;
use crate::dataset::Dataset;
use crate::models::ToolEnvelope;

#[derive(Debug, Clone, Args)]
pub struct DatasetArgs {
    #[command(subcommand)]
    pub command: DatasetCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum DatasetCommand {
    /// Name, description, and column catalog of the sample dataset.
    Info,
    /// Every monthly record as raw JSON rows.
    Dump,
}

pub fn run(args: &DatasetArgs, dataset: &Dataset) -> Result<()> {
    match args.command {
        DatasetCommand::Info => run_info(dataset),
        DatasetCommand::Dump => run_dump(dataset),
    }
}

fn run_info(dataset: &Dataset) -> Result<()> {
    let descriptor = serde_json::to_value(dataset.descriptor())?;
    emit_envelope(ToolEnvelope::ok("dataset.info", descriptor))
}

fn run_dump(dataset: &Dataset) -> Result<()> {
    let rows: Vec<Value> = dataset
        .records()
        .iter()
        .map(|record| {
            json!({
                "date": record.date_string(),
                "mrr": record.mrr,
                "newCustomers": record.new_customers,
                "churnedCustomers": record.churned_customers,
                "cac": record.cac,
                "nps": record.nps,
                "supportTickets": record.support_tickets,
                "featureAdoption": record.feature_adoption,
            })
        })
        .collect();

    let envelope = ToolEnvelope::ok("dataset.dump", Value::Array(rows))
        .with_meta("row_count", json!(dataset.len()));
    emit_envelope(envelope)
}
