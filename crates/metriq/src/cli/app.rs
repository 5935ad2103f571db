use clap::{Parser, Subcommand};

use super::commands::{dataset::DatasetArgs, query::QueryArgs, tools::ToolsArgs};

#[derive(Debug, Parser)]
#[command(
    name = "metriq",
    version,
    about = "Conversational SaaS metrics query engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run an engine operation with fuzzy, AI-style parameters.
    Query(QueryArgs),
    /// List or invoke the schema-validated tool registry.
    Tools(ToolsArgs),
    /// Describe or dump the in-memory sample dataset.
    Dataset(DatasetArgs),
}
