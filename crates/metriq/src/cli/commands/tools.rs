use anyhow::{Error, Result};
use clap::{Args, Subcommand};
use serde_json::{Value, json};

use super::emit_envelope;
use crate::dataset::Dataset;
use crate::models::{EnvelopeCommandFailure, ToolEnvelope};
use crate::registry::ToolRegistry;

#[derive(Debug, Clone, Args)]
pub struct ToolsArgs {
    #[command(subcommand)]
    pub command: ToolsCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ToolsCommand {
    /// Catalog of registered tools and renderer components.
    List(ListArgs),
    /// Invoke a tool by name with JSON arguments, schema-validated both ways.
    Call(CallArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Include the full input/output JSON Schemas in the catalog.
    #[arg(long, default_value_t = false)]
    pub schemas: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CallArgs {
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Tool arguments as a JSON object; defaults to `{}`.
    #[arg(value_name = "JSON")]
    pub args: Option<String>,
}

pub fn run(args: &ToolsArgs, dataset: &Dataset) -> Result<()> {
    let registry = ToolRegistry::new(dataset);
    match &args.command {
        ToolsCommand::List(list_args) => run_list(list_args, &registry),
        ToolsCommand::Call(call_args) => run_call(call_args, &registry),
    }
}

fn run_list(args: &ListArgs, registry: &ToolRegistry<'_>) -> Result<()> {
    let tools: Vec<Value> = registry
        .tools()
        .iter()
        .map(|tool| {
            let mut entry = json!({
                "name": tool.name,
                "description": tool.description,
            });
            if args.schemas {
                entry["inputSchema"] = tool.input_schema.clone();
                entry["outputSchema"] = tool.output_schema.clone();
            }
            entry
        })
        .collect();

    let components: Vec<Value> = registry
        .components()
        .iter()
        .map(|component| {
            let mut entry = json!({
                "name": component.name,
                "description": component.description,
            });
            if args.schemas {
                entry["propsSchema"] = component.props_schema.clone();
            }
            entry
        })
        .collect();

    let envelope = ToolEnvelope::ok(
        "tools.list",
        json!({ "tools": tools, "components": components }),
    )
    .with_meta("tool_count", json!(registry.tools().len()))
    .with_meta("component_count", json!(registry.components().len()));
    emit_envelope(envelope)
}

fn run_call(args: &CallArgs, registry: &ToolRegistry<'_>) -> Result<()> {
    let raw = args.args.as_deref().unwrap_or("{}");
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(error) => {
            let envelope =
                ToolEnvelope::error("tools.call", "invalid_arguments", "arguments are not JSON")
                    .with_error_details(json!({ "cause": error.to_string() }));
            return Err(Error::new(EnvelopeCommandFailure::new(envelope)));
        }
    };

    match registry.invoke(&args.name, parsed) {
        Ok(output) => {
            let envelope = ToolEnvelope::ok("tools.call", output).with_meta("tool_name", json!(args.name));
            emit_envelope(envelope)
        }
        Err(error) => {
            let envelope = ToolEnvelope::error("tools.call", error.code(), error.to_string())
                .with_error_details(json!({
                    "tool_name": args.name,
                    "violations": error.violations(),
                }));
            Err(Error::new(EnvelopeCommandFailure::new(envelope)))
        }
    }
}
