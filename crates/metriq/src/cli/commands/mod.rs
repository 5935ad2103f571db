pub mod dataset;
pub mod query;
pub mod tools;

use anyhow::{Error, Result};
use serde_json::json;

use crate::models::{EnvelopeCommandFailure, ToolEnvelope};

/// Prints a success envelope as a single JSON line, converting an encoding
/// failure into an error envelope so output stays machine-readable.
pub(crate) fn emit_envelope(envelope: ToolEnvelope) -> Result<()> {
    let tool = envelope.tool.clone();
    let encoded = serde_json::to_string(&envelope).map_err(|error| {
        Error::new(EnvelopeCommandFailure::new(
            ToolEnvelope::error(tool, "response_encode_failed", "failed to encode response")
                .with_error_details(json!({ "cause": format!("{error:#}") })),
        ))
    })?;
    println!("{encoded}");
    Ok(())
}
