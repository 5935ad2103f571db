use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::OffsetDateTime;

pub const ENVELOPE_SCHEMA_VERSION: &str = "metriq.envelope.v1";

pub type EnvelopeMeta = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Uniform JSON response wrapper for every CLI command and registry call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEnvelope {
    pub ok: bool,
    pub tool: String,
    pub generated_at_utc: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    pub meta: EnvelopeMeta,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EnvelopeError>,
}

impl ToolEnvelope {
    #[must_use]
    pub fn ok(tool: impl Into<String>, data: Value) -> Self {
        let mut envelope = Self::base(tool, true);
        envelope.data = Some(data);
        envelope
    }

    #[must_use]
    pub fn error(
        tool: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let mut envelope = Self::base(tool, false);
        envelope.error = Some(EnvelopeError {
            code: code.into(),
            message: message.into(),
            details: None,
        });
        envelope
    }

    fn base(tool: impl Into<String>, ok: bool) -> Self {
        let mut meta = EnvelopeMeta::new();
        meta.insert("schema_version".to_string(), json!(ENVELOPE_SCHEMA_VERSION));

        Self {
            ok,
            tool: tool.into(),
            generated_at_utc: generated_at_utc_now(),
            data: None,
            meta,
            error: None,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_error_details(mut self, details: Value) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.details = Some(details);
        }
        self
    }
}

/// Command failure that carries its error envelope; `Display` renders the
/// envelope JSON so failures stay machine-readable on stderr.
#[derive(Debug, Clone)]
pub struct EnvelopeCommandFailure {
    envelope: ToolEnvelope,
}

impl EnvelopeCommandFailure {
    #[must_use]
    pub fn new(envelope: ToolEnvelope) -> Self {
        Self { envelope }
    }

    #[must_use]
    pub fn envelope(&self) -> &ToolEnvelope {
        &self.envelope
    }
}

impl Display for EnvelopeCommandFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(&self.envelope) {
            Ok(encoded) => f.write_str(&encoded),
            Err(_) => f.write_str("tool envelope serialization failure"),
        }
    }
}

impl std::error::Error for EnvelopeCommandFailure {}

fn generated_at_utc_now() -> String {
    let now = OffsetDateTime::now_utc();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}
