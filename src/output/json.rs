//! JSON output formatting
//!
//! Every `--format json` result is wrapped as `{data, meta}` so scripts can
//! tell which reqgate build produced it and when.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A command result plus its metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T> {
    pub data: T,
    pub meta: Metadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Metadata {
    /// RFC 3339 time the output was produced
    pub timestamp: String,

    /// reqgate version
    pub version: String,
}

impl<T> JsonOutput<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

/// Format data as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data))
}

/// Format an untyped restlet payload.
///
/// The payload must be valid JSON; it is wrapped like any other result.
pub fn format_payload(payload: &[u8]) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_slice(payload)?;
    format_json(&value)
}
