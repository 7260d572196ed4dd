//! Wire format of the execution service.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::run::TransportError;

/// Shown when a response carries nothing printable.
pub const NO_OUTPUT: &str = "No output";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub code: String,
}

impl RunRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn to_json(&self) -> Result<String, TransportError> {
        serde_json::to_string(self).map_err(|error| TransportError::Decode(error.to_string()))
    }
}

/// Response body of `POST /run`.
///
/// Every field is optional; unknown fields are ignored. Field values of an
/// unexpected type never fail the decode: non-string output is rendered as
/// JSON text, a malformed `error` or `returncode` is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResponse {
    #[serde(default, deserialize_with = "output_field")]
    pub stdout: Option<String>,
    #[serde(default, deserialize_with = "output_field")]
    pub stderr: Option<String>,
    /// Set by the service when it could not start the interpreter at all.
    #[serde(default, deserialize_with = "text_field")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "exit_code_field")]
    pub returncode: Option<i64>,
}

fn output_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn text_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Accepts `0` and `"0"`.
fn exit_code_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

impl RunResponse {
    pub fn from_json(body: &str) -> Result<Self, TransportError> {
        serde_json::from_str(body).map_err(|error| TransportError::Decode(error.to_string()))
    }

    /// Text for the output pane: first non-empty of `stdout`, `stderr`,
    /// `error`, else [`NO_OUTPUT`].
    pub fn output_text(&self) -> String {
        [&self.stdout, &self.stderr, &self.error]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
            .cloned()
            .unwrap_or_else(|| NO_OUTPUT.to_owned())
    }
}
