//! Error type and envelope decoding for the provisioning API.

use serde_json::Value;
use thiserror::Error;

use crate::transport::TransportError;

/// Errors raised by the instance client.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ApiError {
    /// Raised when the underlying transport fails.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Raised when the request body cannot be encoded as JSON.
    #[error("failed to encode request body: {message}")]
    Encode {
        /// Underlying serializer message.
        message: String,
    },
    /// Raised when the API responds with a non-200 status.
    #[error("{code}: {message}")]
    Status {
        /// Numeric HTTP status code.
        code: u16,
        /// Message decoded from the error envelope.
        message: String,
    },
}

impl ApiError {
    /// Decodes a non-200 response body into a [`ApiError::Status`].
    ///
    /// Message precedence: a `message` field; else `errorMessage` (trimmed,
    /// with a rendered `stackTrace` block appended when present); else the
    /// raw body text.
    #[must_use]
    pub fn from_envelope(code: u16, body: &str) -> Self {
        Self::Status {
            code,
            message: envelope_message(body),
        }
    }
}

fn envelope_message(body: &str) -> String {
    let Ok(envelope) = serde_json::from_str::<Value>(body) else {
        return body.to_owned();
    };

    if let Some(message) = envelope.get("message").and_then(Value::as_str) {
        return message.to_owned();
    }

    if let Some(error_message) = envelope.get("errorMessage").and_then(Value::as_str) {
        let mut message = error_message.trim().to_owned();
        if let Some(trace) = envelope.get("stackTrace") {
            message.push('\n');
            message.push_str(&render_stack_trace(trace));
        }
        return message;
    }

    envelope.to_string()
}

/// Renders a `stackTrace` array with one indented frame per line.
fn render_stack_trace(trace: &Value) -> String {
    let Some(frames) = trace.as_array() else {
        return format!("  {trace}");
    };

    frames
        .iter()
        .map(|frame| match frame.as_str() {
            Some(text) => format!("  {}", text.trim_end()),
            None => format!("  {frame}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
