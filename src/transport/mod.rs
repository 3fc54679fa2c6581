//! HTTP transport abstraction for the provisioning API.
//!
//! The lifecycle layer never talks to the network directly; it goes through
//! the [`Transport`] trait so tests can substitute a scripted double. Two
//! implementations are provided: [`CurlTransport`] shells out to the system
//! `curl` binary and parses its raw header+body output, and
//! [`NativeTransport`] uses an in-process `reqwest` client. Neither performs
//! retries; polling policy belongs to the lifecycle controller.

mod curl;
mod native;

use std::future::Future;
use std::pin::Pin;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use curl::CurlTransport;
pub use native::NativeTransport;

/// HTTP methods used by the provisioning protocol.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method {
    /// Retrieve a job resource.
    Get,
    /// Create or query a job resource.
    Put,
    /// Destroy a job resource.
    Delete,
}

impl Method {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// A parsed HTTP response: status code plus the raw body text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpResponse {
    /// Numeric status code from the response status line.
    pub status_code: u16,
    /// Raw response body, undecoded.
    pub body: String,
}

impl HttpResponse {
    /// Decodes the body as JSON into the requested type.
    ///
    /// The decode is performed lazily on demand; the response itself only
    /// stores the raw text.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error when the body is not valid
    /// JSON for the target type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Errors raised by transport implementations.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TransportError {
    /// Raised when the external HTTP program cannot be started.
    #[error("failed to spawn {program}: {message}")]
    Spawn {
        /// Program that could not be started.
        program: String,
        /// Underlying error message.
        message: String,
    },
    /// Raised when the external HTTP program exits unsuccessfully.
    #[error("{program} failed: {message}")]
    Command {
        /// Program that failed.
        program: String,
        /// Captured standard error text.
        message: String,
    },
    /// Raised when captured output has no header/body separator.
    #[error("response has no header/body boundary")]
    MissingBoundary,
    /// Raised when the status line cannot be parsed.
    #[error("malformed status line: {line}")]
    MalformedStatusLine {
        /// The offending first line of the header block.
        line: String,
    },
    /// Raised when the native HTTP client fails to complete a request.
    #[error("http request failed: {message}")]
    Http {
        /// Underlying client error message.
        message: String,
    },
}

/// Future returned by transport operations.
pub type TransportFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send + 'a>>;

/// Minimal interface for issuing a single HTTP request.
pub trait Transport {
    /// Issues `method` against `url`, attaching `body` and `headers` when
    /// present, and returns the parsed response.
    fn request<'a>(
        &'a self,
        method: Method,
        url: &'a str,
        body: Option<&'a str>,
        headers: &'a [(String, String)],
    ) -> TransportFuture<'a, HttpResponse>;
}

/// Splits raw header+body output into an [`HttpResponse`].
///
/// The split happens at the first `\r\n\r\n` boundary. The second
/// whitespace-delimited token of the first header line is parsed as the
/// status code; anything else is a fatal parse error.
pub(crate) fn parse_raw_response(raw: &str) -> Result<HttpResponse, TransportError> {
    let (head, body) = raw
        .split_once("\r\n\r\n")
        .ok_or(TransportError::MissingBoundary)?;

    let status_line = head.lines().next().unwrap_or_default();
    let status_code = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|token| token.parse::<u16>().ok())
        .ok_or_else(|| TransportError::MalformedStatusLine {
            line: status_line.to_owned(),
        })?;

    Ok(HttpResponse {
        status_code,
        body: body.to_owned(),
    })
}
