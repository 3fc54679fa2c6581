//! Subprocess transport that delegates HTTP to the system `curl` binary.
//!
//! Shelling out keeps TLS and certificate validation in a trusted external
//! tool instead of this process. Headers are included in the captured output
//! (`--include`) so the response can be reassembled from a single stream.

use std::ffi::OsString;

use tokio::process::Command;

use super::{HttpResponse, Method, Transport, TransportError, TransportFuture, parse_raw_response};

const DEFAULT_PROGRAM: &str = "curl";

/// Transport backed by a `curl` subprocess.
#[derive(Clone, Debug)]
pub struct CurlTransport {
    program: String,
}

impl CurlTransport {
    /// Creates a transport invoking the default `curl` binary from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_owned(),
        }
    }

    /// Creates a transport invoking an explicit curl-compatible binary.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(
        &self,
        method: Method,
        url: &str,
        body: Option<&str>,
        headers: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        let args = curl_args(method, url, body, headers);
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|err| TransportError::Spawn {
                program: self.program.clone(),
                message: err.to_string(),
            })?;

        if !output.status.success() {
            return Err(TransportError::Command {
                program: self.program.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        parse_raw_response(&String::from_utf8_lossy(&output.stdout))
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for CurlTransport {
    fn request<'a>(
        &'a self,
        method: Method,
        url: &'a str,
        body: Option<&'a str>,
        headers: &'a [(String, String)],
    ) -> TransportFuture<'a, HttpResponse> {
        Box::pin(async move { self.run(method, url, body, headers).await })
    }
}

/// Builds the curl argument vector for a single request.
///
/// `--silent` suppresses progress output while `--show-error` keeps error
/// text on stderr; `--include` prepends response headers to the captured
/// stdout so the caller can parse the status line.
pub(crate) fn curl_args(
    method: Method,
    url: &str,
    body: Option<&str>,
    headers: &[(String, String)],
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        OsString::from("--silent"),
        OsString::from("--show-error"),
        OsString::from("--include"),
        OsString::from("--request"),
        OsString::from(method.as_str()),
    ];
    for (name, value) in headers {
        args.push(OsString::from("--header"));
        args.push(OsString::from(format!("{name}: {value}")));
    }
    if let Some(data) = body {
        args.push(OsString::from("--data"));
        args.push(OsString::from(data));
    }
    args.push(OsString::from(url));
    args
}
