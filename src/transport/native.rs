//! In-process transport backed by `reqwest` with rustls.
//!
//! Honours the same contract as the curl transport so the lifecycle layer
//! cannot tell which one is in use.

use super::{HttpResponse, Method, Transport, TransportError, TransportFuture};

/// Transport using an in-process HTTP client.
#[derive(Clone, Debug, Default)]
pub struct NativeTransport {
    client: reqwest::Client,
}

impl NativeTransport {
    /// Creates a transport with a default client configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn run(
        &self,
        method: Method,
        url: &str,
        body: Option<&str>,
        headers: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        let reqwest_method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(reqwest_method, url);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if let Some(data) = body {
            builder = builder.body(data.to_owned());
        }

        let response = builder.send().await.map_err(http_error)?;
        let status_code = response.status().as_u16();
        let text = response.text().await.map_err(http_error)?;

        Ok(HttpResponse {
            status_code,
            body: text,
        })
    }
}

fn http_error(err: reqwest::Error) -> TransportError {
    TransportError::Http {
        message: err.to_string(),
    }
}

impl Transport for NativeTransport {
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
