//! Test support utilities shared across unit and integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::transport::{HttpResponse, Method, Transport, TransportError, TransportFuture};

/// Scripted transport that returns pre-seeded responses in FIFO order.
///
/// Records every request so tests can assert on methods, URLs, bodies, and
/// headers without touching the network.
#[derive(Clone, Debug, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    responses: VecDeque<Result<HttpResponse, TransportError>>,
    requests: Vec<RecordedRequest>,
}

/// Records a single request issued through [`ScriptedTransport`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordedRequest {
    /// HTTP method used.
    pub method: Method,
    /// Full request URL.
    pub url: String,
    /// Request body, when present.
    pub body: Option<String>,
    /// Headers attached to the request.
    pub headers: Vec<(String, String)>,
}

impl ScriptedTransport {
    /// Creates a transport with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response with the given status code and body.
    pub fn push_response(&self, status_code: u16, body: impl Into<String>) {
        self.lock().responses.push_back(Ok(HttpResponse {
            status_code,
            body: body.into(),
        }));
    }

    /// Queues a transport-level failure.
    pub fn push_error(&self, error: TransportError) {
        self.lock().responses.push_back(Err(error));
    }

    /// Returns a snapshot of all requests recorded so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Returns how many requests have been issued.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|err| panic!("scripted transport lock poisoned: {err}"))
    }
}

impl Transport for ScriptedTransport {
    fn request<'a>(
        &'a self,
        method: Method,
        url: &'a str,
        body: Option<&'a str>,
        headers: &'a [(String, String)],
    ) -> TransportFuture<'a, HttpResponse> {
        Box::pin(async move {
            let mut state = self.lock();
            state.requests.push(RecordedRequest {
                method,
                url: url.to_owned(),
                body: body.map(ToOwned::to_owned),
                headers: headers.to_vec(),
            });
            state.responses.pop_front().unwrap_or_else(|| {
                Err(TransportError::Http {
                    message: "no scripted response available".to_owned(),
                })
            })
        })
    }
}
