//! Client for a single provisioning job resource.
//!
//! A client is bound to one canonical resource URI of the form
//! `{endpoint}/{stage}/jobs/{instance_id}` and issues the three protocol
//! operations against it. Every non-200 response is decoded through the
//! API's JSON error envelope and surfaced as an [`ApiError`].

mod error;
#[cfg(test)]
mod tests;
mod types;

use crate::transport::{HttpResponse, Method, Transport};

pub use error::ApiError;
pub use types::{
    AuthPayload, ConnectionInfo, DEFAULT_CONNECTION_PORT, InstanceId, InstanceRequest,
    JobSnapshot, RUNNING_STATUS, Stage, StageParseError,
};

const JSON_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// Client bound to one job resource of the provisioning API.
#[derive(Clone, Debug)]
pub struct InstanceClient<T> {
    transport: T,
    url: String,
}

impl<T: Transport> InstanceClient<T> {
    /// Builds a client for `instance_id` under the given endpoint and stage.
    ///
    /// A trailing slash on the endpoint is tolerated so configuration values
    /// and CLI flags compose into the same canonical URI.
    #[must_use]
    pub fn new(transport: T, endpoint: &str, stage: Stage, instance_id: &InstanceId) -> Self {
        let url = format!(
            "{}/{}/jobs/{}",
            endpoint.trim_end_matches('/'),
            stage.as_str(),
            instance_id
        );
        Self { transport, url }
    }

    /// Returns the canonical resource URI this client targets.
    #[must_use]
    pub fn resource_url(&self) -> &str {
        &self.url
    }

    /// Submits a create (or dry-run query) request for the job.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the body cannot be encoded, the transport
    /// fails, or the API responds with a non-200 status.
    pub async fn create(&self, request: &InstanceRequest) -> Result<HttpResponse, ApiError> {
        let body = serde_json::to_string(request).map_err(|err| ApiError::Encode {
            message: err.to_string(),
        })?;
        let headers = [(
            JSON_CONTENT_TYPE.0.to_owned(),
            JSON_CONTENT_TYPE.1.to_owned(),
        )];
        let response = self
            .transport
            .request(Method::Put, &self.url, Some(&body), &headers)
            .await?;
        check_status(response)
    }

    /// Fetches the current job state.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the transport fails or the API responds
    /// with a non-200 status.
    pub async fn fetch(&self) -> Result<HttpResponse, ApiError> {
        let response = self
            .transport
            .request(Method::Get, &self.url, None, &[])
            .await?;
        check_status(response)
    }

    /// Requests teardown of the job.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the transport fails or the API responds
    /// with a non-200 status.
    pub async fn destroy(&self) -> Result<HttpResponse, ApiError> {
        let response = self
            .transport
            .request(Method::Delete, &self.url, None, &[])
            .await?;
        check_status(response)
    }
}

fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.status_code == 200 {
        return Ok(response);
    }
    Err(ApiError::from_envelope(
        response.status_code,
        &response.body,
    ))
}
