//! Orchestration of the start, get, and stop operations.
//!
//! The controller receives a [`Transport`] at construction and owns the
//! per-operation state machines: `start` submits a create request and
//! returns the instance identifier, `get` polls the job resource against a
//! bounded try budget and renders the inventory document, and `stop`
//! submits teardown. Retrying is driven purely by a non-`running` status;
//! request failures are never retried.


use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;

use crate::api::{
    ApiError, AuthPayload, InstanceClient, InstanceId, InstanceRequest, JobSnapshot, Stage,
};
use crate::inventory;
use crate::transport::Transport;

/// Default number of poll attempts before `get` reports a timeout.
pub const DEFAULT_TRIES: u32 = 60;

/// Default delay between poll attempts, in seconds.
pub const DEFAULT_SLEEP_SECS: u64 = 10;

/// Errors raised by lifecycle operations.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LifecycleError {
    /// Raised before any network call when required inputs are missing.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when a protocol operation fails.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Raised when a poll response body cannot be decoded.
    #[error("malformed poll response for instance {instance_id}: {message}")]
    MalformedPollBody {
        /// Instance being polled.
        instance_id: String,
        /// Underlying decode error.
        message: String,
    },
    /// Raised when a running job omits its connection block.
    #[error("instance {instance_id} is running but reported no connection details")]
    MissingConnection {
        /// Instance that lacked connection details.
        instance_id: String,
    },
    /// Raised when the try budget is exhausted without seeing `running`.
    #[error("instance {instance_id} not running after {tries} attempts")]
    Timeout {
        /// Instance being polled.
        instance_id: String,
        /// Number of attempts made.
        tries: u32,
    },
}

/// Inputs for the `start` operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StartOptions {
    /// Caller-supplied identifier; a fresh UUID is generated when absent.
    pub instance_id: Option<InstanceId>,
    /// Desired platform.
    pub platform: String,
    /// Desired platform version.
    pub version: String,
    /// SSH public key material to embed verbatim.
    pub public_key: Option<String>,
    /// Dry-run query mode.
    pub query: bool,
    /// Selected auth mode; absence is a configuration error.
    pub auth: Option<AuthPayload>,
}

/// Result of a successful `start`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StartOutcome {
    /// Identifier of the provisioning job.
    pub instance_id: InstanceId,
    /// Raw JSON body returned by the API.
    pub response_body: String,
}

/// Inputs for the `get` operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GetOptions {
    /// Maximum number of poll attempts.
    pub tries: u32,
    /// Delay between attempts.
    pub sleep: Duration,
    /// Inventory template text; the built-in default is used when absent.
    pub template: Option<String>,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            tries: DEFAULT_TRIES,
            sleep: Duration::from_secs(DEFAULT_SLEEP_SECS),
            template: None,
        }
    }
}

/// Drives the instance lifecycle through an injected transport.
#[derive(Clone, Debug)]
pub struct LifecycleController<T> {
    transport: T,
    endpoint: String,
    stage: Stage,
}

impl<T> LifecycleController<T>
where
    T: Transport + Clone,
{
    /// Creates a controller bound to an API endpoint and stage.
    #[must_use]
    pub fn new(transport: T, endpoint: impl Into<String>, stage: Stage) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            stage,
        }
    }

    fn client(&self, instance_id: &InstanceId) -> InstanceClient<T> {
        InstanceClient::new(self.transport.clone(), &self.endpoint, self.stage, instance_id)
    }

    /// Submits a create request and returns the instance identifier.
    ///
    /// The identifier is settled client-side before any network call so the
    /// caller can persist it even if provisioning later stalls.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Config`] when no auth mode is selected
    /// (before any request is issued) and [`LifecycleError::Api`] when the
    /// create request fails.
    pub async fn start(&self, options: StartOptions) -> Result<StartOutcome, LifecycleError> {
        let auth = options.auth.ok_or_else(|| {
            LifecycleError::Config(
                "no authentication mode selected; use the `shippable` or `remote` subcommand"
                    .to_owned(),
            )
        })?;
        let instance_id = options.instance_id.unwrap_or_else(InstanceId::generate);

        let request = InstanceRequest {
            platform: options.platform,
            version: options.version,
            public_key: options.public_key,
            query: options.query,
            auth,
        };

        let response = self.client(&instance_id).create(&request).await?;
        Ok(StartOutcome {
            instance_id,
            response_body: response.body,
        })
    }

    /// Polls the job until it is running, then renders the inventory.
    ///
    /// Any non-`running` status keeps the loop waiting, including explicit
    /// failure statuses reported by the API; only the try budget ends the
    /// wait. A non-200 response aborts immediately.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Timeout`] when the try budget is exhausted
    /// and [`LifecycleError::Api`] when any poll request fails.
    pub async fn get(
        &self,
        instance_id: &InstanceId,
        options: &GetOptions,
    ) -> Result<String, LifecycleError> {
        let client = self.client(instance_id);

        for attempt in 1..=options.tries {
            let response = client.fetch().await?;
            let snapshot: JobSnapshot =
                response
                    .json()
                    .map_err(|err| LifecycleError::MalformedPollBody {
                        instance_id: instance_id.to_string(),
                        message: err.to_string(),
                    })?;

            if snapshot.is_running() {
                let connection =
                    snapshot
                        .connection
                        .ok_or_else(|| LifecycleError::MissingConnection {
                            instance_id: instance_id.to_string(),
                        })?;
                let template = options
                    .template
                    .as_deref()
                    .unwrap_or(inventory::DEFAULT_TEMPLATE);
                return Ok(inventory::render(template, &connection, instance_id));
            }

            if attempt < options.tries {
                sleep(options.sleep).await;
            }
        }

        Err(LifecycleError::Timeout {
            instance_id: instance_id.to_string(),
            tries: options.tries,
        })
    }

    /// Requests teardown of the job.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Api`] when the delete request fails.
    pub async fn stop(&self, instance_id: &InstanceId) -> Result<(), LifecycleError> {
        self.client(instance_id).destroy().await?;
        Ok(())
    }
}
