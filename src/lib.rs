//! Core library for the vmlease instance-lifecycle client.
//!
//! The crate exposes the provisioning-protocol building blocks: a transport
//! abstraction (curl subprocess or native client), a per-job instance
//! client, the lifecycle controller driving start → poll-until-running →
//! stop, and the inventory renderer that turns connection details into an
//! Ansible host document.

pub mod api;
pub mod config;
pub mod credentials;
pub mod files;
pub mod inventory;
pub mod lifecycle;
pub mod test_support;
pub mod transport;

pub use api::{
    ApiError, AuthPayload, ConnectionInfo, InstanceClient, InstanceId, InstanceRequest,
    JobSnapshot, Stage,
};
pub use config::{ApiConfig, ConfigError, DEFAULT_ENDPOINT};
pub use credentials::{CREDENTIAL_FILE_NAME, CredentialError, default_remote_key};
pub use inventory::{DEFAULT_TEMPLATE, TemplateError};
pub use lifecycle::{
    DEFAULT_SLEEP_SECS, DEFAULT_TRIES, GetOptions, LifecycleController, LifecycleError,
    StartOptions, StartOutcome,
};
pub use transport::{
    CurlTransport, HttpResponse, Method, NativeTransport, Transport, TransportError,
};
