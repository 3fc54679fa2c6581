//! Wire types for the provisioning API.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

/// Job status value the poller treats as terminal success.
pub const RUNNING_STATUS: &str = "running";

/// Default SSH port when the API omits one from the connection block.
pub const DEFAULT_CONNECTION_PORT: u16 = 22;

/// Opaque identifier for one provisioning job.
///
/// Generated client-side before the first network call; the caller is
/// responsible for persisting it between `start` and `get`/`stop`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstanceId(String);

impl InstanceId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for InstanceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for InstanceId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deployment environment of the provisioning API.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Stage {
    /// Development deployment.
    #[default]
    Dev,
    /// Production deployment.
    Prod,
}

impl Stage {
    /// Returns the path segment used in resource URIs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a stage value is not `dev` or `prod`.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown stage `{0}`; expected `dev` or `prod`")]
pub struct StageParseError(String);

impl FromStr for Stage {
    type Err = StageParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(StageParseError(other.to_owned())),
        }
    }
}

/// Authentication payload attached to a create request.
///
/// Exactly one variant is present per request; the discriminant makes a
/// request with no auth mode unrepresentable.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPayload {
    /// CI-delegated authentication using Shippable run coordinates.
    Shippable {
        /// Run identifier assigned by the CI system.
        run_id: String,
        /// Job number within the run.
        job_number: String,
    },
    /// Direct authentication with a pre-shared key.
    Remote {
        /// Pre-shared API key.
        key: String,
        /// Optional nonce for replay protection.
        #[serde(skip_serializing_if = "Option::is_none")]
        nonce: Option<String>,
    },
}

/// Parameters for creating (or dry-run querying) a remote test instance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstanceRequest {
    /// Desired platform (for example `windows-2019`).
    pub platform: String,
    /// Desired platform version or build.
    pub version: String,
    /// SSH public key material embedded verbatim, when supplied.
    pub public_key: Option<String>,
    /// When set, the API reports what it would provision without doing so.
    pub query: bool,
    /// Authentication payload; exactly one mode.
    pub auth: AuthPayload,
}

// The wire shape nests the environment fields under `config` while `auth`
// stays top-level, so serialization goes through an explicit wire struct.
impl Serialize for InstanceRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct WireConfig<'a> {
            platform: &'a str,
            version: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            public_key: Option<&'a str>,
            query: bool,
        }

        let config = WireConfig {
            platform: &self.platform,
            version: &self.version,
            public_key: self.public_key.as_deref(),
            query: self.query,
        };

        let mut state = serializer.serialize_struct("InstanceRequest", 2)?;
        state.serialize_field("config", &config)?;
        state.serialize_field("auth", &self.auth)?;
        state.end()
    }
}

/// Connection details reported once a job reaches `running`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ConnectionInfo {
    /// Hostname or address of the leased instance.
    pub hostname: String,
    /// Connection port; defaults to 22 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Login username.
    pub username: String,
    /// Login password; defaults to empty when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ConnectionInfo {
    /// Returns the connection port, applying the protocol default.
    #[must_use]
    pub const fn port_or_default(&self) -> u16 {
        match self.port {
            Some(port) => port,
            None => DEFAULT_CONNECTION_PORT,
        }
    }

    /// Returns the password, applying the empty-string default.
    #[must_use]
    pub fn password_or_default(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }
}

/// Body of a successful poll response.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct JobSnapshot {
    /// Status reported by the API; only `running` is terminal success.
    pub status: String,
    /// Connection block, present once the job is running.
    #[serde(default)]
    pub connection: Option<ConnectionInfo>,
}

impl JobSnapshot {
    /// Returns `true` when the job has reached the running state.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == RUNNING_STATUS
    }
}
