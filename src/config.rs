//! Configuration loading via `ortho-config`.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::api::Stage;

/// Built-in provisioning API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://provision.vmlease.io";

/// Provisioning API settings derived from configuration files and
/// `VMLEASE_*` environment variables. CLI flags override both.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "VMLEASE")]
pub struct ApiConfig {
    /// Base URL of the provisioning API.
    #[ortho_config(default = DEFAULT_ENDPOINT.to_owned())]
    pub endpoint: String,
    /// Deployment stage of the API, `dev` or `prod`.
    #[ortho_config(default = "dev".to_owned())]
    pub stage: String,
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or invalid.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl ApiConfig {
    /// Loads configuration without attempting to parse CLI arguments.
    /// Values merge defaults, configuration files, and environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("vmlease")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Resolves the effective endpoint, preferring an explicit override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the resolved value is empty.
    pub fn resolve_endpoint(&self, override_value: Option<&str>) -> Result<String, ConfigError> {
        let endpoint = override_value.unwrap_or(&self.endpoint).trim();
        if endpoint.is_empty() {
            return Err(ConfigError::Invalid(
                "endpoint must not be empty; set --endpoint or VMLEASE_ENDPOINT".to_owned(),
            ));
        }
        Ok(endpoint.to_owned())
    }

    /// Resolves the effective stage, preferring an explicit override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the value is neither `dev` nor
    /// `prod`.
    pub fn resolve_stage(&self, override_value: Option<&str>) -> Result<Stage, ConfigError> {
        let value = override_value.unwrap_or(&self.stage);
        value
            .parse::<Stage>()
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }
}
