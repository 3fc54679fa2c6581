//! Command-line interface definitions for the `vmlease` binary.
//!
//! This module centralises the clap parser structures so both the main
//! binary and the build script can reuse them when generating the manual
//! page. It deliberately avoids depending on the rest of the crate for the
//! same reason.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Top-level CLI for the `vmlease` binary.
#[derive(Debug, Parser)]
#[command(
    name = "vmlease",
    about = "Lease remote test instances and render their connection details",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Print diagnostics to standard error.
    #[arg(long, global = true)]
    pub(crate) verbose: bool,
    /// Override the provisioning API base URL.
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) endpoint: Option<String>,
    /// Override the API stage (`dev` or `prod`).
    #[arg(long, global = true, value_name = "STAGE")]
    pub(crate) stage: Option<String>,
    /// Use the in-process HTTP client instead of shelling out to curl.
    #[arg(long, global = true)]
    pub(crate) native_http: bool,
    /// Operation to perform.
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Lifecycle operations.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Provision a new test instance and print its identifier.
    Start(StartCommand),
    /// Poll an instance until it is running and print its inventory.
    Get(GetCommand),
    /// Tear down an instance.
    Stop(StopCommand),
}

/// Arguments for the `vmlease start` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct StartCommand {
    /// Platform of the desired instance (for example `windows-2019`).
    pub(crate) platform: String,
    /// Platform version or build.
    pub(crate) version: String,
    /// Use a caller-chosen instance identifier instead of a generated UUID.
    #[arg(long, value_name = "ID")]
    pub(crate) id: Option<String>,
    /// Path to an SSH public key to embed verbatim in the request.
    #[arg(long, value_name = "PATH")]
    pub(crate) public_key: Option<Utf8PathBuf>,
    /// Ask the API what it would provision without provisioning it.
    #[arg(long)]
    pub(crate) query: bool,
    /// Authentication mode.
    #[command(subcommand)]
    pub(crate) auth: Option<AuthCommand>,
}

/// Authentication subcommands for `start`.
#[derive(Debug, Subcommand)]
pub(crate) enum AuthCommand {
    /// Authenticate with Shippable CI run coordinates.
    Shippable {
        /// Run identifier assigned by the CI system.
        #[arg(long, value_name = "ID")]
        run_id: String,
        /// Job number within the run.
        #[arg(long, value_name = "N")]
        job_number: String,
    },
    /// Authenticate with a pre-shared key.
    Remote {
        /// Pre-shared API key; defaults to the `~/.vmlease_key` file.
        #[arg(long, value_name = "KEY")]
        key: Option<String>,
        /// Optional nonce for replay protection.
        #[arg(long, value_name = "N")]
        nonce: Option<String>,
    },
}

/// Arguments for the `vmlease get` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct GetCommand {
    /// Identifier printed by `start`.
    pub(crate) instance_id: String,
    /// Path to a custom inventory template.
    #[arg(long, value_name = "PATH")]
    pub(crate) template: Option<Utf8PathBuf>,
    /// Maximum number of poll attempts.
    #[arg(long, value_name = "N", default_value_t = 60)]
    pub(crate) tries: u32,
    /// Seconds to wait between poll attempts.
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub(crate) sleep: u64,
}

/// Arguments for the `vmlease stop` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct StopCommand {
    /// Identifier printed by `start`.
    pub(crate) instance_id: String,
}
