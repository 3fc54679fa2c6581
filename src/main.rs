//! Binary entry point for the vmlease CLI.

use std::io::{self, Write};
use std::process;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use vmlease::{
    ApiConfig, AuthPayload, CurlTransport, GetOptions, InstanceId, LifecycleController,
    LifecycleError, NativeTransport, Stage, StartOptions, Transport, credentials, files,
    inventory,
};

mod cli;

use cli::{AuthCommand, Cli, Command, GetCommand, StartCommand, StopCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(err) => {
            write_error(io::stderr(), &err);
            1
        }
    };

    process::exit(exit_code);
}

#[tokio::main]
async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ApiConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    let endpoint = config
        .resolve_endpoint(cli.endpoint.as_deref())
        .map_err(|err| CliError::Config(err.to_string()))?;
    let stage = config
        .resolve_stage(cli.stage.as_deref())
        .map_err(|err| CliError::Config(err.to_string()))?;

    if cli.native_http {
        let controller = LifecycleController::new(NativeTransport::new(), endpoint, stage);
        dispatch(&controller, stage, cli.verbose, cli.command).await
    } else {
        let controller = LifecycleController::new(CurlTransport::new(), endpoint, stage);
        dispatch(&controller, stage, cli.verbose, cli.command).await
    }
}

async fn dispatch<T>(
    controller: &LifecycleController<T>,
    stage: Stage,
    verbose: bool,
    command: Command,
) -> Result<(), CliError>
where
    T: Transport + Clone,
{
    match command {
        Command::Start(args) => start(controller, stage, verbose, args).await,
        Command::Get(args) => get(controller, verbose, args).await,
        Command::Stop(args) => stop(controller, verbose, args).await,
    }
}

async fn start<T>(
    controller: &LifecycleController<T>,
    stage: Stage,
    verbose: bool,
    args: StartCommand,
) -> Result<(), CliError>
where
    T: Transport + Clone,
{
    let auth = resolve_auth(args.auth)?;
    let public_key = args
        .public_key
        .as_deref()
        .map(|path| read_public_key(path.as_str()))
        .transpose()?;

    let options = StartOptions {
        instance_id: args.id.map(InstanceId::from),
        platform: args.platform,
        version: args.version,
        public_key,
        query: args.query,
        auth,
    };

    diag(
        verbose,
        &format!("requesting instance on stage {stage}"),
    );
    let outcome = controller.start(options).await?;

    if args.query {
        write_diag(&outcome.response_body);
    }
    write_output(&outcome.instance_id.to_string());
    Ok(())
}

async fn get<T>(
    controller: &LifecycleController<T>,
    verbose: bool,
    args: GetCommand,
) -> Result<(), CliError>
where
    T: Transport + Clone,
{
    let template = args
        .template
        .as_deref()
        .map(|path| inventory::load_template(path.as_str()))
        .transpose()
        .map_err(|err| CliError::Config(err.to_string()))?;

    let options = GetOptions {
        tries: args.tries,
        sleep: Duration::from_secs(args.sleep),
        template,
    };
    let instance_id = InstanceId::from(args.instance_id);

    diag(
        verbose,
        &format!(
            "polling instance {instance_id} (up to {} tries, {}s apart)",
            options.tries,
            args.sleep
        ),
    );
    let document = controller.get(&instance_id, &options).await?;
    write_output(&document);
    Ok(())
}

async fn stop<T>(
    controller: &LifecycleController<T>,
    verbose: bool,
    args: StopCommand,
) -> Result<(), CliError>
where
    T: Transport + Clone,
{
    let instance_id = InstanceId::from(args.instance_id);
    controller.stop(&instance_id).await?;
    diag(verbose, &format!("instance {instance_id} destroyed"));
    Ok(())
}

/// Maps the auth subcommand onto the request payload.
///
/// `remote` without `--key` falls back to the credential file; `start` with
/// no auth subcommand passes `None` through so the controller can reject it
/// before any network call.
fn resolve_auth(auth: Option<AuthCommand>) -> Result<Option<AuthPayload>, CliError> {
    match auth {
        None => Ok(None),
        Some(AuthCommand::Shippable { run_id, job_number }) => {
            Ok(Some(AuthPayload::Shippable { run_id, job_number }))
        }
        Some(AuthCommand::Remote { key, nonce }) => {
            let resolved = match key {
                Some(value) => value,
                None => credentials::default_remote_key()
                    .map_err(|err| CliError::Config(err.to_string()))?
                    .ok_or_else(|| {
                        CliError::Config(format!(
                            "no remote key given and ~/{} is missing; pass --key",
                            credentials::CREDENTIAL_FILE_NAME
                        ))
                    })?,
            };
            Ok(Some(AuthPayload::Remote {
                key: resolved,
                nonce,
            }))
        }
    }
}

/// Reads SSH public key material to embed verbatim in the request.
fn read_public_key(path: &str) -> Result<String, CliError> {
    let expanded = files::expand_tilde(path);
    files::read_to_string_ambient(camino::Utf8Path::new(&expanded)).map_err(|message| {
        CliError::Config(format!("failed to read public key `{expanded}`: {message}"))
    })
}

fn write_output(text: &str) {
    let mut stdout = io::stdout();
    writeln!(stdout, "{text}").ok();
}

fn write_diag(text: &str) {
    let mut stderr = io::stderr();
    writeln!(stderr, "{text}").ok();
}

fn diag(verbose: bool, text: &str) {
    if verbose {
        write_diag(text);
    }
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_auth_passes_none_through() {
        let auth = resolve_auth(None).expect("no auth should be accepted here");
        assert_eq!(auth, None);
    }

    #[test]
    fn resolve_auth_maps_shippable_fields() {
        let auth = resolve_auth(Some(AuthCommand::Shippable {
            run_id: "run-1".to_owned(),
            job_number: "7".to_owned(),
        }))
        .expect("shippable auth should resolve");
        assert_eq!(
            auth,
            Some(AuthPayload::Shippable {
                run_id: "run-1".to_owned(),
                job_number: "7".to_owned(),
            })
        );
    }

    #[test]
    fn resolve_auth_prefers_explicit_remote_key() {
        let auth = resolve_auth(Some(AuthCommand::Remote {
            key: Some("explicit".to_owned()),
            nonce: Some("n1".to_owned()),
        }))
        .expect("remote auth should resolve");
        assert_eq!(
            auth,
            Some(AuthPayload::Remote {
                key: "explicit".to_owned(),
                nonce: Some("n1".to_owned()),
            })
        );
    }

    #[test]
    fn write_error_renders_configuration_errors() {
        let mut buf = Vec::new();
        write_error(&mut buf, &CliError::Config("bad stage".to_owned()));
        let rendered = String::from_utf8(buf).expect("utf8");
        assert_eq!(rendered, "configuration error: bad stage\n");
    }
}
