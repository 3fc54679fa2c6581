//! Behavioural smoke tests for the CLI entrypoint.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn cli_without_arguments_prints_usage() {
    let mut cmd = cargo_bin_cmd!("vmlease");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn cli_help_lists_lifecycle_subcommands() {
    let mut cmd = cargo_bin_cmd!("vmlease");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("stop"));
}

#[test]
fn cli_rejects_unknown_stage_before_any_request() {
    let mut cmd = cargo_bin_cmd!("vmlease");
    cmd.args(["--stage", "staging", "stop", "abc"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown stage"));
}

#[test]
fn start_without_auth_subcommand_is_a_configuration_error() {
    let mut cmd = cargo_bin_cmd!("vmlease");
    // No auth subcommand: the controller rejects the invocation before any
    // network call, so this fails fast even with an unreachable endpoint.
    cmd.args([
        "--endpoint",
        "http://127.0.0.1:1",
        "start",
        "windows-2019",
        "1809",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no authentication mode selected"));
}
