//! End-to-end lifecycle behaviour against a scripted transport.
//!
//! Exercises the public API the way the binary drives it: start to obtain
//! an identifier, poll until running, render the inventory, and tear down.

use std::time::Duration;

use vmlease::test_support::ScriptedTransport;
use vmlease::{
    AuthPayload, GetOptions, InstanceId, LifecycleController, LifecycleError, Method, Stage,
    StartOptions,
};

const ENDPOINT: &str = "https://api.example";

fn controller(transport: &ScriptedTransport) -> LifecycleController<ScriptedTransport> {
    LifecycleController::new(transport.clone(), ENDPOINT, Stage::Prod)
}

#[tokio::test]
async fn full_lifecycle_renders_default_inventory() {
    let transport = ScriptedTransport::new();
    transport.push_response(200, "{}");
    transport.push_response(200, "{\"status\":\"pending\"}");
    transport.push_response(
        200,
        concat!(
            "{\"status\":\"running\",\"connection\":{",
            "\"hostname\":\"198.51.100.7\",\"port\":5986,",
            "\"username\":\"Administrator\",\"password\":\"pw\"}}",
        ),
    );
    transport.push_response(200, "");

    let lifecycle = controller(&transport);

    let outcome = lifecycle
        .start(StartOptions {
            instance_id: Some(InstanceId::from("abc")),
            platform: "windows-2019".to_owned(),
            version: "1809".to_owned(),
            public_key: None,
            query: false,
            auth: Some(AuthPayload::Remote {
                key: "secret".to_owned(),
                nonce: None,
            }),
        })
        .await
        .expect("start should succeed");

    let inventory = lifecycle
        .get(
            &outcome.instance_id,
            &GetOptions {
                tries: 5,
                sleep: Duration::ZERO,
                template: None,
            },
        )
        .await
        .expect("get should succeed");

    assert!(inventory.contains("windows # abc"));
    assert!(inventory.contains("ansible_host=198.51.100.7"));
    assert!(inventory.contains("ansible_port=5986"));
    assert!(inventory.contains("ansible_user=Administrator"));
    assert!(inventory.contains("ansible_password=pw"));

    lifecycle
        .stop(&outcome.instance_id)
        .await
        .expect("stop should succeed");

    let methods: Vec<Method> = transport
        .requests()
        .iter()
        .map(|request| request.method)
        .collect();
    assert_eq!(
        methods,
        vec![Method::Put, Method::Get, Method::Get, Method::Delete]
    );
    assert!(
        transport
            .requests()
            .iter()
            .all(|request| request.url == "https://api.example/prod/jobs/abc")
    );
}

#[tokio::test]
async fn poll_timeout_reports_try_budget() {
    let transport = ScriptedTransport::new();
    for _ in 0..4 {
        transport.push_response(200, "{\"status\":\"pending\"}");
    }

    let err = controller(&transport)
        .get(
            &InstanceId::from("abc"),
            &GetOptions {
                tries: 4,
                sleep: Duration::ZERO,
                template: None,
            },
        )
        .await
        .expect_err("timeout expected");

    assert_eq!(transport.request_count(), 4);
    assert_eq!(
        err.to_string(),
        "instance abc not running after 4 attempts"
    );
}
