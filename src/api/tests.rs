//! Tests for the instance client and error-envelope decoding.

use rstest::rstest;

use crate::test_support::ScriptedTransport;
use crate::transport::Method;

use super::{ApiError, AuthPayload, InstanceClient, InstanceId, InstanceRequest, Stage};

fn request_with_remote_auth() -> InstanceRequest {
    InstanceRequest {
        platform: "windows-2019".to_owned(),
        version: "1809".to_owned(),
        public_key: None,
        query: false,
        auth: AuthPayload::Remote {
            key: "secret".to_owned(),
            nonce: None,
        },
    }
}

#[rstest]
#[case("https://api.example", Stage::Dev, "abc", "https://api.example/dev/jobs/abc")]
#[case("https://api.example/", Stage::Prod, "abc", "https://api.example/prod/jobs/abc")]
fn resource_url_is_canonical(
    #[case] endpoint: &str,
    #[case] stage: Stage,
    #[case] id: &str,
    #[case] expected: &str,
) {
    let client = InstanceClient::new(
        ScriptedTransport::new(),
        endpoint,
        stage,
        &InstanceId::from(id),
    );
    assert_eq!(client.resource_url(), expected);
}

#[tokio::test]
async fn create_puts_json_with_content_type() {
    let transport = ScriptedTransport::new();
    transport.push_response(200, "{}");
    let client = InstanceClient::new(
        transport.clone(),
        "https://api.example",
        Stage::Dev,
        &InstanceId::from("abc"),
    );

    client
        .create(&request_with_remote_auth())
        .await
        .expect("create should succeed");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let recorded = requests.first().expect("one request recorded");
    assert_eq!(recorded.method, Method::Put);
    assert_eq!(recorded.url, "https://api.example/dev/jobs/abc");
    assert_eq!(
        recorded.headers,
        vec![("Content-Type".to_owned(), "application/json".to_owned())]
    );
    let body: serde_json::Value =
        serde_json::from_str(recorded.body.as_deref().unwrap_or_default())
            .expect("body should be JSON");
    assert_eq!(body["config"]["platform"], "windows-2019");
    assert_eq!(body["auth"]["remote"]["key"], "secret");
}

#[tokio::test]
async fn fetch_issues_get_without_body() {
    let transport = ScriptedTransport::new();
    transport.push_response(200, "{\"status\":\"pending\"}");
    let client = InstanceClient::new(
        transport.clone(),
        "https://api.example",
        Stage::Dev,
        &InstanceId::from("abc"),
    );

    client.fetch().await.expect("fetch should succeed");

    let requests = transport.requests();
    let recorded = requests.first().expect("one request recorded");
    assert_eq!(recorded.method, Method::Get);
    assert_eq!(recorded.body, None);
    assert!(recorded.headers.is_empty());
}

#[tokio::test]
async fn destroy_issues_delete() {
    let transport = ScriptedTransport::new();
    transport.push_response(200, "");
    let client = InstanceClient::new(
        transport.clone(),
        "https://api.example",
        Stage::Prod,
        &InstanceId::from("abc"),
    );

    client.destroy().await.expect("destroy should succeed");

    let requests = transport.requests();
    assert_eq!(requests.first().map(|req| req.method), Some(Method::Delete));
}

#[tokio::test]
async fn non_200_uses_message_field() {
    let transport = ScriptedTransport::new();
    transport.push_response(404, "{\"message\":\"not found\"}");
    let client = InstanceClient::new(
        transport,
        "https://api.example",
        Stage::Dev,
        &InstanceId::from("abc"),
    );

    let err = client.fetch().await.expect_err("fetch should fail");
    assert_eq!(err.to_string(), "404: not found");
}

#[test]
fn envelope_prefers_message_over_error_message() {
    let err = ApiError::from_envelope(400, "{\"message\":\"bad\",\"errorMessage\":\"other\"}");
    assert_eq!(err.to_string(), "400: bad");
}

#[test]
fn envelope_renders_error_message_with_stack_trace() {
    let body = "{\"errorMessage\":\" boom \",\"stackTrace\":[\"frame one\",\"frame two\"]}";
    let rendered = ApiError::from_envelope(500, body).to_string();
    assert!(
        rendered.starts_with("500: boom\n"),
        "unexpected rendering: {rendered}"
    );
    assert!(rendered.contains("  frame one"));
    assert!(rendered.contains("  frame two"));
}

#[test]
fn envelope_falls_back_to_raw_json() {
    let rendered = ApiError::from_envelope(502, "{\"detail\":\"upstream\"}").to_string();
    assert!(
        rendered.starts_with("502: "),
        "missing status prefix: {rendered}"
    );
    assert!(rendered.contains("upstream"));
}

#[test]
fn envelope_passes_non_json_body_through() {
    let rendered = ApiError::from_envelope(503, "service unavailable").to_string();
    assert_eq!(rendered, "503: service unavailable");
}

#[test]
fn stage_parses_known_values_only() {
    assert_eq!("dev".parse::<Stage>(), Ok(Stage::Dev));
    assert_eq!("prod".parse::<Stage>(), Ok(Stage::Prod));
    assert!("staging".parse::<Stage>().is_err());
}
