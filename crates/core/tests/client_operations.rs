//! Client request paths: validation, encoding, cancellation and decoding.

mod support;

use std::collections::HashMap;
use std::time::Duration;

use samplify_core::{CancellationToken, SamplifyClient};
use samplify_domain::{
    ClientOptions, Endpoint, HttpMethod, LineItemAction, Operation, QueryOptions, RequestBody,
    SamplifyError,
};
use serde::{Deserialize, Serialize};
use support::{client, credentials, json, options, ScriptedTransport, API_URL, GATEWAY_URL};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Project {
    ext_project_id: String,
    title: String,
    tags: Vec<String>,
}

#[tokio::test]
async fn unserializable_body_never_reaches_transport() {
    let transport = ScriptedTransport::ok().shared();
    let client = client(transport.clone());

    let mut body = HashMap::new();
    body.insert(vec![1u8], "non-string keys cannot become JSON object keys");

    let err = client
        .request(HttpMethod::Post, API_URL, "/projects", Some(&body), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SamplifyError::Serialization(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn echoed_body_decodes_to_the_original_value() {
    let transport = ScriptedTransport::new(|request, _| match &request.body {
        RequestBody::Json(bytes) => Ok(json(200, std::str::from_utf8(bytes).unwrap())),
        _ => Ok(json(400, "")),
    })
    .shared();
    let client = client(transport.clone());
    let project = Project {
        ext_project_id: "p-9".into(),
        title: "Coffee habits".into(),
        tags: vec!["fmcg".into(), "uk".into()],
    };

    let response =
        client.request(HttpMethod::Post, API_URL, "/projects", Some(&project), None).await.unwrap();

    assert_eq!(response.decode::<Project>().unwrap(), project);
}

#[tokio::test]
async fn none_body_sends_empty_payload() {
    let transport = ScriptedTransport::ok().shared();
    let client = client(transport.clone());

    client
        .request::<()>(HttpMethod::Post, API_URL, "/projects/p-1/close", None, None)
        .await
        .unwrap();

    let sent = &transport.requests_to(&format!("{API_URL}/projects/p-1/close"))[0];
    assert_eq!(sent.body, RequestBody::Empty);
    assert_eq!(sent.header("content-type"), Some("application/json"));
    assert_eq!(sent.header("accept"), Some("application/json"));
}

#[tokio::test]
async fn execute_as_decodes_typed_result() {
    let transport = ScriptedTransport::new(|_, _| {
        Ok(json(200, r#"{"extProjectId":"p-1","title":"t","tags":[]}"#))
    })
    .shared();
    let client = client(transport);

    let project: Project = client
        .execute_as(Operation::GetProject { ext_project_id: "p-1".into() }, None)
        .await
        .unwrap();
    assert_eq!(project.ext_project_id, "p-1");
}

#[tokio::test]
async fn error_body_stays_decodable() {
    #[derive(Deserialize)]
    struct ServerError {
        message: String,
    }

    let transport =
        ScriptedTransport::new(|_, _| Ok(json(400, r#"{"message":"title required"}"#))).shared();
    let client = client(transport);

    let err = client
        .execute(Operation::CreateProject { project: serde_json::json!({}) }, None)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(400));
    let SamplifyError::Api(failure) = &err else {
        panic!("expected API failure");
    };
    assert_eq!(failure.error.http_phrase, "400 Bad Request");
    assert_eq!(failure.error.path, format!("{API_URL}/projects"));
    assert_eq!(failure.error.request_id.as_deref(), Some("req-400"));
    assert_eq!(err.decode_body::<ServerError>().unwrap().message, "title required");
}

#[tokio::test]
async fn unknown_environment_fails_before_any_request() {
    let transport = ScriptedTransport::ok().shared();

    let err = SamplifyClient::from_environment(credentials(), "staging", None, transport.clone())
        .err()
        .unwrap();

    assert!(matches!(err, SamplifyError::Config(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn named_environment_selects_preset_urls() {
    let transport = ScriptedTransport::ok().shared();
    let client = SamplifyClient::from_environment(
        credentials(),
        "prod",
        Some(Duration::from_secs(5)),
        transport,
    )
    .unwrap();

    assert_eq!(client.options().api_base_url, ClientOptions::prod().api_base_url);
    assert_eq!(client.options().timeout, Duration::from_secs(5));
}

#[tokio::test]
async fn builder_requires_a_transport() {
    let err = SamplifyClient::builder().credentials(credentials()).build().err().unwrap();
    assert!(matches!(err, SamplifyError::Config(ref msg) if msg.contains("transport")));
}

#[tokio::test]
async fn invalid_arguments_fail_before_authentication() {
    let transport = ScriptedTransport::ok().shared();
    let client = client(transport.clone());

    let err = client
        .execute(
            Operation::UpdateLineItemState {
                ext_project_id: "p-1".into(),
                ext_line_item_id: "".into(),
                action: LineItemAction::Launch,
            },
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SamplifyError::Validation(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn list_operations_append_query_string() {
    let transport = ScriptedTransport::ok().shared();
    let client = client(transport.clone());

    client
        .execute(
            Operation::ListLineItems {
                ext_project_id: "p-1".into(),
                query: Some(QueryOptions::new().filter("state", "LAUNCHED").limit(2)),
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(
        transport.api_calls(),
        1,
        "only the list call should reach the API handler"
    );
    let url = format!("{API_URL}/projects/p-1/lineItems?state=LAUNCHED&limit=2");
    assert_eq!(transport.hits(&url), 1);
}

#[tokio::test]
async fn event_actions_post_to_absolute_url_with_bearer() {
    let transport = ScriptedTransport::ok().shared();
    let client = client(transport.clone());
    let accept_url = "http://samplify.test/sample/v1/events/41/accept";

    client.execute(Operation::AcceptEvent { accept_url: accept_url.into() }, None).await.unwrap();

    let sent = &transport.requests_to(accept_url)[0];
    assert_eq!(sent.method, HttpMethod::Post);
    assert_eq!(sent.header("authorization"), Some("Bearer access-1"));
}

#[tokio::test]
async fn reconcile_upload_is_sent_as_multipart() {
    let transport = ScriptedTransport::ok().shared();
    let client = client(transport.clone());

    client
        .execute(
            Operation::UploadReconcile {
                ext_project_id: "p-1".into(),
                file_name: "respondents.csv".into(),
                file: b"id\n1\n".to_vec(),
                message: "two ids were wrong".into(),
            },
            None,
        )
        .await
        .unwrap();

    let sent = &transport.requests_to(&format!("{API_URL}/projects/p-1/reconcile"))[0];
    let RequestBody::Multipart(form) = &sent.body else {
        panic!("expected multipart body");
    };
    assert_eq!(form.file_name, "respondents.csv");
    assert_eq!(form.file, b"id\n1\n");
    assert_eq!(sent.header("content-type"), None);
    assert_eq!(sent.header("authorization"), Some("Bearer access-1"));
}

#[tokio::test]
async fn health_check_targets_gateway() {
    let transport = ScriptedTransport::new(|_, _| Ok(json(200, r#"{"status":"UP"}"#))).shared();
    let client = client(transport.clone());

    let response = client.health_status(None).await.unwrap();

    assert_eq!(response.body, br#"{"status":"UP"}"#);
    assert_eq!(transport.hits(GATEWAY_URL), 1);
}

#[tokio::test]
async fn request_endpoint_resolves_configured_base_url() {
    let transport = ScriptedTransport::ok().shared();
    let client = client(transport.clone());

    client
        .request_endpoint::<()>(HttpMethod::Get, Endpoint::Status, "/ping", None, None)
        .await
        .unwrap();

    assert_eq!(transport.hits("http://samplify.test/status/ping"), 1);
}

#[tokio::test]
async fn cancelled_token_aborts_before_sending() {
    let transport = ScriptedTransport::ok().shared();
    let client = client(transport.clone());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .execute(Operation::GetUserInfo, Some(&cancel))
        .await
        .unwrap_err();

    assert!(matches!(err, SamplifyError::Cancelled));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn cancellation_interrupts_in_flight_call() {
    let transport = ScriptedTransport::ok().with_delay(Duration::from_secs(30)).shared();
    let client = client(transport.clone());
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = client.execute(Operation::GetTeams, Some(&cancel)).await.unwrap_err();

    assert!(matches!(err, SamplifyError::Cancelled));
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(transport.password_grants(), 0);
}

#[tokio::test]
async fn slow_transport_times_out_as_transport_error() {
    let transport = ScriptedTransport::ok().with_delay(Duration::from_secs(30)).shared();
    let client = SamplifyClient::new(
        credentials(),
        options().with_timeout(Duration::from_millis(50)),
        transport,
    );

    let err = client.execute(Operation::GetTeams, None).await.unwrap_err();

    assert!(matches!(err, SamplifyError::Transport(ref msg) if msg.contains("timed out")));
}
