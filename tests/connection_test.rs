//! End-to-end tests: resolved policy and credentials reach the wire.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{stream, StreamExt};
use reqwest::{Method, Request, StatusCode};
use serde::{Deserialize, Serialize};

use runner_transport::config::EnvNames;
use runner_transport::http::{StaticPlatform, UserAgentToken};
use runner_transport::net::{Interceptor, RequestIdInterceptor};
use runner_transport::settings::{BackoffPolicy, Locale};
use runner_transport::{
    resolve_credential, ConnectionFactory, Credentials, EndpointAuthorization, TransportDefaults,
    TransportError,
};

mod common;

const FAST_BACKOFF: BackoffPolicy = BackoffPolicy {
    base_delay_ms: 1,
    max_delay_ms: 5,
};

fn factory_with_env(pairs: &[(&str, &str)]) -> ConnectionFactory {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let names = EnvNames::default();

    let mut base = TransportDefaults::new(Locale::new("en-US")).unwrap();
    base.client.backoff = FAST_BACKOFF;
    base.raw.backoff = FAST_BACKOFF;
    let defaults = base.initialize(
        &[UserAgentToken::parse("Runner/2.320.0").unwrap()],
        &StaticPlatform("Linux (test)".into()),
        &env,
        &names,
        None,
    );

    ConnectionFactory::new(Arc::new(defaults), Arc::new(env), names)
}

fn factory() -> ConnectionFactory {
    factory_with_env(&[])
}

fn oauth(token: &str) -> Option<Credentials> {
    let auth = EndpointAuthorization::new("OAuth").with_parameter("AccessToken", token);
    resolve_credential(Some(&auth)).unwrap()
}

fn base_url(addr: SocketAddr) -> String {
    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_policy_headers_reach_the_server() {
    let (addr, recorder) = common::start_mock_backend(200, "{}").await;
    let connection = factory()
        .create_connection(
            &base_url(addr),
            oauth("t0k3n"),
            vec![Arc::new(RequestIdInterceptor)],
            None,
        )
        .unwrap();

    let response = connection.send(Method::GET, "_apis/connectionData").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let requests = recorder.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path, "/_apis/connectionData");
    assert_eq!(request.header("authorization"), Some("Bearer t0k3n"));
    assert_eq!(request.header("accept-language"), Some("en-US"));
    assert!(request.header("x-request-id").is_some());

    let user_agent = request.header("user-agent").unwrap();
    assert!(user_agent.starts_with("Runner/2.320.0 (Linux [test]) RunnerTransport/"));
}

#[tokio::test]
async fn test_raw_connection_uses_its_own_user_agent() {
    let (addr, recorder) = common::start_mock_backend(200, "").await;
    let raw = factory()
        .create_raw_connection(&base_url(addr), oauth("abc"), Vec::new(), None)
        .unwrap();

    raw.send(Method::GET, "results", None).await.unwrap();

    let request = &recorder.requests()[0];
    let user_agent = request.header("user-agent").unwrap();
    assert!(user_agent.starts_with("Runner/2.320.0 (Linux [test]) RunnerTransport.Raw/"));
    assert!(!user_agent.contains("RunnerTransport/"));
    assert_eq!(request.header("authorization"), Some("Bearer abc"));
}

#[tokio::test]
async fn test_unauthenticated_connection_sends_no_authorization() {
    let (addr, recorder) = common::start_mock_backend(200, "").await;
    let auth = EndpointAuthorization::new("UsernamePassword").with_parameter("Username", "u");
    let credentials = resolve_credential(Some(&auth)).unwrap();
    assert!(credentials.is_none());

    let connection = factory()
        .create_connection(&base_url(addr), credentials, Vec::new(), None)
        .unwrap();
    connection.send(Method::GET, "health").await.unwrap();

    assert!(recorder.requests()[0].header("authorization").is_none());
}

#[tokio::test]
async fn test_retries_transient_failures() {
    let (addr, recorder) = common::start_programmable_backend(|i| async move {
        if i < 2 {
            (503, "unavailable".to_string())
        } else {
            (200, r#"{"ok":true}"#.to_string())
        }
    })
    .await;

    let connection = factory()
        .create_connection(&base_url(addr), oauth("t"), Vec::new(), None)
        .unwrap();
    let response = connection.send(Method::GET, "jobs").await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(recorder.count(), 3);
}

#[tokio::test]
async fn test_retry_budget_follows_resolved_max_retry() {
    let (addr, recorder) = common::start_mock_backend(503, "down").await;

    // Out-of-range override is clamped to the minimum of 3 retries.
    let connection = factory_with_env(&[("GITHUB_ACTIONS_RUNNER_HTTP_RETRY", "0")])
        .create_connection(&base_url(addr), None, Vec::new(), None)
        .unwrap();
    assert_eq!(connection.settings().max_retry, 3);

    let response = connection.send(Method::GET, "jobs").await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(recorder.count(), 4);
}

#[tokio::test]
async fn test_unauthorized_is_final() {
    let (addr, recorder) = common::start_mock_backend(401, "").await;
    let connection = factory()
        .create_connection(&base_url(addr), oauth("expired"), Vec::new(), None)
        .unwrap();

    let err = connection.send(Method::GET, "jobs").await.unwrap_err();
    assert!(matches!(err, TransportError::Unauthorized { .. }));
    assert_eq!(recorder.count(), 1);
}

#[derive(Debug, Serialize)]
struct AcquireJob<'a> {
    pool: &'a str,
}

#[derive(Debug, Deserialize, PartialEq)]
struct JobMessage {
    id: u64,
    name: String,
}

#[tokio::test]
async fn test_post_json_is_replayed_on_failure() {
    let (addr, recorder) = common::start_programmable_backend(|i| async move {
        if i == 0 {
            (502, "bad gateway".to_string())
        } else {
            (200, r#"{"id":7,"name":"build"}"#.to_string())
        }
    })
    .await;

    let connection = factory()
        .create_connection(&base_url(addr), oauth("t"), Vec::new(), None)
        .unwrap();
    let job: JobMessage = connection
        .post_json("jobs/acquire", &AcquireJob { pool: "default" })
        .await
        .unwrap();

    assert_eq!(job, JobMessage { id: 7, name: "build".into() });
    let requests = recorder.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].method, "POST");
    assert_eq!(requests[1].body, br#"{"pool":"default"}"#.to_vec());
}

#[tokio::test]
async fn test_get_json_surfaces_client_errors() {
    let (addr, recorder) = common::start_mock_backend(404, "").await;
    let connection = factory()
        .create_connection(&base_url(addr), None, Vec::new(), None)
        .unwrap();

    let result: Result<JobMessage, _> = connection.get_json("jobs/1").await;
    assert!(matches!(result, Err(TransportError::Client(_))));
    // 404 is not transient.
    assert_eq!(recorder.count(), 1);
}

#[tokio::test]
async fn test_raw_stream() {
    let (addr, _recorder) = common::start_mock_backend(200, "chunk-one chunk-two").await;
    let raw = factory()
        .create_raw_connection(&base_url(addr), None, Vec::new(), None)
        .unwrap();

    let mut body = Vec::new();
    let stream = raw.stream("logs/1").await.unwrap();
    futures_util::pin_mut!(stream);
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(body, b"chunk-one chunk-two".to_vec());
}

#[tokio::test]
async fn test_streaming_upload_is_sent_once() {
    let (addr, recorder) = common::start_mock_backend(503, "").await;
    let raw = factory()
        .create_raw_connection(&base_url(addr), None, Vec::new(), None)
        .unwrap();

    let chunks: Vec<Result<Bytes, std::io::Error>> =
        vec![Ok(Bytes::from_static(b"part-1,")), Ok(Bytes::from_static(b"part-2"))];
    let body = reqwest::Body::wrap_stream(stream::iter(chunks));

    let err = raw.upload(Method::PUT, "logs/1", body).await.unwrap_err();
    assert!(matches!(err, TransportError::Client(_)));
    assert_eq!(recorder.count(), 1);
}

struct DenyAll;

impl Interceptor for DenyAll {
    fn name(&self) -> &str {
        "deny-all"
    }

    fn on_request(&self, _request: &mut Request) -> Result<(), String> {
        Err("maintenance window".to_string())
    }
}

#[tokio::test]
async fn test_interceptor_rejection_aborts_before_sending() {
    let (addr, recorder) = common::start_mock_backend(200, "").await;
    let connection = factory()
        .create_connection(
            &base_url(addr),
            None,
            vec![Arc::new(RequestIdInterceptor), Arc::new(DenyAll)],
            None,
        )
        .unwrap();

    let err = connection.send(Method::GET, "jobs").await.unwrap_err();
    match err {
        TransportError::Interceptor { name, reason } => {
            assert_eq!(name, "deny-all");
            assert_eq!(reason, "maintenance window");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(recorder.count(), 0);
}

#[derive(Default)]
struct CountingInterceptor(AtomicUsize);

impl Interceptor for CountingInterceptor {
    fn name(&self) -> &str {
        "counting"
    }

    fn on_request(&self, _request: &mut Request) -> Result<(), String> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_retries_replay_the_prepared_request() {
    let (addr, recorder) = common::start_mock_backend(503, "down").await;
    let counting = Arc::new(CountingInterceptor::default());
    let interceptors: Vec<Arc<dyn Interceptor>> =
        vec![Arc::new(RequestIdInterceptor), counting.clone()];
    let connection = factory()
        .create_connection(&base_url(addr), oauth("t"), interceptors, None)
        .unwrap();

    let response = connection.send(Method::GET, "jobs").await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let requests = recorder.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(counting.0.load(Ordering::SeqCst), 1);

    let first_id = requests[0].header("x-request-id").unwrap();
    for request in &requests {
        assert_eq!(request.header("x-request-id"), Some(first_id));
        assert_eq!(request.header("authorization"), Some("Bearer t"));
    }
}

#[tokio::test]
async fn test_explicit_timeout_reaches_connection_unclamped() {
    let connection = factory()
        .create_connection(
            "https://pipelines.example.com/",
            None,
            Vec::new(),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
    assert_eq!(connection.settings().send_timeout.as_secs(), 5);
}
