//! Integration tests for OllamaClient.
//!
//! Uses wiremock for HTTP mocking. Tests cover the request envelope, label
//! extraction, status mapping (404/500/503), malformed and stalled bodies, and
//! the JSON-mode analysis call.

use credence_core::analysis::{handle_request, ExtensionRequest, RiskLevel};
use credence_core::engine::{RunStatus, Runner};
use credence_core::{Analyzer, Classifier, ClassifyError, ClientConfig, EvaluationRecord, Label, OllamaClient};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(mock_server: &MockServer) -> OllamaClient {
    let config = ClientConfig::default()
        .with_endpoint(format!("{}/api/generate", mock_server.uri()))
        .with_model("llama3");
    OllamaClient::new(config).expect("failed to create client")
}

fn generate_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "model": "llama3",
        "created_at": "2024-05-01T10:00:00Z",
        "response": text,
        "done": true
    }))
}

#[tokio::test]
async fn test_classify_sends_deterministic_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(header_exists("user-agent"))
        .and(body_partial_json(json!({
            "model": "llama3",
            "stream": false,
            "temperature": 0.0,
            "top_p": 1.0
        })))
        .and(body_string_contains("Central bank holds rates"))
        .respond_with(generate_reply("LOW_RISK"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let label = client
        .classify("Central bank holds rates")
        .await
        .expect("classify failed");
    assert_eq!(label, Label::LowRisk);
}

#[tokio::test]
async fn test_classify_tolerates_commentary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(generate_reply(
            "\n  The article is HIGH_RISK; it could also be MEDIUM_RISK.",
        ))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    assert_eq!(client.classify("x").await.unwrap(), Label::MediumRisk);
}

#[tokio::test]
async fn test_classify_without_token_is_unknown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(generate_reply("I cannot determine that."))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    assert_eq!(client.classify("x").await.unwrap(), Label::Unknown);
}

#[tokio::test]
async fn test_model_not_found_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "model 'llama3' not found"})),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.classify("x").await.unwrap_err();
    assert!(matches!(
        err,
        ClassifyError::ServiceUnavailable { status: 404, .. }
    ));
    assert!(err.is_fatal());
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn test_server_error_is_per_item() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("runner crashed"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.classify("x").await.unwrap_err();
    assert!(matches!(err, ClassifyError::Service { status: 500, .. }));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn test_service_unavailable_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.classify("x").await.unwrap_err();
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_malformed_body_is_response_format_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.classify("x").await.unwrap_err();
    assert!(matches!(err, ClassifyError::ResponseFormat { .. }));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn test_missing_response_field_is_response_format_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.classify("x").await.unwrap_err();
    assert!(matches!(err, ClassifyError::ResponseFormat { .. }));
}

#[tokio::test]
async fn test_stalled_body_is_fatal_connectivity() {
    // Headers arrive, then the body stops short of its content-length.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 8192];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"response\":",
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let config = ClientConfig::default()
        .with_endpoint(format!("http://{addr}/api/generate"))
        .with_timeout_secs(1);
    let client = OllamaClient::new(config).unwrap();
    let err = client.classify("x").await.unwrap_err();

    assert!(
        matches!(err, ClassifyError::Connectivity { .. }),
        "unexpected error: {err:?}"
    );
    assert!(err.is_fatal());
    assert!(err.guidance().is_some());
}

#[tokio::test]
async fn test_analyze_uses_json_format() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"format": "json", "stream": false})))
        .respond_with(generate_reply(
            r#"{"score": 18, "risk": "High", "explanation": "Unsourced miracle claims."}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let assessment = client.analyze("Miracle cure").await.expect("analyze failed");
    assert_eq!(assessment.risk, RiskLevel::High);
    assert_eq!(assessment.score, 18.0);
}

#[tokio::test]
async fn test_analyze_reply_folds_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(generate_reply("not json at all"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let reply = handle_request(
        &client,
        ExtensionRequest::AnalyzeText {
            text: "page".into(),
        },
    )
    .await;
    assert!(!reply.success);
    assert!(reply.error.unwrap().contains("invalid response"));
}

#[tokio::test]
async fn test_runner_against_http_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("article one"))
        .respond_with(generate_reply("LOW_RISK"))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("article two"))
        .respond_with(ResponseTemplate::new(200).set_body_string("garbage"))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("article three"))
        .respond_with(generate_reply("HIGH_RISK"))
        .mount(&mock_server)
        .await;

    let records = vec![
        EvaluationRecord::new("1", "article one", "LOW_RISK"),
        EvaluationRecord::new("2", "article two", "MEDIUM_RISK"),
        EvaluationRecord::new("3", "article three", "MEDIUM_RISK"),
    ];
    let client = Arc::new(create_test_client(&mock_server));
    let outcome = Runner::new(client).run(&records).await;

    assert!(matches!(outcome.status, RunStatus::Completed));
    assert_eq!(outcome.report.total, 2);
    assert_eq!(outcome.report.failed, 1);
    assert_eq!(outcome.report.accuracy, Some(0.5));
    assert_eq!(outcome.report.critical.precision, 0.0);
    assert_eq!(outcome.report.critical.recall, 0.0);
    assert_eq!(outcome.failures[0].record_id, "2");
}
