//! Credential verification against a mocked Bedrock endpoint.

use std::sync::Arc;
use std::time::Duration;

use claude_bedrock_setup::infrastructure::credentials::AwsCredentials;
use claude_bedrock_setup::{
    BedrockProbe, BedrockProbeConfig, CredentialVerifier, FailureKind, ProbeFailure,
    ResolvedCredentials,
};
use mockito::{Matcher, Server};

fn bearer(token: &str) -> ResolvedCredentials {
    ResolvedCredentials {
        credentials: AwsCredentials::BearerToken(token.to_string()),
        source: "environment:bearer".to_string(),
    }
}

fn access_keys() -> ResolvedCredentials {
    ResolvedCredentials {
        credentials: AwsCredentials::Static {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            session_token: Some("session".to_string()),
        },
        source: "profile:dev".to_string(),
    }
}

fn verifier(
    endpoint: &str,
    timeout: Duration,
    credentials: ResolvedCredentials,
) -> CredentialVerifier<BedrockProbe> {
    let probe = BedrockProbe::new(
        BedrockProbeConfig {
            region: "us-east-1".to_string(),
            endpoint_url: Some(endpoint.to_string()),
            timeout,
        },
        credentials,
    )
    .expect("probe");
    CredentialVerifier::new(Arc::new(probe))
}

fn models_query() -> Matcher {
    Matcher::UrlEncoded("byProvider".to_string(), "anthropic".to_string())
}

#[tokio::test]
async fn test_bearer_token_verified_with_models() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/foundation-models")
        .match_query(models_query())
        .match_header("authorization", "Bearer tok-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"modelSummaries":[
                {"modelId":"anthropic.claude-3-haiku-20240307-v1:0","providerName":"Anthropic"},
                {"modelId":"anthropic.claude-sonnet-4-20250514-v1:0","providerName":"Anthropic"}
            ]}"#,
        )
        .create_async()
        .await;

    let result = verifier(&server.url(), Duration::from_secs(5), bearer("tok-123"))
        .verify()
        .await;

    mock.assert_async().await;
    assert!(result.verified);
    assert!(result.failure.is_none());
    assert_eq!(result.credential_source.as_deref(), Some("environment:bearer"));
    assert_eq!(
        result.models,
        vec![
            "anthropic.claude-3-haiku-20240307-v1:0".to_string(),
            "anthropic.claude-sonnet-4-20250514-v1:0".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_access_keys_are_signed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/foundation-models")
        .match_query(models_query())
        .match_header(
            "authorization",
            Matcher::Regex(
                r"^AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/\d{8}/us-east-1/bedrock/aws4_request, SignedHeaders=host;x-amz-date;x-amz-security-token, Signature=[0-9a-f]{64}$"
                    .to_string(),
            ),
        )
        .match_header("x-amz-date", Matcher::Regex(r"^\d{8}T\d{6}Z$".to_string()))
        .match_header("x-amz-security-token", "session")
        .with_status(200)
        .with_body(r#"{"modelSummaries":[]}"#)
        .create_async()
        .await;

    let result = verifier(&server.url(), Duration::from_secs(5), access_keys())
        .verify()
        .await;

    mock.assert_async().await;
    assert!(result.verified);
    assert!(result.models.is_empty());
}

#[tokio::test]
async fn test_access_denied_is_credential_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/foundation-models")
        .match_query(models_query())
        .with_status(403)
        .with_header("x-amzn-ErrorType", "AccessDeniedException:http://internal.amazon.com/coral/com.amazon.coral.service/")
        .with_body(r#"{"message":"User is not authorized to perform: bedrock:ListFoundationModels"}"#)
        .create_async()
        .await;

    let result = verifier(&server.url(), Duration::from_secs(5), bearer("tok"))
        .verify()
        .await;

    assert!(!result.verified);
    assert_eq!(result.failure, Some(ProbeFailure::AccessDenied));
    assert_eq!(result.kind(), Some(FailureKind::Credential));
    assert!(result
        .diagnostic
        .as_deref()
        .is_some_and(|d| d.contains("bedrock:ListFoundationModels")));
}

#[tokio::test]
async fn test_unrecognized_client_is_invalid_credentials() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/foundation-models")
        .match_query(models_query())
        .with_status(403)
        .with_body(r#"{"__type":"UnrecognizedClientException","message":"The security token included in the request is invalid."}"#)
        .create_async()
        .await;

    let result = verifier(&server.url(), Duration::from_secs(5), access_keys())
        .verify()
        .await;

    assert_eq!(result.failure, Some(ProbeFailure::InvalidCredentials));
    assert_eq!(result.kind(), Some(FailureKind::Credential));
}

#[tokio::test]
async fn test_expired_token() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/foundation-models")
        .match_query(models_query())
        .with_status(403)
        .with_header("x-amzn-ErrorType", "ExpiredTokenException")
        .with_body(r#"{"message":"The security token included in the request is expired"}"#)
        .create_async()
        .await;

    let result = verifier(&server.url(), Duration::from_secs(5), access_keys())
        .verify()
        .await;

    assert_eq!(result.failure, Some(ProbeFailure::ExpiredCredentials));
}

#[tokio::test]
async fn test_service_unavailable_is_connectivity() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/foundation-models")
        .match_query(models_query())
        .with_status(503)
        .create_async()
        .await;

    let result = verifier(&server.url(), Duration::from_secs(5), bearer("tok"))
        .verify()
        .await;

    assert_eq!(result.failure, Some(ProbeFailure::ServiceUnavailable));
    assert_eq!(result.kind(), Some(FailureKind::Connectivity));
}

#[tokio::test]
async fn test_undecodable_body_is_unexpected_response() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/foundation-models")
        .match_query(models_query())
        .with_status(200)
        .with_body("<html>captive portal</html>")
        .create_async()
        .await;

    let result = verifier(&server.url(), Duration::from_secs(5), bearer("tok"))
        .verify()
        .await;

    assert_eq!(result.failure, Some(ProbeFailure::UnexpectedResponse));
    assert_eq!(result.kind(), Some(FailureKind::Connectivity));
}

#[tokio::test]
async fn test_unresponsive_endpoint_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept connections and hold them open without ever answering
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let result = verifier(
        &format!("http://{addr}"),
        Duration::from_millis(300),
        bearer("tok"),
    )
    .verify()
    .await;
    server.abort();

    assert!(!result.verified);
    assert_eq!(result.failure, Some(ProbeFailure::Timeout));
    assert_eq!(result.kind(), Some(FailureKind::Connectivity));
}

#[tokio::test]
async fn test_refused_connection_is_network_failure() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let result = verifier(&format!("http://{addr}"), Duration::from_secs(2), bearer("tok"))
        .verify()
        .await;

    assert_eq!(result.failure, Some(ProbeFailure::Network));
    assert_eq!(result.kind(), Some(FailureKind::Connectivity));
}

#[tokio::test]
async fn test_invalid_region_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let probe = BedrockProbe::new(
        BedrockProbeConfig {
            region: "US_EAST".to_string(),
            endpoint_url: Some(server.url()),
            timeout: Duration::from_secs(1),
        },
        bearer("tok"),
    )
    .unwrap();
    let result = CredentialVerifier::new(Arc::new(probe)).verify().await;

    mock.assert_async().await;
    assert_eq!(result.failure, Some(ProbeFailure::RegionMisconfigured));
    assert_eq!(result.kind(), Some(FailureKind::Credential));
}

#[tokio::test]
async fn test_stalled_error_body_classified_by_status() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Send the status line and part of the body, then go quiet
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 403 Forbidden\r\ncontent-type: application/json\r\ncontent-length: 200\r\n\r\n{\"mess")
                .await;
            let _ = socket.flush().await;
            held.push(socket);
        }
    });

    let result = verifier(
        &format!("http://{addr}"),
        Duration::from_millis(300),
        bearer("tok"),
    )
    .verify()
    .await;
    server.abort();

    assert!(!result.verified);
    assert_eq!(result.failure, Some(ProbeFailure::AccessDenied));
    assert_eq!(result.kind(), Some(FailureKind::Credential));
}
