//! Tests for the auth module

use super::*;
use crate::error::Error;
use crate::http::testing::{RecordingTransport, TokenReply};
use crate::http::OutboundRequest;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use std::sync::Arc;
use url::Url;

const TOKEN_URL: &str = "https://rally1.rallydev.com/slm/webservice/v2.0/security/authorize";

fn provider(username: &str, password: &str) -> CredentialProvider {
    let server = Url::parse("https://rally1.rallydev.com").unwrap();
    CredentialProvider::new(Credentials::new(username, password, &server))
}

fn authenticator(transport: Arc<RecordingTransport>, fallback: FallbackPolicy) -> Authenticator {
    Authenticator::new(provider("user", "pass"), transport, TOKEN_URL, fallback)
}

fn decode_basic(request: &OutboundRequest) -> String {
    let header = request
        .headers
        .get(AUTHORIZATION)
        .unwrap()
        .to_str()
        .unwrap();
    let encoded = header.strip_prefix("Basic ").unwrap();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    String::from_utf8(decoded).unwrap()
}

// ============================================================================
// Credentials
// ============================================================================

#[test]
fn test_credentials_target_host() {
    let server = Url::parse("https://rally1.rallydev.com/").unwrap();
    let creds = Credentials::new("user", "pass", &server);
    assert_eq!(creds.target_host(), "rally1.rallydev.com");
    assert_eq!(creds.username(), "user");

    let server = Url::parse("http://localhost:7001").unwrap();
    let creds = Credentials::new("user", "pass", &server);
    assert_eq!(creds.target_host(), "localhost:7001");
}

#[test]
fn test_credentials_debug_hides_password() {
    let server = Url::parse("https://rally1.rallydev.com").unwrap();
    let creds = Credentials::new("user", "s3cr3t", &server);
    assert!(!format!("{creds:?}").contains("s3cr3t"));
}

#[test]
fn test_basic_auth_header() {
    let value = provider("user", "pass").build_auth_header();

    assert!(value.is_sensitive());
    assert_eq!(value.to_str().unwrap(), "Basic dXNlcjpwYXNz");
}

#[test]
fn test_apply_same_header_for_any_request() {
    let transport = Arc::new(RecordingTransport::with_token("t"));
    let auth = authenticator(transport, FallbackPolicy::AnyFailure);

    let mut get = OutboundRequest::get("https://rally1.rallydev.com/slm/webservice/v2.0/defect");
    let mut post = OutboundRequest::post("https://other.example.com/x?y=1", "{}");
    auth.apply(&mut get);
    auth.apply(&mut post);

    assert_eq!(get.headers.get(AUTHORIZATION), post.headers.get(AUTHORIZATION));
    assert_eq!(decode_basic(&post), "user:pass");
}

#[test]
fn test_basic_auth_header_utf8() {
    let mut request = OutboundRequest::get("https://rally1.rallydev.com/");
    let value = provider("jürgen", "pässwörd").build_auth_header();
    request.headers.insert(AUTHORIZATION, value);
    assert_eq!(decode_basic(&request), "jürgen:pässwörd");
}

#[test]
fn test_apply_replaces_existing_authorization() {
    let transport = Arc::new(RecordingTransport::with_token("t"));
    let auth = authenticator(transport, FallbackPolicy::AnyFailure);

    let mut request = OutboundRequest::get("https://rally1.rallydev.com/").header(
        AUTHORIZATION,
        reqwest::header::HeaderValue::from_static("Bearer stale"),
    );
    auth.apply(&mut request);

    assert_eq!(request.headers.get_all(AUTHORIZATION).iter().count(), 1);
    assert_eq!(decode_basic(&request), "user:pass");
}

// ============================================================================
// Token resolution
// ============================================================================

#[tokio::test]
async fn test_security_token_resolved_once() {
    let transport = Arc::new(RecordingTransport::with_token("abc-123"));
    let auth = authenticator(transport.clone(), FallbackPolicy::AnyFailure);

    assert_eq!(auth.state().await, SecurityTokenState::Unresolved);

    for _ in 0..3 {
        let token = auth.security_token().await.unwrap();
        assert_eq!(token.as_deref(), Some("abc-123"));
    }

    assert_eq!(transport.token_calls(), 1);
    assert_eq!(
        auth.state().await,
        SecurityTokenState::Resolved("abc-123".to_string())
    );
}

#[tokio::test]
async fn test_bootstrap_request_is_authenticated_get() {
    let transport = Arc::new(RecordingTransport::with_token("abc-123"));
    let auth = authenticator(transport.clone(), FallbackPolicy::AnyFailure);

    auth.security_token().await.unwrap();

    let sent = transport.all_requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::GET);
    assert_eq!(sent[0].uri, TOKEN_URL);
    assert!(sent[0].query_values("key").is_empty());
    assert_eq!(decode_basic(&sent[0]), "user:pass");
}

#[tokio::test]
async fn test_not_found_falls_back_permanently() {
    let transport = Arc::new(RecordingTransport::new(TokenReply::Status(404)));
    let auth = authenticator(transport.clone(), FallbackPolicy::AnyFailure);

    assert_eq!(auth.security_token().await.unwrap(), None);
    assert_eq!(auth.state().await, SecurityTokenState::Unavailable);

    // Even if the endpoint appears later, it is never asked again
    transport.set_token_reply(TokenReply::Token("late".to_string()));
    assert_eq!(auth.security_token().await.unwrap(), None);
    assert_eq!(transport.token_calls(), 1);
}

#[tokio::test]
async fn test_any_failure_swallows_server_error_and_bad_body() {
    let transport = Arc::new(RecordingTransport::new(TokenReply::Status(500)));
    let auth = authenticator(transport, FallbackPolicy::AnyFailure);
    assert_eq!(auth.security_token().await.unwrap(), None);
    assert_eq!(auth.state().await, SecurityTokenState::Unavailable);

    let transport = Arc::new(RecordingTransport::new(TokenReply::Body(
        "<html>maintenance</html>".to_string(),
    )));
    let auth = authenticator(transport, FallbackPolicy::AnyFailure);
    assert_eq!(auth.security_token().await.unwrap(), None);
    assert_eq!(auth.state().await, SecurityTokenState::Unavailable);
}

#[tokio::test]
async fn test_not_found_only_surfaces_other_failures() {
    let transport = Arc::new(RecordingTransport::new(TokenReply::Status(503)));
    let auth = authenticator(transport.clone(), FallbackPolicy::NotFoundOnly);

    let err = auth.security_token().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    assert_eq!(auth.state().await, SecurityTokenState::Unresolved);

    // Next call tries again and succeeds
    transport.set_token_reply(TokenReply::Token("retry-ok".to_string()));
    assert_eq!(
        auth.security_token().await.unwrap().as_deref(),
        Some("retry-ok")
    );
    assert_eq!(transport.token_calls(), 2);
}

#[tokio::test]
async fn test_not_found_only_still_falls_back_on_404() {
    let transport = Arc::new(RecordingTransport::new(TokenReply::Status(404)));
    let auth = authenticator(transport, FallbackPolicy::NotFoundOnly);

    assert_eq!(auth.security_token().await.unwrap(), None);
    assert_eq!(auth.state().await, SecurityTokenState::Unavailable);
}

// ============================================================================
// Response parsing
// ============================================================================

#[test]
fn test_parse_security_token() {
    let body = r#"{"OperationResult": {"SecurityToken": "abc-123", "Errors": [], "Warnings": []}}"#;
    assert_eq!(parse_security_token(body).unwrap(), "abc-123");
}

#[test]
fn test_parse_security_token_missing_field() {
    let err = parse_security_token(r#"{"OperationResult": {}}"#).unwrap_err();
    assert!(matches!(err, Error::TokenResponse { .. }));

    let err = parse_security_token(r#"{"OperationResult": {"SecurityToken": ""}}"#).unwrap_err();
    assert!(matches!(err, Error::TokenResponse { .. }));
}

#[test]
fn test_parse_security_token_malformed() {
    assert!(parse_security_token("not json").is_err());
    assert!(parse_security_token(r#"{"SecurityToken": "top-level"}"#).is_err());
}
