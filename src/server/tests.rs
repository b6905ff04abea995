use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use super::{handlers, router};
use crate::mx::tests::StubResolver;
use crate::verify::{Verifier, VerifyOptions};

fn app_with(stub: StubResolver) -> Router {
    let verifier = Verifier::new(Arc::new(stub), VerifyOptions::default());
    router(Arc::new(verifier), Duration::from_secs(5))
}

fn no_mx_app() -> Router {
    app_with(StubResolver::new(|_| Ok(Vec::new())))
}

async fn post(app: Router, uri: &str, body: &'static str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("request");
    let response = app.oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
}

#[tokio::test]
async fn health_answers_ok() {
    assert_eq!(handlers::health().await, "OK");

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request");
    let response = no_mx_app().oneshot(request).await.expect("infallible");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_address_gets_invalid_format() {
    let (status, body) =
        post(no_mx_app(), "/api/validate-email", r#"{"email":"not-an-email"}"#).await;
    assert_eq!(status, StatusCode::OK);
    insta::assert_snapshot!(body, @r#"{"status":"invalid","message":"Invalid Format","details":"Please enter a valid email address format."}"#);
}

#[tokio::test]
async fn missing_email_on_status_endpoint_is_invalid_format() {
    for body in ["", "{}", r#"{"email":"   "}"#, r#"{"email":42}"#] {
        let (status, text) = post(no_mx_app(), "/api/validate-email", body).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert!(text.contains("Invalid Format"), "{body}: {text}");
    }
}

#[tokio::test]
async fn domain_without_mx_gets_invalid_domain() {
    let (status, body) =
        post(no_mx_app(), "/api/validate-email", r#"{"email":"user@nomx.test"}"#).await;
    assert_eq!(status, StatusCode::OK);
    insta::assert_snapshot!(body, @r#"{"status":"invalid","message":"Invalid Domain","details":"This domain does not have MX records and cannot receive mail."}"#);
}

#[tokio::test]
async fn checks_endpoint_rejects_bad_input() {
    let (status, body) = post(no_mx_app(), "/api/validate-email/checks", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    insta::assert_snapshot!(body, @r#"{"error":"Email is required."}"#);

    let (status, body) =
        post(no_mx_app(), "/api/validate-email/checks", r#"{"email":"nope"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    insta::assert_snapshot!(body, @r#"{"error":"Invalid email format."}"#);
}

#[tokio::test]
async fn checks_endpoint_reports_each_stage() {
    let (status, body) =
        post(no_mx_app(), "/api/validate-email/checks", r#"{"email":"user@nomx.test"}"#).await;
    assert_eq!(status, StatusCode::OK);
    insta::assert_snapshot!(body, @r#"{"mxCheck":{"valid":false,"message":"domain nomx.test has no MX records"},"smtpCheck":{"valid":false,"message":"not checked: no mail exchange to probe"},"dnsblCheck":{"valid":false,"message":"not checked: no mail exchange to look up"}}"#);
}

#[tokio::test]
async fn score_endpoint_reports_band() {
    let (status, body) =
        post(no_mx_app(), "/api/validate-email/score", r#"{"email":"user@nomx.test"}"#).await;
    assert_eq!(status, StatusCode::OK);
    insta::assert_snapshot!(body, @r#"{"email":"user@nomx.test","score":0,"verdict":"Undeliverable","reasons":["domain has no MX records"]}"#);

    let (status, _) = post(no_mx_app(), "/api/validate-email/score", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn panic_in_pipeline_becomes_server_error() {
    let app = app_with(StubResolver::new(|_| panic!("resolver exploded")));
    let (status, body) =
        post(app, "/api/validate-email", r#"{"email":"user@example.com"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("exploded"));
    insta::assert_snapshot!(body, @r#"{"status":"invalid","message":"Server Error","details":"An unexpected error occurred while verifying this address."}"#);
}

#[tokio::test]
async fn request_timeout_becomes_server_error() {
    let stub = StubResolver::new(|_| Ok(Vec::new())).with_delay(Duration::from_secs(2));
    let verifier = Verifier::new(Arc::new(stub), VerifyOptions::default());
    let app = router(Arc::new(verifier), Duration::from_millis(50));

    let (status, body) =
        post(app, "/api/validate-email", r#"{"email":"user@slow.test"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    insta::assert_snapshot!(body, @r#"{"status":"invalid","message":"Server Error","details":"An unexpected error occurred while verifying this address."}"#);
}
