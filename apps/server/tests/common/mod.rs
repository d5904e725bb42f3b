#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test;
use serde_json::Value;

pub mod proptest_prelude;

// Logging is auto-installed for every test binary that includes this module
#[ctor::ctor]
fn init_logging() {
    server_test_support::logging::init();
}

/// Check that a response follows the ProblemDetails structure.
pub async fn assert_problem_details_structure(
    resp: ServiceResponse<BoxBody>,
    expected_status: u16,
    expected_code: &str,
) -> Value {
    assert_eq!(resp.status().as_u16(), expected_status);

    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_eq!(content_type, "application/problem+json");

    let body = test::read_body(resp).await;
    let json: Value = serde_json::from_slice(&body).expect("problem details body is JSON");
    assert_eq!(json["status"], expected_status);
    assert_eq!(json["code"], expected_code);
    assert!(json["type"]
        .as_str()
        .is_some_and(|t| t.ends_with(expected_code)));
    assert!(json["title"].is_string());
    assert!(json["detail"].is_string());
    json
}
