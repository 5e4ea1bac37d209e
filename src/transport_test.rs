use super::*;

#[test]
fn headers_set_replaces_case_insensitively() {
    let mut headers = Headers::new();
    headers.set("Content-Type", "application/json");
    headers.set("content-type", "text/plain");

    assert_eq!(headers.len(), 1);
    assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
}

#[test]
fn headers_merge_prefers_overlay() {
    let mut base = Headers::new();
    base.set("Content-Type", "application/json");
    base.set("Authorization", "Bearer a");

    let mut overlay = Headers::new();
    overlay.set("authorization", "Bearer caller");
    overlay.set("X-Trace", "1");

    base.merge(&overlay);
    assert_eq!(base.get("Authorization"), Some("Bearer caller"));
    assert_eq!(base.get("Content-Type"), Some("application/json"));
    assert_eq!(base.get("x-trace"), Some("1"));
    assert_eq!(base.len(), 3);
}

#[test]
fn post_json_serializes_body() {
    let options = RequestOptions::post_json(&serde_json::json!({ "email": "a@b.test" })).unwrap();
    assert_eq!(options.method, Method::Post);
    assert_eq!(options.body.as_deref(), Some(r#"{"email":"a@b.test"}"#));
}

#[test]
fn response_ok_covers_2xx_only() {
    assert!(ApiResponse::new(200, "").ok());
    assert!(ApiResponse::new(204, "").ok());
    assert!(!ApiResponse::new(301, "").ok());
    assert!(!ApiResponse::new(401, "").ok());
    assert!(ApiResponse::new(401, "").is_unauthorized());
}

#[test]
fn into_json_maps_error_body_message() {
    let err = ApiResponse::new(403, r#"{"error":"account inactive"}"#)
        .into_json::<serde_json::Value>()
        .unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "account inactive");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn into_json_reports_malformed_success_body() {
    let err = ApiResponse::new(200, "<html>").into_json::<serde_json::Value>().unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn method_display_is_uppercase_verb() {
    assert_eq!(Method::Delete.to_string(), "DELETE");
    assert_eq!(RequestOptions::get().method, Method::Get);
}
