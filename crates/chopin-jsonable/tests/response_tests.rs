use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chopin_jsonable::{Encodable, JsonResponse, JsonableError, Model, ModelEncoder};
use serde_json::{Value, json};

#[derive(Model)]
struct Tag {
    id: u32,
    label: String,
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body should be JSON")
}

// ═══ JsonResponse ═══

#[test]
fn test_object_response_defaults_to_200() {
    let response = JsonResponse::new(json!({"response": 42})).unwrap();
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.body(), r#"{"response":42}"#);
}

#[test]
fn test_status_builder() {
    let response = JsonResponse::new(json!({"name": ["required"]}))
        .unwrap()
        .status(StatusCode::BAD_REQUEST);
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_safe_mode_rejects_non_objects() {
    let err = JsonResponse::new(json!([1, 2, 3])).unwrap_err();
    assert!(matches!(err, JsonableError::NonObject));
}

#[test]
fn test_unsafe_mode_allows_lists() {
    let response = JsonResponse::with_encoder(json!([1, 2, 3]), &ModelEncoder::new(), false)
        .expect("lists are allowed when safe is off");
    assert_eq!(response.body(), "[1,2,3]");
}

#[test]
fn test_model_is_a_valid_top_level_object() {
    let tag = Tag {
        id: 3,
        label: "mazurka".to_string(),
    };
    let response = JsonResponse::new(Encodable::Model(&tag)).unwrap();
    assert_eq!(response.body(), r#"{"id":3,"label":"mazurka"}"#);
}

#[tokio::test]
async fn test_into_response_sets_content_type() {
    let response = JsonResponse::new(json!({"ok": true}))
        .unwrap()
        .status(StatusCode::CREATED)
        .into_response();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body_json(response).await, json!({"ok": true}));
}

// ═══ JsonableError ═══

#[test]
fn test_error_status_codes() {
    assert_eq!(
        JsonableError::BadRequest("x".into()).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        JsonableError::Unserializable("Socket").status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        JsonableError::NonObject.status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_error_codes() {
    assert_eq!(JsonableError::Unserializable("Socket").error_code(), "UNSERIALIZABLE");
    assert_eq!(JsonableError::NonObject.error_code(), "NON_OBJECT");
    assert_eq!(JsonableError::BadRequest("x".into()).error_code(), "BAD_REQUEST");
}

#[tokio::test]
async fn test_error_into_response_body() {
    let response = JsonableError::BadRequest("Invalid JSON: EOF".into()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("BAD_REQUEST"));
    assert_eq!(body["error"]["message"], json!("Bad request: Invalid JSON: EOF"));
}
