use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use chopin_jsonable::{Config, db};
use chopin_jsonable_contacts::{AppState, router, setup_schema};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app(vars: &[(&str, &str)]) -> Router {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = Config::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    });
    let db = db::connect(&config).await.expect("Failed to connect");
    setup_schema(&db).await.expect("Failed to create schema");
    router(AppState { db }, &config).expect("Failed to build router")
}

fn create(body: &str, extra: Option<(&str, &str)>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/contacts")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some((name, value)) = extra {
        builder = builder.header(name, value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

const AJAX: Option<(&str, &str)> = Some(("X-Requested-With", "XMLHttpRequest"));

// ═══ Create ═══

#[tokio::test]
async fn test_ajax_create_then_fetch() {
    let app = test_app(&[]).await;

    let res = app
        .clone()
        .oneshot(create("name=Ada&email=ada%40example.com&phone=", AJAX))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({"response": 1}));

    let res = app.oneshot(get("/contacts/1")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        body_json(res).await,
        json!({"id": 1, "name": "Ada", "email": "ada@example.com", "phone": null})
    );
}

#[tokio::test]
async fn test_browser_create_redirects_to_detail() {
    let app = test_app(&[]).await;

    let res = app
        .oneshot(create("name=Ada&email=ada%40example.com", None))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/contacts/1");
}

#[tokio::test]
async fn test_ajax_invalid_reports_field_errors() {
    let app = test_app(&[]).await;

    let res = app.oneshot(create("email=nope", AJAX)).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(res).await,
        json!({
            "email": ["Enter a valid email address."],
            "name": ["This field is required."],
        })
    );
}

#[tokio::test]
async fn test_ajax_missing_email_is_required() {
    let app = test_app(&[]).await;

    let res = app.oneshot(create("name=Ada", AJAX)).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(res).await,
        json!({"email": ["This field is required."]})
    );
}

#[tokio::test]
async fn test_browser_invalid_rerenders_page() {
    let app = test_app(&[]).await;

    let res = app.oneshot(create("name=&email=a%40b.io", None)).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let page = body_text(res).await;
    assert!(page.contains("<form"));
    assert!(page.contains("value=\"a@b.io\""));
    assert!(page.contains("Ensure this value has between 1 and 100 characters."));
}

#[tokio::test]
async fn test_configured_header() {
    let app = test_app(&[("AJAX_HEADER", "X-Ajax"), ("AJAX_HEADER_VALUE", "1")]).await;

    let res = app
        .clone()
        .oneshot(create("name=Ada&email=ada%40example.com", Some(("X-Ajax", "1"))))
        .await
        .unwrap();
    assert_eq!(body_json(res).await, json!({"response": 1}));

    // the stock header is now an ordinary browser request
    let res = app
        .oneshot(create("name=Bo&email=bo%40example.com", AJAX))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

// ═══ Read ═══

#[tokio::test]
async fn test_list_is_a_json_array() {
    let app = test_app(&[]).await;
    for body in ["name=Ada&email=ada%40example.com", "name=Bo&email=bo%40example.com"] {
        app.clone().oneshot(create(body, AJAX)).await.unwrap();
    }

    let res = app.oneshot(get("/contacts")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body[0]["name"], json!("Ada"));
    assert_eq!(body[1]["id"], json!(2));
}

#[tokio::test]
async fn test_missing_contact_is_404() {
    let app = test_app(&[]).await;

    let res = app.oneshot(get("/contacts/99")).await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await, json!({"detail": "Not found."}));
}

#[tokio::test]
async fn test_new_contact_page() {
    let app = test_app(&[]).await;

    let res = app.oneshot(get("/contacts/new")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("action=\"/contacts\""));
}
