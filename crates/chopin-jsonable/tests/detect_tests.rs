use axum::http::{HeaderMap, HeaderValue, header};
use chopin_jsonable::{AcceptsJson, AsyncDetector, ConfiguredDetector, XRequestedWith};

fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.append(*name, HeaderValue::from_static(*value));
    }
    map
}

// ═══ XRequestedWith ═══

#[test]
fn test_default_header_match() {
    let detector = XRequestedWith::default();
    assert!(detector.is_async(&headers(&[("x-requested-with", "XMLHttpRequest")])));
}

#[test]
fn test_missing_header_is_not_async() {
    assert!(!XRequestedWith::default().is_async(&HeaderMap::new()));
}

#[test]
fn test_value_must_match_exactly() {
    let detector = XRequestedWith::default();
    assert!(!detector.is_async(&headers(&[("x-requested-with", "xmlhttprequest")])));
    assert!(!detector.is_async(&headers(&[("x-requested-with", "fetch")])));
}

#[test]
fn test_custom_header() {
    let detector = XRequestedWith::matching("X-Ajax", "1").unwrap();
    assert_eq!(detector.header_name().as_str(), "x-ajax");
    assert!(detector.is_async(&headers(&[("x-ajax", "1")])));
    assert!(!detector.is_async(&headers(&[("x-requested-with", "XMLHttpRequest")])));
}

#[test]
fn test_invalid_header_name_is_rejected() {
    assert!(XRequestedWith::matching("bad header", "1").is_err());
    assert!(XRequestedWith::matching("x-ajax", "bad\nvalue").is_err());
}

// ═══ AcceptsJson ═══

#[test]
fn test_accepts_json() {
    assert!(AcceptsJson.is_async(&headers(&[("accept", "application/json")])));
    assert!(AcceptsJson.is_async(&headers(&[(
        "accept",
        "text/html;q=0.9, application/json; charset=utf-8"
    )])));
    assert!(!AcceptsJson.is_async(&headers(&[("accept", "text/html")])));
    assert!(!AcceptsJson.is_async(&HeaderMap::new()));
}

// ═══ Closures & configured detectors ═══

#[test]
fn test_closure_detector() {
    let detector = |h: &HeaderMap| h.contains_key("hx-request");
    assert!(detector.is_async(&headers(&[("hx-request", "true")])));
    assert!(!detector.is_async(&HeaderMap::new()));
}

#[test]
fn test_configured_detector_combines_rules() {
    let json_accept = headers(&[("accept", "application/json")]);
    let xhr = headers(&[("x-requested-with", "XMLHttpRequest")]);

    let strict = ConfiguredDetector::default();
    assert!(strict.is_async(&xhr));
    assert!(!strict.is_async(&json_accept));

    let relaxed = ConfiguredDetector {
        accepts_json: true,
        ..ConfiguredDetector::default()
    };
    assert!(relaxed.is_async(&xhr));
    assert!(relaxed.is_async(&json_accept));

    let mut html = HeaderMap::new();
    html.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
    assert!(!relaxed.is_async(&html));
}
