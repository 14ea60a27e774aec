use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::error::JsonableError;

/// Form body extractor.
///
/// Reads JSON when the request says `content-type: application/json`,
/// `application/x-www-form-urlencoded` otherwise, so the same form accepts
/// both a browser `<form>` post and a `fetch()` call.
///
/// ```rust,ignore
/// async fn create(headers: HeaderMap, FormData(form): FormData<ContactForm>) -> Response {
///     // ...
/// }
/// ```
pub struct FormData<T>(pub T);

impl<S, T> FromRequest<S> for FormData<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonableError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"));

        let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
            .await
            .map_err(|e| JsonableError::BadRequest(format!("Failed to read body: {}", e)))?;

        let value = if is_json {
            serde_json::from_slice(&bytes)
                .map_err(|e| JsonableError::BadRequest(format!("Invalid JSON: {}", e)))?
        } else {
            serde_urlencoded::from_bytes(&bytes)
                .map_err(|e| JsonableError::BadRequest(format!("Invalid form data: {}", e)))?
        };

        Ok(FormData(value))
    }
}
