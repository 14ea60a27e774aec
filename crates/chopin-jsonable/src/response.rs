use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::encoder::{Encodable, JsonEncoder, ModelEncoder};
use crate::error::JsonableError;

/// An `application/json` response whose body is produced by a [`JsonEncoder`].
///
/// In safe mode (the default) only JSON objects are accepted at the top level:
///
/// ```rust,ignore
/// JsonResponse::new(json!({"response": 42}))?;                   // ok
/// JsonResponse::new(json!([1, 2]));                              // Err(NonObject)
/// JsonResponse::with_encoder(json!([1, 2]), &ModelEncoder::new(), false)?; // ok
/// ```
#[derive(Debug, Clone)]
pub struct JsonResponse {
    status: StatusCode,
    body: String,
}

impl JsonResponse {
    /// Encode `data` with [`ModelEncoder`] in safe mode.
    pub fn new<'a>(data: impl Into<Encodable<'a>>) -> Result<Self, JsonableError> {
        Self::with_encoder(data, &ModelEncoder::new(), true)
    }

    pub fn with_encoder<'a>(
        data: impl Into<Encodable<'a>>,
        encoder: &dyn JsonEncoder,
        safe: bool,
    ) -> Result<Self, JsonableError> {
        let value = encoder.to_value(data.into())?;
        if safe && !value.is_object() {
            return Err(JsonableError::NonObject);
        }

        Ok(JsonResponse {
            status: StatusCode::OK,
            body: serde_json::to_string(&value)?,
        })
    }

    /// Set the status code (default 200).
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl IntoResponse for JsonResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}
