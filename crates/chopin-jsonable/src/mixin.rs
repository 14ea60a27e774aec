use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use crate::detect::{AsyncDetector, XRequestedWith};
use crate::encoder::{JsonEncoder, ModelEncoder};
use crate::error::JsonableError;
use crate::form::FormErrors;
use crate::model::Model;
use crate::response::JsonResponse;
use crate::view::{FormView, Saved};

/// Wraps a [`FormView`] so asynchronous requests get JSON back.
///
/// The wrapped view always runs first, so whatever it does (re-rendering,
/// saving the object) happens exactly once. Only afterwards is its response
/// swapped out:
///
/// | outcome | asynchronous | response |
/// |---|---|---|
/// | invalid | yes | `400`, `{"field": ["message", ...]}` |
/// | invalid | no | the view's own |
/// | valid | yes | `200`, `{"response": <pk>}` |
/// | valid | no | the view's own |
///
/// ```rust,ignore
/// let view = CreateView::<ContactForm, contact::ActiveModel>::new(db, "/contacts/{id}").jsonable();
/// let app = Router::new().route("/contacts", form_route(Arc::new(view)));
/// ```
pub struct JsonableResponse<V, D = XRequestedWith, E = ModelEncoder> {
    inner: V,
    detector: D,
    encoder: E,
}

impl<V: FormView> JsonableResponse<V> {
    pub fn new(inner: V) -> Self {
        JsonableResponse {
            inner,
            detector: XRequestedWith::default(),
            encoder: ModelEncoder::new(),
        }
    }
}

impl<V, D, E> JsonableResponse<V, D, E>
where
    V: FormView,
    D: AsyncDetector,
    E: JsonEncoder,
{
    pub fn with_parts(inner: V, detector: D, encoder: E) -> Self {
        JsonableResponse {
            inner,
            detector,
            encoder,
        }
    }

    /// Swap the request classification.
    pub fn with_detector<D2: AsyncDetector>(self, detector: D2) -> JsonableResponse<V, D2, E> {
        JsonableResponse {
            inner: self.inner,
            detector,
            encoder: self.encoder,
        }
    }

    /// Swap the encoder used for JSON bodies.
    pub fn with_encoder<E2: JsonEncoder>(self, encoder: E2) -> JsonableResponse<V, D, E2> {
        JsonableResponse {
            inner: self.inner,
            detector: self.detector,
            encoder,
        }
    }

    pub fn inner(&self) -> &V {
        &self.inner
    }

    pub fn into_inner(self) -> V {
        self.inner
    }

    fn errors_response(&self, errors: &FormErrors) -> Result<Response, JsonableError> {
        let errors = serde_json::to_value(errors)?;
        let response = JsonResponse::with_encoder(errors, &self.encoder, true)?
            .status(StatusCode::BAD_REQUEST);
        Ok(response.into_response())
    }

    fn pk_response(&self, object: &V::Object) -> Result<Response, JsonableError> {
        let mut body = Map::new();
        body.insert("response".to_string(), self.encoder.to_value(object.pk())?);
        let response = JsonResponse::with_encoder(Value::Object(body), &self.encoder, true)?;
        Ok(response.into_response())
    }
}

#[async_trait]
impl<V, D, E> FormView for JsonableResponse<V, D, E>
where
    V: FormView,
    V::Error: From<JsonableError>,
    D: AsyncDetector,
    E: JsonEncoder,
{
    type Form = V::Form;
    type Object = V::Object;
    type Error = V::Error;

    async fn form_invalid(
        &self,
        headers: &HeaderMap,
        form: &Self::Form,
        errors: &FormErrors,
    ) -> Result<Response, Self::Error> {
        let response = self.inner.form_invalid(headers, form, errors).await?;
        if !self.detector.is_async(headers) {
            return Ok(response);
        }

        tracing::debug!(fields = errors.len(), "answering invalid form with json");
        Ok(self.errors_response(errors)?)
    }

    async fn form_valid(
        &self,
        headers: &HeaderMap,
        form: Self::Form,
    ) -> Result<Saved<Self::Object>, Self::Error> {
        let saved = self.inner.form_valid(headers, form).await?;
        if !self.detector.is_async(headers) {
            return Ok(saved);
        }

        tracing::debug!(model = saved.object.model_name(), "answering valid form with json");
        let response = self.pk_response(&saved.object)?;
        Ok(Saved::new(saved.object, response))
    }
}
