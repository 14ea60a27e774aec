//! Form-handling views.
//!
//! A [`FormView`] owns the two outcomes of a submission: `form_invalid`
//! renders the rejected form, `form_valid` persists the object and returns
//! it together with the response. [`process`] validates and dispatches.

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::response::Response;
use validator::Validate;

use crate::detect::AsyncDetector;
use crate::encoder::JsonEncoder;
use crate::form::FormErrors;
use crate::mixin::JsonableResponse;
use crate::model::Model;

/// Result of an accepted submission.
pub struct Saved<M> {
    pub object: M,
    pub response: Response,
}

impl<M> Saved<M> {
    pub fn new(object: M, response: Response) -> Self {
        Saved { object, response }
    }
}

#[async_trait]
pub trait FormView: Send + Sync {
    type Form: Validate + Send + Sync;
    type Object: Model + Send;
    /// Errors are returned to the caller untouched by any wrapper.
    type Error: Send;

    async fn form_invalid(
        &self,
        headers: &HeaderMap,
        form: &Self::Form,
        errors: &FormErrors,
    ) -> Result<Response, Self::Error>;

    async fn form_valid(
        &self,
        headers: &HeaderMap,
        form: Self::Form,
    ) -> Result<Saved<Self::Object>, Self::Error>;
}

/// Validate `form` and hand it to the matching outcome of `view`.
pub async fn process<V>(view: &V, headers: &HeaderMap, form: V::Form) -> Result<Response, V::Error>
where
    V: FormView + ?Sized,
{
    match form.validate() {
        Ok(()) => {
            tracing::debug!("form valid");
            let saved = view.form_valid(headers, form).await?;
            Ok(saved.response)
        }
        Err(errors) => {
            let errors = FormErrors::from(&errors);
            tracing::debug!(fields = errors.len(), "form invalid");
            view.form_invalid(headers, &form, &errors).await
        }
    }
}

/// Adds [`jsonable`](FormViewExt::jsonable) to every view.
pub trait FormViewExt: FormView + Sized {
    /// Answer asynchronous requests with JSON instead of the view's own responses.
    fn jsonable(self) -> JsonableResponse<Self> {
        JsonableResponse::new(self)
    }

    fn jsonable_with<D, E>(self, detector: D, encoder: E) -> JsonableResponse<Self, D, E>
    where
        D: AsyncDetector,
        E: JsonEncoder,
    {
        JsonableResponse::with_parts(self, detector, encoder)
    }
}

impl<V: FormView> FormViewExt for V {}
