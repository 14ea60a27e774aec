use std::sync::Arc;

use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{MethodRouter, post};
use serde::de::DeserializeOwned;

use crate::error::JsonableError;
use crate::extract::FormData;
use crate::view::{FormView, process};

/// POST route that parses the body into the view's form and runs [`process`].
///
/// ```rust,ignore
/// let app = Router::new().route("/contacts", form_route(Arc::new(view)));
/// ```
pub fn form_route<V, S>(view: Arc<V>) -> MethodRouter<S>
where
    V: FormView + 'static,
    V::Form: DeserializeOwned + 'static,
    V::Error: IntoResponse + 'static,
    S: Clone + Send + Sync + 'static,
{
    post(move |headers: HeaderMap, FormData(form): FormData<V::Form>| {
        let view = Arc::clone(&view);
        async move { process(view.as_ref(), &headers, form).await }
    })
}

/// Shorthand for views whose error type is [`JsonableError`].
pub fn jsonable_route<V, S>(view: V) -> MethodRouter<S>
where
    V: FormView<Error = JsonableError> + 'static,
    V::Form: DeserializeOwned + 'static,
    S: Clone + Send + Sync + 'static,
{
    form_route(Arc::new(view))
}
