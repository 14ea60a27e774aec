use std::fmt::Write as _;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use validator::Validate;

use crate::encoder::{JsonEncoder, ModelEncoder};
use crate::error::JsonableError;
use crate::form::FormErrors;
use crate::model::Model;
use crate::view::{FormView, Saved};

/// Everything outside the RFC 3986 unreserved set gets escaped.
const URL_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

type Renderer<F> = Arc<dyn Fn(&F, &FormErrors) -> String + Send + Sync>;

/// A view that inserts a new row from a validated form.
///
/// `F` is the form, converted with sea-orm's [`IntoActiveModel`]; `A` is the
/// entity's active model. On success it redirects (303) to `success_url`,
/// where `{field}` placeholders are replaced by the saved object's fields:
///
/// ```rust,ignore
/// let view = CreateView::<ContactForm, contact::ActiveModel>::new(db, "/contacts/{id}");
/// ```
///
/// On failure the form is re-rendered with status 200 through the renderer
/// (see [`CreateView::with_renderer`]).
pub struct CreateView<F, A> {
    db: DatabaseConnection,
    success_url: String,
    renderer: Renderer<F>,
    _active_model: PhantomData<fn() -> A>,
}

impl<F: 'static, A> CreateView<F, A> {
    pub fn new(db: DatabaseConnection, success_url: impl Into<String>) -> Self {
        CreateView {
            db,
            success_url: success_url.into(),
            renderer: Arc::new(default_renderer::<F>),
            _active_model: PhantomData,
        }
    }

    /// Replace the default error listing with a custom page.
    pub fn with_renderer(
        mut self,
        renderer: impl Fn(&F, &FormErrors) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn success_url(&self) -> &str {
        &self.success_url
    }
}

#[async_trait]
impl<F, A> FormView for CreateView<F, A>
where
    F: Validate + IntoActiveModel<A> + Send + Sync + 'static,
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A> + Model + Send + Sync,
{
    type Form = F;
    type Object = <A::Entity as EntityTrait>::Model;
    type Error = JsonableError;

    async fn form_invalid(
        &self,
        _headers: &HeaderMap,
        form: &F,
        errors: &FormErrors,
    ) -> Result<Response, JsonableError> {
        Ok(Html((self.renderer)(form, errors)).into_response())
    }

    async fn form_valid(
        &self,
        _headers: &HeaderMap,
        form: F,
    ) -> Result<Saved<Self::Object>, JsonableError> {
        let object = form.into_active_model().insert(&self.db).await?;
        tracing::info!(model = object.model_name(), "created object");

        let url = fill_url(&self.success_url, &object, &ModelEncoder::new())?;
        Ok(Saved::new(object, Redirect::to(&url).into_response()))
    }
}

/// Replace `{field}` placeholders in `template` with the model's field values.
///
/// Strings are inserted without quotes and every value is percent-encoded;
/// unknown placeholders are left as-is.
pub fn fill_url(
    template: &str,
    model: &dyn Model,
    encoder: &dyn JsonEncoder,
) -> Result<String, JsonableError> {
    let mut url = template.to_string();
    for (name, value) in model.fields() {
        let placeholder = format!("{{{name}}}");
        if !url.contains(&placeholder) {
            continue;
        }
        let replacement = match encoder.to_value(value)? {
            Value::String(s) => s,
            other => other.to_string(),
        };
        let replacement = utf8_percent_encode(&replacement, URL_VALUE).to_string();
        url = url.replace(&placeholder, &replacement);
    }
    Ok(url)
}

fn default_renderer<F>(_form: &F, errors: &FormErrors) -> String {
    let mut page = String::from("<ul class=\"errorlist\">");
    for (field, messages) in errors.iter() {
        let _ = write!(page, "<li>{}<ul>", escape(field));
        for message in messages {
            let _ = write!(page, "<li>{}</li>", escape(message));
        }
        page.push_str("</ul></li>");
    }
    page.push_str("</ul>");
    page
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
