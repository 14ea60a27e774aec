use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use chopin_jsonable::detect::DetectorError;
use chopin_jsonable::prelude::*;
use sea_orm::{EntityTrait, QueryOrder};
use serde_json::json;

use crate::AppState;
use crate::models::contact::{self, ContactForm, Entity as Contact};

// ── Routes ──

pub fn routes(state: &AppState, config: &Config) -> Result<Router<AppState>, DetectorError> {
    let create = CreateView::<ContactForm, contact::ActiveModel>::new(
        state.db.clone(),
        "/contacts/{id}",
    )
    .with_renderer(render_form)
    .jsonable_with(config.detector()?, ModelEncoder::new());

    Ok(Router::new()
        .route("/contacts", jsonable_route(create).get(list_contacts))
        .route("/contacts/new", get(new_contact))
        .route("/contacts/{id}", get(get_contact)))
}

// ── Handlers ──

/// All contacts, oldest first.
async fn list_contacts(State(state): State<AppState>) -> Result<JsonResponse, JsonableError> {
    let contacts = Contact::find()
        .order_by_asc(contact::Column::Id)
        .all(&state.db)
        .await?;

    let items = contacts
        .iter()
        .map(|c| Encodable::Model(c))
        .collect::<Vec<_>>();
    JsonResponse::with_encoder(Encodable::List(items), &ModelEncoder::new(), false)
}

async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<JsonResponse, JsonableError> {
    match Contact::find_by_id(id).one(&state.db).await? {
        Some(contact) => JsonResponse::new(Encodable::Model(&contact)),
        None => Ok(JsonResponse::new(json!({"detail": "Not found."}))?.status(StatusCode::NOT_FOUND)),
    }
}

async fn new_contact() -> Html<String> {
    Html(render_form(&ContactForm::default(), &FormErrors::new()))
}

// ── Page ──

fn render_form(form: &ContactForm, errors: &FormErrors) -> String {
    let field = |name: &str, label: &str, value: &str| {
        let messages: String = errors
            .get(name)
            .unwrap_or_default()
            .iter()
            .map(|m| format!("<li>{}</li>", escape(m)))
            .collect();
        format!(
            "<p><label>{label} <input name=\"{name}\" value=\"{}\"></label><ul class=\"errorlist\">{messages}</ul></p>",
            escape(value)
        )
    };

    format!(
        "<!doctype html><title>New contact</title><form method=\"post\" action=\"/contacts\">{}{}{}<button>Save</button></form>",
        field("name", "Name", form.name.as_deref().unwrap_or_default()),
        field("email", "Email", form.email.as_deref().unwrap_or_default()),
        field("phone", "Phone", form.phone.as_deref().unwrap_or_default()),
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
