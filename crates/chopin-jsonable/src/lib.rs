//! Model-aware JSON encoding and AJAX-aware form responses for Chopin
//! applications.
//!
//! - [`ModelEncoder`] encodes model instances as field mappings and leaves
//!   everything else to [`FrameworkEncoder`].
//! - [`JsonableResponse`] wraps a [`FormView`] and answers asynchronous
//!   requests with JSON: validation errors with `400`, or
//!   `{"response": <pk>}` once the object is saved.

// lets `#[derive(Model)]` expand to `::chopin_jsonable::...` inside this crate
extern crate self as chopin_jsonable;

pub mod config;
pub mod create;
pub mod db;
pub mod detect;
pub mod encoder;
pub mod error;
pub mod extract;
pub mod form;
pub mod logging;
pub mod mixin;
pub mod model;
pub mod prelude;
pub mod response;
pub mod routing;
pub mod view;

pub use chopin_jsonable_macros::Model;
pub use config::Config;
pub use create::CreateView;
pub use detect::{AcceptsJson, AsyncDetector, ConfiguredDetector, XRequestedWith};
pub use encoder::{Encodable, FrameworkEncoder, JsonEncoder, ModelEncoder, ToEncodable};
pub use error::JsonableError;
pub use extract::FormData;
pub use form::{FormErrors, NON_FIELD_ERRORS};
pub use mixin::JsonableResponse;
pub use model::{Field, Model, model_to_dict, model_to_dict_filtered};
pub use response::JsonResponse;
pub use routing::{form_route, jsonable_route};
pub use view::{FormView, FormViewExt, Saved, process};
