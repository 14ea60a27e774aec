//! The model capability: a record of named fields with a primary key.
//!
//! Implement it with `#[derive(Model)]`, which also understands sea-orm
//! entity attributes:
//!
//! ```rust,ignore
//! use chopin_jsonable::Model;
//! use sea_orm::entity::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, chopin_jsonable::Model)]
//! #[sea_orm(table_name = "contacts")]
//! pub struct Model {
//!     #[sea_orm(primary_key)]
//!     pub id: i32,
//!     pub name: String,
//! }
//! ```

use serde_json::{Map, Value};

use crate::encoder::{Encodable, JsonEncoder};
use crate::error::JsonableError;

/// A declared field: its name and raw value.
pub type Field<'a> = (&'static str, Encodable<'a>);

/// A persisted record exposing its declared fields and its identifier.
///
/// Object safe, so encoders can hold a `&dyn Model` without knowing the type.
pub trait Model {
    /// Name used when the model ends up somewhere it can't be encoded.
    fn model_name(&self) -> &'static str;

    /// Declared fields in schema order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// The unique identifier.
    fn pk(&self) -> Encodable<'_>;
}

/// Convert a model to a field-name → value mapping.
///
/// Every declared field is present, in declaration order. Values go through
/// `encoder`, so dates, decimals and the like get the same treatment as
/// anywhere else in the document.
pub fn model_to_dict(
    model: &dyn Model,
    encoder: &dyn JsonEncoder,
) -> Result<Map<String, Value>, JsonableError> {
    model_to_dict_filtered(model, encoder, None, None)
}

/// Like [`model_to_dict`], restricted to `fields` (when given) and without
/// anything listed in `exclude`.
pub fn model_to_dict_filtered(
    model: &dyn Model,
    encoder: &dyn JsonEncoder,
    fields: Option<&[&str]>,
    exclude: Option<&[&str]>,
) -> Result<Map<String, Value>, JsonableError> {
    let mut dict = Map::new();
    for (name, value) in model.fields() {
        if fields.is_some_and(|wanted| !wanted.contains(&name)) {
            continue;
        }
        if exclude.is_some_and(|skipped| skipped.contains(&name)) {
            continue;
        }
        dict.insert(name.to_string(), encoder.to_value(value)?);
    }
    Ok(dict)
}
