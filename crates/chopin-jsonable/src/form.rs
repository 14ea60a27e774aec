use std::collections::BTreeMap;

use serde::Serialize;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Key under which errors not tied to a single field are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Validation errors of a rejected form: field name → messages.
///
/// Serializes as a plain object:
///
/// ```json
/// { "email": ["Enter a valid email address."], "name": ["This field is required."] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Builder form of [`FormErrors::add`].
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn non_field_errors(&self) -> &[String] {
        self.get(NON_FIELD_ERRORS).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl From<&ValidationErrors> for FormErrors {
    /// Nested structs are flattened to `parent.child`, list items to
    /// `parent[index].child`.
    fn from(errors: &ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();
        collect(&mut form_errors, "", errors);
        form_errors
    }
}

fn collect(form_errors: &mut FormErrors, prefix: &str, errors: &ValidationErrors) {
    for (field, kind) in errors.errors() {
        let path = format!("{prefix}{field}");
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    form_errors.add(path.clone(), message_for(error));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect(form_errors, &format!("{path}."), nested);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(form_errors, &format!("{path}[{index}]."), nested);
                }
            }
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        FormErrors::from(&errors)
    }
}

/// The validator's own message if set, otherwise a default keyed on the code.
fn message_for(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).map(|v| v.to_string());
    match error.code.as_ref() {
        "required" => "This field is required.".to_string(),
        "email" => "Enter a valid email address.".to_string(),
        "url" => "Enter a valid URL.".to_string(),
        "length" => match (param("min"), param("max"), param("equal")) {
            (_, _, Some(equal)) => format!("Ensure this value has exactly {equal} characters."),
            (Some(min), None, _) => format!("Ensure this value has at least {min} characters."),
            (None, Some(max), _) => format!("Ensure this value has at most {max} characters."),
            (Some(min), Some(max), _) => {
                format!("Ensure this value has between {min} and {max} characters.")
            }
            (None, None, None) => "Enter a valid value.".to_string(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), None) => format!("Ensure this value is greater than or equal to {min}."),
            (None, Some(max)) => format!("Ensure this value is less than or equal to {max}."),
            (Some(min), Some(max)) => format!("Ensure this value is between {min} and {max}."),
            (None, None) => "Enter a valid value.".to_string(),
        },
        _ => "Enter a valid value.".to_string(),
    }
}
