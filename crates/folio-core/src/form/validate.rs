//! Field validation for the contact form.
//!
//! Rules are checked in order against the trimmed value and the first failing
//! one wins:
//!
//! ```text
//!   required && empty            → "This field is required."
//!   type=email && !email-shaped  → "Please enter a valid email."
//!   name=message && < 10 chars   → "Message must be at least 10 characters."
//! ```
//!
//! The format rules only look at non-empty values, so an optional field left
//! blank is always valid.

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{Document, Element, NodeId};

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email.";
pub const MESSAGE_LENGTH_MESSAGE: &str = "Message must be at least 10 characters.";

/// Minimum length of the `message` field, in characters
pub const MIN_MESSAGE_CHARS: usize = 10;

/// Class added to a field that failed validation
pub const ERROR_CLASS: &str = "error";
/// Class of the inline error element following a field
pub const ERROR_MESSAGE_CLASS: &str = "error-message";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// Result of checking one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldValidation {
    pub valid: bool,
    pub message: Option<&'static str>,
}

impl FieldValidation {
    pub const VALID: Self = Self {
        valid: true,
        message: None,
    };

    fn invalid(message: &'static str) -> Self {
        Self {
            valid: false,
            message: Some(message),
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Apply the rules to a raw value.
pub fn check_value(value: &str, required: bool, is_email: bool, is_message: bool) -> FieldValidation {
    let value = value.trim();
    if required && value.is_empty() {
        return FieldValidation::invalid(REQUIRED_MESSAGE);
    }
    if value.is_empty() {
        return FieldValidation::VALID;
    }
    if is_email && !is_valid_email(value) {
        return FieldValidation::invalid(EMAIL_MESSAGE);
    }
    if is_message && value.chars().count() < MIN_MESSAGE_CHARS {
        return FieldValidation::invalid(MESSAGE_LENGTH_MESSAGE);
    }
    FieldValidation::VALID
}

/// Apply the rules to a form control, reading its `required`, `type` and `name`.
pub fn check_field(field: &Element) -> FieldValidation {
    check_value(
        field.value(),
        field.has_attr("required"),
        field.attr("type") == Some("email"),
        field.attr("name") == Some("message"),
    )
}

/// Validate a field and show or clear its inline error. Returns validity.
pub fn validate_field(doc: &mut Document, field: NodeId) -> bool {
    let Some(result) = doc.get(field).map(check_field) else {
        return true;
    };
    match result.message {
        Some(message) => show_field_error(doc, field, message),
        None => clear_field_error(doc, field),
    }
    result.valid
}

/// Validate every required field under `form`, marking each one.
pub fn validate_form(doc: &mut Document, form: NodeId) -> bool {
    let required = doc.find_all(form, |el| el.has_attr("required"));
    required
        .into_iter()
        .fold(true, |all_valid, field| validate_field(doc, field) && all_valid)
}

fn error_element(doc: &Document, field: NodeId) -> Option<NodeId> {
    doc.next_sibling(field)
        .filter(|&s| doc.get(s).is_some_and(|el| el.has_class(ERROR_MESSAGE_CLASS)))
}

pub fn show_field_error(doc: &mut Document, field: NodeId, message: &str) {
    doc.update(field, |el| el.add_class(ERROR_CLASS));
    if let Some(slot) = error_element(doc, field) {
        doc.update(slot, |el| {
            el.set_text(message);
            el.set_style("display", "block");
        });
    }
}

pub fn clear_field_error(doc: &mut Document, field: NodeId) {
    doc.update(field, |el| el.remove_class(ERROR_CLASS));
    if let Some(slot) = error_element(doc, field) {
        doc.update(slot, |el| el.set_style("display", "none"));
    }
}
