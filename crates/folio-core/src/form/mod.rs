//! Contact form: inline validation and asynchronous submission.

pub mod submit;
pub mod validate;

pub use submit::{
    ContactForm, FormState, FormTransport, HttpTransport, SubmitOutcome, TransportResponse,
    CONNECTION_ERROR_MESSAGE, GENERIC_ERROR_MESSAGE, SUCCESS_MESSAGE,
};
pub use validate::{
    check_field, check_value, clear_field_error, is_valid_email, show_field_error, validate_field,
    validate_form, FieldValidation, EMAIL_MESSAGE, MESSAGE_LENGTH_MESSAGE, REQUIRED_MESSAGE,
};
