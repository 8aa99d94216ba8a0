//! Contact form submission.
//!
//! ```text
//!   Idle ──submit──▶ Validating ──invalid──▶ Idle
//!                        │
//!                      valid
//!                        ▼
//!                   Submitting ──response / failure──▶ Idle
//! ```
//!
//! The submit control is disabled and shows its spinner for the whole
//! request. Submissions arriving while one is in flight are ignored. The
//! outcome is written to the `.form-status` element, which hides itself
//! again after a configurable delay.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::validate::{clear_field_error, validate_field, validate_form};
use crate::config::{ms, FormConfig};
use crate::dom::{Document, NodeId, SharedDocument};
use crate::error::FolioResult;

pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again later.";
pub const CONNECTION_ERROR_MESSAGE: &str = "Could not send. Check your connection.";

/// A response from the form endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `error` field of a JSON body, if there is one.
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Delivers form fields to an endpoint.
#[async_trait]
pub trait FormTransport: Send + Sync {
    async fn send(&self, endpoint: &str, fields: &[(String, String)]) -> FolioResult<TransportResponse>;
}

/// Multipart POST over HTTP, asking for a JSON reply.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> FolioResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FormTransport for HttpTransport {
    async fn send(&self, endpoint: &str, fields: &[(String, String)]) -> FolioResult<TransportResponse> {
        let form = fields
            .iter()
            .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            });

        let response = self
            .client
            .post(endpoint)
            .header("Accept", "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A required field failed validation; nothing was sent
    Invalid,
    /// Another submission was already in flight
    Busy,
    Sent,
    Rejected { message: String },
    TransportFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

pub struct ContactForm {
    doc: SharedDocument,
    form: NodeId,
    submit_button: Option<NodeId>,
    status: Option<NodeId>,
    endpoint: String,
    transport: Arc<dyn FormTransport>,
    status_visible: Duration,
    state: Mutex<FormState>,
    status_timer: Mutex<Option<JoinHandle<()>>>,
}

impl ContactForm {
    /// Bind to `.contact-form`; `None` when the page has no form.
    ///
    /// The endpoint is the configured override or the form's `action`.
    pub fn attach(doc: SharedDocument, config: &FormConfig, transport: Arc<dyn FormTransport>) -> Option<Self> {
        let (form, submit_button, status, action) = {
            let d = doc.read();
            let Some(form) = d.first_by_class("contact-form") else {
                debug!("No contact form on page");
                return None;
            };
            (
                form,
                d.find_class_within(form, "form-submit"),
                d.find_class_within(form, "form-status"),
                d.get(form).and_then(|el| el.attr("action")).map(str::to_string),
            )
        };
        let endpoint = config.endpoint.clone().or(action).unwrap_or_default();
        if endpoint.is_empty() {
            warn!("Contact form has no endpoint; submissions will fail");
        }
        Some(Self {
            doc,
            form,
            submit_button,
            status,
            endpoint,
            transport,
            status_visible: ms(config.status_visible_ms),
            state: Mutex::new(FormState::Idle),
            status_timer: Mutex::new(None),
        })
    }

    pub fn element(&self) -> NodeId {
        self.form
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> FormState {
        *self.state.lock()
    }

    /// Whether `field` is one of this form's text controls.
    pub fn owns_field(&self, field: NodeId) -> bool {
        let doc = self.doc.read();
        doc.is_within(field, self.form)
            && doc
                .get(field)
                .is_some_and(|el| el.has_class("form-input") || el.has_class("form-textarea"))
    }

    pub fn on_blur(&self, field: NodeId) -> bool {
        validate_field(&mut self.doc.write(), field)
    }

    pub fn on_input(&self, field: NodeId, value: &str) {
        let mut doc = self.doc.write();
        doc.update(field, |el| el.set_value(value));
        clear_field_error(&mut doc, field);
    }

    pub async fn submit(&self) -> SubmitOutcome {
        {
            let mut state = self.state.lock();
            if *state != FormState::Idle {
                debug!(state = ?*state, "Submission already in progress, ignoring");
                return SubmitOutcome::Busy;
            }
            *state = FormState::Validating;
        }

        let fields = {
            let mut doc = self.doc.write();
            if !validate_form(&mut doc, self.form) {
                *self.state.lock() = FormState::Idle;
                debug!("Form invalid, not submitting");
                return SubmitOutcome::Invalid;
            }
            self.set_loading(&mut doc, true);
            self.collect_fields(&doc)
        };
        *self.state.lock() = FormState::Submitting;

        let outcome = match self.transport.send(&self.endpoint, &fields).await {
            Ok(response) if response.is_success() => {
                info!(status = response.status, "Form submitted");
                SubmitOutcome::Sent
            }
            Ok(response) => {
                let message = response
                    .error_message()
                    .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
                warn!(status = response.status, %message, "Form endpoint rejected submission");
                SubmitOutcome::Rejected { message }
            }
            Err(e) => {
                error!(error = %e, endpoint = %self.endpoint, "Form submission error");
                SubmitOutcome::TransportFailed
            }
        };

        {
            let mut doc = self.doc.write();
            match &outcome {
                SubmitOutcome::Sent => {
                    self.show_status(&mut doc, StatusKind::Success, SUCCESS_MESSAGE);
                    self.reset(&mut doc);
                }
                SubmitOutcome::Rejected { message } => {
                    self.show_status(&mut doc, StatusKind::Error, message);
                }
                _ => self.show_status(&mut doc, StatusKind::Error, CONNECTION_ERROR_MESSAGE),
            }
            self.set_loading(&mut doc, false);
        }
        self.schedule_status_hide();
        *self.state.lock() = FormState::Idle;
        outcome
    }

    /// Name/value pairs of every named control, in document order.
    fn collect_fields(&self, doc: &Document) -> Vec<(String, String)> {
        doc.find_all(self.form, |el| el.has_attr("name"))
            .into_iter()
            .filter_map(|n| doc.get(n))
            .filter_map(|el| Some((el.attr("name")?.to_string(), el.value().to_string())))
            .collect()
    }

    fn reset(&self, doc: &mut Document) {
        for field in doc.find_all(self.form, |el| el.has_attr("name")) {
            doc.update(field, |el| el.set_value(""));
        }
    }

    fn set_loading(&self, doc: &mut Document, loading: bool) {
        let Some(button) = self.submit_button else { return };
        doc.update(button, |el| el.set_disabled(loading));
        if let Some(text) = doc.find_class_within(button, "submit-text") {
            doc.update(text, |el| el.set_style("display", if loading { "none" } else { "inline" }));
        }
        if let Some(spinner) = doc.find_class_within(button, "submit-loading") {
            doc.update(spinner, |el| {
                el.set_style("display", if loading { "inline-flex" } else { "none" })
            });
        }
    }

    fn show_status(&self, doc: &mut Document, kind: StatusKind, message: &str) {
        let Some(status) = self.status else { return };
        doc.update(status, |el| {
            el.set_class_name(&format!("form-status {}", kind.as_str()));
            el.set_text(message);
            el.set_style("display", "block");
        });
    }

    /// Hide the status after the visibility window. A newer status restarts the window.
    fn schedule_status_hide(&self) {
        let Some(status) = self.status else { return };
        let doc = self.doc.clone();
        let delay = self.status_visible;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            doc.write().update(status, |el| el.set_style("display", "none"));
        });
        if let Some(previous) = self.status_timer.lock().replace(timer) {
            previous.abort();
        }
    }
}

impl Drop for ContactForm {
    fn drop(&mut self) {
        if let Some(timer) = self.status_timer.lock().take() {
            timer.abort();
        }
    }
}
