//! The chat widget state machine
//!
//! `ChatWidget` owns the message log, the data display, the confirmation
//! flow and the outgoing call queue. It never touches the network itself:
//! a driver takes calls from `start_next`, performs them, and hands the
//! outcome back to `complete`. `drive` does both in a loop for a given
//! transport.

use std::collections::VecDeque;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::confirmation::{ConfirmationFlow, PendingConfirmation};
use crate::display::DataDisplay;
use crate::error::TransportError;
use crate::form::{AddEmployeeForm, FORM_SUBMISSION_ORIGIN, SUBMITTING_MESSAGE};
use crate::protocol::{ChatRequest, ChatResponse, ResponseKind, ADD_EMPLOYEE_FORM};
use crate::state::{Message, MessageKind, MessageLog};
use crate::table::ResultView;
use crate::transport::ChatTransport;

/// Origin label when no user message is associated with a response.
pub const DEFAULT_ORIGIN: &str = "Operation";
pub const CANCELLED_MESSAGE: &str = "Operation cancelled.";
pub const CONFIRMED_NOTE: &str = "User confirmed. Executing...";
pub const GENERIC_ERROR_TEXT: &str = "An error occurred.";
pub const CONFIRMATION_FALLBACK_TEXT: &str = "Please confirm this operation.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Message,
    ConfirmedExecution,
    FormSubmission,
}

/// A request waiting to be sent, with the label its response is routed under.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundCall {
    pub request: ChatRequest,
    pub origin: String,
    pub kind: CallKind,
}

#[derive(Debug)]
pub struct ChatWidget {
    log: MessageLog,
    display: DataDisplay,
    confirmation: ConfirmationFlow,
    queue: VecDeque<OutboundCall>,
    in_flight: Option<OutboundCall>,
    today: fn() -> NaiveDate,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl ChatWidget {
    pub fn new() -> Self {
        Self::with_clock(local_today)
    }

    /// `today` supplies the default hire date for new forms.
    pub fn with_clock(today: fn() -> NaiveDate) -> Self {
        Self {
            log: MessageLog::new(),
            display: DataDisplay::Empty,
            confirmation: ConfirmationFlow::new(),
            queue: VecDeque::new(),
            in_flight: None,
            today,
        }
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn messages(&self) -> &[Message] {
        self.log.messages()
    }

    pub fn display(&self) -> &DataDisplay {
        &self.display
    }

    pub fn form_mut(&mut self) -> Option<&mut AddEmployeeForm> {
        self.display.form_mut()
    }

    pub fn confirmation(&self) -> &ConfirmationFlow {
        &self.confirmation
    }

    pub fn pending_confirmation(&self) -> Option<&PendingConfirmation> {
        self.confirmation.awaiting()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    // ---------------------------------------------------------------------
    // User actions
    // ---------------------------------------------------------------------

    /// Echo a free-form message and queue it. Blank input is ignored.
    pub fn submit_message(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.log.user(text);
        self.enqueue(OutboundCall {
            request: ChatRequest::message(text),
            origin: text.to_string(),
            kind: CallKind::Message,
        });
        true
    }

    /// "Yes, Proceed": re-send the original message with the stored query.
    pub fn confirm_proceed(&mut self) -> bool {
        let Some(pending) = self.confirmation.proceed() else {
            return false;
        };
        self.log.set_note(pending.message_id, CONFIRMED_NOTE);
        debug!(query_type = ?pending.query_type_to_confirm, "user confirmed execution");

        self.enqueue(OutboundCall {
            request: ChatRequest::confirmed(
                pending.original_user_message.clone(),
                pending.query_to_confirm,
                pending.query_type_to_confirm,
            ),
            origin: pending.original_user_message,
            kind: CallKind::ConfirmedExecution,
        });
        true
    }

    /// "No, Cancel": drop the pending confirmation without a request.
    pub fn confirm_cancel(&mut self) -> bool {
        if self.confirmation.cancel().is_none() {
            return false;
        }
        self.log.bot(CANCELLED_MESSAGE, MessageKind::Info);
        true
    }

    /// Validate and queue the Add-Employee form. Validation failures are
    /// reported in the chat and nothing is sent.
    pub fn submit_form(&mut self) -> bool {
        let Some(form) = self.display.form() else {
            return false;
        };

        match form.validate() {
            Ok(data) => {
                self.log.user(SUBMITTING_MESSAGE);
                self.enqueue(OutboundCall {
                    request: ChatRequest::add_employee(data),
                    origin: FORM_SUBMISSION_ORIGIN.to_string(),
                    kind: CallKind::FormSubmission,
                });
                true
            }
            Err(err) => {
                debug!(error = %err, "add employee form rejected");
                self.log.bot(err.to_string(), MessageKind::Error);
                false
            }
        }
    }

    // ---------------------------------------------------------------------
    // Call lifecycle
    // ---------------------------------------------------------------------

    fn enqueue(&mut self, call: OutboundCall) {
        self.queue.push_back(call);
    }

    /// Take the next queued call if nothing is in flight. The thinking
    /// indicator stays up until `complete`.
    pub fn start_next(&mut self) -> Option<OutboundCall> {
        if self.in_flight.is_some() {
            return None;
        }
        let call = self.queue.pop_front()?;
        debug!(kind = ?call.kind, "starting chat call");
        self.log.show_thinking();
        self.in_flight = Some(call.clone());
        Some(call)
    }

    /// Settle the in-flight call. Failures are shown and not routed.
    pub fn complete(&mut self, result: Result<Value, TransportError>) {
        let Some(call) = self.in_flight.take() else {
            warn!("completion received with no call in flight");
            return;
        };
        self.log.hide_thinking();

        if call.kind == CallKind::ConfirmedExecution {
            self.confirmation.settle();
        }

        match result {
            Ok(value) => self.process_response(&value, &call.origin),
            Err(err) => {
                warn!(error = %err, kind = ?call.kind, "chat call failed");
                self.log.bot(err.display_message(), MessageKind::Error);
            }
        }
    }

    /// Run every queued call through `transport`, one at a time.
    pub async fn drive<T: ChatTransport + ?Sized>(&mut self, transport: &T) {
        while let Some(call) = self.start_next() {
            let result = transport.send(&call.request).await;
            self.complete(result);
        }
    }

    // ---------------------------------------------------------------------
    // Response routing
    // ---------------------------------------------------------------------

    pub fn process_response(&mut self, value: &Value, origin: &str) {
        let response = match ChatResponse::from_value(value) {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, response = %value, "invalid chat response");
                self.log.bot(err.display_message(), MessageKind::Error);
                return;
            }
        };

        self.clear_display_if_needed(response.kind());

        match response {
            ChatResponse::LoadComponent {
                response_text,
                component_name,
                pre_fill_data,
            } => {
                self.info(response_text);
                match component_name.as_deref() {
                    Some(ADD_EMPLOYEE_FORM) => {
                        let pre_fill = pre_fill_data.unwrap_or_default();
                        let form = AddEmployeeForm::new(&pre_fill, (self.today)());
                        self.display = DataDisplay::AddEmployeeForm(form);
                    }
                    Some(other) => warn!(component = other, "unknown component requested"),
                    None => {}
                }
            }
            ChatResponse::ConfirmationRequired {
                response_text,
                query_to_confirm,
                query_type_to_confirm,
            } => {
                let text = response_text.unwrap_or_else(|| CONFIRMATION_FALLBACK_TEXT.to_string());
                let message_id = self.log.bot(text, MessageKind::Confirmation);
                let superseded = self.confirmation.request(PendingConfirmation {
                    query_to_confirm,
                    query_type_to_confirm,
                    original_user_message: origin.to_string(),
                    message_id,
                });
                if let Some(previous) = superseded {
                    debug!(message_id = previous.message_id, "pending confirmation superseded");
                }
            }
            ChatResponse::DataResult {
                response_text,
                data,
                query_executed,
            } => {
                self.info(response_text);
                let query_executed = non_empty(query_executed);
                let view = ResultView::build(data.as_deref(), query_executed.as_deref(), origin);
                self.display = DataDisplay::Results(view);
            }
            ChatResponse::ActionSuccess {
                response_text,
                query_executed,
            } => {
                let text = response_text.unwrap_or_default();
                self.log.bot(text.clone(), MessageKind::Success);
                if let Some(query) = non_empty(query_executed) {
                    self.log.bot(format!("Executed: {}", query), MessageKind::Info);
                }
                self.display = DataDisplay::Success(text);
            }
            ChatResponse::FormError {
                response_text,
                query_attempted,
            }
            | ChatResponse::ExecutionError {
                response_text,
                query_attempted,
            }
            | ChatResponse::Error {
                response_text,
                query_attempted,
            } => {
                let text = non_empty(response_text).unwrap_or_else(|| GENERIC_ERROR_TEXT.to_string());
                self.log.bot(text.clone(), MessageKind::Error);
                if let Some(query) = non_empty(query_attempted) {
                    self.log.bot(format!("Attempted Query: {}", query), MessageKind::Info);
                }
                self.display = DataDisplay::Error(text);
            }
            ChatResponse::Clarification { response_text } | ChatResponse::Chat { response_text } => {
                self.info(response_text);
            }
        }
    }

    fn clear_display_if_needed(&mut self, kind: ResponseKind) {
        if kind.clears_display() || self.display.current_form().is_some() {
            self.display.clear();
        }
    }

    fn info(&mut self, text: Option<String>) {
        if let Some(text) = text {
            self.log.bot(text, MessageKind::Info);
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
