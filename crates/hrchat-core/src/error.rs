//! Error types for the chat client
//!
//! Server-reported failures (FORM_ERROR, EXECUTION_ERROR, ERROR) are regular
//! response variants and never show up here.

use thiserror::Error;

/// A failed round trip to the chat endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Non-success HTTP status. `message` is the server-provided `error`
    /// field, or a status-derived fallback.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// Success status, but the body was not JSON.
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

impl TransportError {
    /// Text shown to the user in the chat log.
    pub fn display_message(&self) -> String {
        format!("Network or Server Error: {}", self)
    }
}

/// A response that could not be routed.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("response is empty or not an object")]
    Missing,

    #[error("response has no type")]
    MissingType,

    #[error("unexpected response type: {0}")]
    UnknownType(String),

    #[error("malformed {kind} response: {source}")]
    Malformed {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ResponseError {
    pub fn display_message(&self) -> String {
        match self {
            ResponseError::UnknownType(kind) => format!(
                "Received an unexpected response type: {} from the server.",
                kind
            ),
            _ => "Received an invalid response from the server.".to_string(),
        }
    }
}

/// Client-side form validation failure. No request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields (*) for the new employee.")]
    MissingRequired { fields: Vec<&'static str> },

    #[error("{label} {reason}")]
    InvalidField {
        field: &'static str,
        label: &'static str,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display_is_verbatim() {
        let err = TransportError::Server {
            status: 400,
            message: "bad input".to_string(),
        };
        assert_eq!(err.to_string(), "bad input");
        assert_eq!(err.display_message(), "Network or Server Error: bad input");
    }

    #[test]
    fn test_unknown_type_message_names_the_type() {
        let err = ResponseError::UnknownType("REBOOT".to_string());
        assert_eq!(
            err.display_message(),
            "Received an unexpected response type: REBOOT from the server."
        );
        assert_eq!(
            ResponseError::MissingType.display_message(),
            "Received an invalid response from the server."
        );
    }

    #[test]
    fn test_invalid_field_message() {
        let err = ValidationError::InvalidField {
            field: "commission_pct",
            label: "Commission Pct",
            reason: "must be between 0 and 1.",
        };
        assert_eq!(err.to_string(), "Commission Pct must be between 0 and 1.");
    }
}
