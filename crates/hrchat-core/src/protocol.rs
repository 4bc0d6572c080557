//! Wire types for the `/chat` endpoint

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ResponseError;

/// Component name the server uses to request the Add-Employee form.
pub const ADD_EMPLOYEE_FORM: &str = "add_employee_form";

/// Request body sent to `/chat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatRequest {
    Confirmed {
        message: String,
        confirmed_execution: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        confirmed_sql_query: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        confirmed_query_type: Option<String>,
    },
    Message {
        message: String,
    },
    AddEmployee {
        add_employee_form_data: EmployeeFormData,
    },
}

impl ChatRequest {
    pub fn message(text: impl Into<String>) -> Self {
        ChatRequest::Message {
            message: text.into(),
        }
    }

    pub fn confirmed(
        original_message: impl Into<String>,
        query: Option<String>,
        query_type: Option<String>,
    ) -> Self {
        ChatRequest::Confirmed {
            message: original_message.into(),
            confirmed_execution: true,
            confirmed_sql_query: query,
            confirmed_query_type: query_type,
        }
    }

    pub fn add_employee(data: EmployeeFormData) -> Self {
        ChatRequest::AddEmployee {
            add_employee_form_data: data,
        }
    }
}

/// Flat Add-Employee submission. Optional fields serialize as `null` when
/// unset so the server can tell "unset" from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFormData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub hire_date: String,
    pub job_id: Option<String>,
    pub salary: String,
    pub commission_pct: Option<String>,
    pub manager_id: Option<String>,
    pub department_id: Option<String>,
}

/// The `type` tag of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    LoadComponent,
    ConfirmationRequired,
    DataResult,
    ActionSuccess,
    FormError,
    ExecutionError,
    Error,
    Clarification,
    Chat,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::LoadComponent => "LOAD_COMPONENT",
            ResponseKind::ConfirmationRequired => "CONFIRMATION_REQUIRED",
            ResponseKind::DataResult => "DATA_RESULT",
            ResponseKind::ActionSuccess => "ACTION_SUCCESS",
            ResponseKind::FormError => "FORM_ERROR",
            ResponseKind::ExecutionError => "EXECUTION_ERROR",
            ResponseKind::Error => "ERROR",
            ResponseKind::Clarification => "CLARIFICATION",
            ResponseKind::Chat => "CHAT",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().into_iter().find(|kind| kind.as_str() == tag)
    }

    pub fn all() -> Vec<ResponseKind> {
        vec![
            ResponseKind::LoadComponent,
            ResponseKind::ConfirmationRequired,
            ResponseKind::DataResult,
            ResponseKind::ActionSuccess,
            ResponseKind::FormError,
            ResponseKind::ExecutionError,
            ResponseKind::Error,
            ResponseKind::Clarification,
            ResponseKind::Chat,
        ]
    }

    /// Whether a response of this kind wipes the data display before it is
    /// handled. ERROR is deliberately absent: it replaces the display with
    /// its own panel instead.
    pub fn clears_display(&self) -> bool {
        matches!(
            self,
            ResponseKind::DataResult
                | ResponseKind::LoadComponent
                | ResponseKind::FormError
                | ResponseKind::ExecutionError
                | ResponseKind::ActionSuccess
        )
    }
}

pub type Row = Map<String, Value>;

/// A response from `/chat`, discriminated on its `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatResponse {
    LoadComponent {
        response_text: Option<String>,
        component_name: Option<String>,
        pre_fill_data: Option<Map<String, Value>>,
    },
    ConfirmationRequired {
        response_text: Option<String>,
        query_to_confirm: Option<String>,
        query_type_to_confirm: Option<String>,
    },
    DataResult {
        response_text: Option<String>,
        data: Option<Vec<Row>>,
        query_executed: Option<String>,
    },
    ActionSuccess {
        response_text: Option<String>,
        query_executed: Option<String>,
    },
    FormError {
        response_text: Option<String>,
        query_attempted: Option<String>,
    },
    ExecutionError {
        response_text: Option<String>,
        query_attempted: Option<String>,
    },
    Error {
        response_text: Option<String>,
        query_attempted: Option<String>,
    },
    Clarification {
        response_text: Option<String>,
    },
    Chat {
        response_text: Option<String>,
    },
}

impl ChatResponse {
    /// Decode a raw JSON response, separating "no type" from "unknown type"
    /// from "known type with a bad shape".
    pub fn from_value(value: &Value) -> Result<Self, ResponseError> {
        let object = value.as_object().ok_or(ResponseError::Missing)?;

        let kind = match object.get("type") {
            None | Some(Value::Null) => return Err(ResponseError::MissingType),
            Some(Value::String(tag)) if tag.is_empty() => {
                return Err(ResponseError::MissingType)
            }
            Some(Value::String(tag)) => ResponseKind::from_tag(tag)
                .ok_or_else(|| ResponseError::UnknownType(tag.clone()))?,
            Some(other) => return Err(ResponseError::UnknownType(other.to_string())),
        };

        serde_json::from_value(value.clone()).map_err(|source| ResponseError::Malformed {
            kind: kind.as_str(),
            source,
        })
    }

    pub fn kind(&self) -> ResponseKind {
        match self {
            ChatResponse::LoadComponent { .. } => ResponseKind::LoadComponent,
            ChatResponse::ConfirmationRequired { .. } => ResponseKind::ConfirmationRequired,
            ChatResponse::DataResult { .. } => ResponseKind::DataResult,
            ChatResponse::ActionSuccess { .. } => ResponseKind::ActionSuccess,
            ChatResponse::FormError { .. } => ResponseKind::FormError,
            ChatResponse::ExecutionError { .. } => ResponseKind::ExecutionError,
            ChatResponse::Error { .. } => ResponseKind::Error,
            ChatResponse::Clarification { .. } => ResponseKind::Clarification,
            ChatResponse::Chat { .. } => ResponseKind::Chat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_message_request_body() {
        let body = serde_json::to_value(ChatRequest::message("list employees")).unwrap();
        assert_eq!(body, json!({ "message": "list employees" }));
    }

    #[test]
    fn test_confirmed_request_body() {
        let request = ChatRequest::confirmed(
            "give everyone a raise",
            Some("UPDATE employees SET salary = salary * 1.1".to_string()),
            Some("UPDATE".to_string()),
        );
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(
            body,
            json!({
                "message": "give everyone a raise",
                "confirmed_execution": true,
                "confirmed_sql_query": "UPDATE employees SET salary = salary * 1.1",
                "confirmed_query_type": "UPDATE",
            })
        );
    }

    #[test]
    fn test_parse_data_result_keeps_column_order() {
        let value = json!({
            "type": "DATA_RESULT",
            "response_text": "Here you go",
            "data": [{ "name": "Alice", "age": 30 }],
            "query_executed": "SELECT name, age FROM employees",
        });
        let response = ChatResponse::from_value(&value).unwrap();
        assert_eq!(response.kind(), ResponseKind::DataResult);
        match response {
            ChatResponse::DataResult { data: Some(rows), .. } => {
                let keys: Vec<&String> = rows[0].keys().collect();
                assert_eq!(keys, vec!["name", "age"]);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_and_unknown_type() {
        assert!(matches!(
            ChatResponse::from_value(&Value::Null),
            Err(ResponseError::Missing)
        ));
        assert!(matches!(
            ChatResponse::from_value(&json!({ "response_text": "hi" })),
            Err(ResponseError::MissingType)
        ));
        assert!(matches!(
            ChatResponse::from_value(&json!({ "type": "" })),
            Err(ResponseError::MissingType)
        ));
        match ChatResponse::from_value(&json!({ "type": "DANCE" })) {
            Err(ResponseError::UnknownType(tag)) => assert_eq!(tag, "DANCE"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_bad_shape_is_malformed() {
        let value = json!({ "type": "DATA_RESULT", "data": "not a list" });
        assert!(matches!(
            ChatResponse::from_value(&value),
            Err(ResponseError::Malformed { kind: "DATA_RESULT", .. })
        ));
    }

    #[test]
    fn test_clearing_kinds() {
        let clearing: Vec<&str> = ResponseKind::all()
            .into_iter()
            .filter(|kind| kind.clears_display())
            .map(|kind| kind.as_str())
            .collect();
        assert_eq!(
            clearing,
            vec![
                "LOAD_COMPONENT",
                "DATA_RESULT",
                "ACTION_SUCCESS",
                "FORM_ERROR",
                "EXECUTION_ERROR"
            ]
        );
    }
}
