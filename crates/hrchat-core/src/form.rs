//! Add-Employee form state, editing, and client-side validation

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::protocol::EmployeeFormData;

/// Origin label used when routing the response to a form submission.
pub const FORM_SUBMISSION_ORIGIN: &str = "Add New Employee (Form Submission)";

/// Echoed into the chat as a user message on submit.
pub const SUBMITTING_MESSAGE: &str = "Submitting new employee data via form...";

/// What a field accepts, mirroring the input types of the web form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Date,
    Decimal,
    Integer,
}

impl InputKind {
    /// Whether `c` may be typed into a field of this kind holding `current`.
    pub fn accepts(&self, c: char, current: &str) -> bool {
        match self {
            InputKind::Text | InputKind::Email => !c.is_control(),
            InputKind::Date => c.is_ascii_digit() || c == '-',
            InputKind::Decimal => {
                c.is_ascii_digit()
                    || (c == '.' && !current.contains('.'))
                    || (c == '-' && current.is_empty())
            }
            InputKind::Integer => c.is_ascii_digit() || (c == '-' && current.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub hint: Option<&'static str>,
    pub required: bool,
    pub kind: InputKind,
    pub value: String,
}

/// (name, label, hint, required, kind), in display order.
const EMPLOYEE_FIELDS: &[(&str, &str, Option<&str>, bool, InputKind)] = &[
    ("first_name", "First Name", None, true, InputKind::Text),
    ("last_name", "Last Name", None, true, InputKind::Text),
    ("email", "Email", None, true, InputKind::Email),
    ("phone_number", "Phone Number", None, false, InputKind::Text),
    ("hire_date", "Hire Date", Some("YYYY-MM-DD"), true, InputKind::Date),
    ("job_id", "Job ID", None, false, InputKind::Text),
    ("salary", "Salary", None, true, InputKind::Decimal),
    ("commission_pct", "Commission Pct", Some("e.g., 0.1 for 10%"), false, InputKind::Decimal),
    ("manager_id", "Manager ID", None, false, InputKind::Integer),
    ("department_id", "Department ID", None, false, InputKind::Integer),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(usize),
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddEmployeeForm {
    pub fields: Vec<FormField>,
    pub focus: FormFocus,
}

impl AddEmployeeForm {
    pub const TITLE: &'static str = "Add New Employee Record";
    pub const SUBMIT_LABEL: &'static str = "Add Employee Record";

    /// Build the form from server-supplied pre-fill data. An unset hire date
    /// defaults to `today`.
    pub fn new(pre_fill: &Map<String, Value>, today: NaiveDate) -> Self {
        let fields = EMPLOYEE_FIELDS
            .iter()
            .map(|&(name, label, hint, required, kind)| {
                let mut value = pre_fill.get(name).map(prefill_text).unwrap_or_default();
                if name == "hire_date" && value.is_empty() {
                    value = today.format("%Y-%m-%d").to_string();
                }
                FormField {
                    name,
                    label,
                    hint,
                    required,
                    kind,
                    value,
                }
            })
            .collect();

        Self {
            fields,
            focus: FormFocus::Field(0),
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).map(|f| f.value.as_str())
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.value = value.into();
        }
    }

    fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn focused_field(&self) -> Option<&FormField> {
        match self.focus {
            FormFocus::Field(idx) => self.fields.get(idx),
            FormFocus::Submit => None,
        }
    }

    /// Move focus down; the submit button follows the last field.
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormFocus::Field(idx) if idx + 1 < self.fields.len() => FormFocus::Field(idx + 1),
            FormFocus::Field(_) => FormFocus::Submit,
            FormFocus::Submit => FormFocus::Field(0),
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FormFocus::Field(0) => FormFocus::Submit,
            FormFocus::Field(idx) => FormFocus::Field(idx - 1),
            FormFocus::Submit => FormFocus::Field(self.fields.len().saturating_sub(1)),
        };
    }

    /// Type a character into the focused field. Returns false if the field's
    /// kind rejects it (or the submit button is focused).
    pub fn insert_char(&mut self, c: char) -> bool {
        let FormFocus::Field(idx) = self.focus else {
            return false;
        };
        match self.fields.get_mut(idx) {
            Some(field) if field.kind.accepts(c, &field.value) => {
                field.value.push(c);
                true
            }
            _ => false,
        }
    }

    pub fn backspace(&mut self) {
        if let FormFocus::Field(idx) = self.focus {
            if let Some(field) = self.fields.get_mut(idx) {
                field.value.pop();
            }
        }
    }

    /// Check required fields and formats, then collect the submission.
    pub fn validate(&self) -> Result<EmployeeFormData, ValidationError> {
        let missing: Vec<&'static str> = self
            .fields
            .iter()
            .filter(|f| f.required && f.value.trim().is_empty())
            .map(|f| f.name)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingRequired { fields: missing });
        }

        for field in &self.fields {
            let value = field.value.trim();
            if value.is_empty() {
                continue;
            }
            check_format(field, value)?;
        }

        Ok(EmployeeFormData {
            first_name: self.required_text("first_name"),
            last_name: self.required_text("last_name"),
            email: self.required_text("email"),
            phone_number: self.optional_text("phone_number"),
            hire_date: self.required_text("hire_date"),
            job_id: self.optional_text("job_id"),
            salary: self.required_text("salary"),
            commission_pct: self.optional_text("commission_pct"),
            manager_id: self.optional_text("manager_id"),
            department_id: self.optional_text("department_id"),
        })
    }

    fn required_text(&self, name: &str) -> String {
        self.value(name).unwrap_or_default().trim().to_string()
    }

    fn optional_text(&self, name: &str) -> Option<String> {
        let value = self.required_text(name);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

fn check_format(field: &FormField, value: &str) -> Result<(), ValidationError> {
    let invalid = |reason| ValidationError::InvalidField {
        field: field.name,
        label: field.label,
        reason,
    };

    match field.kind {
        InputKind::Text => {}
        InputKind::Email => {
            if !value.contains('@') {
                return Err(invalid("must be a valid email address."));
            }
        }
        InputKind::Date => {
            if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
                return Err(invalid("must be a date in YYYY-MM-DD format."));
            }
        }
        InputKind::Decimal => {
            let number = value
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| invalid("must be a number."))?;
            if field.name == "commission_pct" && !(0.0..=1.0).contains(&number) {
                return Err(invalid("must be between 0 and 1."));
            }
        }
        InputKind::Integer => {
            if value.parse::<i64>().is_err() {
                return Err(invalid("must be a whole number."));
            }
        }
    }
    Ok(())
}

/// Pre-fill values may arrive as strings or numbers.
fn prefill_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn filled() -> AddEmployeeForm {
        let mut form = AddEmployeeForm::new(&Map::new(), today());
        form.set_value("first_name", "Alice");
        form.set_value("last_name", "Wonderland");
        form.set_value("email", "alice@example.com");
        form.set_value("salary", "80000");
        form
    }

    #[test]
    fn test_prefill_and_default_hire_date() {
        let pre_fill = json!({
            "first_name": "Alice",
            "salary": 80000,
            "department_id": 80,
            "job_id": null,
        });
        let form = AddEmployeeForm::new(pre_fill.as_object().unwrap(), today());
        assert_eq!(form.value("first_name"), Some("Alice"));
        assert_eq!(form.value("salary"), Some("80000"));
        assert_eq!(form.value("department_id"), Some("80"));
        assert_eq!(form.value("job_id"), Some(""));
        assert_eq!(form.value("hire_date"), Some("2024-03-15"));
    }

    #[test]
    fn test_prefilled_hire_date_is_kept() {
        let pre_fill = json!({ "hire_date": "2020-01-02" });
        let form = AddEmployeeForm::new(pre_fill.as_object().unwrap(), today());
        assert_eq!(form.value("hire_date"), Some("2020-01-02"));
    }

    #[test]
    fn test_missing_required_fields() {
        for name in ["first_name", "last_name", "email", "hire_date", "salary"] {
            let mut form = filled();
            form.set_value(name, "  ");
            assert_eq!(
                form.validate(),
                Err(ValidationError::MissingRequired { fields: vec![name] }),
                "field {}",
                name
            );
        }
    }

    #[test]
    fn test_empty_optionals_become_none() {
        let data = filled().validate().unwrap();
        assert_eq!(
            data,
            EmployeeFormData {
                first_name: "Alice".to_string(),
                last_name: "Wonderland".to_string(),
                email: "alice@example.com".to_string(),
                phone_number: None,
                hire_date: "2024-03-15".to_string(),
                job_id: None,
                salary: "80000".to_string(),
                commission_pct: None,
                manager_id: None,
                department_id: None,
            }
        );
    }

    #[test]
    fn test_format_checks() {
        let mut form = filled();
        form.set_value("commission_pct", "1.5");
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidField { field: "commission_pct", .. })
        ));

        let mut form = filled();
        form.set_value("email", "alice");
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidField { field: "email", .. })
        ));

        let mut form = filled();
        form.set_value("hire_date", "2024-13-40");
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidField { field: "hire_date", .. })
        ));

        let mut form = filled();
        form.set_value("manager_id", "1.5");
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidField { field: "manager_id", .. })
        ));
    }

    #[test]
    fn test_typing_respects_input_kind() {
        let mut form = AddEmployeeForm::new(&Map::new(), today());
        form.focus = FormFocus::Field(6); // salary
        assert!(form.insert_char('1'));
        assert!(form.insert_char('.'));
        assert!(!form.insert_char('.'));
        assert!(!form.insert_char('x'));
        assert!(form.insert_char('5'));
        assert_eq!(form.value("salary"), Some("1.5"));

        form.backspace();
        assert_eq!(form.value("salary"), Some("1."));
    }

    #[test]
    fn test_focus_wraps_through_submit() {
        let mut form = AddEmployeeForm::new(&Map::new(), today());
        form.focus_prev();
        assert_eq!(form.focus, FormFocus::Submit);
        form.focus_prev();
        assert_eq!(form.focus, FormFocus::Field(9));
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus, FormFocus::Field(0));
        assert!(form.focused_field().is_some());
    }
}
