use crate::form::AddEmployeeForm;
use crate::table::ResultView;

/// Tag for a dynamically rendered form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormComponent {
    AddEmployee,
}

impl FormComponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormComponent::AddEmployee => crate::protocol::ADD_EMPLOYEE_FORM,
        }
    }
}

/// Contents of the data display area. Only one thing is shown at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DataDisplay {
    #[default]
    Empty,
    AddEmployeeForm(AddEmployeeForm),
    Results(ResultView),
    Success(String),
    Error(String),
}

impl DataDisplay {
    pub fn current_form(&self) -> Option<FormComponent> {
        match self {
            DataDisplay::AddEmployeeForm(_) => Some(FormComponent::AddEmployee),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&AddEmployeeForm> {
        match self {
            DataDisplay::AddEmployeeForm(form) => Some(form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut AddEmployeeForm> {
        match self {
            DataDisplay::AddEmployeeForm(form) => Some(form),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DataDisplay::Empty)
    }

    pub fn clear(&mut self) {
        *self = DataDisplay::Empty;
    }
}
