pub mod config;
pub mod confirmation;
pub mod display;
pub mod error;
pub mod form;
pub mod protocol;
pub mod state;
pub mod table;
pub mod transport;
pub mod widget;

// Re-export main types for convenience
pub use config::Config;
pub use confirmation::{ConfirmationFlow, ConfirmationState, PendingConfirmation};
pub use display::{DataDisplay, FormComponent};
pub use error::{ResponseError, TransportError, ValidationError};
pub use form::{AddEmployeeForm, FormField, FormFocus, InputKind};
pub use protocol::{ChatRequest, ChatResponse, EmployeeFormData, ResponseKind};
pub use state::{Message, MessageId, MessageKind, MessageLog, Sender};
pub use table::{DataTable, ResultView};
pub use transport::{ChatClient, ChatTransport};
pub use widget::{CallKind, ChatWidget, OutboundCall};
