use crate::state::MessageId;

/// A server operation waiting for the user's yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub query_to_confirm: Option<String>,
    pub query_type_to_confirm: Option<String>,
    pub original_user_message: String,
    /// The confirmation message the Yes/No controls hang off.
    pub message_id: MessageId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfirmationState {
    #[default]
    Idle,
    AwaitingDecision(PendingConfirmation),
    /// The user proceeded and the confirmed call has not settled yet.
    Executing(PendingConfirmation),
}

/// Holds at most one pending confirmation. Newer requests overwrite older
/// ones; decisions are accepted only once.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationFlow {
    state: ConfirmationState,
}

impl ConfirmationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ConfirmationState {
        &self.state
    }

    /// Start awaiting a decision. Returns whatever was awaiting before.
    pub fn request(&mut self, pending: PendingConfirmation) -> Option<PendingConfirmation> {
        let previous = match std::mem::take(&mut self.state) {
            ConfirmationState::AwaitingDecision(previous) => Some(previous),
            other => {
                self.state = other;
                None
            }
        };
        self.state = ConfirmationState::AwaitingDecision(pending);
        previous
    }

    pub fn awaiting(&self) -> Option<&PendingConfirmation> {
        match &self.state {
            ConfirmationState::AwaitingDecision(pending) => Some(pending),
            _ => None,
        }
    }

    /// Whether the controls for `message_id` are live.
    pub fn has_controls(&self, message_id: MessageId) -> bool {
        self.awaiting().is_some_and(|p| p.message_id == message_id)
    }

    /// AwaitingDecision -> Executing. Returns the confirmation to execute.
    pub fn proceed(&mut self) -> Option<PendingConfirmation> {
        match std::mem::take(&mut self.state) {
            ConfirmationState::AwaitingDecision(pending) => {
                self.state = ConfirmationState::Executing(pending.clone());
                Some(pending)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// AwaitingDecision -> Idle. Returns the discarded confirmation.
    pub fn cancel(&mut self) -> Option<PendingConfirmation> {
        match std::mem::take(&mut self.state) {
            ConfirmationState::AwaitingDecision(pending) => Some(pending),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Executing -> Idle, once the confirmed call has settled either way.
    pub fn settle(&mut self) {
        if matches!(self.state, ConfirmationState::Executing(_)) {
            self.state = ConfirmationState::Idle;
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == ConfirmationState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(query: &str, message_id: MessageId) -> PendingConfirmation {
        PendingConfirmation {
            query_to_confirm: Some(query.to_string()),
            query_type_to_confirm: Some("UPDATE".to_string()),
            original_user_message: "raise salaries".to_string(),
            message_id,
        }
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut flow = ConfirmationFlow::new();
        flow.request(pending("UPDATE a", 1));
        assert!(flow.has_controls(1));

        let cancelled = flow.cancel().unwrap();
        assert_eq!(cancelled.message_id, 1);
        assert!(flow.is_idle());
        assert!(!flow.has_controls(1));
    }

    #[test]
    fn test_proceed_then_settle() {
        let mut flow = ConfirmationFlow::new();
        flow.request(pending("UPDATE a", 1));

        let executing = flow.proceed().unwrap();
        assert_eq!(executing.query_to_confirm.as_deref(), Some("UPDATE a"));
        assert!(matches!(flow.state(), ConfirmationState::Executing(_)));
        assert!(!flow.has_controls(1));

        flow.settle();
        assert!(flow.is_idle());
    }

    #[test]
    fn test_decision_only_once() {
        let mut flow = ConfirmationFlow::new();
        flow.request(pending("UPDATE a", 1));
        assert!(flow.proceed().is_some());
        assert!(flow.proceed().is_none());
        assert!(flow.cancel().is_none());
        assert!(matches!(flow.state(), ConfirmationState::Executing(_)));
    }

    #[test]
    fn test_second_request_overwrites() {
        let mut flow = ConfirmationFlow::new();
        flow.request(pending("UPDATE a", 1));
        let superseded = flow.request(pending("UPDATE b", 2)).unwrap();
        assert_eq!(superseded.message_id, 1);
        assert!(!flow.has_controls(1));
        assert!(flow.has_controls(2));
        assert_eq!(
            flow.awaiting().unwrap().query_to_confirm.as_deref(),
            Some("UPDATE b")
        );
    }

    #[test]
    fn test_settle_does_not_drop_new_request() {
        let mut flow = ConfirmationFlow::new();
        flow.request(pending("UPDATE a", 1));
        flow.settle();
        assert!(flow.has_controls(1));
    }
}
