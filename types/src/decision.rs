/// Outcome of evaluating one action. The caller owns the actual
/// cancellation: a `Deny` here never cancels anything by itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Let the action proceed untouched.
    Allow,
    /// Suppress the action silently.
    Deny,
    /// Suppress the action and deliver `text` to the actor verbatim.
    DenyWithMessage(String),
}

impl Decision {
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub const fn is_denied(&self) -> bool {
        !self.is_allowed()
    }

    /// Message to deliver, if this decision carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Decision::DenyWithMessage(text) => Some(text),
            _ => None,
        }
    }
}
