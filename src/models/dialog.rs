//! Confirmation dialog flow for mutating actions
//!
//! Each mutating action (accept, decline, cancel, confirm) runs behind an
//! "are you sure?" dialog. The flow is a small explicit state machine instead
//! of a pile of per-dialog booleans.

/// Lifecycle of one confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogFlow {
    /// Nothing shown.
    #[default]
    Idle,
    /// Dialog open, waiting for the user to confirm or back out.
    Confirming,
    /// Remote call dispatched, result pending.
    Submitting,
    /// Remote call succeeded.
    Done,
}

impl DialogFlow {
    /// User clicked the action button; only valid from `Idle`.
    pub fn open(self) -> Self {
        match self {
            DialogFlow::Idle => DialogFlow::Confirming,
            other => other,
        }
    }

    /// User confirmed in the dialog; only valid from `Confirming`.
    pub fn submit(self) -> Self {
        match self {
            DialogFlow::Confirming => DialogFlow::Submitting,
            other => other,
        }
    }

    /// Remote call finished.
    pub fn finish(self, success: bool) -> Self {
        match self {
            DialogFlow::Submitting if success => DialogFlow::Done,
            // Failure returns to the dialog so the user can retry or back out.
            DialogFlow::Submitting => DialogFlow::Confirming,
            other => other,
        }
    }

    /// User backed out or the flow completed and was acknowledged.
    pub fn dismiss(self) -> Self {
        match self {
            // An in-flight call cannot be abandoned from the dialog.
            DialogFlow::Submitting => DialogFlow::Submitting,
            _ => DialogFlow::Idle,
        }
    }

    pub fn is_busy(self) -> bool {
        matches!(self, DialogFlow::Submitting)
    }
}
