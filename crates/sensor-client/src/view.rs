//! Pieces shared by the list and detail views

/// What happened to a user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the change and the view refreshed
    Applied,
    /// The user declined the confirmation prompt; nothing was sent
    Cancelled,
    /// Local validation failed; nothing was sent
    Rejected(Vec<String>),
    /// The server or network failed; the view's error message is set
    Failed,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Asks the user to confirm a destructive action
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}
