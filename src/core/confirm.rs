/// Asks the user to approve a destructive action.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves everything; used by scripted runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNo;

impl Confirmation for AssumeNo {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// Result of a guarded action. Declining is not an error and changes nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Applied(T),
    Declined,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Declined => None,
        }
    }
}
