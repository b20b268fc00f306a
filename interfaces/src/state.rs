use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Active { position: usize },
    Complete,
}

impl SessionStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, SessionStatus::Complete)
    }

    pub fn position(&self) -> Option<usize> {
        match self {
            SessionStatus::Active { position } => Some(*position),
            SessionStatus::Complete => None,
        }
    }
}

/// Everything an annotator can do at one position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Choose(String),
    Skip,
    Confirm,
    Prev,
    Undo,
}
