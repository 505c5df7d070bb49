use crate::core::{DataApiError, Result};
use std::fmt;

/// Unit-of-work lifecycle state
///
/// State transitions:
/// ```text
/// Open ──build──> Built ──commit──> Committed
///                   │
///                   └──rejected──> Failed
/// ```
/// Nothing ever goes back to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitOfWorkState {
    /// Registrations are allowed
    Open,

    /// Frozen and ready to be handed to a commit executor
    Built,

    /// The store applied every operation
    Committed,

    /// The store rejected the batch; nothing was applied
    Failed,
}

impl UnitOfWorkState {
    pub fn is_open(&self) -> bool {
        matches!(self, UnitOfWorkState::Open)
    }

    pub fn can_transition_to(&self, next: UnitOfWorkState) -> bool {
        matches!(
            (self, next),
            (UnitOfWorkState::Open, UnitOfWorkState::Built)
                | (UnitOfWorkState::Built, UnitOfWorkState::Committed)
                | (UnitOfWorkState::Built, UnitOfWorkState::Failed)
        )
    }

    /// Move to `next`, or fail with `IllegalState` naming `operation`
    pub fn transition_to(self, next: UnitOfWorkState, operation: &str) -> Result<UnitOfWorkState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DataApiError::IllegalState {
                operation: operation.to_string(),
                state: self.to_string(),
            })
        }
    }
}

impl fmt::Display for UnitOfWorkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitOfWorkState::Open => write!(f, "OPEN"),
            UnitOfWorkState::Built => write!(f, "BUILT"),
            UnitOfWorkState::Committed => write!(f, "COMMITTED"),
            UnitOfWorkState::Failed => write!(f, "FAILED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(UnitOfWorkState::Open.can_transition_to(UnitOfWorkState::Built));
        assert!(UnitOfWorkState::Built.can_transition_to(UnitOfWorkState::Committed));
        assert!(UnitOfWorkState::Built.can_transition_to(UnitOfWorkState::Failed));
    }

    #[test]
    fn test_no_way_back_to_open() {
        for state in [
            UnitOfWorkState::Open,
            UnitOfWorkState::Built,
            UnitOfWorkState::Committed,
            UnitOfWorkState::Failed,
        ] {
            assert!(!state.can_transition_to(UnitOfWorkState::Open));
        }
        assert!(!UnitOfWorkState::Open.can_transition_to(UnitOfWorkState::Committed));
        assert!(!UnitOfWorkState::Committed.can_transition_to(UnitOfWorkState::Failed));
    }

    #[test]
    fn test_transition_to() {
        assert_eq!(
            UnitOfWorkState::Built.transition_to(UnitOfWorkState::Failed, "commit"),
            Ok(UnitOfWorkState::Failed)
        );

        let err = UnitOfWorkState::Committed
            .transition_to(UnitOfWorkState::Failed, "commit")
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot commit: unit of work is COMMITTED");
    }
}
