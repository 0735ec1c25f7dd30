//! Tracked request status state machine.

use crate::domain::foundation::{DomainError, ErrorCode, StateMachine};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a tracked integration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Order created, waiting for a captured payment callback.
    /// Declined authorizations leave the request here so the checkout can be retried.
    Pending,

    /// Payment authorized and captured.
    Completed,

    /// Order could not be created at the gateway.
    Failed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Completed => "completed",
            RequestStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "completed" => Ok(RequestStatus::Completed),
            "failed" => Ok(RequestStatus::Failed),
            _ => Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid status value: {}", s),
            )),
        }
    }
}

impl StateMachine for RequestStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use RequestStatus::*;
        matches!((self, target), (Pending, Completed) | (Pending, Failed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RequestStatus::*;
        match self {
            Pending => vec![Completed, Failed],
            Completed => vec![],
            Failed => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_transition_to_completed() {
        let result = RequestStatus::Pending.transition_to(RequestStatus::Completed);
        assert_eq!(result, Ok(RequestStatus::Completed));
    }

    #[test]
    fn pending_can_transition_to_failed() {
        let result = RequestStatus::Pending.transition_to(RequestStatus::Failed);
        assert_eq!(result, Ok(RequestStatus::Failed));
    }

    #[test]
    fn completed_cannot_regress_to_pending() {
        assert!(RequestStatus::Completed
            .transition_to(RequestStatus::Pending)
            .is_err());
    }

    #[test]
    fn completed_cannot_be_completed_twice() {
        assert!(RequestStatus::Completed
            .transition_to(RequestStatus::Completed)
            .is_err());
    }

    #[test]
    fn failed_cannot_become_completed() {
        assert!(RequestStatus::Failed
            .transition_to(RequestStatus::Completed)
            .is_err());
    }

    #[test]
    fn completed_and_failed_are_terminal() {
        assert!(RequestStatus::Completed.is_terminal());
        assert!(RequestStatus::Failed.is_terminal());
        assert!(!RequestStatus::Pending.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Completed,
            RequestStatus::Failed,
        ] {
            for target in status.valid_transitions() {
                assert!(status.can_transition_to(&target));
            }
        }
    }

    #[test]
    fn parse_round_trips_as_str() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Completed,
            RequestStatus::Failed,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn parse_rejects_unknown_value() {
        let err = RequestStatus::parse("queued").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
