use thiserror::Error;

use crate::types::{CampaignStatus, ValidationIssue};

pub type CampaignResult<T> = Result<T, CampaignError>;

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Invalid delay: {0}")]
    InvalidDelay(String),

    #[error("Invalid trigger kind: {0}")]
    InvalidTriggerKind(String),

    #[error("Invalid campaign settings: {0}")]
    InvalidSettings(String),

    #[error("Activation rejected: {} blocking issue(s)", blocking_count(.0))]
    ActivationRejected(Vec<ValidationIssue>),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: CampaignStatus,
        to: CampaignStatus,
    },

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Step not found: {0}")]
    StepNotFound(uuid::Uuid),

    #[error("Campaign not found: {0}")]
    CampaignNotFound(uuid::Uuid),
}

fn blocking_count(issues: &[ValidationIssue]) -> usize {
    issues.iter().filter(|i| i.is_blocking()).count()
}

impl CampaignError {
    /// Issues attached to a rejected activation, empty for other kinds.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            CampaignError::ActivationRejected(issues) => issues,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IssueCode;

    #[test]
    fn test_activation_rejected_message_counts_blocking_only() {
        let err = CampaignError::ActivationRejected(vec![
            ValidationIssue::error(IssueCode::NoTriggers, None, "no triggers"),
            ValidationIssue::warning(IssueCode::EmptySequence, None, "empty"),
        ]);
        assert_eq!(err.to_string(), "Activation rejected: 1 blocking issue(s)");
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn test_transition_message() {
        let err = CampaignError::InvalidTransition {
            from: CampaignStatus::Draft,
            to: CampaignStatus::Paused,
        };
        assert_eq!(err.to_string(), "Invalid transition from draft to paused");
        assert!(err.issues().is_empty());
    }
}
