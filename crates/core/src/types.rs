use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Campaign Status ───────────────────────────────────────────────────────

/// Lifecycle status of a campaign workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Never been live.
    #[default]
    Draft,
    Active,
    Paused,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ─── Validation Issues ─────────────────────────────────────────────────────

/// Errors block activation, warnings are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Machine-readable reason for a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    NoTriggers,
    ZeroDelayTimeTrigger,
    DuplicateStepId,
    EmptySequence,
    MissingCampaignName,
    InvalidFromEmail,
    InvalidReplyToEmail,
}

/// A structured problem report produced by workflow validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    /// Step the issue refers to; `None` for campaign-level settings.
    pub step_id: Option<Uuid>,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(code: IssueCode, step_id: Option<Uuid>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            step_id,
            message: message.into(),
        }
    }

    pub fn warning(code: IssueCode, step_id: Option<Uuid>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            step_id,
            message: message.into(),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match self.step_id {
            Some(step) => write!(f, "[{level}] step {step}: {}", self.message),
            None => write!(f, "[{level}] {}", self.message),
        }
    }
}

// ─── Identity ──────────────────────────────────────────────────────────────

/// The signed-in user as reported by the session layer. Only `id` is used as
/// an ownership key; name and email seed sender defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Session collaborator: who is the current user, if anyone.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserIdentity>;
}

/// Fixed identity, for tools and tests that act on behalf of one user.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<UserIdentity>);

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.0.clone()
    }
}

// ─── Campaign Events ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignEventType {
    CampaignCreated,
    CampaignDeleted,
    CampaignSaved,
    CampaignActivated,
    CampaignPaused,
    CampaignResumed,
}

/// Emitted by the registry once a change is durable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignEvent {
    pub event_id: Uuid,
    pub event_type: CampaignEventType,
    pub campaign_id: Uuid,
    pub owner_id: String,
    pub status: Option<CampaignStatus>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&CampaignStatus::Paused).unwrap(), "\"paused\"");
        let s: CampaignStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(s, CampaignStatus::Active);
        assert_eq!(CampaignStatus::default(), CampaignStatus::Draft);
    }

    #[test]
    fn test_issue_blocking() {
        let err = ValidationIssue::error(IssueCode::NoTriggers, None, "no triggers");
        let warn = ValidationIssue::warning(IssueCode::EmptySequence, None, "empty");
        assert!(err.is_blocking());
        assert!(!warn.is_blocking());
        assert_eq!(warn.to_string(), "[warning] empty");
    }

    #[test]
    fn test_static_identity() {
        let provider = StaticIdentity(Some(UserIdentity {
            id: "u-1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        }));
        assert_eq!(provider.current_user().unwrap().id, "u-1");
        assert!(StaticIdentity::default().current_user().is_none());
    }
}
