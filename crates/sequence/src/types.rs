use std::collections::BTreeSet;
use std::fmt;

use campaign_core::types::CampaignStatus;
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::trigger::TriggerKind;

/// Default name for steps appended by the builder.
pub const DEFAULT_STEP_NAME: &str = "New Email";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// Syntactic address check (local part, `@`, dotted domain with a TLD).
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_RE.is_match(address)
}

// ─── Delay ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayUnit {
    Minutes,
    Hours,
    #[default]
    Days,
    Weeks,
}

impl DelayUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DelayUnit::Minutes => "minutes",
            DelayUnit::Hours => "hours",
            DelayUnit::Days => "days",
            DelayUnit::Weeks => "weeks",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "minutes" => Some(DelayUnit::Minutes),
            "hours" => Some(DelayUnit::Hours),
            "days" => Some(DelayUnit::Days),
            "weeks" => Some(DelayUnit::Weeks),
            _ => None,
        }
    }
}

/// Wait period measured from the moment a step's trigger fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelaySpec {
    pub amount: u32,
    #[serde(default)]
    pub unit: DelayUnit,
}

impl DelaySpec {
    pub fn new(amount: u32, unit: DelayUnit) -> Self {
        Self { amount, unit }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn to_duration(&self) -> Duration {
        let amount = i64::from(self.amount);
        match self.unit {
            DelayUnit::Minutes => Duration::minutes(amount),
            DelayUnit::Hours => Duration::hours(amount),
            DelayUnit::Days => Duration::days(amount),
            DelayUnit::Weeks => Duration::weeks(amount),
        }
    }
}

impl fmt::Display for DelaySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit.as_str())
    }
}

// ─── Sequence Step ─────────────────────────────────────────────────────────

/// One email in a campaign's ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceStep {
    pub id: Uuid,
    /// Position in the owning sequence. Maintained by the workflow.
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subject_line: String,
    #[serde(default)]
    pub delay: DelaySpec,
    #[serde(default)]
    pub triggers: BTreeSet<TriggerKind>,
}

impl SequenceStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            order: 0,
            name: name.into(),
            subject_line: String::new(),
            delay: DelaySpec::default(),
            triggers: BTreeSet::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject_line = subject.into();
        self
    }

    pub fn with_delay(mut self, amount: u32, unit: DelayUnit) -> Self {
        self.delay = DelaySpec::new(amount, unit);
        self
    }

    pub fn with_triggers(mut self, triggers: impl IntoIterator<Item = TriggerKind>) -> Self {
        self.triggers = triggers.into_iter().collect();
        self
    }

    /// Only the pure time trigger is selected.
    pub fn is_time_only(&self) -> bool {
        !self.triggers.is_empty() && self.triggers.iter().all(|t| !t.is_event())
    }
}

/// Caller-supplied fields for `CampaignWorkflow::add_step`. Missing fields
/// take the builder defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStep {
    pub name: Option<String>,
    pub subject_line: Option<String>,
    pub delay: Option<DelaySpec>,
    #[serde(default)]
    pub triggers: BTreeSet<TriggerKind>,
}

/// A field-level edit to one step. There is no `order` variant: position
/// changes go through `reorder_step`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPatch {
    Name(String),
    SubjectLine(String),
    DelayAmount(i64),
    DelayUnit(DelayUnit),
    Triggers(BTreeSet<TriggerKind>),
}

// ─── Campaign Settings ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSettings {
    #[serde(default)]
    pub name: String,
    /// Free-form note shown on the dashboard card.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub from_name: String,
    #[serde(default)]
    pub from_email: String,
    #[serde(default)]
    pub reply_to_email: String,
    #[serde(default = "default_true")]
    pub tracking_enabled: bool,
    #[serde(default = "default_true")]
    pub send_test_before_activate: bool,
}

fn default_true() -> bool {
    true
}

impl CampaignSettings {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_sender(mut self, from_name: impl Into<String>, from_email: impl Into<String>) -> Self {
        self.from_name = from_name.into();
        self.from_email = from_email.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to_email = reply_to.into();
        self
    }
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            from_name: String::new(),
            from_email: String::new(),
            reply_to_email: String::new(),
            tracking_enabled: true,
            send_test_before_activate: true,
        }
    }
}

// ─── Campaign Workflow ─────────────────────────────────────────────────────

/// A campaign: settings plus the ordered email sequence and its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignWorkflow {
    pub id: Uuid,
    pub owner_id: String,
    #[serde(default)]
    pub settings: CampaignSettings,
    #[serde(default)]
    pub(crate) steps: Vec<SequenceStep>,
    #[serde(default)]
    pub(crate) status: CampaignStatus,
    pub created_at: DateTime<Utc>,
}

/// Dashboard counters for one owner's campaigns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStats {
    pub total: usize,
    pub draft: usize,
    pub active: usize,
    pub paused: usize,
    pub total_steps: usize,
}
