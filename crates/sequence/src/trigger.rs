//! Trigger catalog: the fixed set of events that can start a step's delay
//! clock, with display metadata for the builder.

use std::fmt;
use std::str::FromStr;

use campaign_core::error::{CampaignError, CampaignResult};
use serde::{Deserialize, Serialize};

/// An event or time condition that starts a sequence step's delay countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Signup,
    EmailOpen,
    LinkClick,
    Purchase,
    CartAbandon,
    TimeDelay,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 6] = [
        TriggerKind::Signup,
        TriggerKind::EmailOpen,
        TriggerKind::LinkClick,
        TriggerKind::Purchase,
        TriggerKind::CartAbandon,
        TriggerKind::TimeDelay,
    ];

    /// Wire name, as stored and as accepted by `from_str`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Signup => "signup",
            TriggerKind::EmailOpen => "email_open",
            TriggerKind::LinkClick => "link_click",
            TriggerKind::Purchase => "purchase",
            TriggerKind::CartAbandon => "cart_abandon",
            TriggerKind::TimeDelay => "time_delay",
        }
    }

    /// `true` for subscriber-driven events, `false` for the pure time trigger.
    pub fn is_event(&self) -> bool {
        !matches!(self, TriggerKind::TimeDelay)
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerKind {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TriggerKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CampaignError::InvalidTriggerKind(s.to_string()))
    }
}

/// Grouping used by the builder when listing triggers. Carries no behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCategory {
    Account,
    Engagement,
    Commerce,
    Time,
}

/// Display metadata for one trigger kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerInfo {
    pub kind: TriggerKind,
    pub label: &'static str,
    pub category: TriggerCategory,
    pub help_text: &'static str,
}

/// Static, process-wide registry of trigger kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerCatalog;

impl TriggerCatalog {
    pub fn describe(kind: TriggerKind) -> TriggerInfo {
        let (label, category, help_text) = match kind {
            TriggerKind::Signup => (
                "User Signup",
                TriggerCategory::Account,
                "When user creates account",
            ),
            TriggerKind::EmailOpen => (
                "Email Open",
                TriggerCategory::Engagement,
                "When user opens an email",
            ),
            TriggerKind::LinkClick => (
                "Link Click",
                TriggerCategory::Engagement,
                "When user clicks a link",
            ),
            TriggerKind::Purchase => (
                "Purchase Made",
                TriggerCategory::Commerce,
                "When user makes a purchase",
            ),
            TriggerKind::CartAbandon => (
                "Cart Abandoned",
                TriggerCategory::Commerce,
                "When user abandons cart",
            ),
            TriggerKind::TimeDelay => (
                "Time Delay",
                TriggerCategory::Time,
                "After specified time period",
            ),
        };
        TriggerInfo {
            kind,
            label,
            category,
            help_text,
        }
    }

    /// Looks up a trigger by wire name. Fails with `InvalidTriggerKind` for
    /// names outside the catalog.
    pub fn describe_str(name: &str) -> CampaignResult<TriggerInfo> {
        name.parse().map(Self::describe)
    }

    /// Every trigger in catalog order.
    pub fn all() -> Vec<TriggerInfo> {
        TriggerKind::ALL.into_iter().map(Self::describe).collect()
    }
}
