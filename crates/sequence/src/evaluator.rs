use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campaign_core::types::CampaignStatus;

use crate::trigger::TriggerKind;
use crate::types::{CampaignWorkflow, SequenceStep};

/// An account event observed for one subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberEvent {
    pub kind: TriggerKind,
    pub at: DateTime<Utc>,
}

/// What the dispatcher already knows about one subscriber in one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberHistory {
    /// When the subscriber entered the campaign; the first step's clock
    /// cannot start before this.
    pub enrolled_at: DateTime<Utc>,
    #[serde(default)]
    pub events: Vec<SubscriberEvent>,
    /// Send time per step already delivered.
    #[serde(default)]
    pub sent: HashMap<Uuid, DateTime<Utc>>,
}

impl SubscriberHistory {
    pub fn new(enrolled_at: DateTime<Utc>) -> Self {
        Self {
            enrolled_at,
            events: Vec::new(),
            sent: HashMap::new(),
        }
    }

    pub fn with_event(mut self, kind: TriggerKind, at: DateTime<Utc>) -> Self {
        self.events.push(SubscriberEvent { kind, at });
        self
    }

    pub fn with_sent(mut self, step_id: Uuid, at: DateTime<Utc>) -> Self {
        self.sent.insert(step_id, at);
        self
    }
}

/// The dispatcher's next move for a subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum NextSend {
    /// Campaign is not live; nothing fires.
    Inactive,
    /// Every step has been sent.
    Complete,
    /// None of the step's triggers has fired since the previous send.
    AwaitingTrigger {
        step_id: Uuid,
        triggers: Vec<TriggerKind>,
    },
    /// The step's delay is still running.
    Scheduled {
        step_id: Uuid,
        trigger: TriggerKind,
        fire_at: DateTime<Utc>,
    },
    /// The step should be sent now.
    Due {
        step_id: Uuid,
        trigger: TriggerKind,
        fire_at: DateTime<Utc>,
    },
}

/// Decides which sequence step fires next for a subscriber. Pure: the same
/// workflow, history and instant always yield the same answer.
#[derive(Debug, Clone, Default)]
pub struct SequenceEvaluator;

impl SequenceEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Walks the sequence in order. The first unsent step is the candidate;
    /// its delay clock starts at the earliest trigger at or after the
    /// previous step's send time (enrolment for the first step).
    pub fn next_send(
        &self,
        workflow: &CampaignWorkflow,
        history: &SubscriberHistory,
        now: DateTime<Utc>,
    ) -> NextSend {
        if workflow.status() != CampaignStatus::Active {
            return NextSend::Inactive;
        }

        let mut cursor = history.enrolled_at;
        for step in workflow.steps() {
            if let Some(sent_at) = history.sent.get(&step.id) {
                cursor = cursor.max(*sent_at);
                continue;
            }

            return match self.clock_start(step, history, cursor) {
                Some((trigger, started)) => {
                    // Delays past the end of the calendar saturate.
                    let fire_at = started
                        .checked_add_signed(step.delay.to_duration())
                        .unwrap_or(DateTime::<Utc>::MAX_UTC);
                    if fire_at <= now {
                        NextSend::Due {
                            step_id: step.id,
                            trigger,
                            fire_at,
                        }
                    } else {
                        NextSend::Scheduled {
                            step_id: step.id,
                            trigger,
                            fire_at,
                        }
                    }
                }
                None => NextSend::AwaitingTrigger {
                    step_id: step.id,
                    triggers: step.triggers.iter().copied().collect(),
                },
            };
        }

        NextSend::Complete
    }

    /// Earliest moment at or after `cursor` when one of the step's triggers
    /// fired. Ties go to the trigger listed first in catalog order.
    fn clock_start(
        &self,
        step: &SequenceStep,
        history: &SubscriberHistory,
        cursor: DateTime<Utc>,
    ) -> Option<(TriggerKind, DateTime<Utc>)> {
        step.triggers
            .iter()
            .filter_map(|&trigger| {
                if trigger == TriggerKind::TimeDelay {
                    return Some((trigger, cursor));
                }
                history
                    .events
                    .iter()
                    .filter(|e| e.kind == trigger && e.at >= cursor)
                    .map(|e| e.at)
                    .min()
                    .map(|at| (trigger, at))
            })
            .min_by_key(|(trigger, at)| (*at, *trigger))
    }
}
