use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::types::{CampaignStatus, ValidationIssue};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::CampaignWorkflow;

/// Describes a single valid status transition for a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTransition {
    pub from: CampaignStatus,
    pub to: CampaignStatus,
    pub trigger: String,
}

/// Result of a successful in-memory transition. Warnings from validation are
/// surfaced here even though they did not block activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub from: CampaignStatus,
    pub to: CampaignStatus,
    /// Name of the edge taken (`activate`, `pause`, `resume`).
    pub trigger: String,
    pub warnings: Vec<ValidationIssue>,
}

/// Guards campaign status by enforcing a closed set of transitions:
/// `draft → active`, `active → paused`, `paused → active`. Nothing returns
/// to `draft`, so `draft` always means "never yet live".
#[derive(Debug, Clone)]
pub struct CampaignLifecycle {
    pub transitions: Vec<StatusTransition>,
}

impl CampaignLifecycle {
    pub fn new() -> Self {
        let transitions = vec![
            StatusTransition {
                from: CampaignStatus::Draft,
                to: CampaignStatus::Active,
                trigger: "activate".to_string(),
            },
            StatusTransition {
                from: CampaignStatus::Active,
                to: CampaignStatus::Paused,
                trigger: "pause".to_string(),
            },
            StatusTransition {
                from: CampaignStatus::Paused,
                to: CampaignStatus::Active,
                trigger: "resume".to_string(),
            },
        ];

        Self { transitions }
    }

    /// Returns `true` if the edge exists in the graph.
    pub fn can_transition(&self, from: CampaignStatus, to: CampaignStatus) -> bool {
        self.transitions.iter().any(|t| t.from == from && t.to == to)
    }

    /// Moves `workflow` to `to`. Edges into `active` require a workflow with
    /// no blocking validation issues; on any failure the status is unchanged.
    pub fn transition(
        &self,
        workflow: &mut CampaignWorkflow,
        to: CampaignStatus,
    ) -> CampaignResult<TransitionOutcome> {
        let from = workflow.status();
        let edge = self
            .transitions
            .iter()
            .find(|t| t.from == from && t.to == to)
            .ok_or(CampaignError::InvalidTransition { from, to })?;

        let mut warnings = Vec::new();
        if to == CampaignStatus::Active {
            let (blocking, rest): (Vec<_>, Vec<_>) =
                workflow.validate().into_iter().partition(|i| i.is_blocking());
            if !blocking.is_empty() {
                warn!(
                    campaign_id = %workflow.id,
                    trigger = %edge.trigger,
                    blocking = blocking.len(),
                    "Activation rejected by validation"
                );
                let mut issues = blocking;
                issues.extend(rest);
                return Err(CampaignError::ActivationRejected(issues));
            }
            warnings = rest;
        }

        let trigger = edge.trigger.clone();
        workflow.set_status(to);
        info!(campaign_id = %workflow.id, %from, %to, %trigger, "Campaign status changed");
        Ok(TransitionOutcome {
            from,
            to,
            trigger,
            warnings,
        })
    }

    /// `draft → active` or `paused → active`.
    pub fn activate(&self, workflow: &mut CampaignWorkflow) -> CampaignResult<TransitionOutcome> {
        self.transition(workflow, CampaignStatus::Active)
    }

    /// `active → paused` only.
    pub fn pause(&self, workflow: &mut CampaignWorkflow) -> CampaignResult<TransitionOutcome> {
        self.transition(workflow, CampaignStatus::Paused)
    }

    /// `paused → active` only, re-validating in case the workflow changed
    /// while paused.
    pub fn resume(&self, workflow: &mut CampaignWorkflow) -> CampaignResult<TransitionOutcome> {
        if workflow.status() != CampaignStatus::Paused {
            return Err(CampaignError::InvalidTransition {
                from: workflow.status(),
                to: CampaignStatus::Active,
            });
        }
        self.activate(workflow)
    }

    /// Dashboard toggle: pauses a live campaign, otherwise activates it.
    pub fn toggle(&self, workflow: &mut CampaignWorkflow) -> CampaignResult<TransitionOutcome> {
        match workflow.status() {
            CampaignStatus::Active => self.pause(workflow),
            CampaignStatus::Draft | CampaignStatus::Paused => self.activate(workflow),
        }
    }
}

impl Default for CampaignLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
