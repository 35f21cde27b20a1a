//! Builder operations and validation for a campaign workflow.
//!
//! Mutations never enforce well-formedness beyond their own field: a draft
//! may hold a step with no trigger yet. `validate` reports what is wrong and
//! the lifecycle decides whether that blocks activation.

use std::collections::{BTreeSet, HashSet};

use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::types::{CampaignStatus, IssueCode, ValidationIssue};
use chrono::Utc;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::trigger::TriggerKind;
use crate::types::{
    is_valid_email, CampaignSettings, CampaignWorkflow, DelayUnit, NewStep, SequenceStep,
    StepPatch, DEFAULT_STEP_NAME,
};

impl CampaignWorkflow {
    /// A fresh draft with no steps. The settings name is trimmed; callers
    /// that need settings checked go through the registry.
    pub fn new(owner_id: impl Into<String>, mut settings: CampaignSettings) -> Self {
        settings.name = settings.name.trim().to_string();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            settings,
            steps: Vec::new(),
            status: CampaignStatus::Draft,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: CampaignStatus) {
        self.status = status;
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[SequenceStep] {
        &self.steps
    }

    pub fn step(&self, step_id: Uuid) -> Option<&SequenceStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    fn position_of(&self, step_id: Uuid) -> CampaignResult<usize> {
        self.steps
            .iter()
            .position(|s| s.id == step_id)
            .ok_or(CampaignError::StepNotFound(step_id))
    }

    /// Rewrites every `order` to match its index.
    pub(crate) fn renumber(&mut self) {
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.order = index;
        }
    }

    /// Appends a step at the end of the sequence. Unset fields default to
    /// the builder's blank email (`"New Email"`, `0 days`, no triggers).
    pub fn add_step(&mut self, spec: NewStep) -> SequenceStep {
        let step = SequenceStep {
            id: Uuid::new_v4(),
            order: self.steps.len(),
            name: spec.name.unwrap_or_else(|| DEFAULT_STEP_NAME.to_string()),
            subject_line: spec.subject_line.unwrap_or_default(),
            delay: spec.delay.unwrap_or_default(),
            triggers: spec.triggers,
        };
        debug!(campaign_id = %self.id, step_id = %step.id, order = step.order, "Step added");
        self.steps.push(step.clone());
        step
    }

    /// Removes a step and closes the gap. Absent ids are a no-op.
    pub fn remove_step(&mut self, step_id: Uuid) -> Option<SequenceStep> {
        let index = self.steps.iter().position(|s| s.id == step_id)?;
        let removed = self.steps.remove(index);
        self.renumber();
        debug!(campaign_id = %self.id, step_id = %step_id, "Step removed");
        Some(removed)
    }

    /// Applies one field-level edit. Rejected patches leave the step untouched.
    pub fn update_step(&mut self, step_id: Uuid, patch: StepPatch) -> CampaignResult<&SequenceStep> {
        let index = self.position_of(step_id)?;
        let step = &mut self.steps[index];
        match patch {
            StepPatch::Name(name) => step.name = name,
            StepPatch::SubjectLine(subject) => step.subject_line = subject,
            StepPatch::DelayAmount(amount) => {
                if amount < 0 {
                    return Err(CampaignError::InvalidDelay(format!(
                        "delay amount must be non-negative, got {amount}"
                    )));
                }
                step.delay.amount = u32::try_from(amount).map_err(|_| {
                    CampaignError::InvalidDelay(format!("delay amount {amount} is too large"))
                })?;
            }
            StepPatch::DelayUnit(unit) => step.delay.unit = unit,
            StepPatch::Triggers(triggers) => step.triggers = triggers,
        }
        Ok(&self.steps[index])
    }

    /// Parses a builder edit (`field` name plus JSON value) and applies it.
    pub fn update_step_field(
        &mut self,
        step_id: Uuid,
        field: &str,
        value: Value,
    ) -> CampaignResult<&SequenceStep> {
        let patch = parse_patch(field, value)?;
        self.update_step(step_id, patch)
    }

    /// Moves a step to `new_position`, clamped into the sequence bounds, and
    /// returns the position it landed at.
    pub fn reorder_step(&mut self, step_id: Uuid, new_position: usize) -> CampaignResult<usize> {
        let from = self.position_of(step_id)?;
        let to = new_position.min(self.steps.len() - 1);
        let step = self.steps.remove(from);
        self.steps.insert(to, step);
        self.renumber();
        debug!(campaign_id = %self.id, step_id = %step_id, from, to, "Step reordered");
        Ok(to)
    }

    /// Checks the workflow for activation readiness. Empty result means the
    /// workflow can go live; warnings alone never block.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.settings.name.trim().is_empty() {
            issues.push(ValidationIssue::error(
                IssueCode::MissingCampaignName,
                None,
                "Campaign name is required",
            ));
        }
        if !is_valid_email(&self.settings.from_email) {
            issues.push(ValidationIssue::error(
                IssueCode::InvalidFromEmail,
                None,
                format!("From email '{}' is not a valid address", self.settings.from_email),
            ));
        }
        if !self.settings.reply_to_email.is_empty() && !is_valid_email(&self.settings.reply_to_email)
        {
            issues.push(ValidationIssue::error(
                IssueCode::InvalidReplyToEmail,
                None,
                format!(
                    "Reply-to email '{}' is not a valid address",
                    self.settings.reply_to_email
                ),
            ));
        }

        if self.steps.is_empty() {
            issues.push(ValidationIssue::warning(
                IssueCode::EmptySequence,
                None,
                "Campaign has no emails in its sequence",
            ));
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id) {
                issues.push(ValidationIssue::error(
                    IssueCode::DuplicateStepId,
                    Some(step.id),
                    format!("Step id {} is used more than once", step.id),
                ));
            }
            if step.triggers.is_empty() {
                issues.push(ValidationIssue::error(
                    IssueCode::NoTriggers,
                    Some(step.id),
                    format!("'{}' has no triggers selected", step.name),
                ));
            } else if step.is_time_only() && step.delay.is_zero() {
                issues.push(ValidationIssue::warning(
                    IssueCode::ZeroDelayTimeTrigger,
                    Some(step.id),
                    format!(
                        "'{}' uses a time delay of zero and will send immediately on activation",
                        step.name
                    ),
                ));
            }
        }

        issues
    }

    /// `true` when nothing in `validate` would block activation.
    pub fn is_activatable(&self) -> bool {
        self.validate().iter().all(|i| !i.is_blocking())
    }
}

fn parse_patch(field: &str, value: Value) -> CampaignResult<StepPatch> {
    match field {
        "order" | "id" => Err(CampaignError::InvalidField(format!(
            "'{field}' cannot be set directly"
        ))),
        "name" => expect_string(field, value).map(StepPatch::Name),
        "subjectLine" | "subject" => expect_string(field, value).map(StepPatch::SubjectLine),
        "delay" | "delay.amount" | "delayAmount" => match value.as_i64() {
            Some(amount) => Ok(StepPatch::DelayAmount(amount)),
            None if value.is_number() => Err(CampaignError::InvalidDelay(format!(
                "delay amount must be a whole number, got {value}"
            ))),
            None => Err(CampaignError::InvalidField(format!(
                "'{field}' expects a number"
            ))),
        },
        "delayUnit" | "delay.unit" => {
            let unit = expect_string(field, value)?;
            DelayUnit::parse(&unit)
                .map(StepPatch::DelayUnit)
                .ok_or_else(|| CampaignError::InvalidField(format!("unknown delay unit '{unit}'")))
        }
        "triggers" => {
            let Value::Array(items) = value else {
                return Err(CampaignError::InvalidField(
                    "'triggers' expects a list of trigger names".to_string(),
                ));
            };
            let mut triggers = BTreeSet::new();
            for item in items {
                let name = item.as_str().ok_or_else(|| {
                    CampaignError::InvalidTriggerKind(item.to_string())
                })?;
                triggers.insert(name.parse::<TriggerKind>()?);
            }
            Ok(StepPatch::Triggers(triggers))
        }
        other => Err(CampaignError::InvalidField(format!("unknown field '{other}'"))),
    }
}

fn expect_string(field: &str, value: Value) -> CampaignResult<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(CampaignError::InvalidField(format!(
            "'{field}' expects a string"
        ))),
    }
}
