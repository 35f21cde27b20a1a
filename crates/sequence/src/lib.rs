//! Email campaign sequences: triggers, ordered steps, validation, the
//! draft/active/paused lifecycle and the per-owner campaign registry.

pub mod evaluator;
pub mod registry;
pub mod state_machine;
pub mod trigger;
pub mod types;
pub mod workflow;

pub use evaluator::{NextSend, SequenceEvaluator, SubscriberHistory};
pub use registry::{CampaignRegistry, CampaignStore};
pub use state_machine::{CampaignLifecycle, TransitionOutcome};
pub use trigger::{TriggerCatalog, TriggerKind};
pub use types::{CampaignSettings, CampaignWorkflow, DelaySpec, DelayUnit, NewStep, SequenceStep, StepPatch};
