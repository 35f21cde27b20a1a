//! Campaign registry. Owns each owner's campaigns and commits every change
//! through the persistence collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use campaign_core::config::WorkflowConfig;
use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::event_bus::{make_event, noop_sink, EventSink};
use campaign_core::types::{CampaignEventType, CampaignStatus, IdentityProvider, UserIdentity};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state_machine::{CampaignLifecycle, TransitionOutcome};
use crate::types::{is_valid_email, CampaignSettings, CampaignStats, CampaignWorkflow, NewStep};

/// Persistence collaborator: one ordered campaign list per owner.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    /// All campaigns stored for `owner_id`, in stored order. Unknown owners
    /// yield an empty list.
    async fn load(&self, owner_id: &str) -> anyhow::Result<Vec<CampaignWorkflow>>;

    /// Replaces the stored list for `owner_id`.
    async fn store(&self, owner_id: &str, campaigns: &[CampaignWorkflow]) -> anyhow::Result<()>;
}

/// Creates, lists and deletes campaigns per owner and commits edits and
/// status transitions, rolling the in-memory copy back when a write fails.
pub struct CampaignRegistry {
    store: Arc<dyn CampaignStore>,
    lifecycle: CampaignLifecycle,
    event_sink: Arc<dyn EventSink>,
    config: WorkflowConfig,
    /// Serializes load-modify-store per owner.
    owner_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for CampaignRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignRegistry")
            .field("owners", &self.owner_locks.len())
            .field("config", &self.config)
            .finish()
    }
}

impl CampaignRegistry {
    pub fn new(store: Arc<dyn CampaignStore>) -> Self {
        Self {
            store,
            lifecycle: CampaignLifecycle::new(),
            event_sink: noop_sink(),
            config: WorkflowConfig::default(),
            owner_locks: DashMap::new(),
        }
    }

    /// Attach an event sink for campaign lifecycle events.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    pub fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Template for a builder "Add Email" click.
    pub fn blank_step(&self) -> NewStep {
        NewStep {
            name: Some(self.config.default_step_name.clone()),
            ..Default::default()
        }
    }

    fn owner_lock(&self, owner_id: &str) -> Arc<Mutex<()>> {
        self.owner_locks
            .entry(owner_id.to_string())
            .or_default()
            .value()
            .clone()
    }

    async fn load_owned(&self, owner_id: &str) -> CampaignResult<Vec<CampaignWorkflow>> {
        let mut campaigns = self
            .store
            .load(owner_id)
            .await
            .map_err(persistence_failure)?;
        if let Some(stray) = campaigns.iter().find(|c| c.owner_id != owner_id) {
            return Err(CampaignError::PersistenceFailure(format!(
                "stored list for '{owner_id}' holds campaign {} owned by '{}'",
                stray.id, stray.owner_id
            )));
        }
        for campaign in &mut campaigns {
            campaign.renumber();
        }
        Ok(campaigns)
    }

    async fn store_owned(&self, owner_id: &str, campaigns: &[CampaignWorkflow]) -> CampaignResult<()> {
        self.store
            .store(owner_id, campaigns)
            .await
            .map_err(persistence_failure)
    }

    // ─── Create / List / Delete ────────────────────────────────────────────

    /// Creates and persists a new draft campaign.
    pub async fn create(
        &self,
        owner_id: &str,
        settings: CampaignSettings,
    ) -> CampaignResult<CampaignWorkflow> {
        check_settings(&settings)?;
        let campaign = CampaignWorkflow::new(owner_id, settings);

        let lock = self.owner_lock(owner_id);
        let _guard = lock.lock().await;
        let mut campaigns = self.load_owned(owner_id).await?;
        campaigns.push(campaign.clone());
        self.store_owned(owner_id, &campaigns).await?;

        info!(
            campaign_id = %campaign.id,
            owner_id = %owner_id,
            name = %campaign.settings.name,
            "Campaign created"
        );
        metrics::counter!("campaigns.created").increment(1);
        self.event_sink.emit(make_event(
            CampaignEventType::CampaignCreated,
            campaign.id,
            owner_id,
            Some(campaign.status()),
        ));
        Ok(campaign)
    }

    /// Creates a campaign for `user`, filling a blank sender name or email
    /// from the user's profile.
    pub async fn create_for_user(
        &self,
        user: &UserIdentity,
        mut settings: CampaignSettings,
    ) -> CampaignResult<CampaignWorkflow> {
        if settings.from_name.trim().is_empty() {
            settings.from_name = user.name.clone();
        }
        if settings.from_email.trim().is_empty() {
            settings.from_email = user.email.clone();
        }
        self.create(&user.id, settings).await
    }

    /// Creates a campaign for whoever is signed in.
    pub async fn create_for_current_user(
        &self,
        identity: &dyn IdentityProvider,
        settings: CampaignSettings,
    ) -> CampaignResult<CampaignWorkflow> {
        let user = identity.current_user().ok_or_else(|| {
            CampaignError::InvalidSettings("no signed-in user to own the campaign".to_string())
        })?;
        self.create_for_user(&user, settings).await
    }

    /// The owner's campaigns in creation order.
    pub async fn list(&self, owner_id: &str) -> CampaignResult<Vec<CampaignWorkflow>> {
        self.load_owned(owner_id).await
    }

    pub async fn get(&self, owner_id: &str, campaign_id: Uuid) -> CampaignResult<CampaignWorkflow> {
        self.load_owned(owner_id)
            .await?
            .into_iter()
            .find(|c| c.id == campaign_id)
            .ok_or(CampaignError::CampaignNotFound(campaign_id))
    }

    /// Removes a campaign outright. Returns whether anything was removed;
    /// absent ids are not an error.
    pub async fn delete(&self, owner_id: &str, campaign_id: Uuid) -> CampaignResult<bool> {
        let lock = self.owner_lock(owner_id);
        let _guard = lock.lock().await;
        let mut campaigns = self.load_owned(owner_id).await?;
        let before = campaigns.len();
        campaigns.retain(|c| c.id != campaign_id);
        if campaigns.len() == before {
            debug!(campaign_id = %campaign_id, owner_id = %owner_id, "Delete of absent campaign ignored");
            return Ok(false);
        }
        self.store_owned(owner_id, &campaigns).await?;

        info!(campaign_id = %campaign_id, owner_id = %owner_id, "Campaign deleted");
        metrics::counter!("campaigns.deleted").increment(1);
        self.event_sink.emit(make_event(
            CampaignEventType::CampaignDeleted,
            campaign_id,
            owner_id,
            None,
        ));
        Ok(true)
    }

    /// Dashboard counters for the owner's campaigns.
    pub async fn stats(&self, owner_id: &str) -> CampaignResult<CampaignStats> {
        let campaigns = self.load_owned(owner_id).await?;
        let mut stats = CampaignStats {
            total: campaigns.len(),
            ..Default::default()
        };
        for campaign in &campaigns {
            match campaign.status() {
                CampaignStatus::Draft => stats.draft += 1,
                CampaignStatus::Active => stats.active += 1,
                CampaignStatus::Paused => stats.paused += 1,
            }
            stats.total_steps += campaign.steps().len();
        }
        Ok(stats)
    }

    // ─── Save / Commit ─────────────────────────────────────────────────────

    /// Persists the workflow's current state over its stored copy. Only
    /// `create` inserts, so a campaign that was deleted (or never created)
    /// fails with `CampaignNotFound`.
    pub async fn save(&self, workflow: &CampaignWorkflow) -> CampaignResult<()> {
        let owner_id = workflow.owner_id.as_str();
        let lock = self.owner_lock(owner_id);
        let _guard = lock.lock().await;
        let mut campaigns = self.load_owned(owner_id).await?;
        let existing = campaigns
            .iter_mut()
            .find(|c| c.id == workflow.id)
            .ok_or(CampaignError::CampaignNotFound(workflow.id))?;
        *existing = workflow.clone();
        self.store_owned(owner_id, &campaigns).await?;

        debug!(campaign_id = %workflow.id, owner_id = %owner_id, "Campaign saved");
        self.event_sink.emit(make_event(
            CampaignEventType::CampaignSaved,
            workflow.id,
            owner_id,
            Some(workflow.status()),
        ));
        Ok(())
    }

    /// Applies a builder edit and persists it. If the edit fails, touches the
    /// campaign's identity or the write fails, `workflow` is restored to its
    /// state before the call.
    pub async fn commit<T, F>(&self, workflow: &mut CampaignWorkflow, edit: F) -> CampaignResult<T>
    where
        F: FnOnce(&mut CampaignWorkflow) -> CampaignResult<T>,
    {
        let snapshot = workflow.clone();
        let output = match edit(workflow) {
            Ok(output) => output,
            Err(e) => {
                *workflow = snapshot;
                return Err(e);
            }
        };
        if workflow.id != snapshot.id || workflow.owner_id != snapshot.owner_id {
            *workflow = snapshot;
            return Err(CampaignError::InvalidField(
                "id and ownerId cannot be changed".to_string(),
            ));
        }
        if let Err(e) = self.save(workflow).await {
            warn!(campaign_id = %workflow.id, error = %e, "Save failed, edit rolled back");
            metrics::counter!("campaigns.rollbacks").increment(1);
            *workflow = snapshot;
            return Err(e);
        }
        Ok(output)
    }

    // ─── Lifecycle ─────────────────────────────────────────────────────────

    async fn commit_transition(
        &self,
        workflow: &mut CampaignWorkflow,
        result: CampaignResult<TransitionOutcome>,
    ) -> CampaignResult<TransitionOutcome> {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                if matches!(e, CampaignError::ActivationRejected(_)) {
                    metrics::counter!("campaigns.activation_rejected").increment(1);
                }
                return Err(e);
            }
        };

        if let Err(e) = self.save(workflow).await {
            warn!(
                campaign_id = %workflow.id,
                from = %outcome.from,
                to = %outcome.to,
                trigger = %outcome.trigger,
                error = %e,
                "Save failed, status rolled back"
            );
            metrics::counter!("campaigns.rollbacks").increment(1);
            workflow.set_status(outcome.from);
            return Err(e);
        }

        metrics::counter!("campaigns.transitions", "status" => outcome.to.as_str()).increment(1);
        let event_type = match (outcome.from, outcome.to) {
            (CampaignStatus::Paused, CampaignStatus::Active) => CampaignEventType::CampaignResumed,
            (_, CampaignStatus::Paused) => CampaignEventType::CampaignPaused,
            _ => CampaignEventType::CampaignActivated,
        };
        self.event_sink.emit(make_event(
            event_type,
            workflow.id,
            workflow.owner_id.as_str(),
            Some(outcome.to),
        ));
        Ok(outcome)
    }

    pub async fn activate(&self, workflow: &mut CampaignWorkflow) -> CampaignResult<TransitionOutcome> {
        let result = self.lifecycle.activate(workflow);
        self.commit_transition(workflow, result).await
    }

    pub async fn pause(&self, workflow: &mut CampaignWorkflow) -> CampaignResult<TransitionOutcome> {
        let result = self.lifecycle.pause(workflow);
        self.commit_transition(workflow, result).await
    }

    pub async fn resume(&self, workflow: &mut CampaignWorkflow) -> CampaignResult<TransitionOutcome> {
        let result = self.lifecycle.resume(workflow);
        self.commit_transition(workflow, result).await
    }

    pub async fn toggle(&self, workflow: &mut CampaignWorkflow) -> CampaignResult<TransitionOutcome> {
        let result = self.lifecycle.toggle(workflow);
        self.commit_transition(workflow, result).await
    }
}

fn persistence_failure(err: anyhow::Error) -> CampaignError {
    CampaignError::PersistenceFailure(format!("{err:#}"))
}

/// Creation-time checks: a non-blank name and well-formed addresses where
/// given. Blank addresses are left for `validate` to report.
fn check_settings(settings: &CampaignSettings) -> CampaignResult<()> {
    if settings.name.trim().is_empty() {
        return Err(CampaignError::InvalidSettings(
            "campaign name is required".to_string(),
        ));
    }
    for (label, address) in [
        ("from email", &settings.from_email),
        ("reply-to email", &settings.reply_to_email),
    ] {
        if !address.is_empty() && !is_valid_email(address) {
            return Err(CampaignError::InvalidSettings(format!(
                "{label} '{address}' is not a valid address"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::TriggerKind;
    use crate::types::{DelaySpec, DelayUnit};
    use campaign_core::event_bus::capture_sink;
    use campaign_core::types::StaticIdentity;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Store double: a plain map with a switch that makes writes fail.
    #[derive(Default)]
    struct FlakyStore {
        data: std::sync::Mutex<HashMap<String, Vec<CampaignWorkflow>>>,
        fail_writes: AtomicBool,
    }

    #[async_trait]
    impl CampaignStore for FlakyStore {
        async fn load(&self, owner_id: &str) -> anyhow::Result<Vec<CampaignWorkflow>> {
            Ok(self
                .data
                .lock()
                .unwrap()
                .get(owner_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn store(&self, owner_id: &str, campaigns: &[CampaignWorkflow]) -> anyhow::Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                anyhow::bail!("disk full");
            }
            self.data
                .lock()
                .unwrap()
                .insert(owner_id.to_string(), campaigns.to_vec());
            Ok(())
        }
    }

    fn settings() -> CampaignSettings {
        CampaignSettings::named("Welcome Series").with_sender("Your Company", "noreply@company.com")
    }

    fn signup_step() -> NewStep {
        NewStep {
            name: Some("Welcome Email".into()),
            delay: Some(DelaySpec::new(0, DelayUnit::Minutes)),
            triggers: [TriggerKind::Signup].into_iter().collect(),
            ..Default::default()
        }
    }

    fn registry() -> (CampaignRegistry, Arc<FlakyStore>) {
        let store = Arc::new(FlakyStore::default());
        (CampaignRegistry::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (registry, _) = registry();
        let a = registry.create("owner-1", settings()).await.unwrap();
        let b = registry
            .create("owner-1", CampaignSettings::named("  Cart Recovery  "))
            .await
            .unwrap();

        assert_eq!(a.status(), CampaignStatus::Draft);
        assert!(a.steps().is_empty());
        assert_eq!(b.settings.name, "Cart Recovery");

        let listed = registry.list("owner-1").await.unwrap();
        assert_eq!(listed.iter().map(|c| c.id).collect::<Vec<_>>(), vec![a.id, b.id]);
        assert!(registry.list("owner-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_name_rejected_and_not_persisted() {
        let (registry, _) = registry();
        let err = registry
            .create("owner-1", CampaignSettings::named("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, CampaignError::InvalidSettings(_)));
        assert!(registry.list("owner-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_email_rejected_at_creation() {
        let (registry, _) = registry();
        let err = registry
            .create("owner-1", settings().with_reply_to("support-at-company"))
            .await
            .unwrap_err();
        assert!(matches!(err, CampaignError::InvalidSettings(_)));
    }

    #[tokio::test]
    async fn test_create_for_user_fills_sender() {
        let (registry, _) = registry();
        let identity = StaticIdentity(Some(UserIdentity {
            id: "user-42".into(),
            name: "Grace".into(),
            email: "grace@example.com".into(),
        }));
        let campaign = registry
            .create_for_current_user(&identity, CampaignSettings::named("Onboarding"))
            .await
            .unwrap();
        assert_eq!(campaign.owner_id, "user-42");
        assert_eq!(campaign.settings.from_name, "Grace");
        assert_eq!(campaign.settings.from_email, "grace@example.com");

        let err = registry
            .create_for_current_user(&StaticIdentity(None), CampaignSettings::named("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, CampaignError::InvalidSettings(_)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let sink = capture_sink();
        let (registry, _) = registry();
        let registry = registry.with_event_sink(sink.clone());
        let campaign = registry.create("owner-1", settings()).await.unwrap();

        assert!(registry.delete("owner-1", campaign.id).await.unwrap());
        assert!(!registry.delete("owner-1", campaign.id).await.unwrap());
        assert!(registry.list("owner-1").await.unwrap().is_empty());
        assert_eq!(sink.count_type(CampaignEventType::CampaignDeleted), 1);
    }

    #[tokio::test]
    async fn test_no_cross_owner_delete() {
        let (registry, _) = registry();
        let campaign = registry.create("owner-1", settings()).await.unwrap();
        assert!(!registry.delete("owner-2", campaign.id).await.unwrap());
        assert!(matches!(
            registry.get("owner-2", campaign.id).await,
            Err(CampaignError::CampaignNotFound(_))
        ));
        assert_eq!(registry.list("owner-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_persists_edit() {
        let (registry, _) = registry();
        let mut campaign = registry.create("owner-1", settings()).await.unwrap();
        let step = registry
            .commit(&mut campaign, |wf| Ok(wf.add_step(signup_step())))
            .await
            .unwrap();

        let stored = registry.get("owner-1", campaign.id).await.unwrap();
        assert_eq!(stored.steps().len(), 1);
        assert_eq!(stored.steps()[0].id, step.id);
    }

    #[tokio::test]
    async fn test_commit_rolls_back_on_write_failure() {
        let (registry, store) = registry();
        let mut campaign = registry.create("owner-1", settings()).await.unwrap();
        let before = campaign.clone();

        store.fail_writes.store(true, Ordering::SeqCst);
        let err = registry
            .commit(&mut campaign, |wf| Ok(wf.add_step(signup_step())))
            .await
            .unwrap_err();
        assert!(matches!(err, CampaignError::PersistenceFailure(ref msg) if msg.contains("disk full")));
        assert_eq!(campaign, before);
    }

    #[tokio::test]
    async fn test_commit_restores_on_edit_error() {
        let (registry, _) = registry();
        let mut campaign = registry.create("owner-1", settings()).await.unwrap();
        let before = campaign.clone();
        let err = registry
            .commit(&mut campaign, |wf| {
                wf.add_step(NewStep::default());
                Err::<(), _>(CampaignError::InvalidField("boom".into()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CampaignError::InvalidField(_)));
        assert_eq!(campaign, before);
    }

    #[tokio::test]
    async fn test_stale_copy_cannot_resurrect_deleted_campaign() {
        let sink = capture_sink();
        let (registry, _) = registry();
        let registry = registry.with_event_sink(sink.clone());
        let mut stale = registry.create("owner-1", settings()).await.unwrap();
        assert!(registry.delete("owner-1", stale.id).await.unwrap());
        let before = stale.clone();

        let err = registry
            .commit(&mut stale, |wf| Ok(wf.add_step(signup_step())))
            .await
            .unwrap_err();
        assert!(matches!(err, CampaignError::CampaignNotFound(id) if id == stale.id));
        assert_eq!(stale, before);

        let err = registry.activate(&mut stale).await.unwrap_err();
        assert!(matches!(err, CampaignError::CampaignNotFound(_)));
        assert_eq!(stale.status(), CampaignStatus::Draft);
        assert!(matches!(
            registry.save(&stale).await,
            Err(CampaignError::CampaignNotFound(_))
        ));

        assert!(registry.list("owner-1").await.unwrap().is_empty());
        assert_eq!(sink.count_type(CampaignEventType::CampaignSaved), 0);
    }

    #[tokio::test]
    async fn test_commit_cannot_move_campaign_to_another_owner() {
        let (registry, _) = registry();
        let mut campaign = registry.create("owner-1", settings()).await.unwrap();
        let before = campaign.clone();

        let err = registry
            .commit(&mut campaign, |wf| {
                wf.owner_id = "owner-2".into();
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CampaignError::InvalidField(_)));
        assert_eq!(campaign, before);

        let err = registry
            .commit(&mut campaign, |wf| {
                wf.id = Uuid::new_v4();
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CampaignError::InvalidField(_)));
        assert_eq!(campaign, before);

        assert_eq!(registry.list("owner-1").await.unwrap(), vec![before]);
        assert!(registry.list("owner-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_record_fails_instead_of_being_dropped() {
        let (registry, store) = registry();
        let own = registry.create("owner-1", settings()).await.unwrap();
        let foreign = CampaignWorkflow::new("owner-2", settings());
        store
            .data
            .lock()
            .unwrap()
            .get_mut("owner-1")
            .unwrap()
            .push(foreign.clone());

        assert!(matches!(
            registry.list("owner-1").await,
            Err(CampaignError::PersistenceFailure(ref msg)) if msg.contains("owner-2")
        ));
        assert!(matches!(
            registry.create("owner-1", settings()).await,
            Err(CampaignError::PersistenceFailure(_))
        ));
        assert!(matches!(
            registry.delete("owner-1", own.id).await,
            Err(CampaignError::PersistenceFailure(_))
        ));

        let stored = store.data.lock().unwrap().get("owner-1").cloned().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].id, foreign.id);
    }

    #[tokio::test]
    async fn test_activation_persists_and_emits() {
        let sink = capture_sink();
        let (registry, _) = registry();
        let registry = registry.with_event_sink(sink.clone());
        let mut campaign = registry.create("owner-1", settings()).await.unwrap();
        registry
            .commit(&mut campaign, |wf| Ok(wf.add_step(signup_step())))
            .await
            .unwrap();

        registry.activate(&mut campaign).await.unwrap();
        assert_eq!(
            registry.get("owner-1", campaign.id).await.unwrap().status(),
            CampaignStatus::Active
        );
        registry.pause(&mut campaign).await.unwrap();
        registry.resume(&mut campaign).await.unwrap();

        assert_eq!(sink.count_type(CampaignEventType::CampaignActivated), 1);
        assert_eq!(sink.count_type(CampaignEventType::CampaignPaused), 1);
        assert_eq!(sink.count_type(CampaignEventType::CampaignResumed), 1);
    }

    #[tokio::test]
    async fn test_transition_rolled_back_on_write_failure() {
        let sink = capture_sink();
        let (registry, store) = registry();
        let registry = registry.with_event_sink(sink.clone());
        let mut campaign = registry.create("owner-1", settings()).await.unwrap();

        store.fail_writes.store(true, Ordering::SeqCst);
        let err = registry.activate(&mut campaign).await.unwrap_err();
        assert!(matches!(err, CampaignError::PersistenceFailure(_)));
        assert_eq!(campaign.status(), CampaignStatus::Draft);
        assert_eq!(
            registry.get("owner-1", campaign.id).await.unwrap().status(),
            CampaignStatus::Draft
        );
        assert_eq!(sink.count_type(CampaignEventType::CampaignActivated), 0);
    }

    #[tokio::test]
    async fn test_rejected_activation_is_not_saved() {
        let (registry, _) = registry();
        let mut campaign = registry.create("owner-1", settings()).await.unwrap();
        registry
            .commit(&mut campaign, |wf| Ok(wf.add_step(NewStep::default())))
            .await
            .unwrap();

        let err = registry.activate(&mut campaign).await.unwrap_err();
        assert!(!err.issues().is_empty());
        assert_eq!(campaign.status(), CampaignStatus::Draft);
    }

    #[tokio::test]
    async fn test_stats() {
        let (registry, _) = registry();
        let mut live = registry.create("owner-1", settings()).await.unwrap();
        registry
            .commit(&mut live, |wf| Ok(wf.add_step(signup_step())))
            .await
            .unwrap();
        registry.activate(&mut live).await.unwrap();
        registry.create("owner-1", settings()).await.unwrap();

        let stats = registry.stats("owner-1").await.unwrap();
        assert_eq!(
            stats,
            CampaignStats {
                total: 2,
                draft: 1,
                active: 1,
                paused: 0,
                total_steps: 1,
            }
        );
    }

    #[test]
    fn test_blank_step_uses_configured_name() {
        let (registry, _) = registry();
        let registry = registry.with_config(WorkflowConfig {
            default_step_name: "Untitled".into(),
        });
        assert_eq!(registry.blank_step().name.as_deref(), Some("Untitled"));
    }
}
