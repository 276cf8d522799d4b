//! Create / delete flows: validate -> persist -> update snapshot -> notify.
//!
//! - Validation failures never reach the store
//! - The snapshot changes only after the store confirms
//! - Store failures notify once and leave the snapshot untouched; no retry
//! - Deletes ask for confirmation first; declining has no side effects

use crate::domain::validation::{validate_referenced, RawRecord, TicketDraft, ValidatedRecord};
use crate::domain::{
    EntityId, EntityKind, FieldErrors, Movie, Room, Showing, StoreError, StoredRecord, Ticket,
    TicketKind,
};
use crate::ports::{Confirmer, Notification, Notifier};
use crate::usecases::catalog::Catalog;
use crate::usecases::repository::EntityRepository;
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where the current user action is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Idle,
    Validating,
    Invalid,
    Submitting,
    Persisted,
    Failed,
}

/// Result of one user action.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// Field errors to render; the store was not contacted.
    Invalid(FieldErrors),
    /// Created and appended to the snapshot.
    Persisted(StoredRecord),
    /// Deleted and removed from the snapshot.
    Deleted { kind: EntityKind, id: EntityId },
    /// Store rejected or was unreachable; snapshot unchanged.
    Failed(StoreError),
    /// User declined the confirmation.
    Declined,
    /// A request for an earlier action is still in flight.
    Busy,
}

/// Wall clock used for temporal validation rules.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Tracks one action's phase and puts it back to `Idle` when dropped, so an
/// action abandoned mid-request cannot leave the orchestrator `Submitting`.
struct PhaseGuard<'a> {
    phase: &'a mut MutationPhase,
    kind: EntityKind,
}

impl<'a> PhaseGuard<'a> {
    fn start(phase: &'a mut MutationPhase, kind: EntityKind) -> Self {
        let mut guard = Self { phase, kind };
        guard.enter(MutationPhase::Validating);
        guard
    }

    fn enter(&mut self, to: MutationPhase) {
        let from = *self.phase;
        debug!(kind = %self.kind, from = ?from, to = ?to, "mutation phase");
        *self.phase = to;
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        if *self.phase == MutationPhase::Submitting {
            warn!(kind = %self.kind, "request abandoned while in flight");
        }
        *self.phase = MutationPhase::Idle;
    }
}

/// Runs mutation flows against the session snapshot.
pub struct MutationOrchestrator {
    repo: EntityRepository,
    catalog: Catalog,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
    clock: Arc<dyn Clock>,
    phase: MutationPhase,
    refresh_after_mutation: bool,
}

impl MutationOrchestrator {
    pub fn new(
        repo: EntityRepository,
        catalog: Catalog,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        Self {
            repo,
            catalog,
            notifier,
            confirmer,
            clock: Arc::new(SystemClock),
            phase: MutationPhase::Idle,
            refresh_after_mutation: true,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Re-read the touched collection after a confirmed write.
    pub fn with_refresh_after_mutation(mut self, refresh: bool) -> Self {
        self.refresh_after_mutation = refresh;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn phase(&self) -> MutationPhase {
        self.phase
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Replaces the snapshot with a fresh load. Snapshot kept on failure.
    pub async fn reload(&mut self) -> Result<(), StoreError> {
        self.catalog = Catalog::load(&self.repo).await?;
        Ok(())
    }

    /// Validates and creates one record.
    pub async fn submit(&mut self, raw: RawRecord) -> MutationOutcome {
        let kind = raw.kind();
        if self.phase == MutationPhase::Submitting {
            warn!(kind = %kind, "submission ignored, request in flight");
            return MutationOutcome::Busy;
        }
        let mut phase = PhaseGuard::start(&mut self.phase, kind);

        // Clock read at submission, not when the form was opened.
        let validated = match validate_referenced(&raw, self.clock.now(), &self.catalog) {
            Ok(record) => record,
            Err(errors) => {
                info!(kind = %kind, fields = errors.len(), "submission invalid");
                phase.enter(MutationPhase::Invalid);
                return MutationOutcome::Invalid(errors);
            }
        };

        phase.enter(MutationPhase::Submitting);
        match persist(&self.repo, &validated).await {
            Ok(record) => {
                let message = created_message(&record);
                self.catalog.insert(record.clone());
                if self.refresh_after_mutation {
                    refresh_collection(&mut self.catalog, &self.repo, kind).await;
                }
                phase.enter(MutationPhase::Persisted);
                self.notifier.notify(Notification::success(message));
                MutationOutcome::Persisted(record)
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "create failed");
                phase.enter(MutationPhase::Failed);
                self.notifier.notify(Notification::failure(create_failed_message(kind)));
                MutationOutcome::Failed(e)
            }
        }
    }

    /// Sells one ticket for `showing_id` at the kind's tariff.
    pub async fn sell_ticket(&mut self, showing_id: &EntityId, kind: TicketKind) -> MutationOutcome {
        self.submit(RawRecord::Ticket(TicketDraft {
            showing_id: showing_id.to_string(),
            kind: kind.to_string(),
        }))
        .await
    }

    /// Deletes one record after user confirmation. Records referencing it
    /// are not touched.
    pub async fn delete(&mut self, kind: EntityKind, id: &EntityId) -> MutationOutcome {
        if self.phase == MutationPhase::Submitting {
            warn!(kind = %kind, id = %id, "delete ignored, request in flight");
            return MutationOutcome::Busy;
        }
        if !self.confirmer.confirm(&delete_question(kind)).await {
            debug!(kind = %kind, id = %id, "delete declined");
            return MutationOutcome::Declined;
        }

        let mut phase = PhaseGuard::start(&mut self.phase, kind);
        if !self.catalog.contains(kind, id) {
            let mut errors = FieldErrors::new();
            errors.add("id", format!("No {} with id {}", kind, id));
            phase.enter(MutationPhase::Invalid);
            return MutationOutcome::Invalid(errors);
        }

        phase.enter(MutationPhase::Submitting);
        match self.repo.delete(kind, id).await {
            Ok(()) => {
                self.catalog.remove(kind, id);
                if self.refresh_after_mutation {
                    refresh_collection(&mut self.catalog, &self.repo, kind).await;
                }
                phase.enter(MutationPhase::Persisted);
                self.notifier
                    .notify(Notification::success(format!("{} deleted!", capitalized(kind))));
                MutationOutcome::Deleted {
                    kind,
                    id: id.clone(),
                }
            }
            Err(e) => {
                warn!(kind = %kind, id = %id, error = %e, "delete failed");
                phase.enter(MutationPhase::Failed);
                self.notifier
                    .notify(Notification::failure(format!("Failed to delete {}.", kind)));
                MutationOutcome::Failed(e)
            }
        }
    }
}

async fn persist(
    repo: &EntityRepository,
    record: &ValidatedRecord,
) -> Result<StoredRecord, StoreError> {
    Ok(match record {
        ValidatedRecord::Movie(m) => StoredRecord::Movie(repo.create::<Movie>(m).await?),
        ValidatedRecord::Room(r) => StoredRecord::Room(repo.create::<Room>(r).await?),
        ValidatedRecord::Showing(s) => StoredRecord::Showing(repo.create::<Showing>(s).await?),
        ValidatedRecord::Ticket(t) => StoredRecord::Ticket(repo.create::<Ticket>(t).await?),
    })
}

/// Resynchronizes `kind` from the store. The confirmed local update stays in
/// place if this fails.
async fn refresh_collection(catalog: &mut Catalog, repo: &EntityRepository, kind: EntityKind) {
    if let Err(e) = catalog.refresh(repo, kind).await {
        warn!(kind = %kind, error = %e, "refresh after mutation failed, keeping local snapshot");
    }
}

fn capitalized(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Movie => "Movie",
        EntityKind::Room => "Room",
        EntityKind::Showing => "Showing",
        EntityKind::Ticket => "Ticket",
    }
}

fn delete_question(kind: EntityKind) -> String {
    format!("Do you really want to delete this {}?", kind)
}

fn created_message(record: &StoredRecord) -> String {
    match record {
        StoredRecord::Movie(_) => "Movie registered!".to_string(),
        StoredRecord::Room(_) => "Room registered!".to_string(),
        StoredRecord::Showing(_) => "Showing scheduled!".to_string(),
        StoredRecord::Ticket(t) => format!("Ticket sold! Price: {}", t.details.price),
    }
}

fn create_failed_message(kind: EntityKind) -> String {
    match kind {
        EntityKind::Ticket => "Failed to sell ticket. Try again.".to_string(),
        EntityKind::Showing => "Failed to schedule showing.".to_string(),
        other => format!("Failed to register {}.", other),
    }
}
