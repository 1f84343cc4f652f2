//! When the tracker is written to the document store.
//!
//! Edits mark the session dirty and re-arm a single debounce timer; the
//! save runs once input has paused for the full window and samples the
//! tracker as it is when the timer fires. Sign-out flushes unsaved edits
//! only if the caller confirms.

use crate::errors::{SessionError, StoreError};
use crate::loader;
use crate::models::{SaveState, SessionView, Tracker, USERS_COLLECTION};
use crate::schedule::{Debouncer, Job, Scheduler};
use crate::state::AppState;
use crate::storage::DocumentStore;
use crate::tracker::Edit;
use std::time::Duration;
use tracing::{info, warn};

/// Dirty tracking plus the pending debounce for one session.
///
/// Every edit bumps `revision`; a save records the revision it wrote, so
/// the session stays dirty when an edit lands while a save is in flight.
pub struct PersistenceGate {
    revision: u64,
    saved_revision: u64,
    debouncer: Debouncer,
}

impl PersistenceGate {
    pub fn new(delay: Duration) -> Self {
        Self {
            revision: 0,
            saved_revision: 0,
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn state(&self) -> SaveState {
        if self.revision == self.saved_revision {
            SaveState::Clean
        } else {
            SaveState::Dirty
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state() == SaveState::Dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn mark_dirty(&mut self) {
        self.revision += 1;
    }

    pub fn mark_saved(&mut self, revision: u64) {
        self.saved_revision = self.saved_revision.max(revision.min(self.revision));
    }

    pub fn arm(&mut self, scheduler: &dyn Scheduler, job: Job) {
        self.debouncer.reschedule(scheduler, job);
    }

    pub fn cancel_pending(&mut self) {
        self.debouncer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Drops pending work and treats the current state as saved.
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.saved_revision = self.revision;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Write only when there are unsaved edits.
    IfDirty,
    /// Write even when clean.
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub prompted: bool,
    pub saved: bool,
}

pub struct SaveSnapshot {
    pub user_id: String,
    pub tracker: Tracker,
    pub revision: u64,
}

/// Writes the whole tracker as the user's document, replacing any prior one.
pub async fn save_document(
    store: &dyn DocumentStore,
    user_id: &str,
    tracker: &Tracker,
) -> Result<(), StoreError> {
    store.put_document(USERS_COLLECTION, user_id, tracker).await?;
    info!("saved tracker for {user_id}");
    Ok(())
}

/// Applies one edit to the signed-in session and re-arms the debounce.
pub async fn apply_edit(state: &AppState, edit: Edit) -> Result<SessionView, SessionError> {
    let mut session = state.session.lock().await;
    if session.user().is_none() {
        return Err(SessionError::NotSignedIn);
    }

    let next = edit.apply(session.tracker())?;
    session.replace_tracker(next);
    session.gate.arm(state.scheduler.as_ref(), debounced_save(state.clone()));

    Ok(session.view())
}

fn debounced_save(state: AppState) -> Job {
    Box::pin(async move {
        if let Err(err) = save_now(&state, SaveMode::IfDirty).await {
            warn!("debounced save failed, edits stay pending: {err}");
        }
    })
}

/// Writes the current tracker. The session lock is released while the
/// store call is in flight.
pub async fn save_now(state: &AppState, mode: SaveMode) -> Result<SaveOutcome, SessionError> {
    let snapshot = {
        let mut session = state.session.lock().await;
        if mode == SaveMode::Always {
            session.gate.cancel_pending();
        }
        match session.save_snapshot(mode) {
            Some(snapshot) => snapshot,
            None => return Ok(SaveOutcome::Skipped),
        }
    };

    save_document(state.store.as_ref(), &snapshot.user_id, &snapshot.tracker)
        .await
        .map_err(SessionError::Save)?;

    let mut session = state.session.lock().await;
    if session.user_id() == Some(snapshot.user_id.as_str()) {
        session.gate.mark_saved(snapshot.revision);
    }
    Ok(SaveOutcome::Saved)
}

/// Saves pending edits if the session is dirty.
pub async fn flush(state: &AppState) -> Result<SaveOutcome, SessionError> {
    state.session.lock().await.gate.cancel_pending();
    save_now(state, SaveMode::IfDirty).await
}

/// Signs out, first asking `confirm` whether unsaved edits should be saved.
///
/// The session is invalidated whatever the answer, and also when the save
/// or the provider's sign-out fails.
pub async fn logout<F>(state: &AppState, confirm: F) -> LogoutOutcome
where
    F: FnOnce() -> bool,
{
    let dirty = {
        let mut session = state.session.lock().await;
        session.gate.cancel_pending();
        session.is_dirty()
    };

    let mut saved = false;
    if dirty {
        if confirm() {
            match save_now(state, SaveMode::IfDirty).await {
                Ok(outcome) => saved = outcome == SaveOutcome::Saved,
                Err(err) => warn!("save before sign-out failed: {err}"),
            }
        } else {
            warn!("signing out with unsaved edits discarded");
        }
    }

    if let Err(err) = state.identity.sign_out().await {
        warn!("identity provider sign-out failed: {err}");
    }
    loader::load_session(state, None).await;

    LogoutOutcome {
        prompted: dirty,
        saved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_tracks_revisions() {
        let mut gate = PersistenceGate::new(Duration::from_millis(1000));
        assert_eq!(gate.state(), SaveState::Clean);

        gate.mark_dirty();
        let written = gate.revision();
        gate.mark_dirty();
        gate.mark_saved(written);
        assert!(gate.is_dirty());

        gate.mark_saved(gate.revision());
        assert_eq!(gate.state(), SaveState::Clean);
    }

    #[test]
    fn stale_save_does_not_regress() {
        let mut gate = PersistenceGate::new(Duration::from_millis(1000));
        gate.mark_dirty();
        gate.mark_dirty();
        gate.mark_saved(2);
        gate.mark_saved(1);
        assert_eq!(gate.state(), SaveState::Clean);
    }

    #[test]
    fn reset_marks_clean() {
        let mut gate = PersistenceGate::new(Duration::from_millis(1000));
        gate.mark_dirty();
        gate.reset();
        assert!(!gate.is_dirty());
        assert!(!gate.is_pending());
    }
}
