//! Keeps the session in step with the identity provider.

use crate::errors::{AuthError, SessionError};
use crate::identity::Identity;
use crate::models::{LoadStatus, SessionView, USERS_COLLECTION};
use crate::state::AppState;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

const SIGN_IN_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub enum LoadOutcome {
    Restored,
    Fresh,
    Failed(SessionError),
    SignedOut,
}

/// Applies an identity change: fetch and replace the tracker on sign-in,
/// forget it on sign-out.
///
/// A fetch failure leaves the blank tracker in place and is reported as
/// [`LoadOutcome::Failed`] rather than folded into "no document".
pub async fn load_session(state: &AppState, identity: Option<Identity>) -> LoadOutcome {
    let Some(identity) = identity else {
        state.session.lock().await.clear();
        state.loaded.send_replace(None);
        return LoadOutcome::SignedOut;
    };

    let mut session = state.session.lock().await;
    session.begin(identity.clone());

    let outcome = match state.store.get_document(USERS_COLLECTION, &identity.id).await {
        Ok(Some(tracker)) => {
            info!("restored tracker for {}", identity.id);
            session.finish_load(Some(tracker), LoadStatus::Restored);
            LoadOutcome::Restored
        }
        Ok(None) => {
            info!("no tracker stored for {}, starting blank", identity.id);
            session.finish_load(None, LoadStatus::Fresh);
            LoadOutcome::Fresh
        }
        Err(err) => {
            error!("failed to load tracker for {}: {err}", identity.id);
            session.finish_load(
                None,
                LoadStatus::Failed {
                    message: err.to_string(),
                },
            );
            LoadOutcome::Failed(SessionError::Load(err))
        }
    };
    drop(session);

    state.loaded.send_replace(Some(identity.id));
    outcome
}

/// Follows the provider's identity changes until the provider goes away.
/// Aborting the returned task unsubscribes.
pub fn spawn_listener(state: AppState) -> JoinHandle<()> {
    let mut changes = state.identity.subscribe();
    tokio::spawn(async move {
        loop {
            let identity = changes.borrow_and_update().clone();
            load_session(&state, identity).await;
            if changes.changed().await.is_err() {
                break;
            }
        }
    })
}

/// Signs in through the provider and waits for the listener to load the
/// user's tracker.
pub async fn sign_in(state: &AppState) -> Result<SessionView, SessionError> {
    let mut loaded = state.loaded.subscribe();
    let identity = state.identity.sign_in().await?;

    let wait = async {
        loop {
            if loaded.borrow_and_update().as_deref() == Some(identity.id.as_str()) {
                return true;
            }
            if loaded.changed().await.is_err() {
                return false;
            }
        }
    };
    let ready = tokio::time::timeout(SIGN_IN_LOAD_TIMEOUT, wait).await;
    match ready {
        Ok(true) => Ok(state.session.lock().await.view()),
        _ => Err(AuthError::LoadTimeout(identity.id).into()),
    }
}
