use crate::identity::IdentityProvider;
use crate::schedule::Scheduler;
use crate::session::Session;
use crate::storage::DocumentStore;
use std::{sync::Arc, time::Duration};
use tokio::sync::{Mutex, watch};

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub scheduler: Arc<dyn Scheduler>,
    /// Id of the user whose tracker is currently loaded.
    pub loaded: Arc<watch::Sender<Option<String>>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        scheduler: Arc<dyn Scheduler>,
        debounce: Duration,
    ) -> Self {
        let (loaded, _) = watch::channel(None);
        Self {
            session: Arc::new(Mutex::new(Session::new(debounce))),
            store,
            identity,
            scheduler,
            loaded: Arc::new(loaded),
        }
    }
}
