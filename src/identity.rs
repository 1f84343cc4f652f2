use crate::errors::AuthError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub display_name: String,
}

/// Authentication collaborator.
///
/// `subscribe` yields the current identity and every later change;
/// dropping the receiver unsubscribes.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

/// Signs in the single account configured for this process.
pub struct LocalIdentityProvider {
    account: Option<Identity>,
    current: watch::Sender<Option<Identity>>,
}

impl LocalIdentityProvider {
    pub fn new(account: Option<Identity>) -> Self {
        let (current, _) = watch::channel(None);
        Self { account, current }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        let identity = self
            .account
            .clone()
            .ok_or_else(|| AuthError::Rejected("no account configured".into()))?;

        info!("signed in as {}", identity.id);
        let next = identity.clone();
        self.current.send_if_modified(|current| {
            if current.as_ref() == Some(&next) {
                return false;
            }
            *current = Some(next);
            true
        });
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let changed = self.current.send_if_modified(|current| current.take().is_some());
        if changed {
            info!("signed out");
        }
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity {
            id: "alice".into(),
            display_name: "Alice".into(),
        }
    }

    #[tokio::test]
    async fn sign_in_publishes_identity() {
        let provider = LocalIdentityProvider::new(Some(alice()));
        let mut rx = provider.subscribe();
        assert!(rx.borrow().is_none());

        let identity = provider.sign_in().await.unwrap();
        assert_eq!(identity, alice());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref(), Some(&alice()));

        provider.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn sign_in_without_account_is_rejected() {
        let provider = LocalIdentityProvider::new(None);
        let result = provider.sign_in().await;
        assert!(matches!(result, Err(AuthError::Rejected(_))));
        assert!(provider.subscribe().borrow().is_none());
    }

    #[tokio::test]
    async fn repeated_sign_in_does_not_notify() {
        let provider = LocalIdentityProvider::new(Some(alice()));
        provider.sign_in().await.unwrap();
        let rx = provider.subscribe();
        provider.sign_in().await.unwrap();
        assert!(!rx.has_changed().unwrap());
    }
}
