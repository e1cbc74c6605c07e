//! In-memory identity provider standing in for the external auth service.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use hashbrown::HashMap;
use tokio::sync::{watch, Mutex};

use crate::types::UserId;

use super::{AuthError, AuthResult, Identity, IdentityProvider};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    password: String,
}

/// Account registry with the provider's observed validation rules: the email
/// must contain `@`, the password at least [`MIN_PASSWORD_LEN`] characters.
pub struct LocalIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    next_user: AtomicU64,
    state_tx: watch::Sender<Option<Identity>>,
}

impl LocalIdentityProvider {
    /// Empty registry, signed out.
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            next_user: AtomicU64::new(0),
            state_tx,
        }
    }
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<Identity> {
        if !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(email) {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let n = self.next_user.fetch_add(1, Ordering::Relaxed) + 1;
        let account = Account {
            user_id: format!("user-{n:06}"),
            password: password.to_string(),
        };
        accounts.insert(email.to_string(), account.clone());

        let identity = Identity {
            user_id: account.user_id,
            email: email.to_string(),
        };
        let _ = self.state_tx.send(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let accounts = self.accounts.lock().await;
        let account = accounts.get(email).ok_or(AuthError::UserNotFound)?;
        if account.password != password {
            return Err(AuthError::InvalidCredentials);
        }

        let identity = Identity {
            user_id: account.user_id.clone(),
            email: email.to_string(),
        };
        let _ = self.state_tx.send(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) {
        let _ = self.state_tx.send(None);
    }

    fn auth_state(&self) -> watch::Receiver<Option<Identity>> {
        self.state_tx.subscribe()
    }
}
