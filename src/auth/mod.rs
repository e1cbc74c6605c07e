pub mod local;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::types::UserId;

/// A signed-in session identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider-issued user id.
    pub user_id: UserId,
    /// Account email.
    pub email: String,
}

/// Provider error kinds observed by the sign-in and sign-up flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    EmailAlreadyInUse,
    InvalidEmail,
    WeakPassword,
    InvalidCredentials,
    UserNotFound,
    Other(String),
}

impl AuthError {
    /// Human-readable message shown in place of the raw provider code.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmailAlreadyInUse => "Email is already in use.".to_string(),
            Self::InvalidEmail => "Invalid email address.".to_string(),
            Self::WeakPassword => "Password is too weak.".to_string(),
            Self::InvalidCredentials => "Incorrect email or password.".to_string(),
            Self::UserNotFound => "No account found for this email.".to_string(),
            Self::Other(_) => "An error occurred. Please try again.".to_string(),
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

/// External authentication service issuing session identities.
///
/// Auth state changes arrive on the watch channel returned by
/// [`IdentityProvider::auth_state`]; dropping the receiver is the unsubscribe.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<Identity>;

    /// Signs an existing account in.
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Identity>;

    /// Ends the current session.
    async fn sign_out(&self);

    /// Receiver holding the current session identity, `None` when signed out.
    fn auth_state(&self) -> watch::Receiver<Option<Identity>>;
}
