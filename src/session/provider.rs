use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{AuthError, SessionClaims, SessionEvent};

/// A hosted authentication provider holding at most one active session.
#[async_trait]
pub trait AuthProvider: Send + Sync + std::fmt::Debug {
    /// Claims of the active session, `None` when signed out.
    async fn get_session(&self) -> Result<Option<SessionClaims>, AuthError>;

    /// Exchanges credentials for a new session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Session changes from now on.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}
