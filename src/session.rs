//! Signed-in user state derived from the hosted auth provider's session.
//!
//! There is no global auth state: the server builds one [`SessionContext`]
//! at start, keeps it in the application state, updates it from the
//! provider's session events and clears it on sign-out.

mod context;
mod hosted;
mod provider;

pub use context::{SessionCheck, SessionContext};
pub use hosted::HostedAuthClient;
pub use provider::AuthProvider;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The provider rejected the email/password pair
    #[error("Invalid login credentials: {0}")]
    InvalidCredentials(String),

    #[error("Auth provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Auth provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected auth provider response: {0}")]
    InvalidResponse(String),

    /// A session lookup right after a successful sign in found nothing
    #[error("No active session")]
    NoSession,
}

/// Identity claims of a hosted session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Hosted identity id, also the `users.id` of the row
    #[serde(alias = "id")]
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub user_metadata: Value,
}

impl SessionClaims {
    /// Display name from the user metadata, if any was recorded at sign up.
    pub fn display_name(&self) -> Option<String> {
        ["display_name", "full_name", "name"]
            .iter()
            .filter_map(|key| self.user_metadata.get(key).and_then(Value::as_str))
            .map(str::trim)
            .find(|name| !name.is_empty())
            .map(str::to_string)
    }
}

/// Session change pushed by the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn(SessionClaims),
    TokenRefreshed(SessionClaims),
    SignedOut,
}

impl SessionEvent {
    pub fn claims(&self) -> Option<&SessionClaims> {
        match self {
            SessionEvent::SignedIn(claims) | SessionEvent::TokenRefreshed(claims) => Some(claims),
            SessionEvent::SignedOut => None,
        }
    }
}

/// The signed in user as held by the session context.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl From<&SessionClaims> for CurrentUser {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            id: claims.sub.clone(),
            email: claims.email.clone(),
            display_name: claims.display_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name_prefers_display_name_then_full_name() {
        let claims: SessionClaims = serde_json::from_value(json!({
            "id": "u-1",
            "email": "ada@example.com",
            "user_metadata": {"full_name": "Ada Lovelace", "name": "ada"}
        }))
        .unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.display_name().as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_blank_or_missing_metadata_has_no_display_name() {
        let claims: SessionClaims = serde_json::from_value(json!({
            "sub": "u-2",
            "email": "bob@example.com",
            "user_metadata": {"display_name": "   "}
        }))
        .unwrap();
        assert_eq!(claims.display_name(), None);

        let bare: SessionClaims =
            serde_json::from_value(json!({"sub": "u-3", "email": "c@example.com"})).unwrap();
        assert_eq!(bare.display_name(), None);
    }
}
