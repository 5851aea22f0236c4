use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::{AuthOutcome, CurrentUserDto, OnboardingOutcome};
use sea_orm::DatabaseConnection;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, trace, warn};

use super::{AuthError, AuthProvider, CurrentUser, SessionClaims};
use crate::store::{preferences, users};

/// Where a successful login lands.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// Where a logout lands.
pub const LOGIN_VIEW: &str = "/login";

const ONBOARDING_NOT_SAVED: &str =
    "Your onboarding progress could not be saved and may be shown again next time.";

/// Outcome of [`SessionContext::check_session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheck {
    /// Another check was already running.
    Skipped,
    Unchanged,
    Changed,
}

/// Clears the in-flight flag when the check ends, even on early return.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Current-user state of the server, fed by the hosted auth provider.
#[derive(Debug)]
pub struct SessionContext {
    provider: Arc<dyn AuthProvider>,
    user: RwLock<Option<CurrentUser>>,
    show_onboarding: AtomicBool,
    checking: AtomicBool,
}

impl SessionContext {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            user: RwLock::new(None),
            show_onboarding: AtomicBool::new(false),
            checking: AtomicBool::new(false),
        }
    }

    /// Loads the provider's active session, if any.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), AuthError> {
        let claims = self.provider.get_session().await?;
        match &claims {
            Some(claims) => info!("Resuming session of {}", claims.sub),
            None => debug!("No active session at start"),
        }
        self.reconcile(claims.as_ref()).await;
        Ok(())
    }

    /// Brings the local user in line with `claims`. Returns whether the
    /// signed in identity changed.
    pub async fn reconcile(&self, claims: Option<&SessionClaims>) -> bool {
        let mut user = self.user.write().await;
        let current_id = user.as_ref().map(|u| u.id.as_str());
        let incoming_id = claims.map(|c| c.sub.as_str());
        if current_id == incoming_id {
            trace!("Session identity unchanged");
            return false;
        }

        match claims {
            Some(claims) => {
                info!("Session user changed to {}", claims.sub);
                *user = Some(CurrentUser::from(claims));
            }
            None => {
                info!("Session ended");
                *user = None;
                self.show_onboarding.store(false, Ordering::Release);
            }
        }
        true
    }

    /// Re-reads the provider's session. At most one check runs at a time,
    /// a concurrent call returns [`SessionCheck::Skipped`] at once.
    #[instrument(skip(self))]
    pub async fn check_session(&self) -> Result<SessionCheck, AuthError> {
        let Some(_in_flight) = InFlight::acquire(&self.checking) else {
            debug!("Session check already in flight");
            return Ok(SessionCheck::Skipped);
        };

        let claims = self.provider.get_session().await?;
        if self.reconcile(claims.as_ref()).await {
            Ok(SessionCheck::Changed)
        } else {
            Ok(SessionCheck::Unchanged)
        }
    }

    /// Signs in and lands on the dashboard. Failures are reported in the
    /// outcome, never as errors.
    #[instrument(skip(self, db, password))]
    pub async fn login(&self, db: &DatabaseConnection, email: &str, password: &str) -> AuthOutcome {
        trace!("Entering login");
        if let Err(err) = self.provider.sign_in_with_password(email, password).await {
            return match err {
                AuthError::InvalidCredentials(message) => AuthOutcome::failure(message),
                other => {
                    warn!("Sign in for {} failed: {}", email, other);
                    AuthOutcome::failure(other.to_string())
                }
            };
        }

        let claims = match self.provider.get_session().await {
            Ok(Some(claims)) => claims,
            Ok(None) => return AuthOutcome::failure(AuthError::NoSession.to_string()),
            Err(err) => {
                warn!("Session lookup after sign in failed: {}", err);
                return AuthOutcome::failure(err.to_string());
            }
        };

        if let Err(err) = users::ensure_user(db, &claims).await {
            warn!("Could not record user {}: {}", claims.sub, err);
        }
        let show_onboarding = match preferences::get_or_default(db, &claims.sub).await {
            Ok(prefs) => prefs.show_onboarding,
            Err(err) => {
                warn!("Could not load preferences of {}: {}", claims.sub, err);
                true
            }
        };

        self.reconcile(Some(&claims)).await;
        self.show_onboarding.store(show_onboarding, Ordering::Release);
        info!("User {} logged in", claims.sub);
        AuthOutcome::redirect(DASHBOARD_VIEW)
    }

    /// Clears local state and lands on the login view. A failing provider
    /// sign-out is logged and ignored.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> AuthOutcome {
        if let Err(err) = self.provider.sign_out().await {
            warn!("Provider sign out failed: {}", err);
        }
        self.user.write().await.take();
        self.show_onboarding.store(false, Ordering::Release);
        info!("Logged out");
        AuthOutcome::redirect(LOGIN_VIEW)
    }

    pub async fn current_user(&self) -> Option<CurrentUserDto> {
        self.user.read().await.as_ref().map(|user| CurrentUserDto {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            show_onboarding: self.show_onboarding.load(Ordering::Acquire),
        })
    }

    pub fn show_onboarding(&self) -> bool {
        self.show_onboarding.load(Ordering::Acquire)
    }

    /// Hides onboarding and tries to remember that. Never fails: when the
    /// flag cannot be saved the outcome carries a notice instead.
    #[instrument(skip(self, db))]
    pub async fn complete_onboarding(&self, db: &DatabaseConnection) -> OnboardingOutcome {
        self.show_onboarding.store(false, Ordering::Release);

        let user_id = self.user.read().await.as_ref().map(|u| u.id.clone());
        let notice = match user_id {
            Some(user_id) => match preferences::set_show_onboarding(db, &user_id, false).await {
                Ok(_) => {
                    info!("Onboarding completed for {}", user_id);
                    None
                }
                Err(err) => {
                    warn!("Failed to save onboarding state of {}: {}", user_id, err);
                    Some(ONBOARDING_NOT_SAVED.to_string())
                }
            },
            None => {
                warn!("Onboarding completed without a signed in user");
                Some(ONBOARDING_NOT_SAVED.to_string())
            }
        };

        OnboardingOutcome {
            show_onboarding: false,
            notice,
        }
    }

    /// Follows the provider's session events until the provider goes away.
    pub fn spawn_session_listener(self: Arc<Self>) -> JoinHandle<()> {
        let mut events = self.provider.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if self.reconcile(event.claims()).await {
                            debug!("Session event {:?} changed the user", event);
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Missed {} session events, re-checking session", skipped);
                        if let Err(err) = self.check_session().await {
                            warn!("Session check failed: {}", err);
                        }
                    }
                    Err(RecvError::Closed) => {
                        debug!("Session event stream closed");
                        break;
                    }
                }
            }
        })
    }
}
