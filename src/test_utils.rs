#[cfg(test)]
pub mod test_utils {
    use std::sync::{Arc, Mutex};

    use crate::ai::{AiError, PromptModel};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use crate::session::{AuthError, AuthProvider, SessionClaims, SessionContext, SessionEvent};
    use crate::store;
    use async_trait::async_trait;
    use axum::Router;
    use common::CreateUserRequest;
    use migration::{Migrator, MigratorTrait};
    use moka::future::Cache;
    use sea_orm::{Database, DatabaseConnection};
    use serde_json::{json, Value};
    use tokio::sync::broadcast;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const TEST_USER_1: &str = "user-1";
    pub const TEST_USER_2: &str = "user-2";
    pub const TEST_PASSWORD: &str = "correct-horse";
    /// Identity id every successful fake sign in resolves to
    pub const FAKE_AUTH_USER: &str = "auth-user";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing with two users and no hosted services
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;

        for (id, email) in [(TEST_USER_1, "one@example.com"), (TEST_USER_2, "two@example.com")] {
            store::users::create(
                &db,
                CreateUserRequest {
                    id: id.to_string(),
                    email: email.to_string(),
                    display_name: None,
                },
            )
            .await
            .expect("Failed to create test user");
        }

        AppState {
            db,
            cache: Cache::new(100),
            session: None,
            ai: None,
            forecast_generation: Arc::default(),
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level comes from RUST_LOG and defaults to WARN.
    pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _guard = init_test_tracing();
        create_router(setup_test_app_state().await)
    }

    /// Auth provider accepting [`TEST_PASSWORD`] for any email.
    #[derive(Debug)]
    pub struct FakeAuthProvider {
        session: Mutex<Option<SessionClaims>>,
        events: broadcast::Sender<SessionEvent>,
    }

    impl FakeAuthProvider {
        pub fn new() -> Self {
            let (events, _) = broadcast::channel(16);
            Self {
                session: Mutex::new(None),
                events,
            }
        }
    }

    #[async_trait]
    impl AuthProvider for FakeAuthProvider {
        async fn get_session(&self) -> Result<Option<SessionClaims>, AuthError> {
            Ok(self.session.lock().unwrap().clone())
        }

        async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
            if password != TEST_PASSWORD {
                return Err(AuthError::InvalidCredentials(
                    "Invalid login credentials".to_string(),
                ));
            }
            let claims = SessionClaims {
                sub: FAKE_AUTH_USER.to_string(),
                email: email.to_string(),
                user_metadata: json!({ "full_name": "Test Person" }),
            };
            *self.session.lock().unwrap() = Some(claims.clone());
            let _ = self.events.send(SessionEvent::SignedIn(claims));
            Ok(())
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            *self.session.lock().unwrap() = None;
            let _ = self.events.send(SessionEvent::SignedOut);
            Ok(())
        }

        fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
            self.events.subscribe()
        }
    }

    /// Model answering every prompt with the same JSON.
    #[derive(Debug)]
    pub struct CannedModel(pub Value);

    #[async_trait]
    impl PromptModel for CannedModel {
        async fn generate(&self, _prompt: &str, _schema: &Value) -> Result<Value, AiError> {
            Ok(self.0.clone())
        }
    }

    /// Create axum app whose auth and suggestion endpoints are backed by fakes
    pub async fn setup_test_app_with_services(answer: Value) -> (Router, AppState) {
        let _guard = init_test_tracing();
        let mut state = setup_test_app_state().await;
        state.session = Some(Arc::new(SessionContext::new(Arc::new(FakeAuthProvider::new()))));
        state.ai = Some(Arc::new(CannedModel(answer)));
        (create_router(state.clone()), state)
    }
}
