use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, instrument, warn};

use super::{AuthError, AuthProvider, SessionClaims, SessionEvent};

const EVENT_CAPACITY: usize = 16;

#[derive(Debug)]
struct ActiveSession {
    access_token: SecretString,
    claims: SessionClaims,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: SessionClaims,
}

/// Error body of the token endpoint; older deployments use
/// `error_description`, newer ones `msg`.
#[derive(Deserialize, Default)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn message(self) -> Option<String> {
        self.error_description.or(self.msg).or(self.error)
    }
}

/// Client of a GoTrue compatible auth REST API (`{url}/auth/v1/...`).
#[derive(Debug)]
pub struct HostedAuthClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: SecretString,
    session: RwLock<Option<ActiveSession>>,
    events: broadcast::Sender<SessionEvent>,
}

impl HostedAuthClient {
    pub fn new(base_url: impl Into<String>, anon_key: SecretString) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key,
            session: RwLock::new(None),
            events,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn publish(&self, event: SessionEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl AuthProvider for HostedAuthClient {
    #[instrument(skip(self))]
    async fn get_session(&self) -> Result<Option<SessionClaims>, AuthError> {
        let token = match self.session.read().await.as_ref() {
            Some(active) => active.access_token.expose_secret().to_string(),
            None => return Ok(None),
        };

        let response = self
            .http
            .get(self.endpoint("user"))
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            info!("Hosted session expired, treating as signed out");
            self.session.write().await.take();
            self.publish(SessionEvent::SignedOut);
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let claims: SessionClaims = response
            .json()
            .await
            .map_err(|err| AuthError::InvalidResponse(err.to_string()))?;
        if let Some(active) = self.session.write().await.as_mut() {
            active.claims = claims.clone();
        }
        debug!("Active session for {}", claims.sub);
        Ok(Some(claims))
    }

    #[instrument(skip(self, password))]
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", self.anon_key.expose_secret())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            let message = body
                .message()
                .unwrap_or_else(|| "Invalid login credentials".to_string());
            warn!("Sign in rejected for {}: {}", email, message);
            return Err(AuthError::InvalidCredentials(message));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| AuthError::InvalidResponse(err.to_string()))?;
        let claims = token.user;
        *self.session.write().await = Some(ActiveSession {
            access_token: SecretString::from(token.access_token),
            claims: claims.clone(),
        });
        info!("Signed in as {}", claims.sub);
        self.publish(SessionEvent::SignedIn(claims));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(active) = self.session.write().await.take() else {
            return Ok(());
        };
        self.publish(SessionEvent::SignedOut);

        let response = self
            .http
            .post(self.endpoint("logout"))
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(active.access_token.expose_secret())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        info!("Signed out {}", active.claims.sub);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::Value;
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    const ANON_KEY: &str = "anon-test-key";
    const TOKEN: &str = "access-token-1";

    fn authorized(headers: &HeaderMap) -> bool {
        headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(ANON_KEY)
            && headers.get("authorization").and_then(|v| v.to_str().ok())
                == Some(format!("Bearer {}", TOKEN).as_str())
    }

    async fn token(
        Query(params): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if params.get("grant_type").map(String::as_str) != Some("password") {
            return (StatusCode::BAD_REQUEST, Json(json!({"msg": "unsupported grant type"})));
        }
        if body["password"] != "correct horse" {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "invalid_grant", "error_description": "Invalid login credentials"})),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "access_token": TOKEN,
                "token_type": "bearer",
                "user": {"id": "u-1", "email": body["email"], "user_metadata": {"full_name": "Ada"}}
            })),
        )
    }

    async fn user(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"msg": "invalid JWT"})));
        }
        (
            StatusCode::OK,
            Json(json!({"id": "u-1", "email": "ada@example.com", "user_metadata": {"full_name": "Ada"}})),
        )
    }

    async fn logout(headers: HeaderMap) -> StatusCode {
        if authorized(&headers) {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::UNAUTHORIZED
        }
    }

    async fn spawn_fake_auth() -> String {
        let app = Router::new()
            .route("/auth/v1/token", post(token))
            .route("/auth/v1/user", get(user))
            .route("/auth/v1/logout", post(logout));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_sign_in_session_and_sign_out() {
        let url = spawn_fake_auth().await;
        let client = HostedAuthClient::new(url, SecretString::from(ANON_KEY)).unwrap();
        let mut events = client.subscribe();

        assert_eq!(client.get_session().await.unwrap(), None);

        client
            .sign_in_with_password("ada@example.com", "correct horse")
            .await
            .unwrap();
        let event = events.recv().await.unwrap();
        assert_eq!(event.claims().map(|c| c.sub.as_str()), Some("u-1"));

        let claims = client.get_session().await.unwrap().unwrap();
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.display_name().as_deref(), Some("Ada"));

        client.sign_out().await.unwrap();
        assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedOut);
        assert_eq!(client.get_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let url = spawn_fake_auth().await;
        let client = HostedAuthClient::new(url, SecretString::from(ANON_KEY)).unwrap();

        let err = client
            .sign_in_with_password("ada@example.com", "wrong")
            .await
            .unwrap_err();
        match err {
            AuthError::InvalidCredentials(message) => assert_eq!(message, "Invalid login credentials"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(client.get_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejected_token_reads_as_signed_out() {
        let url = spawn_fake_auth().await;
        let client = HostedAuthClient::new(url, SecretString::from("wrong-anon-key")).unwrap();
        *client.session.write().await = Some(ActiveSession {
            access_token: SecretString::from(TOKEN),
            claims: SessionClaims {
                sub: "u-1".to_string(),
                email: "ada@example.com".to_string(),
                user_metadata: Value::Null,
            },
        });

        assert_eq!(client.get_session().await.unwrap(), None);
        assert!(client.session.read().await.is_none());
    }
}
