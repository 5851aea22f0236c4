use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::AiError;

/// A text model that answers a prompt with JSON shaped by `schema`.
#[async_trait]
pub trait PromptModel: Send + Sync + std::fmt::Debug {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value, AiError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Client of a `generateContent` style endpoint
/// (`{endpoint}/v1beta/models/{model}:generateContent`).
#[derive(Debug)]
pub struct HostedModel {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: SecretString,
}

impl HostedModel {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: SecretString,
    ) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(25))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }
}

#[async_trait]
impl PromptModel for HostedModel {
    #[instrument(skip(self, prompt, schema), fields(model = %self.model))]
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value, AiError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model);
        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            }
        });

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Model call failed with {}", status);
            return Err(AiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|err| AiError::InvalidOutput(err.to_string()))?;
        let text = payload
            .candidates
            .into_iter()
            .flat_map(|candidate| candidate.content.parts)
            .find_map(|part| part.text)
            .ok_or_else(|| AiError::InvalidOutput("response has no text candidate".to_string()))?;
        debug!("Model answered with {} bytes", text.len());

        serde_json::from_str(&text).map_err(|err| AiError::InvalidOutput(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use tokio::net::TcpListener;

    async fn generate(
        Path(call): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some("model-key") {
            return (StatusCode::FORBIDDEN, Json(json!({"error": {"message": "bad key"}})));
        }
        assert_eq!(call, "test-model:generateContent");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
        let answer = json!({"category": "Groceries", "confidence": 0.9, "echo": prompt});
        (
            StatusCode::OK,
            Json(json!({"candidates": [{"content": {"parts": [{"text": answer.to_string()}]}}]})),
        )
    }

    async fn spawn_fake_model() -> String {
        let app = Router::new().route("/v1beta/models/:call", post(generate));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_generate_parses_candidate_text_as_json() {
        let url = spawn_fake_model().await;
        let model = HostedModel::new(url, "test-model", SecretString::from("model-key")).unwrap();

        let value = model
            .generate("Coffee at the corner shop", &json!({"type": "object"}))
            .await
            .unwrap();
        assert_eq!(value["category"], "Groceries");
        assert_eq!(value["echo"], "Coffee at the corner shop");
    }

    #[tokio::test]
    async fn test_rejected_key_is_status_error() {
        let url = spawn_fake_model().await;
        let model = HostedModel::new(url, "test-model", SecretString::from("other-key")).unwrap();

        let err = model.generate("x", &json!({})).await.unwrap_err();
        assert!(matches!(err, AiError::Status { status: 403, .. }));
    }
}
