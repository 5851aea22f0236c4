use std::path::Path;

use anyhow::{bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, error, info};

const EXEC_SQL_PATH: &str = "/rest/v1/rpc/exec_sql";

/// Sends the contents of `file` to the hosted `exec_sql` procedure.
pub async fn run_sql(file: &Path, supabase_url: &str, service_role_key: SecretString) -> Result<()> {
    info!("Running SQL file {}", file.display());

    let sql = std::fs::read_to_string(file)
        .with_context(|| format!("reading SQL file {}", file.display()))?;
    if sql.trim().is_empty() {
        bail!("SQL file {} is empty", file.display());
    }
    debug!("Read {} bytes of SQL", sql.len());

    let endpoint = format!("{}{}", supabase_url.trim_end_matches('/'), EXEC_SQL_PATH);
    let key = service_role_key.expose_secret();

    let response = reqwest::Client::new()
        .post(&endpoint)
        .header("apikey", key)
        .bearer_auth(key)
        .json(&json!({ "sql": sql }))
        .send()
        .await
        .with_context(|| format!("sending SQL to {}", endpoint))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("SQL execution failed with status {}: {}", status, body);
        bail!("SQL execution failed with status {}: {}", status, body);
    }

    info!("SQL executed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    async fn spawn_exec_sql(status: StatusCode) -> (String, Arc<Mutex<Vec<(HeaderMap, Value)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = seen.clone();
        let app = Router::new().route(
            EXEC_SQL_PATH,
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let recorded = recorded.clone();
                async move {
                    recorded.lock().unwrap().push((headers, body));
                    status
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    fn sql_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_run_sql_posts_file_with_service_key() {
        let (url, seen) = spawn_exec_sql(StatusCode::OK).await;
        let file = sql_file("ALTER TABLE users ADD COLUMN nickname text;");

        run_sql(file.path(), &format!("{}/", url), SecretString::from("service-key".to_string()))
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (headers, body) = &seen[0];
        assert_eq!(headers.get("apikey").unwrap(), "service-key");
        assert_eq!(headers.get("authorization").unwrap(), "Bearer service-key");
        assert_eq!(body["sql"], "ALTER TABLE users ADD COLUMN nickname text;");
    }

    #[tokio::test]
    async fn test_run_sql_fails_on_error_status() {
        let (url, _) = spawn_exec_sql(StatusCode::BAD_REQUEST).await;
        let file = sql_file("SELECT 1;");

        let err = run_sql(file.path(), &url, SecretString::from("key".to_string()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("400"));
    }

    #[tokio::test]
    async fn test_run_sql_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.sql");

        let result = run_sql(&missing, "http://127.0.0.1:9", SecretString::from("key".to_string())).await;
        assert!(result.is_err());
    }
}
