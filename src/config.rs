use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use moka::future::Cache;
use sea_orm::Database;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::ai::{HostedModel, PromptModel};
use crate::schemas::AppState;
use crate::session::{HostedAuthClient, SessionContext};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://pocket_ledger.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_AI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_AI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub ttl_secs: u64,
    pub capacity: u64,
}

/// Hosted auth provider. Auth endpoints answer 503 without it.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub url: String,
    pub anon_key: String,
}

/// Hosted generative model. Suggestion endpoints answer 503 without it.
#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_ai_model")]
    pub model: String,
    pub api_key: String,
}

fn default_ai_endpoint() -> String {
    DEFAULT_AI_ENDPOINT.to_string()
}

fn default_ai_model() -> String {
    DEFAULT_AI_MODEL.to_string()
}

/// Server settings: defaults, then `pocket_ledger.toml` (optional), then
/// `POCKET_LEDGER__*` variables, then `DATABASE_URL` / `BIND_ADDRESS`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub cache: CacheSettings,
    pub auth: Option<AuthSettings>,
    pub ai: Option<AiSettings>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(None)
    }

    /// Loads settings with `file` in place of the default `pocket_ledger.toml`.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("pocket_ledger").required(false),
        };

        let settings = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("cache.ttl_secs", 300)?
            .set_default("cache.capacity", 1000)?
            .add_source(file_source)
            .add_source(Environment::with_prefix("POCKET_LEDGER").separator("__"))
            .set_override_option("database_url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("bind_address", std::env::var("BIND_ADDRESS").ok())?
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        self
    }

    pub fn with_bind_address(mut self, bind_address: Option<String>) -> Self {
        if let Some(address) = bind_address {
            self.bind_address = address;
        }
        self
    }
}

/// Connects the database and builds the optional hosted collaborators.
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    info!("Connecting to database: {}", settings.database_url);
    let db = Database::connect(&settings.database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", settings.database_url))?;

    let cache = Cache::builder()
        .max_capacity(settings.cache.capacity)
        .time_to_live(Duration::from_secs(settings.cache.ttl_secs))
        .build();

    let session = match &settings.auth {
        Some(auth) => {
            let client = HostedAuthClient::new(&auth.url, SecretString::from(auth.anon_key.clone()))
                .context("Failed to build auth client")?;
            let context = Arc::new(SessionContext::new(Arc::new(client)));
            if let Err(err) = context.initialize().await {
                warn!("Could not load the initial session: {}", err);
            }
            context.clone().spawn_session_listener();
            info!("Hosted auth enabled at {}", auth.url);
            Some(context)
        }
        None => {
            debug!("No auth provider configured");
            None
        }
    };

    let ai = match &settings.ai {
        Some(ai) => {
            let model = HostedModel::new(&ai.endpoint, &ai.model, SecretString::from(ai.api_key.clone()))
                .context("Failed to build model client")?;
            info!("Suggestions enabled with model {}", ai.model);
            Some(Arc::new(model) as Arc<dyn PromptModel>)
        }
        None => {
            debug!("No suggestion model configured");
            None
        }
    };

    Ok(AppState {
        db,
        cache,
        session,
        ai,
        forecast_generation: Arc::default(),
    })
}
