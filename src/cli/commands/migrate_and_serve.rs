use anyhow::Result;
use tracing::{debug, info, trace};

use super::initdb::init_database;
use super::serve::run_server;
use crate::config::Settings;

pub async fn migrate_and_serve(
    database_url: Option<String>,
    bind_address: Option<String>,
) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");

    let settings = Settings::load()?
        .with_database_url(database_url)
        .with_bind_address(bind_address);
    debug!("Database URL: {}", settings.database_url);

    init_database(&settings.database_url).await?;

    run_server(&settings).await
}
