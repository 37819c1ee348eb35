use std::sync::Arc;

use product_info_core::config::{AppConfig, ConfigError, LoadOptions};
use product_info_core::{ApplicationError, ProductMapper};
use product_info_db::{connect_with_settings, migrations, DbPool, SqlProductRepository};
use thiserror::Error;
use tracing::info;

use crate::catalog::HttpCatalogNotifier;
use crate::service::ProductService;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub product_service: ProductService,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("catalog client setup failed: {0}")]
    Catalog(#[source] ApplicationError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let notifier = HttpCatalogNotifier::new(&config.catalog).map_err(BootstrapError::Catalog)?;
    info!(
        event_name = "system.bootstrap.catalog_client_ready",
        correlation_id = "bootstrap",
        catalog_url = %config.catalog.products_url,
        timeout_secs = config.catalog.timeout_secs,
        "catalog client configured"
    );

    let product_service = ProductService::new(
        Arc::new(SqlProductRepository::new(db_pool.clone())),
        Arc::new(notifier),
        ProductMapper,
    );

    Ok(Application { config, db_pool, product_service })
}
