//! Outbound client for the product catalog service.

use std::time::Duration;

use product_info_core::config::CatalogConfig;
use product_info_core::{ApplicationError, CatalogNotifier, CatalogProduct, NotifyError};
use reqwest::Client;
use tracing::{info, warn};

pub struct HttpCatalogNotifier {
    client: Client,
    products_url: String,
}

impl HttpCatalogNotifier {
    pub fn new(config: &CatalogConfig) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                ApplicationError::Configuration(format!("catalog http client: {error}"))
            })?;
        Ok(Self::with_client(client, config.products_url.clone()))
    }

    pub fn with_client(client: Client, products_url: impl Into<String>) -> Self {
        Self { client, products_url: products_url.into() }
    }
}

#[async_trait::async_trait]
impl CatalogNotifier for HttpCatalogNotifier {
    async fn notify(&self, product: &CatalogProduct) -> Result<(), NotifyError> {
        let response =
            self.client.post(&self.products_url).json(product).send().await.map_err(|error| {
                warn!(
                    event_name = "product.catalog.post_failed",
                    product_id = product.id.0,
                    error = %error,
                    "catalog request failed"
                );
                NotifyError::Transport(error.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                event_name = "product.catalog.post_rejected",
                product_id = product.id.0,
                status = status.as_u16(),
                "catalog service rejected product"
            );
            return Err(NotifyError::Rejected { product_id: product.id.0, status: status.as_u16() });
        }

        info!(
            event_name = "product.catalog.posted",
            product_id = product.id.0,
            "product forwarded to catalog service"
        );
        Ok(())
    }
}
