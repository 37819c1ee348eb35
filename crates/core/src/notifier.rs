use async_trait::async_trait;
use thiserror::Error;

use crate::domain::catalog::CatalogProduct;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("catalog service unreachable: {0}")]
    Transport(String),
    #[error("catalog service rejected product {product_id} with status {status}")]
    Rejected { product_id: i64, status: u16 },
}

/// Pushes newly created products to the catalog service.
#[async_trait]
pub trait CatalogNotifier: Send + Sync {
    async fn notify(&self, product: &CatalogProduct) -> Result<(), NotifyError>;
}
