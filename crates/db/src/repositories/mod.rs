use async_trait::async_trait;
use thiserror::Error;

use product_info_core::domain::product::{Product, ProductId};
use product_info_core::{ApplicationError, DomainError};

pub mod memory;
pub mod product;

pub use memory::InMemoryProductRepository;
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid product identifier `{0}`")]
    InvalidId(ProductId),
    #[error("no product identifier left above `{0}`")]
    IdsExhausted(ProductId),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::IdsExhausted(last) => Self::Domain(DomainError::InvalidArgument(
                format!("cannot assign a product id, the highest stored id is {last}"),
            )),
            other => Self::Persistence(other.to_string()),
        }
    }
}

/// Entry point to product storage. Every read or write goes through a unit of work.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Opens a unit that may write. Writers are serialized from the start,
    /// so two units never hand out the same [`ProductUnitOfWork::next_id`].
    async fn begin(&self) -> Result<Box<dyn ProductUnitOfWork>, RepositoryError>;

    /// Opens a unit that only reads and does not block writers.
    async fn begin_read(&self) -> Result<Box<dyn ProductUnitOfWork>, RepositoryError> {
        self.begin().await
    }
}

/// One atomic scope over the product store.
///
/// Writes are invisible to other units until [`ProductUnitOfWork::commit`].
/// Dropping an uncommitted unit discards its writes.
#[async_trait]
pub trait ProductUnitOfWork: Send {
    async fn find_by_id(&mut self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Smallest identifier greater than every stored one.
    ///
    /// Fails with [`RepositoryError::IdsExhausted`] once `i64::MAX` is taken.
    async fn next_id(&mut self) -> Result<ProductId, RepositoryError>;

    /// Inserts the product, or replaces the row that already has its id.
    async fn save(&mut self, product: Product) -> Result<Product, RepositoryError>;

    /// Fails with [`RepositoryError::InvalidId`] for malformed or unknown ids.
    async fn delete_by_id(&mut self, id: ProductId) -> Result<(), RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError>;
}
