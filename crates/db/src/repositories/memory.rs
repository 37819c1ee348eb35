use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use product_info_core::domain::product::{Product, ProductId};

use super::{ProductRepository, ProductUnitOfWork, RepositoryError};

type ProductTable = BTreeMap<i64, Product>;

/// Process-local product store.
///
/// A unit of work holds the table lock until it finishes and stages writes on
/// a copy, so units are serialized and a rollback leaves the table untouched.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<Mutex<ProductTable>>,
}

impl InMemoryProductRepository {
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let table = products.into_iter().map(|product| (product.id.0, product)).collect();
        Self { products: Arc::new(Mutex::new(table)) }
    }

    pub async fn len(&self) -> usize {
        self.products.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn begin(&self) -> Result<Box<dyn ProductUnitOfWork>, RepositoryError> {
        let guard = Arc::clone(&self.products).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryProductUnitOfWork { guard, staged }))
    }
}

struct InMemoryProductUnitOfWork {
    guard: OwnedMutexGuard<ProductTable>,
    staged: ProductTable,
}

#[async_trait::async_trait]
impl ProductUnitOfWork for InMemoryProductUnitOfWork {
    async fn find_by_id(&mut self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.staged.get(&id.0).cloned())
    }

    async fn next_id(&mut self) -> Result<ProductId, RepositoryError> {
        let last = self.staged.keys().next_back().copied().unwrap_or(0);
        last.checked_add(1).map(ProductId).ok_or(RepositoryError::IdsExhausted(ProductId(last)))
    }

    async fn save(&mut self, product: Product) -> Result<Product, RepositoryError> {
        if !product.id.is_valid() {
            return Err(RepositoryError::InvalidId(product.id));
        }
        self.staged.insert(product.id.0, product.clone());
        Ok(product)
    }

    async fn delete_by_id(&mut self, id: ProductId) -> Result<(), RepositoryError> {
        if !id.is_valid() {
            return Err(RepositoryError::InvalidId(id));
        }
        self.staged.remove(&id.0).map(|_| ()).ok_or(RepositoryError::InvalidId(id))
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let Self { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        Ok(())
    }
}
