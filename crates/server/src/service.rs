//! Product use cases. Knows nothing about HTTP.

use std::sync::Arc;

use product_info_core::{
    ApplicationError, CatalogNotifier, CatalogProduct, DomainError, NewProduct, Product,
    ProductDto, ProductId, ProductMapper,
};
use product_info_db::{ProductRepository, ProductUnitOfWork, RepositoryError};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    notifier: Arc<dyn CatalogNotifier>,
    mapper: ProductMapper,
}

impl ProductService {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        notifier: Arc<dyn CatalogNotifier>,
        mapper: ProductMapper,
    ) -> Self {
        Self { repository, notifier, mapper }
    }

    pub async fn get_product_by_id(&self, id: ProductId) -> Result<ProductDto, ApplicationError> {
        let mut uow = self.repository.begin_read().await?;
        let found = uow.find_by_id(id).await;
        // Reads never commit.
        rollback_quietly(uow).await;

        let product = found?.ok_or_else(DomainError::product_not_found)?;
        Ok(self.mapper.to_dto(&product))
    }

    /// Forwards the product to the catalog service, then stores it.
    ///
    /// The catalog call happens inside the open unit of work and before the
    /// save, so a failed notification leaves nothing behind locally.
    pub async fn add_new_product(
        &self,
        new_product: NewProduct,
    ) -> Result<ProductDto, ApplicationError> {
        let mut uow = self.repository.begin().await?;
        let result = self.add_in(uow.as_mut(), new_product).await;
        let saved = finish(uow, result).await?;

        info!(
            event_name = "product.service.created",
            product_id = saved.id.0,
            "product saved and forwarded to product-catalog-service"
        );
        Ok(self.mapper.to_dto(&saved))
    }

    async fn add_in(
        &self,
        uow: &mut dyn ProductUnitOfWork,
        new_product: NewProduct,
    ) -> Result<Product, ApplicationError> {
        let id = match new_product.id {
            Some(id) if !id.is_valid() => {
                return Err(DomainError::InvalidArgument(format!(
                    "product id must be positive, got {id}"
                ))
                .into());
            }
            Some(id) => id,
            None => uow.next_id().await?,
        };
        let product = new_product.with_id(id);

        self.notifier.notify(&CatalogProduct::from(&product)).await?;
        Ok(uow.save(product).await?)
    }

    /// Replaces all mutable fields of an existing product.
    pub async fn update_product(&self, product: Product) -> Result<ProductDto, ApplicationError> {
        let mut uow = self.repository.begin().await?;
        let result = update_in(uow.as_mut(), &product).await;
        let updated = finish(uow, result).await?;

        info!(
            event_name = "product.service.updated",
            product_id = updated.id.0,
            "updated the properties of product in product-info-service"
        );
        Ok(self.mapper.to_dto(&updated))
    }

    pub async fn delete_product_by_id(&self, id: ProductId) -> Result<(), ApplicationError> {
        info!(event_name = "product.service.deleting", product_id = id.0, "deleting product");
        let mut uow = self.repository.begin().await?;
        let result = uow.delete_by_id(id).await.map_err(|repo_error| match repo_error {
            RepositoryError::InvalidId(id) => {
                error!(
                    event_name = "product.service.delete_failed",
                    product_id = id.0,
                    "an error occurred while removing the product"
                );
                ApplicationError::from(DomainError::unknown_product_id(id))
            }
            other => other.into(),
        });
        finish(uow, result).await
    }
}

async fn update_in(
    uow: &mut dyn ProductUnitOfWork,
    incoming: &Product,
) -> Result<Product, ApplicationError> {
    let mut stored =
        uow.find_by_id(incoming.id).await?.ok_or_else(DomainError::update_target_not_found)?;
    stored.replace_fields(incoming);
    Ok(uow.save(stored).await?)
}

/// Commits on success and rolls back on failure, keeping the original error.
async fn finish<T>(
    uow: Box<dyn ProductUnitOfWork>,
    result: Result<T, ApplicationError>,
) -> Result<T, ApplicationError> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(error) => {
            rollback_quietly(uow).await;
            Err(error)
        }
    }
}

async fn rollback_quietly(uow: Box<dyn ProductUnitOfWork>) {
    if let Err(error) = uow.rollback().await {
        warn!(event_name = "product.service.rollback_failed", error = %error, "rollback failed");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use product_info_core::errors::{PRODUCT_NOT_FOUND_MESSAGE, UPDATE_TARGET_NOT_FOUND_MESSAGE};
    use product_info_core::{
        ApplicationError, DomainError, NewProduct, NotifyError, Product, ProductId, ProductMapper,
    };
    use product_info_db::{InMemoryProductRepository, ProductRepository};
    use rust_decimal::Decimal;

    use super::ProductService;
    use crate::testing::{CallLog, RecordingNotifier, RecordingRepository};

    fn shirt() -> Product {
        Product {
            id: ProductId(1),
            name: "Shirt".to_string(),
            brand_name: "Acme".to_string(),
            size: "M".to_string(),
            available: true,
            description: "Cotton".to_string(),
            price: Decimal::new(1999, 2),
        }
    }

    fn new_shirt(id: Option<i64>) -> NewProduct {
        NewProduct {
            id: id.map(ProductId),
            name: "Shirt".to_string(),
            brand_name: "Acme".to_string(),
            size: "M".to_string(),
            available: true,
            description: "Cotton".to_string(),
            price: Decimal::new(1999, 2),
        }
    }

    struct Harness {
        service: ProductService,
        store: InMemoryProductRepository,
        log: CallLog,
    }

    fn harness(store: InMemoryProductRepository, notify_failure: Option<NotifyError>) -> Harness {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let notifier = match notify_failure {
            Some(failure) => RecordingNotifier::failing(Arc::clone(&log), failure),
            None => RecordingNotifier::succeeding(Arc::clone(&log)),
        };
        let service = ProductService::new(
            Arc::new(RecordingRepository::new(store.clone(), Arc::clone(&log))),
            Arc::new(notifier),
            ProductMapper,
        );
        Harness { service, store, log }
    }

    fn calls(log: &CallLog) -> Vec<String> {
        log.lock().expect("log").clone()
    }

    async fn stored(store: &InMemoryProductRepository, id: i64) -> Option<Product> {
        let mut uow = store.begin().await.expect("begin");
        uow.find_by_id(ProductId(id)).await.expect("find")
    }

    #[tokio::test]
    async fn get_returns_dto_matching_stored_record() {
        let h = harness(InMemoryProductRepository::with_products([shirt()]), None);

        let dto = h.service.get_product_by_id(ProductId(1)).await.expect("found");

        assert_eq!(Product::from(dto), shirt());
        assert_eq!(calls(&h.log), vec!["begin", "find:1", "rollback"]);
    }

    #[tokio::test]
    async fn get_missing_product_is_not_found_and_writes_nothing() {
        let h = harness(InMemoryProductRepository::with_products([shirt()]), None);

        let error = h.service.get_product_by_id(ProductId(2)).await.expect_err("missing");

        assert_eq!(
            error,
            ApplicationError::Domain(DomainError::NotFound(PRODUCT_NOT_FOUND_MESSAGE.to_string()))
        );
        assert!(!calls(&h.log).iter().any(|call| call.starts_with("save") || call == "commit"));
        assert_eq!(h.store.len().await, 1);
    }

    #[tokio::test]
    async fn add_notifies_catalog_before_saving() {
        let h = harness(InMemoryProductRepository::default(), None);

        let dto = h.service.add_new_product(new_shirt(Some(1))).await.expect("created");

        assert_eq!(Product::from(dto), shirt());
        assert_eq!(calls(&h.log), vec!["begin", "notify:1:Shirt:Acme", "save:1", "commit"]);
        assert_eq!(stored(&h.store, 1).await, Some(shirt()));
    }

    #[tokio::test]
    async fn add_without_id_assigns_one_before_notifying() {
        let existing = Product { id: ProductId(4), ..shirt() };
        let h = harness(InMemoryProductRepository::with_products([existing]), None);

        let dto = h.service.add_new_product(new_shirt(None)).await.expect("created");

        assert_eq!(dto.id, ProductId(5));
        assert_eq!(
            calls(&h.log),
            vec!["begin", "next_id", "notify:5:Shirt:Acme", "save:5", "commit"]
        );
    }

    #[tokio::test]
    async fn failed_notification_prevents_the_save() {
        let h = harness(
            InMemoryProductRepository::default(),
            Some(NotifyError::Transport("connection refused".to_string())),
        );

        let error = h.service.add_new_product(new_shirt(Some(1))).await.expect_err("notify fails");

        assert!(matches!(error, ApplicationError::Integration(_)));
        assert_eq!(calls(&h.log), vec!["begin", "notify:1:Shirt:Acme", "rollback"]);
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn add_rejects_non_positive_id_without_notifying() {
        let h = harness(InMemoryProductRepository::default(), None);

        let error = h.service.add_new_product(new_shirt(Some(0))).await.expect_err("bad id");

        assert!(matches!(error, ApplicationError::Domain(DomainError::InvalidArgument(_))));
        assert!(!calls(&h.log).iter().any(|call| call.starts_with("notify")));
    }

    #[tokio::test]
    async fn add_without_id_after_max_id_is_invalid_argument_without_notifying() {
        let last = Product { id: ProductId(i64::MAX), ..shirt() };
        let h = harness(InMemoryProductRepository::with_products([last]), None);

        let error = h.service.add_new_product(new_shirt(None)).await.expect_err("no id left");

        assert!(matches!(error, ApplicationError::Domain(DomainError::InvalidArgument(_))));
        assert_eq!(calls(&h.log), vec!["begin", "next_id", "rollback"]);
        assert_eq!(h.store.len().await, 1);
    }

    #[tokio::test]
    async fn update_overwrites_all_mutable_fields_and_keeps_id() {
        let h = harness(InMemoryProductRepository::with_products([shirt()]), None);
        let incoming = Product {
            id: ProductId(1),
            name: "Hoodie".to_string(),
            brand_name: "Globex".to_string(),
            size: "XL".to_string(),
            available: false,
            description: "Fleece".to_string(),
            price: Decimal::new(4950, 2),
        };

        let dto = h.service.update_product(incoming.clone()).await.expect("updated");

        assert_eq!(Product::from(dto), incoming);
        assert_eq!(stored(&h.store, 1).await, Some(incoming));
        assert_eq!(calls(&h.log), vec!["begin", "find:1", "save:1", "commit"]);
    }

    #[tokio::test]
    async fn update_of_missing_product_is_not_found_and_leaves_store_unchanged() {
        let h = harness(InMemoryProductRepository::with_products([shirt()]), None);
        let incoming = Product { id: ProductId(2), name: "Ghost".to_string(), ..shirt() };

        let error = h.service.update_product(incoming).await.expect_err("missing");

        assert_eq!(
            error,
            ApplicationError::Domain(DomainError::NotFound(
                UPDATE_TARGET_NOT_FOUND_MESSAGE.to_string()
            ))
        );
        assert_eq!(calls(&h.log), vec!["begin", "find:2", "rollback"]);
        assert_eq!(stored(&h.store, 1).await, Some(shirt()));
        assert_eq!(h.store.len().await, 1);
    }

    #[tokio::test]
    async fn delete_removes_product_so_get_is_not_found() {
        let h = harness(InMemoryProductRepository::with_products([shirt()]), None);

        h.service.delete_product_by_id(ProductId(1)).await.expect("deleted");
        let error = h.service.get_product_by_id(ProductId(1)).await.expect_err("gone");

        assert!(matches!(error, ApplicationError::Domain(DomainError::NotFound(_))));
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_invalid_argument_naming_the_id() {
        let h = harness(InMemoryProductRepository::default(), None);

        let error = h.service.delete_product_by_id(ProductId(77)).await.expect_err("unknown");

        match error {
            ApplicationError::Domain(DomainError::InvalidArgument(message)) => {
                assert!(message.contains("77"), "message should name the id: {message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls(&h.log), vec!["begin", "delete:77", "rollback"]);
    }
}
